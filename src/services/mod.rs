pub mod attachment_client;
pub mod attachment_service;
pub mod candidate_client;
pub mod candidate_service;
pub mod peer;
pub mod proxy_service;
