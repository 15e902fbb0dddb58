pub mod attachment;
pub mod candidate;
