pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::database::Repositories;
use crate::error::Result;
use crate::services::{
    attachment_client::{AttachmentClient, AttachmentSource, LocalAttachments},
    attachment_service::AttachmentService,
    candidate_client::CandidateClient,
    candidate_service::CandidateService,
    peer::PeerClient,
    proxy_service::ProxyService,
};

#[derive(Clone)]
pub struct CandidatesState {
    pub candidate_service: CandidateService,
}

impl CandidatesState {
    pub fn new(candidate_service: CandidateService) -> Self {
        Self { candidate_service }
    }

    /// Co-located attachments unless `ATTACHMENT_SERVICE_URL` points at the
    /// attachment service.
    pub fn from_config(config: &Config, repositories: Repositories) -> Result<Self> {
        let source: Arc<dyn AttachmentSource> = match &config.attachment_service_url {
            Some(url) => {
                info!(%url, "reading attachments from the attachment service");
                Arc::new(AttachmentClient::new(PeerClient::new(
                    "attachment service",
                    url.clone(),
                    config.peer,
                )?))
            }
            None => {
                info!("attachments are co-located with candidates");
                Arc::new(LocalAttachments::new(repositories.attachments))
            }
        };
        Ok(Self::new(CandidateService::new(
            repositories.candidates,
            source,
        )))
    }
}

#[derive(Clone)]
pub struct AttachmentsState {
    pub attachment_service: AttachmentService,
}

impl AttachmentsState {
    pub fn new(attachment_service: AttachmentService) -> Self {
        Self { attachment_service }
    }

    pub fn from_config(config: &Config, repositories: Repositories) -> Result<Self> {
        let url = config.require_candidate_service_url()?;
        let directory = CandidateClient::new(PeerClient::new(
            "candidate service",
            url.clone(),
            config.peer,
        )?);
        Ok(Self::new(AttachmentService::new(
            repositories.attachments,
            Arc::new(directory),
        )))
    }
}

#[derive(Clone)]
pub struct GatewayState {
    pub proxy_service: ProxyService,
}

impl GatewayState {
    pub fn new(proxy_service: ProxyService) -> Self {
        Self { proxy_service }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let proxy = ProxyService::new(
            config.require_candidate_service_url()?.clone(),
            config.require_attachment_service_url()?.clone(),
            config.peer,
        )?;
        Ok(Self::new(proxy))
    }
}
