use std::sync::Arc;

use async_trait::async_trait;

use crate::database::AttachmentRepository;
use crate::dto::attachment_dto::{AttachmentResponse, NewAttachmentPayload};
use crate::error::Result;
use crate::models::attachment::{Attachment, NewAttachment};
use crate::services::peer::{PeerClient, PeerResponse};

pub const ATTACHMENTS_PATH: &str = "/api/v1/adjuntos";

/// Where the candidate service reads attachments from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Attachments live in the candidate store and are written in the same
    /// transaction as their candidate.
    fn is_co_located(&self) -> bool;

    async fn for_candidate(&self, candidate_id: i32) -> Result<PeerResponse<Vec<Attachment>>>;

    async fn all(&self) -> Result<PeerResponse<Vec<Attachment>>>;

    async fn create(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>>;
}

/// Attachments kept in the candidate service's own store.
#[derive(Clone)]
pub struct LocalAttachments {
    repository: Arc<dyn AttachmentRepository>,
}

impl LocalAttachments {
    pub fn new(repository: Arc<dyn AttachmentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AttachmentSource for LocalAttachments {
    fn is_co_located(&self) -> bool {
        true
    }

    async fn for_candidate(&self, candidate_id: i32) -> Result<PeerResponse<Vec<Attachment>>> {
        let attachments = self.repository.find_by_candidate(candidate_id).await?;
        Ok(PeerResponse::Found(attachments))
    }

    async fn all(&self) -> Result<PeerResponse<Vec<Attachment>>> {
        Ok(PeerResponse::Found(self.repository.find_all().await?))
    }

    async fn create(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>> {
        self.repository.insert_many(attachments).await
    }
}

/// The attachment service, reached over HTTP.
#[derive(Clone)]
pub struct AttachmentClient {
    peer: PeerClient,
}

impl AttachmentClient {
    pub fn new(peer: PeerClient) -> Self {
        Self { peer }
    }
}

fn into_models(items: Vec<AttachmentResponse>) -> Vec<Attachment> {
    items.into_iter().map(Attachment::from).collect()
}

#[async_trait]
impl AttachmentSource for AttachmentClient {
    fn is_co_located(&self) -> bool {
        false
    }

    async fn for_candidate(&self, candidate_id: i32) -> Result<PeerResponse<Vec<Attachment>>> {
        let path = format!("{}/candidato/{}", ATTACHMENTS_PATH, candidate_id);
        let found: PeerResponse<Vec<AttachmentResponse>> = self.peer.get_json(&path).await?;
        Ok(found.map(into_models))
    }

    async fn all(&self) -> Result<PeerResponse<Vec<Attachment>>> {
        let found: PeerResponse<Vec<AttachmentResponse>> =
            self.peer.get_json(ATTACHMENTS_PATH).await?;
        Ok(found.map(into_models))
    }

    async fn create(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>> {
        let body: Vec<NewAttachmentPayload> = attachments.into_iter().map(Into::into).collect();
        let created: Vec<AttachmentResponse> = self.peer.post_json(ATTACHMENTS_PATH, &body).await?;
        Ok(into_models(created))
    }
}
