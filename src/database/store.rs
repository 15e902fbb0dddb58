use async_trait::async_trait;

use crate::error::Result;
use crate::models::attachment::{Attachment, AttachmentFile, NewAttachment};
use crate::models::candidate::{Candidate, NewCandidate};

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Inserts the candidate and its co-located attachments atomically.
    /// A duplicate email surfaces as `Error::Conflict` even when the
    /// `email_exists` pre-check raced.
    async fn insert(
        &self,
        candidate: NewCandidate,
        attachments: Vec<AttachmentFile>,
    ) -> Result<(Candidate, Vec<Attachment>)>;

    async fn find_all(&self) -> Result<Vec<Candidate>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Candidate>>;

    /// Deletes co-located attachments, then the candidate, in one
    /// transaction. Returns `false` when no candidate had that id.
    async fn delete_cascade(&self, id: i32) -> Result<bool>;

    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn insert_many(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>>;

    async fn find_all(&self) -> Result<Vec<Attachment>>;

    async fn find_by_candidate(&self, candidate_id: i32) -> Result<Vec<Attachment>>;

    async fn delete_by_candidate(&self, candidate_id: i32) -> Result<u64>;
}
