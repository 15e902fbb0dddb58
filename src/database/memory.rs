use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::store::{AttachmentRepository, CandidateRepository};
use crate::error::{Error, Result, DUPLICATE_EMAIL};
use crate::models::attachment::{Attachment, AttachmentFile, NewAttachment};
use crate::models::candidate::{Candidate, NewCandidate};

#[derive(Debug, Default)]
struct Tables {
    candidates: Vec<Candidate>,
    attachments: Vec<Attachment>,
    next_candidate_id: i32,
    next_attachment_id: i32,
}

impl Tables {
    fn push_attachment(&mut self, item: NewAttachment) -> Attachment {
        self.next_attachment_id += 1;
        let attachment = item.into_attachment(self.next_attachment_id);
        self.attachments.push(attachment.clone());
        attachment
    }
}

/// Store kept in process memory. Every write holds the lock for its whole
/// duration, which gives the same atomicity as a transaction and makes the
/// email uniqueness check race-free.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateRepository for MemoryStore {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.candidates.iter().any(|c| c.email == email))
    }

    async fn insert(
        &self,
        candidate: NewCandidate,
        attachments: Vec<AttachmentFile>,
    ) -> Result<(Candidate, Vec<Attachment>)> {
        let mut tables = self.tables.write().await;
        if tables.candidates.iter().any(|c| c.email == candidate.email) {
            return Err(Error::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        tables.next_candidate_id += 1;
        let created = candidate.into_candidate(tables.next_candidate_id);
        tables.candidates.push(created.clone());

        let stored = attachments
            .into_iter()
            .map(|file| tables.push_attachment(file.for_candidate(created.id)))
            .collect();
        Ok((created, stored))
    }

    async fn find_all(&self) -> Result<Vec<Candidate>> {
        Ok(self.tables.read().await.candidates.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Candidate>> {
        let tables = self.tables.read().await;
        Ok(tables.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_cascade(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.candidates.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        tables.attachments.retain(|a| a.candidate_id != id);
        tables.candidates.retain(|c| c.id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.read().await.candidates.len() as i64)
    }
}

#[async_trait]
impl AttachmentRepository for MemoryStore {
    async fn insert_many(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>> {
        let mut tables = self.tables.write().await;
        Ok(attachments
            .into_iter()
            .map(|item| tables.push_attachment(item))
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Attachment>> {
        Ok(self.tables.read().await.attachments.clone())
    }

    async fn find_by_candidate(&self, candidate_id: i32) -> Result<Vec<Attachment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attachments
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn delete_by_candidate(&self, candidate_id: i32) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.attachments.len();
        tables.attachments.retain(|a| a.candidate_id != candidate_id);
        Ok((before - tables.attachments.len()) as u64)
    }
}
