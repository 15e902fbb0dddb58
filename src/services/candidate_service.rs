use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::database::CandidateRepository;
use crate::error::{Error, Result, DUPLICATE_EMAIL};
use crate::models::attachment::{Attachment, AttachmentFile};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::services::attachment_client::AttachmentSource;
use crate::services::peer::PeerResponse;

#[derive(Clone)]
pub struct CandidateService {
    candidates: Arc<dyn CandidateRepository>,
    attachments: Arc<dyn AttachmentSource>,
}

impl CandidateService {
    pub fn new(
        candidates: Arc<dyn CandidateRepository>,
        attachments: Arc<dyn AttachmentSource>,
    ) -> Self {
        Self {
            candidates,
            attachments,
        }
    }

    /// Creates a candidate and any attachments sent with it. Co-located
    /// attachments share the candidate's transaction; remote ones are posted
    /// afterwards and the candidate is removed again if that post fails.
    pub async fn create(
        &self,
        candidate: NewCandidate,
        files: Vec<AttachmentFile>,
    ) -> Result<(Candidate, Vec<Attachment>)> {
        if self.candidates.email_exists(&candidate.email).await? {
            return Err(Error::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        if self.attachments.is_co_located() || files.is_empty() {
            let (created, attachments) = self.candidates.insert(candidate, files).await?;
            info!(
                candidate_id = created.id,
                attachments = attachments.len(),
                "candidate created"
            );
            return Ok((created, attachments));
        }

        let (created, _) = self.candidates.insert(candidate, Vec::new()).await?;
        let items = files
            .into_iter()
            .map(|file| file.for_candidate(created.id))
            .collect();

        match self.attachments.create(items).await {
            Ok(attachments) => {
                info!(
                    candidate_id = created.id,
                    attachments = attachments.len(),
                    "candidate created with remote attachments"
                );
                Ok((created, attachments))
            }
            Err(err) => {
                warn!(candidate_id = created.id, error = %err, "attachment service rejected nested attachments, removing candidate");
                if let Err(rollback) = self.candidates.delete_cascade(created.id).await {
                    error!(candidate_id = created.id, error = %rollback, "failed to remove candidate after attachment failure");
                }
                Err(err)
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Candidate>> {
        let candidates = self.candidates.find_all().await?;
        if candidates.is_empty() {
            return Err(Error::NotFound("No se encontraron candidatos".to_string()));
        }
        Ok(candidates)
    }

    pub async fn get(&self, id: i32) -> Result<Candidate> {
        self.candidates.find_by_id(id).await?.ok_or_else(|| {
            Error::NotFound(format!("No se encontró un candidato con el ID dado {}", id))
        })
    }

    /// Deletes the candidate. Co-located attachments go first, in the same
    /// transaction; remote attachments are left alone.
    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.candidates.delete_cascade(id).await? {
            return Err(Error::NotFound(format!(
                "No existe un candidato con el ID {}",
                id
            )));
        }
        info!(candidate_id = id, "candidate deleted");
        Ok(())
    }

    pub async fn get_with_attachments(&self, id: i32) -> Result<(Candidate, Vec<Attachment>)> {
        let candidate = self.get(id).await?;
        let attachments = match self.attachments.for_candidate(id).await? {
            PeerResponse::Found(attachments) => attachments,
            PeerResponse::NotFound => Vec::new(),
        };
        Ok((candidate, attachments))
    }

    /// Every candidate with its attachments, fetched in a single call to the
    /// attachment source.
    pub async fn list_with_attachments(&self) -> Result<Vec<(Candidate, Vec<Attachment>)>> {
        let candidates = self.list().await?;
        let mut grouped = group_by_candidate(self.attachments.all().await?.unwrap_or_default());

        Ok(candidates
            .into_iter()
            .map(|candidate| {
                let attachments = grouped.remove(&candidate.id).unwrap_or_default();
                (candidate, attachments)
            })
            .collect())
    }
}

pub fn group_by_candidate(attachments: Vec<Attachment>) -> HashMap<i32, Vec<Attachment>> {
    let mut grouped: HashMap<i32, Vec<Attachment>> = HashMap::new();
    for attachment in attachments {
        grouped
            .entry(attachment.candidate_id)
            .or_default()
            .push(attachment);
    }
    grouped
}
