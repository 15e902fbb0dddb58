use std::sync::Arc;

use tracing::info;

use crate::database::AttachmentRepository;
use crate::error::{Error, Result};
use crate::models::attachment::{Attachment, NewAttachment};
use crate::models::candidate::Candidate;
use crate::services::candidate_client::CandidateDirectory;
use crate::services::candidate_service::group_by_candidate;
use crate::services::peer::PeerResponse;

#[derive(Clone)]
pub struct AttachmentService {
    attachments: Arc<dyn AttachmentRepository>,
    candidates: Arc<dyn CandidateDirectory>,
}

impl AttachmentService {
    pub fn new(
        attachments: Arc<dyn AttachmentRepository>,
        candidates: Arc<dyn CandidateDirectory>,
    ) -> Self {
        Self {
            attachments,
            candidates,
        }
    }

    pub async fn create_many(&self, items: Vec<NewAttachment>) -> Result<Vec<Attachment>> {
        let created = self.attachments.insert_many(items).await?;
        info!(count = created.len(), "attachments created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Attachment>> {
        let attachments = self.attachments.find_all().await?;
        if attachments.is_empty() {
            return Err(Error::NotFound("No se encontraron adjuntos".to_string()));
        }
        Ok(attachments)
    }

    pub async fn list_for_candidate(&self, candidate_id: i32) -> Result<Vec<Attachment>> {
        let attachments = self.attachments.find_by_candidate(candidate_id).await?;
        if attachments.is_empty() {
            return Err(Error::NotFound(format!(
                "No se encontraron adjuntos para el candidato con ID {}",
                candidate_id
            )));
        }
        Ok(attachments)
    }

    pub async fn delete_for_candidate(&self, candidate_id: i32) -> Result<u64> {
        let removed = self.attachments.delete_by_candidate(candidate_id).await?;
        if removed == 0 {
            return Err(Error::NotFound(format!(
                "No se encontraron adjuntos para el candidato con ID {}",
                candidate_id
            )));
        }
        info!(candidate_id, removed, "attachments deleted");
        Ok(removed)
    }

    /// One candidate, as known by the candidate service, with the attachments
    /// stored here.
    pub async fn detail(&self, candidate_id: i32) -> Result<(Candidate, Vec<Attachment>)> {
        let candidate = match self.candidates.find(candidate_id).await? {
            PeerResponse::Found(candidate) => candidate,
            PeerResponse::NotFound => {
                return Err(Error::NotFound(format!(
                    "No se encontraron candidatos con el ID dado {}",
                    candidate_id
                )))
            }
        };

        let attachments = self.attachments.find_by_candidate(candidate_id).await?;
        if attachments.is_empty() {
            return Err(Error::NotFound(format!(
                "El candidato con ID {} no tiene adjuntos asociados",
                candidate_id
            )));
        }
        Ok((candidate, attachments))
    }

    /// Every candidate with its attachments: one peer call, one local query.
    pub async fn catalog(&self) -> Result<Vec<(Candidate, Vec<Attachment>)>> {
        let not_found =
            || Error::NotFound("No se encontraron candidatos con documentos asociados".to_string());

        let candidates = self.candidates.all().await?.found().ok_or_else(not_found)?;
        if candidates.is_empty() {
            return Err(not_found());
        }

        let mut grouped = group_by_candidate(self.attachments.find_all().await?);
        Ok(candidates
            .into_iter()
            .map(|candidate| {
                let attachments = grouped.remove(&candidate.id).unwrap_or_default();
                (candidate, attachments)
            })
            .collect())
    }
}
