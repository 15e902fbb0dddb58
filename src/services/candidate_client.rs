use async_trait::async_trait;

use crate::dto::candidate_dto::CandidateResponse;
use crate::error::Result;
use crate::models::candidate::Candidate;
use crate::services::peer::{PeerClient, PeerResponse};

pub const CANDIDATES_PATH: &str = "/api/v1/candidatos";

/// Candidate lookups made by the attachment service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateDirectory: Send + Sync {
    async fn find(&self, id: i32) -> Result<PeerResponse<Candidate>>;

    async fn all(&self) -> Result<PeerResponse<Vec<Candidate>>>;
}

#[derive(Clone)]
pub struct CandidateClient {
    peer: PeerClient,
}

impl CandidateClient {
    pub fn new(peer: PeerClient) -> Self {
        Self { peer }
    }
}

#[async_trait]
impl CandidateDirectory for CandidateClient {
    async fn find(&self, id: i32) -> Result<PeerResponse<Candidate>> {
        let path = format!("{}/{}", CANDIDATES_PATH, id);
        let found: PeerResponse<CandidateResponse> = self.peer.get_json(&path).await?;
        Ok(found.map(Candidate::from))
    }

    async fn all(&self) -> Result<PeerResponse<Vec<Candidate>>> {
        let found: PeerResponse<Vec<CandidateResponse>> =
            self.peer.get_json(CANDIDATES_PATH).await?;
        Ok(found.map(|items| items.into_iter().map(Candidate::from).collect()))
    }
}
