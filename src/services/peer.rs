use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::PeerSettings;
use crate::error::{Error, Result};

/// Outcome of a peer lookup that reached the peer. A 404 is a valid answer
/// ("nothing there") and is kept apart from transport or status failures,
/// which surface as `Error::UpstreamUnavailable` or `Error::BadGateway`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerResponse<T> {
    Found(T),
    NotFound,
}

impl<T> PeerResponse<T> {
    pub fn found(self) -> Option<T> {
        match self {
            PeerResponse::Found(value) => Some(value),
            PeerResponse::NotFound => None,
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.found().unwrap_or_default()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PeerResponse<U> {
        match self {
            PeerResponse::Found(value) => PeerResponse::Found(f(value)),
            PeerResponse::NotFound => PeerResponse::NotFound,
        }
    }
}

/// JSON client for one sibling service.
#[derive(Clone)]
pub struct PeerClient {
    client: Client,
    base_url: Url,
    settings: PeerSettings,
    peer: &'static str,
}

impl PeerClient {
    pub fn new(peer: &'static str, base_url: Url, settings: PeerSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client for {}: {}", peer, e)))?;

        Ok(Self {
            client,
            base_url,
            settings,
            peer,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| Error::Internal(format!("Invalid {} path '{}': {}", self.peer, path, e)))
    }

    /// GET with retries on connect errors, timeouts and 5xx.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<PeerResponse<T>> {
        let url = self.endpoint(path)?;
        let mut attempt: u32 = 0;

        loop {
            let failure = match self.client.get(url.clone()).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    debug!(peer = self.peer, %url, "peer reported not found");
                    return Ok(PeerResponse::NotFound);
                }
                Ok(response) if response.status().is_success() => {
                    return self.decode(response).await.map(PeerResponse::Found);
                }
                Ok(response) if response.status().is_server_error() => {
                    format!("{} responded with {}", self.peer, response.status())
                }
                Ok(response) => {
                    return Err(Error::BadGateway(format!(
                        "{} responded with unexpected status {}",
                        self.peer,
                        response.status()
                    )));
                }
                Err(err) => format!("{} is unreachable: {}", self.peer, err),
            };

            if attempt >= self.settings.max_retries {
                warn!(peer = self.peer, %url, attempts = attempt + 1, "giving up on peer call");
                return Err(Error::UpstreamUnavailable(failure));
            }

            attempt += 1;
            warn!(peer = self.peer, %url, attempt, error = %failure, "retrying peer call");
            tokio::time::sleep(self.backoff(attempt)).await;
        }
    }

    /// POST once; writes are never retried.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("{} is unreachable: {}", self.peer, e)))?;

        let status = response.status();
        if status.is_success() {
            return self.decode(response).await;
        }
        if status.is_server_error() {
            return Err(Error::UpstreamUnavailable(format!(
                "{} responded with {}",
                self.peer, status
            )));
        }
        Err(Error::BadGateway(format!(
            "{} rejected the request with {}",
            self.peer, status
        )))
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            Error::BadGateway(format!("{} returned an unreadable body: {}", self.peer, e))
        })
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.settings.retry_backoff * attempt
    }
}
