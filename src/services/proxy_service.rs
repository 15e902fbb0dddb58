use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Response, StatusCode},
};
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::PeerSettings;
use crate::error::{Error, Result};
use crate::services::attachment_client::ATTACHMENTS_PATH;
use crate::services::candidate_client::CANDIDATES_PATH;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "host",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    HOP_BY_HOP.contains(&name.as_str()) || name == "content-length"
}

/// Path-prefix reverse proxy in front of the two services.
#[derive(Clone)]
pub struct ProxyService {
    client: Client,
    candidates: Url,
    attachments: Url,
}

impl ProxyService {
    pub fn new(candidates: Url, attachments: Url, settings: PeerSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create gateway HTTP client: {}", e)))?;

        Ok(Self {
            client,
            candidates,
            attachments,
        })
    }

    pub fn resolve(&self, path: &str) -> Option<&Url> {
        if has_prefix(path, CANDIDATES_PATH) {
            Some(&self.candidates)
        } else if has_prefix(path, ATTACHMENTS_PATH) {
            Some(&self.attachments)
        } else {
            None
        }
    }

    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response<Body>> {
        let upstream = self
            .resolve(path)
            .ok_or_else(|| Error::NotFound(format!("No route for {}", path)))?;
        let target = target_url(upstream, path, query);

        let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .map_err(|e| Error::BadRequest(format!("Unsupported method: {}", e)))?;
        let mut request = self.client.request(method, target.clone());
        for (name, value) in headers {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            request = request.header(name.as_str(), value.as_bytes());
        }

        debug!(%target, "forwarding request");
        let upstream_response = request.body(body).send().await.map_err(|e| {
            warn!(%target, error = %e, "upstream unreachable");
            Error::UpstreamUnavailable(format!("Upstream service is unavailable: {}", e))
        })?;

        let status = StatusCode::from_u16(upstream_response.status().as_u16())
            .map_err(|e| Error::BadGateway(format!("Invalid upstream status: {}", e)))?;
        let mut response_headers = HeaderMap::new();
        for (name, value) in upstream_response.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_str().as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                response_headers.append(name, value);
            }
        }
        let bytes = upstream_response.bytes().await.map_err(|e| {
            Error::BadGateway(format!("Failed to read upstream response: {}", e))
        })?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn target_url(base: &Url, path: &str, query: Option<&str>) -> Url {
    let mut url = base.clone();
    let joined = format!("{}{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(query);
    url
}
