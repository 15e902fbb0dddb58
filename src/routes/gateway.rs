use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::IntoResponse,
};
use bytes::Bytes;
use tracing::info;

use crate::{error::Result, GatewayState};

/// Forwards everything under the known prefixes to the owning service.
#[axum::debug_handler]
pub async fn proxy(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    info!(%method, path = %uri.path(), "gateway request");
    state
        .proxy_service
        .forward(method, uri.path(), uri.query(), &headers, body)
        .await
}
