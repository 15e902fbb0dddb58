use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::error::ErrorResponse;

/// Fills `path` in error bodies produced by `Error::into_response`.
pub async fn fill_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;

    let Some(body) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    let Ok(bytes) = serde_json::to_vec(&body.with_path(path)) else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(bytes))
}
