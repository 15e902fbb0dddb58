use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config::ServiceRole;

#[axum::debug_handler]
pub async fn health(State(role): State<ServiceRole>) -> impl IntoResponse {
    let body = json!({
        "status": "ok",
        "service": role.to_string(),
    });
    (StatusCode::OK, Json(body))
}
