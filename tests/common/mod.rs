#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use candidate_services::{
    config::{Config, LogFormat, PeerSettings, ServiceRole},
    database::Repositories,
    routes, AttachmentsState, CandidatesState, GatewayState,
};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub fn test_config(
    role: ServiceRole,
    candidate_service_url: Option<Url>,
    attachment_service_url: Option<Url>,
) -> Config {
    Config {
        role,
        server_address: "127.0.0.1:0".into(),
        database_url: None,
        database_max_connections: 5,
        attachment_service_url,
        candidate_service_url,
        peer: PeerSettings {
            timeout: Duration::from_millis(1000),
            max_retries: 1,
            retry_backoff: Duration::from_millis(10),
        },
        cors_allowed_origins: None,
        log_format: LogFormat::Text,
    }
}

/// Candidate service with co-located attachments.
pub fn co_located_candidates() -> (Router, Repositories) {
    let repositories = Repositories::in_memory();
    let config = test_config(ServiceRole::Candidates, None, None);
    let state = CandidatesState::from_config(&config, repositories.clone()).unwrap();
    (routes::candidates_app(state, None), repositories)
}

/// Candidate service reading attachments from `attachments`.
pub fn remote_candidates(attachments: Url) -> (Router, Repositories) {
    let repositories = Repositories::in_memory();
    let config = test_config(ServiceRole::Candidates, None, Some(attachments));
    let state = CandidatesState::from_config(&config, repositories.clone()).unwrap();
    (routes::candidates_app(state, None), repositories)
}

pub fn attachments_service(candidates: Url) -> (Router, Repositories) {
    let repositories = Repositories::in_memory();
    let config = test_config(ServiceRole::Attachments, Some(candidates), None);
    let state = AttachmentsState::from_config(&config, repositories.clone()).unwrap();
    (routes::attachments_app(state, None), repositories)
}

pub fn gateway(candidates: Url, attachments: Url) -> Router {
    let config = test_config(ServiceRole::Gateway, Some(candidates), Some(attachments));
    routes::gateway_app(GatewayState::from_config(&config).unwrap(), None)
}

/// Binds an ephemeral port so two services can learn each other's URL
/// before either starts serving.
pub async fn reserve() -> (TcpListener, Url) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    (listener, url)
}

pub fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

/// A URL nothing is listening on.
pub async fn dead_url() -> Url {
    let (listener, url) = reserve().await;
    drop(listener);
    url
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: JsonValue,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn candidate_json(email: &str) -> JsonValue {
    json!({
        "nombre": "Juan",
        "apellidos": "Pérez",
        "email": email,
        "telefono": "+56912345678",
        "tipoDocumento": "RUT",
        "numeroDocumento": "12.345.678-9",
        "genero": "M",
        "lugarNacimiento": "Santiago, Chile",
        "fechaNacimiento": "1990-01-01",
        "direccion": "Calle Falsa 123",
        "codigoPostal": "8320000",
        "pais": "Chile",
        "localizacion": "Santiago, Chile",
        "disponibilidadDesde": "2025-01-01",
        "disponibilidadHasta": "2025-12-31"
    })
}
