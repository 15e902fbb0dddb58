pub mod attachments;
pub mod candidates;
pub mod gateway;
pub mod health;

use axum::{
    http::{Method, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::ServiceRole,
    dto::{
        attachment_dto::{
            AttachmentFilePayload, AttachmentResponse, CandidateAttachmentsResponse,
            NewAttachmentPayload, NewAttachmentsPayload,
        },
        candidate_dto::{
            CandidatePayload, CandidateResponse, CandidateWithAttachmentsResponse,
            CreatedCandidateResponse,
        },
    },
    error::{Error, ErrorResponse},
    middleware::{cors::cors_layer, error_path::fill_error_path},
    AttachmentsState, CandidatesState, GatewayState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Candidate service", version = "1.0.0"),
    paths(
        candidates::create_candidate,
        candidates::list_candidates,
        candidates::get_candidate,
        candidates::delete_candidate,
        candidates::get_candidate_with_attachments,
        candidates::list_candidates_with_attachments,
    ),
    components(schemas(
        CandidatePayload,
        AttachmentFilePayload,
        CandidateResponse,
        CandidateWithAttachmentsResponse,
        CreatedCandidateResponse,
        AttachmentResponse,
        ErrorResponse,
    )),
    tags((name = "candidatos", description = "Candidate records"))
)]
pub struct CandidatesApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(title = "Attachment service", version = "1.0.0"),
    paths(
        attachments::list_attachments,
        attachments::create_attachments,
        attachments::list_candidate_attachments,
        attachments::delete_candidate_attachments,
        attachments::get_candidate_detail,
        attachments::list_candidates_catalog,
    ),
    components(schemas(
        NewAttachmentPayload,
        NewAttachmentsPayload,
        AttachmentResponse,
        CandidateAttachmentsResponse,
        CandidateResponse,
        ErrorResponse,
    )),
    tags((name = "adjuntos", description = "Candidate attachments"))
)]
pub struct AttachmentsApiDoc;

async fn candidates_openapi() -> impl IntoResponse {
    Json(CandidatesApiDoc::openapi())
}

async fn attachments_openapi() -> impl IntoResponse {
    Json(AttachmentsApiDoc::openapi())
}

async fn not_found(method: Method, uri: Uri) -> Error {
    Error::NotFound(format!("No existe la ruta {} {}", method, uri.path()))
}

fn health_routes(role: ServiceRole) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .with_state(role)
}

/// Layers shared by every role, outermost last.
fn with_common_layers(router: Router, cors_origins: Option<&[String]>) -> Router {
    router
        .layer(axum::middleware::from_fn(fill_error_path))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(cors_origins))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

pub fn candidates_app(state: CandidatesState, cors_origins: Option<&[String]>) -> Router {
    let api = Router::new()
        .route(
            "/api/v1/candidatos",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route(
            "/api/v1/candidatos/adjuntos",
            get(candidates::list_candidates_with_attachments),
        )
        .route(
            "/api/v1/candidatos/:id",
            get(candidates::get_candidate).delete(candidates::delete_candidate),
        )
        .route(
            "/api/v1/candidatos/:id/adjuntos",
            get(candidates::get_candidate_with_attachments),
        )
        .route("/api-docs/openapi.json", get(candidates_openapi))
        .with_state(state);

    let router = api
        .merge(health_routes(ServiceRole::Candidates))
        .fallback(not_found);
    with_common_layers(router, cors_origins)
}

pub fn attachments_app(state: AttachmentsState, cors_origins: Option<&[String]>) -> Router {
    let api = Router::new()
        .route(
            "/api/v1/adjuntos",
            get(attachments::list_attachments).post(attachments::create_attachments),
        )
        .route(
            "/api/v1/adjuntos/candidatos",
            get(attachments::list_candidates_catalog),
        )
        .route(
            "/api/v1/adjuntos/candidato/:id",
            get(attachments::list_candidate_attachments)
                .delete(attachments::delete_candidate_attachments),
        )
        .route(
            "/api/v1/adjuntos/candidato/:id/detalle",
            get(attachments::get_candidate_detail),
        )
        .route("/api-docs/openapi.json", get(attachments_openapi))
        .with_state(state);

    let router = api
        .merge(health_routes(ServiceRole::Attachments))
        .fallback(not_found);
    with_common_layers(router, cors_origins)
}

/// Unmatched paths fall through to the proxy, which answers 404 for anything
/// outside the service prefixes.
pub fn gateway_app(state: GatewayState, cors_origins: Option<&[String]>) -> Router {
    let router = Router::new()
        .fallback(gateway::proxy)
        .with_state(state)
        .merge(health_routes(ServiceRole::Gateway));
    with_common_layers(router, cors_origins)
}
