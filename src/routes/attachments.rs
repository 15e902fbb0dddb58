use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::attachment_dto::{AttachmentResponse, CandidateAttachmentsResponse, NewAttachmentsPayload},
    error::{ErrorResponse, Result},
    extractors::{json::ValidatedJson, path::AppPath},
    AttachmentsState,
};

#[utoipa::path(
    get,
    path = "/api/v1/adjuntos",
    tag = "adjuntos",
    responses(
        (status = 200, description = "All attachments", body = [AttachmentResponse]),
        (status = 404, description = "No attachments", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_attachments(State(state): State<AttachmentsState>) -> Result<impl IntoResponse> {
    let attachments = state.attachment_service.list().await?;
    let body: Vec<AttachmentResponse> = attachments.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/v1/adjuntos",
    tag = "adjuntos",
    request_body = NewAttachmentsPayload,
    responses(
        (status = 201, description = "Attachments created", body = [AttachmentResponse]),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_attachments(
    State(state): State<AttachmentsState>,
    ValidatedJson(payload): ValidatedJson<NewAttachmentsPayload>,
) -> Result<impl IntoResponse> {
    let created = state
        .attachment_service
        .create_many(payload.into_new_attachments()?)
        .await?;
    let body: Vec<AttachmentResponse> = created.into_iter().map(Into::into).collect();
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v1/adjuntos/candidato/{id}",
    tag = "adjuntos",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Attachments of the candidate", body = [AttachmentResponse]),
        (status = 404, description = "No attachments for the candidate", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_candidate_attachments(
    State(state): State<AttachmentsState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let attachments = state.attachment_service.list_for_candidate(id).await?;
    let body: Vec<AttachmentResponse> = attachments.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    delete,
    path = "/api/v1/adjuntos/candidato/{id}",
    tag = "adjuntos",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 204, description = "Attachments deleted"),
        (status = 404, description = "No attachments for the candidate", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate_attachments(
    State(state): State<AttachmentsState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    state.attachment_service.delete_for_candidate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/adjuntos/candidato/{id}/detalle",
    tag = "adjuntos",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate info with its attachments", body = CandidateAttachmentsResponse),
        (status = 404, description = "Unknown candidate or no attachments", body = ErrorResponse),
        (status = 503, description = "Candidate service unavailable", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_candidate_detail(
    State(state): State<AttachmentsState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let detail = state.attachment_service.detail(id).await?;
    Ok(Json(CandidateAttachmentsResponse::from(detail)))
}

#[utoipa::path(
    get,
    path = "/api/v1/adjuntos/candidatos",
    tag = "adjuntos",
    responses(
        (status = 200, description = "Every candidate with its attachments", body = [CandidateAttachmentsResponse]),
        (status = 404, description = "No candidates", body = ErrorResponse),
        (status = 503, description = "Candidate service unavailable", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_candidates_catalog(
    State(state): State<AttachmentsState>,
) -> Result<impl IntoResponse> {
    let catalog = state.attachment_service.catalog().await?;
    let body: Vec<CandidateAttachmentsResponse> = catalog.into_iter().map(Into::into).collect();
    Ok(Json(body))
}
