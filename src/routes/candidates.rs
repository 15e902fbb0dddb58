use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::candidate_dto::{
        CandidatePayload, CandidateResponse, CandidateWithAttachmentsResponse,
        CreatedCandidateResponse,
    },
    error::{ErrorResponse, Result},
    extractors::{json::ValidatedJson, path::AppPath},
    CandidatesState,
};

#[utoipa::path(
    post,
    path = "/api/v1/candidatos",
    tag = "candidatos",
    request_body = CandidatePayload,
    responses(
        (status = 201, description = "Candidate created", body = CreatedCandidateResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 503, description = "Attachment service unavailable", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<CandidatesState>,
    ValidatedJson(payload): ValidatedJson<CandidatePayload>,
) -> Result<impl IntoResponse> {
    let nested = !payload.attachments.is_empty();
    let (candidate, files) = payload.into_parts()?;
    let (created, attachments) = state.candidate_service.create(candidate, files).await?;

    let body = if nested {
        CreatedCandidateResponse::WithAttachments((created, attachments).into())
    } else {
        CreatedCandidateResponse::Plain(created.into())
    };
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v1/candidatos",
    tag = "candidatos",
    responses(
        (status = 200, description = "All candidates", body = [CandidateResponse]),
        (status = 404, description = "No candidates", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(State(state): State<CandidatesState>) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.list().await?;
    let body: Vec<CandidateResponse> = candidates.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1/candidatos/{id}",
    tag = "candidatos",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate", body = CandidateResponse),
        (status = 404, description = "Candidate not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<CandidatesState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get(id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/candidatos/{id}",
    tag = "candidatos",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 204, description = "Candidate deleted"),
        (status = 404, description = "Candidate not found", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<CandidatesState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    state.candidate_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/candidatos/{id}/adjuntos",
    tag = "candidatos",
    params(
        ("id" = i32, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate with its attachments", body = CandidateWithAttachmentsResponse),
        (status = 404, description = "Candidate not found", body = ErrorResponse),
        (status = 502, description = "Attachment service answered badly", body = ErrorResponse),
        (status = 503, description = "Attachment service unavailable", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_candidate_with_attachments(
    State(state): State<CandidatesState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let view = state.candidate_service.get_with_attachments(id).await?;
    Ok(Json(CandidateWithAttachmentsResponse::from(view)))
}

#[utoipa::path(
    get,
    path = "/api/v1/candidatos/adjuntos",
    tag = "candidatos",
    responses(
        (status = 200, description = "Every candidate with its attachments", body = [CandidateWithAttachmentsResponse]),
        (status = 404, description = "No candidates", body = ErrorResponse),
        (status = 502, description = "Attachment service answered badly", body = ErrorResponse),
        (status = 503, description = "Attachment service unavailable", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_candidates_with_attachments(
    State(state): State<CandidatesState>,
) -> Result<impl IntoResponse> {
    let views = state.candidate_service.list_with_attachments().await?;
    let body: Vec<CandidateWithAttachmentsResponse> = views.into_iter().map(Into::into).collect();
    Ok(Json(body))
}
