use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::candidate_dto::CandidateResponse;
use crate::dto::RequestPayload;
use crate::error::{Error, FieldErrors, Result};
use crate::models::attachment::{Attachment, AttachmentFile, NewAttachment};
use crate::models::candidate::Candidate;
use crate::utils::validation::{require_text, validate_items};

const EXTENSION_REQUIRED: &str = "La extensión es obligatoria";
const FILE_NAME_REQUIRED: &str = "El nombre del archivo es obligatorio";

/// Attachment nested in a candidate creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AttachmentFilePayload {
    #[validate(length(max = 5, message = "La extensión debe tener como máximo 5 caracteres"))]
    pub extension: String,

    #[serde(rename = "nombreArchivo")]
    #[validate(length(
        max = 255,
        message = "El nombre del archivo debe tener como máximo 255 caracteres"
    ))]
    pub file_name: String,
}

impl AttachmentFilePayload {
    pub fn wire_field(field: &str) -> String {
        match field {
            "file_name" => "nombreArchivo".to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn check_at(&self, prefix: &str, errors: &mut FieldErrors) {
        require_text(
            errors,
            &format!("{}.extension", prefix),
            &self.extension,
            EXTENSION_REQUIRED,
        );
        require_text(
            errors,
            &format!("{}.nombreArchivo", prefix),
            &self.file_name,
            FILE_NAME_REQUIRED,
        );
    }
}

impl From<AttachmentFilePayload> for AttachmentFile {
    fn from(value: AttachmentFilePayload) -> Self {
        Self {
            extension: value.extension,
            file_name: value.file_name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct NewAttachmentPayload {
    #[serde(rename = "candidatoId")]
    #[validate(required(message = "El ID del candidato es obligatorio"))]
    pub candidate_id: Option<i32>,

    #[validate(length(max = 5, message = "La extensión debe tener como máximo 5 caracteres"))]
    pub extension: String,

    #[serde(rename = "nombreArchivo")]
    #[validate(length(
        max = 255,
        message = "El nombre del archivo debe tener como máximo 255 caracteres"
    ))]
    pub file_name: String,
}

impl NewAttachmentPayload {
    pub fn wire_field(field: &str) -> String {
        match field {
            "candidate_id" => "candidatoId".to_string(),
            "file_name" => "nombreArchivo".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<NewAttachment> for NewAttachmentPayload {
    fn from(value: NewAttachment) -> Self {
        Self {
            candidate_id: Some(value.candidate_id),
            extension: value.extension,
            file_name: value.file_name,
        }
    }
}

impl TryFrom<NewAttachmentPayload> for NewAttachment {
    type Error = Error;

    fn try_from(value: NewAttachmentPayload) -> Result<Self> {
        Ok(Self {
            candidate_id: value
                .candidate_id
                .ok_or_else(|| Error::BadRequest("candidatoId is required".into()))?,
            extension: value.extension,
            file_name: value.file_name,
        })
    }
}

/// Body of the batch create endpoint: a non-empty JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NewAttachmentsPayload(pub Vec<NewAttachmentPayload>);

impl RequestPayload for NewAttachmentsPayload {
    fn check(&self, errors: &mut FieldErrors) {
        if self.0.is_empty() {
            errors.insert(
                "adjuntos".to_string(),
                "Debe enviar al menos un adjunto".to_string(),
            );
            return;
        }
        validate_items(&self.0, "", NewAttachmentPayload::wire_field, errors);
        for (index, item) in self.0.iter().enumerate() {
            let prefix = format!("[{}]", index);
            require_text(
                errors,
                &format!("{}.extension", prefix),
                &item.extension,
                EXTENSION_REQUIRED,
            );
            require_text(
                errors,
                &format!("{}.nombreArchivo", prefix),
                &item.file_name,
                FILE_NAME_REQUIRED,
            );
        }
    }
}

impl NewAttachmentsPayload {
    pub fn into_new_attachments(self) -> Result<Vec<NewAttachment>> {
        self.0.into_iter().map(NewAttachment::try_from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponse {
    pub id: i32,
    #[serde(rename = "candidatoId")]
    pub candidate_id: i32,
    pub extension: String,
    #[serde(rename = "nombreArchivo")]
    pub file_name: String,
}

impl From<Attachment> for AttachmentResponse {
    fn from(value: Attachment) -> Self {
        Self {
            id: value.id,
            candidate_id: value.candidate_id,
            extension: value.extension,
            file_name: value.file_name,
        }
    }
}

impl From<AttachmentResponse> for Attachment {
    fn from(value: AttachmentResponse) -> Self {
        Self {
            id: value.id,
            candidate_id: value.candidate_id,
            extension: value.extension,
            file_name: value.file_name,
        }
    }
}

/// A candidate (as reported by the candidate service) with the attachments
/// stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CandidateAttachmentsResponse {
    #[serde(rename = "candidato")]
    pub candidate: CandidateResponse,
    #[serde(rename = "adjuntos")]
    pub attachments: Vec<AttachmentResponse>,
}

impl From<(Candidate, Vec<Attachment>)> for CandidateAttachmentsResponse {
    fn from((candidate, attachments): (Candidate, Vec<Attachment>)) -> Self {
        Self {
            candidate: candidate.into(),
            attachments: attachments.into_iter().map(Into::into).collect(),
        }
    }
}
