use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::attachment_dto::{AttachmentFilePayload, AttachmentResponse};
use crate::dto::RequestPayload;
use crate::error::{Error, FieldErrors, Result};
use crate::models::attachment::{Attachment, AttachmentFile};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::utils::validation::{require_text, validate_fields, validate_items};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CandidatePayload {
    #[serde(rename = "nombre")]
    #[validate(length(max = 50, message = "El nombre debe tener como máximo 50 caracteres"))]
    pub name: String,

    #[serde(rename = "apellidos")]
    #[validate(length(max = 50, message = "El apellido debe tener como máximo 50 caracteres"))]
    pub surname: String,

    #[validate(
        email(message = "El correo electrónico debe ser válido"),
        length(max = 150, message = "El correo electrónico debe tener como máximo 150 caracteres")
    )]
    pub email: String,

    #[serde(rename = "telefono")]
    #[validate(length(max = 20, message = "El teléfono debe tener como máximo 20 caracteres"))]
    pub phone: String,

    #[serde(rename = "tipoDocumento")]
    #[validate(length(
        max = 15,
        message = "El tipo de documento debe tener como máximo 15 caracteres"
    ))]
    pub document_type: String,

    #[serde(rename = "numeroDocumento")]
    #[validate(length(
        max = 30,
        message = "El número de documento debe tener como máximo 30 caracteres"
    ))]
    pub document_number: String,

    #[serde(rename = "genero")]
    #[validate(length(max = 20, message = "El género debe tener como máximo 20 caracteres"))]
    pub gender: String,

    #[serde(rename = "lugarNacimiento")]
    #[validate(length(
        max = 200,
        message = "El lugar de nacimiento debe tener como máximo 200 caracteres"
    ))]
    pub birthplace: String,

    #[serde(rename = "fechaNacimiento")]
    #[validate(required(message = "La fecha de nacimiento es obligatoria"))]
    pub birth_date: Option<NaiveDate>,

    #[serde(rename = "direccion")]
    #[validate(length(max = 200, message = "La dirección debe tener como máximo 200 caracteres"))]
    pub address: String,

    #[serde(rename = "codigoPostal")]
    #[validate(length(max = 20, message = "El código postal debe tener como máximo 20 caracteres"))]
    pub postal_code: String,

    #[serde(rename = "pais")]
    #[validate(length(max = 50, message = "El país debe tener como máximo 50 caracteres"))]
    pub country: String,

    #[serde(rename = "localizacion")]
    #[validate(length(
        max = 150,
        message = "La localización debe tener como máximo 150 caracteres"
    ))]
    pub locale: String,

    #[serde(rename = "disponibilidadDesde")]
    #[validate(required(message = "La fecha de inicio de disponibilidad es obligatoria"))]
    pub available_from: Option<NaiveDate>,

    #[serde(rename = "disponibilidadHasta")]
    #[validate(required(message = "La fecha de fin de disponibilidad es obligatoria"))]
    pub available_until: Option<NaiveDate>,

    /// Attachments created together with the candidate.
    #[serde(rename = "adjuntos")]
    pub attachments: Vec<AttachmentFilePayload>,
}

impl RequestPayload for CandidatePayload {
    fn wire_field(field: &str) -> String {
        let wire = match field {
            "name" => "nombre",
            "surname" => "apellidos",
            "phone" => "telefono",
            "document_type" => "tipoDocumento",
            "document_number" => "numeroDocumento",
            "gender" => "genero",
            "birthplace" => "lugarNacimiento",
            "birth_date" => "fechaNacimiento",
            "address" => "direccion",
            "postal_code" => "codigoPostal",
            "country" => "pais",
            "locale" => "localizacion",
            "available_from" => "disponibilidadDesde",
            "available_until" => "disponibilidadHasta",
            "attachments" => "adjuntos",
            other => other,
        };
        wire.to_string()
    }

    fn check(&self, errors: &mut FieldErrors) {
        errors.extend(validate_fields(self, Self::wire_field));

        require_text(errors, "nombre", &self.name, "El nombre es obligatorio");
        require_text(errors, "apellidos", &self.surname, "El apellido es obligatorio");
        require_text(errors, "email", &self.email, "El correo electrónico es obligatorio");
        require_text(errors, "telefono", &self.phone, "El teléfono es obligatorio");
        require_text(
            errors,
            "tipoDocumento",
            &self.document_type,
            "El tipo de documento es obligatorio",
        );
        require_text(
            errors,
            "numeroDocumento",
            &self.document_number,
            "El número de documento es obligatorio",
        );
        require_text(errors, "genero", &self.gender, "El género es obligatorio");
        require_text(
            errors,
            "lugarNacimiento",
            &self.birthplace,
            "El lugar de nacimiento es obligatorio",
        );
        require_text(errors, "direccion", &self.address, "La dirección es obligatoria");
        require_text(errors, "codigoPostal", &self.postal_code, "El código postal es obligatorio");
        require_text(errors, "pais", &self.country, "El país es obligatorio");
        require_text(errors, "localizacion", &self.locale, "La localización es obligatoria");

        if let Some(birth_date) = self.birth_date {
            if birth_date > Utc::now().date_naive() {
                errors
                    .entry("fechaNacimiento".to_string())
                    .or_insert_with(|| "La fecha de nacimiento no puede ser en el futuro".into());
            }
        }

        validate_items(
            &self.attachments,
            "adjuntos",
            AttachmentFilePayload::wire_field,
            errors,
        );
        for (index, item) in self.attachments.iter().enumerate() {
            item.check_at(&format!("adjuntos[{}]", index), errors);
        }
    }
}

impl CandidatePayload {
    /// Splits a validated payload into the row to insert and its attachments.
    pub fn into_parts(self) -> Result<(NewCandidate, Vec<AttachmentFile>)> {
        let missing = |field: &str| Error::BadRequest(format!("{} is required", field));
        let candidate = NewCandidate {
            birth_date: self.birth_date.ok_or_else(|| missing("fechaNacimiento"))?,
            available_from: self
                .available_from
                .ok_or_else(|| missing("disponibilidadDesde"))?,
            available_until: self
                .available_until
                .ok_or_else(|| missing("disponibilidadHasta"))?,
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            document_type: self.document_type,
            document_number: self.document_number,
            gender: self.gender,
            birthplace: self.birthplace,
            address: self.address,
            postal_code: self.postal_code,
            country: self.country,
            locale: self.locale,
        };
        let files = self.attachments.into_iter().map(Into::into).collect();
        Ok((candidate, files))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CandidateResponse {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellidos")]
    pub surname: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "tipoDocumento")]
    pub document_type: String,
    #[serde(rename = "numeroDocumento")]
    pub document_number: String,
    #[serde(rename = "genero")]
    pub gender: String,
    #[serde(rename = "lugarNacimiento")]
    pub birthplace: String,
    #[serde(rename = "fechaNacimiento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "codigoPostal")]
    pub postal_code: String,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "localizacion")]
    pub locale: String,
    #[serde(rename = "disponibilidadDesde")]
    pub available_from: NaiveDate,
    #[serde(rename = "disponibilidadHasta")]
    pub available_until: NaiveDate,
}

/// Candidate fields with its attachments merged in under `adjuntos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CandidateWithAttachmentsResponse {
    #[serde(flatten)]
    pub candidate: CandidateResponse,
    #[serde(rename = "adjuntos")]
    pub attachments: Vec<AttachmentResponse>,
}

/// Body of a successful create: `adjuntos` is present only when attachments
/// were sent with the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CreatedCandidateResponse {
    WithAttachments(CandidateWithAttachmentsResponse),
    Plain(CandidateResponse),
}

impl From<Candidate> for CandidateResponse {
    fn from(value: Candidate) -> Self {
        Self {
            id: value.id,
            name: value.name,
            surname: value.surname,
            email: value.email,
            phone: value.phone,
            document_type: value.document_type,
            document_number: value.document_number,
            gender: value.gender,
            birthplace: value.birthplace,
            birth_date: value.birth_date,
            address: value.address,
            postal_code: value.postal_code,
            country: value.country,
            locale: value.locale,
            available_from: value.available_from,
            available_until: value.available_until,
        }
    }
}

impl From<CandidateResponse> for Candidate {
    fn from(value: CandidateResponse) -> Self {
        Self {
            id: value.id,
            name: value.name,
            surname: value.surname,
            email: value.email,
            phone: value.phone,
            document_type: value.document_type,
            document_number: value.document_number,
            gender: value.gender,
            birthplace: value.birthplace,
            birth_date: value.birth_date,
            address: value.address,
            postal_code: value.postal_code,
            country: value.country,
            locale: value.locale,
            available_from: value.available_from,
            available_until: value.available_until,
        }
    }
}

impl From<(Candidate, Vec<Attachment>)> for CandidateWithAttachmentsResponse {
    fn from((candidate, attachments): (Candidate, Vec<Attachment>)) -> Self {
        Self {
            candidate: candidate.into(),
            attachments: attachments.into_iter().map(Into::into).collect(),
        }
    }
}
