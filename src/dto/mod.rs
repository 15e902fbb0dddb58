pub mod attachment_dto;
pub mod candidate_dto;

use serde::de::DeserializeOwned;

use crate::error::FieldErrors;

/// A JSON request body with field-level validation. Implementors collect
/// every failure in `check`, usually starting from
/// `validation::validate_fields` for the `validator` rules.
pub trait RequestPayload: DeserializeOwned {
    /// Maps a struct field name to the name used in the JSON body.
    fn wire_field(field: &str) -> String {
        field.to_string()
    }

    fn check(&self, _errors: &mut FieldErrors) {}

    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        self.check(&mut errors);
        errors
    }
}
