use validator::{Validate, ValidationErrors};

use crate::error::FieldErrors;

/// Flattens `validator` output into `{field: message}`, keeping the first
/// message reported for each field. `rename` maps struct field names to the
/// names clients see on the wire.
pub fn field_errors(err: &ValidationErrors, rename: impl Fn(&str) -> String) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errors) in err.field_errors() {
        let Some(first) = errors.first() else {
            continue;
        };
        let message = first
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| first.code.to_string());
        out.entry(rename(&*field)).or_insert(message);
    }
    out
}

/// Runs the `validator` rules of `value`, keyed by wire names.
pub fn validate_fields<T: Validate>(value: &T, rename: impl Fn(&str) -> String) -> FieldErrors {
    match value.validate() {
        Ok(()) => FieldErrors::new(),
        Err(err) => field_errors(&err, rename),
    }
}

/// Records `message` when `value` is empty or only whitespace. Overrides any
/// format error already recorded for the field.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

/// Validates every element of a list, keying errors as `prefix[i].field`.
pub fn validate_items<T, F>(items: &[T], prefix: &str, rename: F, errors: &mut FieldErrors)
where
    T: Validate,
    F: Fn(&str) -> String,
{
    for (index, item) in items.iter().enumerate() {
        for (field, message) in validate_fields(item, &rename) {
            errors
                .entry(format!("{}[{}].{}", prefix, index, field))
                .or_insert(message);
        }
    }
}
