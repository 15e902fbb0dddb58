use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::dto::RequestPayload;
use crate::error::Error;

/// `Json<T>` that also runs the payload's field validation. Malformed bodies
/// become `Error::BadRequest` and field failures `Error::Validation`, so
/// clients always get the standard error body.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: RequestPayload + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;

        let errors = value.field_errors();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        Ok(ValidatedJson(value))
    }
}
