use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;

use crate::error::IntakeError;

/// Upper bound for a `/contato` body.
pub const CONTACT_BODY_LIMIT: usize = 64 * 1024;

/// Raw JSON body of a contact submission.
///
/// Anything that cannot be read as JSON is treated like an empty form and gets
/// the validation response; only an oversized body keeps axum's 413.
pub struct ContactForm(pub Value);

impl<S> FromRequest<S> for ContactForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(body)) => Ok(ContactForm(body)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(rejection.into_response())
            }
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "unreadable contact body");
                Err(IntakeError::Validation.into_response())
            }
        }
    }
}
