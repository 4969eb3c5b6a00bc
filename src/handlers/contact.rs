use axum::{Json, extract::State};

use crate::error::MessageBody;
use crate::middleware::ContactForm;
use crate::service::submission;
use crate::{IntakeError, router::IntakeState};

pub const MSG_SUCCESS: &str = "Mensagem enviada com sucesso!";

/// POST /contato -> validates and stores one contact message.
pub async fn contato_handler(
    State(state): State<IntakeState>,
    ContactForm(body): ContactForm,
) -> Result<Json<MessageBody>, IntakeError> {
    submission::submit(state.store.as_ref(), &body).await?;
    Ok(Json(MessageBody::new(MSG_SUCCESS)))
}
