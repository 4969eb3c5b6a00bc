use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

pub const MSG_VALIDATION: &str = "Preencha todos os campos!";
pub const MSG_STORE_UNAVAILABLE: &str = "Banco ainda não configurado.";
pub const MSG_PERSISTENCE: &str = "Erro ao salvar no banco";
pub const MSG_INTERNAL: &str = "Erro interno do servidor.";

#[derive(Debug, ThisError)]
pub enum IntakeError {
    #[error("submission is missing one or more required fields")]
    Validation,

    #[error("no database handle is available")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Persistence(#[from] SqlxError),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for IntakeError {
    fn from(e: figment::Error) -> Self {
        IntakeError::Config(Box::new(e))
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            IntakeError::Validation => (StatusCode::BAD_REQUEST, MSG_VALIDATION),
            IntakeError::StoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_STORE_UNAVAILABLE)
            }
            IntakeError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_PERSISTENCE),
            IntakeError::Probe(_) | IntakeError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
        };
        (status, Json(MessageBody::new(message))).into_response()
    }
}

/// Body shape shared by every `/contato` response.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub mensagem: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            mensagem: message.into(),
        }
    }
}
