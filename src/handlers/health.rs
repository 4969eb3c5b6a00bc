use axum::{Json, extract::State};

use crate::router::IntakeState;
use crate::service::health;
use crate::types::contact::HealthStatus;

/// GET / -> plain liveness text, independent of the database.
pub async fn root_handler() -> &'static str {
    "Servidor rodando 🚀"
}

/// GET /health -> always 200; `db` reflects a probe made right now.
pub async fn health_handler(State(state): State<IntakeState>) -> Json<HealthStatus> {
    let Ok(status) = health::check(state.store.as_ref()).await;
    Json(status)
}
