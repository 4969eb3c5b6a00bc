use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::StoreHandle;
use crate::handlers::{contato_handler, health_handler, root_handler};
use crate::middleware::{CONTACT_BODY_LIMIT, cors_layer};

/// Shared request state. The store is set once at startup and only read
/// afterwards.
#[derive(Clone)]
pub struct IntakeState {
    pub store: Option<StoreHandle>,
}

impl IntakeState {
    pub fn new(store: Option<StoreHandle>) -> Self {
        Self { store }
    }
}

pub fn intake_router(state: IntakeState, allowed_origins: Option<&[String]>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/contato",
            post(contato_handler).layer(DefaultBodyLimit::max(CONTACT_BODY_LIMIT)),
        )
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
