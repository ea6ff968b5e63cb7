//! Expression Service
//!
//! Stores, validates and evaluates boolean logical expressions such as
//! `(x > 5 && y < 10) || z == 20` against caller-supplied variables.
//!
//! ## Endpoints
//!
//! - `POST /expression` - Save an expression, returns its id
//! - `GET /expression/{id}` - Get a stored expression
//! - `GET /all-expressions` - List stored expressions
//! - `POST /evaluate` - Evaluate a stored expression with variables
//! - `POST /validate` - Validate expression text without storing it
//! - `GET /health` - Health check

pub mod config;
pub mod handlers;
pub mod service;
pub mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::{Config, StorageBackend};
pub use service::ExpressionService;
pub use storage::{ExpressionStore, MemoryStore, RedisStore};

/// Application state shared across handlers
pub struct AppState {
    pub service: ExpressionService,
}

impl AppState {
    pub fn new(store: Arc<dyn ExpressionStore>) -> Self {
        Self {
            service: ExpressionService::new(store),
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/expression", post(handlers::save_expression_handler))
        .route("/expression/{id}", get(handlers::get_expression_handler))
        .route("/all-expressions", get(handlers::list_expressions_handler))
        .route("/evaluate", post(handlers::evaluate_handler))
        .route("/validate", post(handlers::validate_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
