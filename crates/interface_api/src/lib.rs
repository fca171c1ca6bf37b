//! HTTP API Layer
//!
//! This crate exposes the claim info form over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: country selection, fields, claim data and submission
//! - **Middleware**: tracing and request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Backend**: the mock claim service submissions go to
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::from_config(config));
//! axum::serve(listener, app).await?;
//! ```

pub mod backend;
pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use domain_claim_info::{ClaimFormSession, ClaimInfoStore, SubmissionJournal};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::MockClaimBackend;
use crate::config::ApiConfig;
use crate::handlers::{claims, countries, fields, health, session};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ClaimFormSession>,
    pub backend: MockClaimBackend,
    pub journal: Arc<SubmissionJournal>,
    pub config: ApiConfig,
}

impl AppState {
    /// State with every country registered and an empty store
    pub fn from_config(config: ApiConfig) -> Self {
        let journal = Arc::new(SubmissionJournal::with_log_capacity(config.journal_log_capacity));
        let factory = bootstrap::country_factory(&journal, config.simulate_handler_delays);
        let session = ClaimFormSession::new(factory, Arc::new(ClaimInfoStore::new()));
        Self {
            session: Arc::new(session),
            backend: MockClaimBackend::new(Duration::from_millis(config.mock_submit_latency_ms)),
            journal,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Session, backend and configuration shared by handlers
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Session routes
    let session_routes = Router::new()
        .route("/", get(session::get_session))
        .route("/country", put(session::select_country).delete(session::clear_country));

    // Field routes
    let field_routes = Router::new()
        .route("/", get(fields::list_fields))
        .route("/:field_id", put(fields::set_field));

    // Claim routes
    let claim_routes = Router::new()
        .route("/submit", post(claims::submit_claim))
        .route("/validation-errors", get(claims::validation_errors));

    let api_routes = Router::new()
        .route("/countries", get(countries::list_countries))
        .route("/claim", put(claims::set_claim).get(claims::get_claim))
        .nest("/session", session_routes)
        .nest("/fields", field_routes)
        .nest("/claims", claim_routes)
        .layer(axum_middleware::from_fn(request_logging));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
