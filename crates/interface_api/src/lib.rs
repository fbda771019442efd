//! HTTP API Layer
//!
//! This crate provides the REST API for the debt settlement engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Stateless computations over posted records, and stored groups
//! - **Middleware**: Request ids, tracing spans and request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(Arc::new(InMemoryGroupStore::new()), config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod seed;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_settlement::{DebtService, InMemoryGroupStore};

use crate::config::ApiConfig;
use crate::handlers::{allocation, balances, groups, health, settlement};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: DebtService,
    pub store: Arc<InMemoryGroupStore>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the debt service to `store`
    pub fn new(store: Arc<InMemoryGroupStore>, config: ApiConfig) -> Self {
        Self {
            service: DebtService::new(store.clone()),
            store,
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Computations over posted records; nothing is stored
    let compute_routes = Router::new()
        .route("/allocations", post(allocation::allocate))
        .route("/balances", post(balances::compute_balances))
        .route("/settlements", post(settlement::compute_settlement))
        .route("/settlements/:member_id", post(settlement::compute_user_debts));

    // Stored groups
    let group_routes = Router::new()
        .route("/", post(groups::create_group))
        .route("/:id/expenses", post(groups::create_expense))
        .route("/:id/transfers", post(groups::propose_transfer))
        .route("/:id/transfers/:transfer_id/confirm", post(groups::confirm_transfer))
        .route("/:id/balances", get(groups::balances))
        .route("/:id/debts", get(groups::debts))
        .route("/:id/debts/:member_id", get(groups::user_debts))
        .route("/:id/statistics", get(groups::statistics));

    let api_routes = Router::new()
        .merge(compute_routes)
        .nest("/groups", group_routes)
        .layer(axum_middleware::from_fn(request_logging));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
