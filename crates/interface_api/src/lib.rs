//! HTTP API Layer
//!
//! Read-only REST API over the balance engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Group, friend, dashboard and health endpoints
//! - **Middleware**: Bearer authentication and audit logging
//! - **DTOs**: Response bodies enriched with display names
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let ledger = Arc::new(PostgresLedgerAdapter::new(pool));
//! let app = create_router(ledger, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_balance::BalanceService;
use domain_ledger::LedgerPort;

use crate::config::ApiConfig;
use crate::handlers::{dashboard, friends, groups, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BalanceService,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `ledger` - Source of groups, expenses and settlements
/// * `config` - API configuration
pub fn create_router(ledger: Arc<dyn LedgerPort>, config: ApiConfig) -> Router {
    let state = AppState {
        service: BalanceService::new(ledger),
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let group_routes = Router::new()
        .route("/:id/balances", get(groups::get_balances))
        .route("/:id/member-balances", get(groups::get_member_balances))
        .route("/:id/stats", get(groups::get_stats))
        .route("/:id/outstanding", get(groups::get_outstanding))
        .route(
            "/:id/members/:user_id/outstanding",
            get(groups::get_member_outstanding),
        );

    let friend_routes = Router::new()
        .route("/", get(friends::list_friends))
        .route("/:id", get(friends::get_friend_details))
        .route("/:id/balance", get(friends::get_friend_balance))
        .route("/:id/expenses", get(friends::list_shared_expenses));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/groups", group_routes)
        .nest("/friends", friend_routes)
        .route("/dashboard/stats", get(dashboard::get_stats))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
