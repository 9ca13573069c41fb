//! faf-api — HTTP surface of the FAF service.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Landing page |
//! | POST | `/api/dfaf` | Deterministic transform |
//! | POST | `/api/pfaf` | Noisy transform |
//! | GET | `/healthz` | Liveness probe |
//! | GET | `/metrics` | Prometheus exposition |

pub mod error;
pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use faf_core::{FafConfig, LimitsConfig};
use faf_metrics::MetricsCollector;

pub use error::ApiError;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub limits: LimitsConfig,
    pub metrics: Arc<MetricsCollector>,
}

/// Build the complete router (transforms + landing page + probes).
pub fn build_router(config: &FafConfig) -> Router {
    let state = ApiState {
        limits: config.limits,
        metrics: Arc::new(MetricsCollector::new()),
    };

    let api_routes = Router::new()
        .route("/dfaf", post(handlers::dfaf))
        .route("/pfaf", post(handlers::pfaf))
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes));

    Router::new()
        .route("/", get(page::index))
        .nest("/api", api_routes)
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(state)
}
