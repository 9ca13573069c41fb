//! faf-metrics — request accounting for the FAF transform endpoints.
//!
//! # Architecture
//!
//! ```text
//! MetricsCollector
//!   ├── record() ← called once per transform request
//!   └── snapshot() → Vec<EndpointSnapshot>
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod collector;
pub mod prometheus;

pub use collector::{EndpointSnapshot, MetricsCollector, Outcome};
pub use prometheus::render_prometheus;
