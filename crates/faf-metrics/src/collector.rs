//! Metrics collector — tracks per-endpoint request counters.
//!
//! Lock-free: every counter is an atomic, so handlers record without
//! contending on a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use faf_core::TransformKind;
use serde::Serialize;
use tracing::debug;

/// How a request finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

/// Counters for one transform endpoint.
#[derive(Default)]
struct EndpointMetrics {
    requests: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
    /// Elements transformed by successful requests.
    elements: AtomicU64,
    /// Sum of request latencies in microseconds.
    latency_us_sum: AtomicU64,
}

/// Point-in-time view of one endpoint's counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSnapshot {
    pub endpoint: String,
    pub requests: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub elements: u64,
    pub latency_us_sum: u64,
}

/// Collects request metrics for the D-FAF and P-FAF endpoints.
#[derive(Default)]
pub struct MetricsCollector {
    dfaf: EndpointMetrics,
    pfaf: EndpointMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn endpoint(&self, kind: TransformKind) -> &EndpointMetrics {
        match kind {
            TransformKind::Dfaf => &self.dfaf,
            TransformKind::Pfaf => &self.pfaf,
        }
    }

    /// Record a finished request.
    pub fn record(
        &self,
        kind: TransformKind,
        latency: Duration,
        elements: usize,
        outcome: Outcome,
    ) {
        let m = self.endpoint(kind);
        m.requests.fetch_add(1, Ordering::Relaxed);
        m.latency_us_sum
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
        match outcome {
            Outcome::Ok => {
                m.elements.fetch_add(elements as u64, Ordering::Relaxed);
            }
            Outcome::ClientError => {
                m.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::ServerError => {
                m.server_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
        debug!(endpoint = %kind, ?outcome, elements, "request recorded");
    }

    /// Current counters, one entry per endpoint.
    pub fn snapshot(&self) -> Vec<EndpointSnapshot> {
        [TransformKind::Dfaf, TransformKind::Pfaf]
            .into_iter()
            .map(|kind| {
                let m = self.endpoint(kind);
                EndpointSnapshot {
                    endpoint: kind.to_string(),
                    requests: m.requests.load(Ordering::Relaxed),
                    client_errors: m.client_errors.load(Ordering::Relaxed),
                    server_errors: m.server_errors.load(Ordering::Relaxed),
                    elements: m.elements.load(Ordering::Relaxed),
                    latency_us_sum: m.latency_us_sum.load(Ordering::Relaxed),
                }
            })
            .collect()
    }
}
