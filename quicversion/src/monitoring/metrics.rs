//! Metrics collection for version negotiation

use crate::protocol::version::VersionNumber;
use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

lazy_static! {
    static ref NEGOTIATION_COUNTER: CounterVec = register_counter_vec!(
        "quic_version_negotiations_total",
        "Total number of QUIC version negotiations by outcome",
        &["outcome"]
    )
    .expect("Failed to create NEGOTIATION_COUNTER metric");
    static ref VERSION_COUNTER: CounterVec = register_counter_vec!(
        "quic_negotiated_versions_total",
        "Negotiated QUIC versions",
        &["version"]
    )
    .expect("Failed to create VERSION_COUNTER metric");
}

pub struct NegotiationMetrics {
    total_negotiations: AtomicU64,
    failed_negotiations: AtomicU64,
    tls_negotiations: AtomicU64,
}

impl Default for NegotiationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl NegotiationMetrics {
    pub fn new() -> Self {
        Self {
            total_negotiations: AtomicU64::new(0),
            failed_negotiations: AtomicU64::new(0),
            tls_negotiations: AtomicU64::new(0),
        }
    }

    pub fn record_outcome(&self, chosen: VersionNumber) {
        self.total_negotiations.fetch_add(1, Ordering::Relaxed);

        if chosen == VersionNumber::VERSION_UNSUPPORTED {
            self.failed_negotiations.fetch_add(1, Ordering::Relaxed);
            NEGOTIATION_COUNTER.with_label_values(&["unsupported"]).inc();
            return;
        }

        if chosen.uses_tls() {
            self.tls_negotiations.fetch_add(1, Ordering::Relaxed);
        }
        NEGOTIATION_COUNTER.with_label_values(&["negotiated"]).inc();
        VERSION_COUNTER
            .with_label_values(&[chosen.to_alt_svc().as_str()])
            .inc();
    }

    pub fn snapshot(&self) -> NegotiationStats {
        NegotiationStats {
            total_negotiations: self.total_negotiations.load(Ordering::Relaxed),
            failed_negotiations: self.failed_negotiations.load(Ordering::Relaxed),
            tls_negotiations: self.tls_negotiations.load(Ordering::Relaxed),
        }
    }

    pub fn report_stats(&self) {
        let stats = self.snapshot();

        info!(
            "📊 Version negotiation: {} total | {} failed ({:.1}%) | {} TLS",
            stats.total_negotiations,
            stats.failed_negotiations,
            (stats.failed_negotiations as f64 / stats.total_negotiations.max(1) as f64) * 100.0,
            stats.tls_negotiations,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationStats {
    pub total_negotiations: u64,
    pub failed_negotiations: u64,
    pub tls_negotiations: u64,
}
