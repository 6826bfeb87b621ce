pub mod metrics;

pub use metrics::{NegotiationMetrics, NegotiationStats};
