//! QUIC Version Negotiation Tool
//!
//! Negotiates the configured supported versions against a peer's offered list
//! and prints the outcome as JSON.
//!
//! Usage: `quicversion Q039 Q038 ...` (or a single comma separated list)

use anyhow::{bail, Result};
use quicversion::{NegotiationConfig, NegotiationMetrics, VersionNumber};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct NegotiationReport {
    ours: Vec<String>,
    theirs: Vec<String>,
    chosen: String,
    chosen_wire: i32,
    uses_tls: bool,
    uses_ietf_stream_frame: bool,
    uses_ietf_ack_frame: bool,
    crypto_stream_id: u64,
    alt_svc: String,
}

fn main() -> Result<()> {
    // Initialize environment and logging
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = NegotiationConfig::from_env()?;
    info!("📋 Configuration loaded: {:?}", config);

    // 피어 버전 목록: 인자 여러 개 또는 쉼표로 구분된 목록
    let theirs = std::env::args()
        .skip(1)
        .flat_map(|arg| {
            arg.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .map(|token| token.parse::<VersionNumber>())
        .collect::<Result<Vec<_>, _>>()?;

    let metrics = NegotiationMetrics::new();
    let chosen = config
        .supported_versions
        .negotiate_with_metrics(&theirs, &metrics);

    let report = NegotiationReport {
        ours: config.supported_versions.iter().map(|v| v.to_string()).collect(),
        theirs: theirs.iter().map(|v| v.to_string()).collect(),
        chosen: chosen.to_string(),
        chosen_wire: chosen.to_wire(),
        uses_tls: chosen.uses_tls(),
        uses_ietf_stream_frame: chosen.uses_ietf_stream_frame(),
        uses_ietf_ack_frame: chosen.uses_ietf_ack_frame(),
        crypto_stream_id: chosen.crypto_stream_id(),
        alt_svc: config.alt_svc_header(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    metrics.report_stats();

    if chosen == VersionNumber::VERSION_UNSUPPORTED {
        warn!("🛑 No mutually supported version, a version negotiation packet is required");
        bail!("no common QUIC version with peer");
    }

    info!("✅ Negotiated {}", chosen);
    Ok(())
}
