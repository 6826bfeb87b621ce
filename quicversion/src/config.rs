//! Version Negotiation Configuration

use crate::protocol::negotiation::SupportedVersions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

const DEFAULT_ALT_SVC_PORT: u16 = 443;
/// 30 days
const DEFAULT_ALT_SVC_MAX_AGE_SECS: u64 = 2_592_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationConfig {
    // Versions we accept, most preferred first
    pub supported_versions: SupportedVersions,

    // Alt-Svc advertisement
    pub alt_svc_port: u16,
    pub alt_svc_max_age_secs: u64,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            supported_versions: SupportedVersions::default(),
            alt_svc_port: DEFAULT_ALT_SVC_PORT,
            alt_svc_max_age_secs: DEFAULT_ALT_SVC_MAX_AGE_SECS,
        }
    }
}

impl NegotiationConfig {
    pub fn from_env() -> Result<Self> {
        let supported_versions = match env::var("QUIC_SUPPORTED_VERSIONS") {
            Ok(list) => list
                .parse::<SupportedVersions>()
                .with_context(|| format!("QUIC_SUPPORTED_VERSIONS={}", list))?,
            Err(_) => SupportedVersions::default(),
        };

        let alt_svc_port = env::var("QUIC_ALT_SVC_PORT")
            .unwrap_or_else(|_| DEFAULT_ALT_SVC_PORT.to_string())
            .parse::<u16>()
            .context("QUIC_ALT_SVC_PORT")?;

        let alt_svc_max_age_secs = env::var("QUIC_ALT_SVC_MAX_AGE")
            .unwrap_or_else(|_| DEFAULT_ALT_SVC_MAX_AGE_SECS.to_string())
            .parse::<u64>()
            .context("QUIC_ALT_SVC_MAX_AGE")?;

        let config = Self {
            supported_versions,
            alt_svc_port,
            alt_svc_max_age_secs,
        };
        info!("Supported QUIC versions: {}", config.supported_versions);
        Ok(config)
    }

    /// e.g. `quic=":443"; ma=2592000; v="39,38,37"`
    pub fn alt_svc_header(&self) -> String {
        format!(
            "quic=\":{}\"; ma={}; v=\"{}\"",
            self.alt_svc_port,
            self.alt_svc_max_age_secs,
            self.supported_versions.to_alt_svc()
        )
    }
}
