//! Version Negotiation
//!
//! We pick greedily by our own preference: the first entry of our list that the
//! peer offers wins. The peer's list is treated as a set.

use crate::error::VersionError;
use crate::monitoring::metrics::NegotiationMetrics;
use crate::protocol::version::VersionNumber;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

static DEFAULT_SUPPORTED_VERSIONS: Lazy<SupportedVersions> = Lazy::new(|| SupportedVersions {
    versions: vec![
        VersionNumber::VERSION_39,
        VersionNumber::VERSION_38,
        VersionNumber::VERSION_37,
    ],
});

/// Whether `candidate` appears anywhere in `supported`
pub fn is_supported_version(supported: &[VersionNumber], candidate: VersionNumber) -> bool {
    supported.contains(&candidate)
}

/// Returns the first version of `ours` (most preferred first) that also appears in
/// `theirs`, or [`VersionNumber::VERSION_UNSUPPORTED`] when there is none.
///
/// Sentinels never match, even if both sides list them.
pub fn choose_supported_version(ours: &[VersionNumber], theirs: &[VersionNumber]) -> VersionNumber {
    ours.iter()
        .copied()
        .filter(|version| !version.is_sentinel())
        .find(|version| theirs.contains(version))
        .unwrap_or(VersionNumber::VERSION_UNSUPPORTED)
}

/// Versions this endpoint accepts, in descending preference.
///
/// Never empty, no duplicates, no sentinels. An empty list is refused when the
/// configuration is built so that `preferred()` always has an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VersionNumber>", into = "Vec<VersionNumber>")]
pub struct SupportedVersions {
    versions: Vec<VersionNumber>,
}

impl SupportedVersions {
    pub fn new(versions: Vec<VersionNumber>) -> Result<Self, VersionError> {
        if versions.is_empty() {
            return Err(VersionError::EmptySupportedList);
        }
        for (index, version) in versions.iter().enumerate() {
            if version.is_sentinel() {
                return Err(VersionError::SentinelInSupportedList(*version));
            }
            if versions[..index].contains(version) {
                return Err(VersionError::DuplicateVersion(*version));
            }
        }
        Ok(Self { versions })
    }

    /// The process-wide default list: gQUIC 39, 38, 37.
    pub fn global() -> &'static SupportedVersions {
        &DEFAULT_SUPPORTED_VERSIONS
    }

    pub fn as_slice(&self) -> &[VersionNumber] {
        &self.versions
    }

    pub fn iter(&self) -> impl Iterator<Item = VersionNumber> + '_ {
        self.versions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn preferred(&self) -> VersionNumber {
        self.versions[0]
    }

    pub fn contains(&self, version: VersionNumber) -> bool {
        is_supported_version(&self.versions, version)
    }

    /// Negotiates against the versions a peer offered.
    pub fn negotiate(&self, theirs: &[VersionNumber]) -> VersionNumber {
        let chosen = choose_supported_version(&self.versions, theirs);
        if chosen == VersionNumber::VERSION_UNSUPPORTED {
            warn!(
                "No common QUIC version: ours [{}], theirs [{}]",
                self,
                DisplayList(theirs)
            );
        } else {
            debug!("Negotiated QUIC version {} from {} offered", chosen, theirs.len());
        }
        chosen
    }

    pub fn negotiate_with_metrics(
        &self,
        theirs: &[VersionNumber],
        metrics: &NegotiationMetrics,
    ) -> VersionNumber {
        let chosen = self.negotiate(theirs);
        metrics.record_outcome(chosen);
        chosen
    }

    /// Comma separated `v=` list for an Alt-Svc header, e.g. `39,38,37`
    pub fn to_alt_svc(&self) -> String {
        self.versions
            .iter()
            .map(|version| version.to_alt_svc())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for SupportedVersions {
    fn default() -> Self {
        Self::global().clone()
    }
}

impl TryFrom<Vec<VersionNumber>> for SupportedVersions {
    type Error = VersionError;

    fn try_from(versions: Vec<VersionNumber>) -> Result<Self, Self::Error> {
        Self::new(versions)
    }
}

impl From<SupportedVersions> for Vec<VersionNumber> {
    fn from(supported: SupportedVersions) -> Self {
        supported.versions
    }
}

impl FromStr for SupportedVersions {
    type Err = VersionError;

    /// Parses a comma separated list such as `Q039,Q038,tls`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let versions = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<VersionNumber>)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(versions)
    }
}

impl std::fmt::Display for SupportedVersions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DisplayList(&self.versions))
    }
}

struct DisplayList<'a>(&'a [VersionNumber]);

impl std::fmt::Display for DisplayList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, version) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", version)?;
        }
        Ok(())
    }
}
