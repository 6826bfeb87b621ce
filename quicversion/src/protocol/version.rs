//! QUIC Version Numbers
//!
//! Every version travels on the wire as a 32-bit field. Inside the crate it is a
//! tagged value so a legacy gQUIC draft, the TLS dev version and the sentinels can
//! never be confused by numeric coincidence.

use crate::error::VersionError;
use crate::protocol::byte_order::ByteOrder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// First value of the gQUIC band ("Q000")
pub const GQUIC_VERSION_0: i32 = 0x5130_3030;
/// Last value of the gQUIC band ("Q049")
pub const MAX_GQUIC_VERSION: i32 = 0x5130_3439;

/// Wire value of the TLS 1.3 handshake version
const TLS_WIRE: i32 = 101;
const WHATEVER_WIRE: i32 = 0;
const UNSUPPORTED_WIRE: i32 = -1;
const UNKNOWN_WIRE: i32 = -2;

/// Stream identifier as seen by the framing layer
pub type StreamId = u64;

/// A gQUIC draft number in `0..=49`, excluding the unassigned draft 40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GquicDraft(u8);

impl GquicDraft {
    pub const MAX: u8 = 49;
    /// Draft 40 was never assigned.
    pub const SKIPPED: u8 = 40;

    pub const fn new(draft: u8) -> Option<Self> {
        if draft > Self::MAX || draft == Self::SKIPPED {
            None
        } else {
            Some(Self(draft))
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// `GQUIC_VERSION_0 + tens * 0x100 + ones`, i.e. the ASCII tag "Q0<tens><ones>"
    pub const fn to_wire(self) -> i32 {
        GQUIC_VERSION_0 + (self.0 as i32 / 10) * 0x100 + (self.0 as i32 % 10)
    }

    /// Accepts only canonical encodings: the band plus ASCII digits in both
    /// trailing bytes.
    fn from_wire(value: i32) -> Option<Self> {
        if !in_gquic_band(value) {
            return None;
        }
        let [_, _, tens, ones] = value.to_be_bytes();
        if !ones.is_ascii_digit() {
            return None;
        }
        // the band already restricts `tens` to '0'..='4'
        let draft = (tens - b'0') * 10 + (ones - b'0');
        debug_assert_eq!(draft as i32, decode_gquic(value));
        Self::new(draft)
    }
}

fn in_gquic_band(value: i32) -> bool {
    (GQUIC_VERSION_0..=MAX_GQUIC_VERSION).contains(&value)
}

/// Inverse of the gQUIC affine encoding: `10 * (v - v0) / 0x100 + v % 0x10`
fn decode_gquic(value: i32) -> i32 {
    10 * (value - GQUIC_VERSION_0) / 0x100 + value % 0x10
}

/// Wire value that matches no named version. Only [`VersionNumber::from_wire`]
/// builds one, so it never holds a sentinel, the TLS value or a canonical draft.
///
/// ```compile_fail
/// use quicversion::protocol::version::{UnassignedWire, VersionNumber};
///
/// let _ = VersionNumber::Unassigned(UnassignedWire(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnassignedWire(i32);

impl UnassignedWire {
    pub fn get(self) -> i32 {
        self.0
    }
}

/// A QUIC version identifier.
///
/// Equality, hashing and serde all go through [`VersionNumber::to_wire`], so two
/// values are equal exactly when they would be sent as the same 32 bits.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum VersionNumber {
    /// Legacy gQUIC draft version
    Gquic(GquicDraft),
    /// TLS 1.3 handshake dev version
    Tls,
    /// Not negotiated yet, or the caller does not care
    #[default]
    Whatever,
    /// Negotiation found no common version
    Unsupported,
    /// Present but not classifiable
    Unknown,
    /// Any other wire value. Use [`VersionNumber::from_wire`] to build one.
    Unassigned(UnassignedWire),
}

impl VersionNumber {
    pub const VERSION_37: Self = Self::Gquic(GquicDraft(37));
    pub const VERSION_38: Self = Self::Gquic(GquicDraft(38));
    pub const VERSION_39: Self = Self::Gquic(GquicDraft(39));
    pub const VERSION_41: Self = Self::Gquic(GquicDraft(41));
    pub const VERSION_TLS: Self = Self::Tls;
    pub const VERSION_WHATEVER: Self = Self::Whatever;
    pub const VERSION_UNSUPPORTED: Self = Self::Unsupported;
    pub const VERSION_UNKNOWN: Self = Self::Unknown;

    /// Classifies a raw wire value. Total over `i32`.
    pub fn from_wire(value: i32) -> Self {
        match value {
            TLS_WIRE => Self::Tls,
            WHATEVER_WIRE => Self::Whatever,
            UNSUPPORTED_WIRE => Self::Unsupported,
            UNKNOWN_WIRE => Self::Unknown,
            v => GquicDraft::from_wire(v).map_or(Self::Unassigned(UnassignedWire(v)), Self::Gquic),
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            Self::Gquic(draft) => draft.to_wire(),
            Self::Tls => TLS_WIRE,
            Self::Whatever => WHATEVER_WIRE,
            Self::Unsupported => UNSUPPORTED_WIRE,
            Self::Unknown => UNKNOWN_WIRE,
            Self::Unassigned(raw) => raw.get(),
        }
    }

    /// Version field as it appears in a packet header
    pub fn to_be_bytes(self) -> [u8; 4] {
        self.to_wire().to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self::from_wire(i32::from_be_bytes(bytes))
    }

    /// Whatever, Unsupported and Unknown. These never take part in negotiation.
    pub fn is_sentinel(self) -> bool {
        matches!(self, Self::Whatever | Self::Unsupported | Self::Unknown)
    }

    pub fn gquic_draft(self) -> Option<GquicDraft> {
        match self {
            Self::Gquic(draft) => Some(draft),
            _ => None,
        }
    }

    /// Whether this version uses TLS 1.3 for the handshake
    pub fn uses_tls(self) -> bool {
        self == Self::VERSION_TLS
    }

    /// Only the enumerated legacy versions keep the gQUIC STREAM frame layout.
    /// Anything else, unrecognized values included, gets the IETF layout.
    pub fn uses_ietf_stream_frame(self) -> bool {
        !self.is_legacy_frame_version()
    }

    pub fn uses_ietf_ack_frame(self) -> bool {
        !self.is_legacy_frame_version()
    }

    fn is_legacy_frame_version(self) -> bool {
        self == Self::VERSION_37 || self == Self::VERSION_38 || self == Self::VERSION_39
    }

    /// 37 and 38 encode integers little endian; 39 switched to big endian.
    pub fn byte_order(self) -> ByteOrder {
        if self == Self::VERSION_37 || self == Self::VERSION_38 {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    /// TLS versions carry the handshake on stream 0, gQUIC on stream 1.
    pub fn crypto_stream_id(self) -> StreamId {
        if self.uses_tls() {
            0
        } else {
            1
        }
    }

    /// Representation for the `v=` parameter of an HTTP Alt-Svc header.
    /// Always numeric.
    pub fn to_alt_svc(self) -> String {
        match self {
            Self::Gquic(draft) => draft.number().to_string(),
            Self::Unassigned(raw) if in_gquic_band(raw.get()) => decode_gquic(raw.get()).to_string(),
            other => other.to_wire().to_string(),
        }
    }
}

impl PartialEq for VersionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.to_wire() == other.to_wire()
    }
}

impl Eq for VersionNumber {}

impl Hash for VersionNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_wire().hash(state);
    }
}

impl From<i32> for VersionNumber {
    fn from(value: i32) -> Self {
        Self::from_wire(value)
    }
}

impl From<VersionNumber> for i32 {
    fn from(version: VersionNumber) -> Self {
        version.to_wire()
    }
}

impl From<GquicDraft> for VersionNumber {
    fn from(draft: GquicDraft) -> Self {
        Self::Gquic(draft)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whatever => f.write_str("whatever"),
            Self::Unsupported => f.write_str("unsupported"),
            Self::Unknown => f.write_str("unknown"),
            Self::Tls => f.write_str("TLS dev version (WIP)"),
            Self::Gquic(draft) => write!(f, "gQUIC {}", draft.number()),
            // non-canonical band values still read as gQUIC in logs
            Self::Unassigned(raw) if in_gquic_band(raw.get()) => {
                write!(f, "gQUIC {}", decode_gquic(raw.get()))
            }
            Self::Unassigned(raw) => write!(f, "{}", raw.get()),
        }
    }
}

impl FromStr for VersionNumber {
    type Err = VersionError;

    /// Accepts `Q039`, `gQUIC 39`, `tls`, the sentinel words, and decimal or
    /// `0x` hex wire values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || VersionError::Parse {
            input: s.to_string(),
        };

        match text.to_ascii_lowercase().as_str() {
            "tls" => return Ok(Self::Tls),
            "whatever" => return Ok(Self::Whatever),
            "unsupported" => return Ok(Self::Unsupported),
            "unknown" => return Ok(Self::Unknown),
            _ => {}
        }

        let draft_text = strip_prefix_ignore_case(text, "gquic ")
            .map(str::trim)
            .or_else(|| strip_prefix_ignore_case(text, "q").filter(|rest| rest.len() == 3));
        if let Some(digits) = draft_text {
            if !all_digits(digits, 10) {
                return Err(invalid());
            }
            return digits
                .parse::<u8>()
                .ok()
                .and_then(GquicDraft::new)
                .map(Self::Gquic)
                .ok_or_else(invalid);
        }

        // signs only as a leading '-' on decimal values
        let raw = match strip_prefix_ignore_case(text, "0x") {
            Some(hex) if all_digits(hex, 16) => u32::from_str_radix(hex, 16).map(|v| v as i32).ok(),
            Some(_) => None,
            None if all_digits(text.strip_prefix('-').unwrap_or(text), 10) => {
                text.parse::<i32>().ok()
            }
            None => None,
        };
        raw.map(Self::from_wire).ok_or_else(invalid)
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

fn all_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_digit(radix))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMED: [VersionNumber; 4] = [
        VersionNumber::VERSION_37,
        VersionNumber::VERSION_38,
        VersionNumber::VERSION_39,
        VersionNumber::VERSION_41,
    ];

    #[test]
    fn legacy_constants_match_wire_layout() {
        assert_eq!(VersionNumber::VERSION_37.to_wire(), GQUIC_VERSION_0 + 3 * 0x100 + 0x7);
        assert_eq!(VersionNumber::VERSION_38.to_wire(), GQUIC_VERSION_0 + 3 * 0x100 + 0x8);
        assert_eq!(VersionNumber::VERSION_39.to_wire(), GQUIC_VERSION_0 + 3 * 0x100 + 0x9);
        assert_eq!(VersionNumber::VERSION_41.to_wire(), GQUIC_VERSION_0 + 4 * 0x100 + 0x1);
        assert_eq!(VersionNumber::VERSION_39.to_be_bytes(), *b"Q039");
    }

    #[test]
    fn sentinels_have_fixed_wire_values() {
        assert_eq!(VersionNumber::VERSION_TLS.to_wire(), 101);
        assert_eq!(VersionNumber::VERSION_WHATEVER.to_wire(), 0);
        assert_eq!(VersionNumber::VERSION_UNSUPPORTED.to_wire(), -1);
        assert_eq!(VersionNumber::VERSION_UNKNOWN.to_wire(), -2);
    }

    #[test]
    fn from_wire_classifies_named_values() {
        for version in NAMED {
            assert_eq!(VersionNumber::from_wire(version.to_wire()), version);
            assert!(matches!(VersionNumber::from_wire(version.to_wire()), VersionNumber::Gquic(_)));
        }
        assert!(matches!(VersionNumber::from_wire(101), VersionNumber::Tls));
        assert!(matches!(VersionNumber::from_wire(0), VersionNumber::Whatever));
        assert!(matches!(VersionNumber::from_wire(-1), VersionNumber::Unsupported));
        assert!(matches!(VersionNumber::from_wire(-2), VersionNumber::Unknown));
    }

    #[test]
    fn version_40_is_never_a_gquic_draft() {
        assert!(GquicDraft::new(40).is_none());
        let q040 = i32::from_be_bytes(*b"Q040");
        assert!(matches!(VersionNumber::from_wire(q040), VersionNumber::Unassigned(_)));
    }

    #[test]
    fn non_canonical_band_values_are_unassigned() {
        let value = GQUIC_VERSION_0 + 0x0a;
        assert!(matches!(VersionNumber::from_wire(value), VersionNumber::Unassigned(_)));
    }

    #[test]
    fn unassigned_compares_by_wire_value() {
        let seven = VersionNumber::from_wire(7);
        assert!(matches!(seven, VersionNumber::Unassigned(raw) if raw.get() == 7));
        assert_ne!(seven, VersionNumber::VERSION_TLS);
    }

    #[test]
    fn uses_tls_only_for_tls_version() {
        assert!(VersionNumber::VERSION_TLS.uses_tls());
        for version in NAMED {
            assert!(!version.uses_tls());
        }
        assert!(!VersionNumber::VERSION_WHATEVER.uses_tls());
        assert!(!VersionNumber::VERSION_UNSUPPORTED.uses_tls());
        assert!(!VersionNumber::VERSION_UNKNOWN.uses_tls());
    }

    #[test]
    fn ietf_frames_default_to_true() {
        for version in [
            VersionNumber::VERSION_37,
            VersionNumber::VERSION_38,
            VersionNumber::VERSION_39,
        ] {
            assert!(!version.uses_ietf_stream_frame());
            assert!(!version.uses_ietf_ack_frame());
        }
        for version in [
            VersionNumber::VERSION_TLS,
            VersionNumber::VERSION_41,
            VersionNumber::from_wire(1),
        ] {
            assert!(version.uses_ietf_stream_frame());
            assert!(version.uses_ietf_ack_frame());
        }
    }

    #[test]
    fn byte_order_and_crypto_stream() {
        assert_eq!(VersionNumber::VERSION_37.byte_order(), ByteOrder::LittleEndian);
        assert_eq!(VersionNumber::VERSION_38.byte_order(), ByteOrder::LittleEndian);
        assert_eq!(VersionNumber::VERSION_39.byte_order(), ByteOrder::BigEndian);
        assert_eq!(VersionNumber::VERSION_TLS.byte_order(), ByteOrder::BigEndian);

        assert_eq!(VersionNumber::VERSION_37.crypto_stream_id(), 1);
        assert_eq!(VersionNumber::VERSION_39.crypto_stream_id(), 1);
        assert_eq!(VersionNumber::VERSION_TLS.crypto_stream_id(), 0);
    }

    #[test]
    fn display_names() {
        assert_eq!(VersionNumber::VERSION_WHATEVER.to_string(), "whatever");
        assert_eq!(VersionNumber::VERSION_UNSUPPORTED.to_string(), "unsupported");
        assert_eq!(VersionNumber::VERSION_UNKNOWN.to_string(), "unknown");
        assert_eq!(VersionNumber::VERSION_TLS.to_string(), "TLS dev version (WIP)");
        assert_eq!(VersionNumber::VERSION_37.to_string(), "gQUIC 37");
        assert_eq!(VersionNumber::VERSION_41.to_string(), "gQUIC 41");
        assert_eq!(VersionNumber::from_wire(1234).to_string(), "1234");
    }

    #[test]
    fn display_contains_decoded_draft() {
        for version in NAMED {
            let decoded = decode_gquic(version.to_wire());
            assert!(version.to_string().contains(&decoded.to_string()));
        }
    }

    #[test]
    fn alt_svc_is_numeric() {
        assert_eq!(VersionNumber::VERSION_39.to_alt_svc(), "39");
        assert_eq!(VersionNumber::VERSION_TLS.to_alt_svc(), "101");
        assert_eq!(VersionNumber::VERSION_WHATEVER.to_alt_svc(), "0");
        assert_eq!(VersionNumber::VERSION_UNSUPPORTED.to_alt_svc(), "-1");
        assert_eq!(VersionNumber::VERSION_UNKNOWN.to_alt_svc(), "-2");
    }

    #[test]
    fn parse_accepts_tags_and_raw_values() {
        assert_eq!("Q039".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_39));
        assert_eq!("gQUIC 41".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_41));
        assert_eq!("TLS".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_TLS));
        assert_eq!("unknown".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_UNKNOWN));
        assert_eq!("0x51303338".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_38));
        assert_eq!("-1".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_UNSUPPORTED));
    }

    #[test]
    fn named_wire_values_never_become_unassigned() {
        for raw in [0, -1, -2, 101] {
            assert!(!matches!(VersionNumber::from_wire(raw), VersionNumber::Unassigned(_)));
        }
        assert!(VersionNumber::from_wire(0).is_sentinel());
        assert!(VersionNumber::from_wire(-1).is_sentinel());

        let tls = VersionNumber::from_wire(101);
        assert!(tls.uses_tls());
        assert_eq!(tls.to_string(), "TLS dev version (WIP)");
    }

    #[test]
    fn gquic_band_edges_render_inclusively() {
        let cases = [
            (0x5130_302f, "1362112559", "1362112559"),
            (0x5130_3030, "gQUIC 0", "0"),
            (0x5130_3439, "gQUIC 49", "49"),
            (0x5130_343a, "1362113594", "1362113594"),
            // non-canonical, still decoded through the affine transform
            (0x5130_33ff, "gQUIC 54", "54"),
        ];
        for (raw, display, alt_svc) in cases {
            let version = VersionNumber::from_wire(raw);
            assert_eq!(version.to_string(), display, "display of {:#x}", raw);
            assert_eq!(version.to_alt_svc(), alt_svc, "alt-svc of {:#x}", raw);
        }
        assert!(matches!(
            VersionNumber::from_wire(0x5130_33ff),
            VersionNumber::Unassigned(_)
        ));
    }

    #[test]
    fn parse_is_case_insensitive_and_unsigned() {
        assert_eq!("GQUIC 39".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_39));
        assert_eq!("gquic 37".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_37));
        assert_eq!("q038".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_38));
        assert_eq!("0X65".parse::<VersionNumber>().ok(), Some(VersionNumber::VERSION_TLS));

        for text in ["Q+39", "gQUIC +39", "0x+1", "+101", "--1", "-", "0x"] {
            assert!(text.parse::<VersionNumber>().is_err(), "{} should not parse", text);
        }
    }

    #[test]
    fn default_is_whatever() {
        assert!(matches!(VersionNumber::default(), VersionNumber::Whatever));
    }

    #[test]
    fn parse_rejects_garbage_and_draft_40() {
        assert!("Q040".parse::<VersionNumber>().is_err());
        assert!("Qabc".parse::<VersionNumber>().is_err());
        assert!("version".parse::<VersionNumber>().is_err());
        assert!("".parse::<VersionNumber>().is_err());
    }
}
