//! QUIC protocol version handling

pub mod byte_order;
pub mod negotiation;
pub mod version;

pub use byte_order::ByteOrder;
pub use negotiation::{choose_supported_version, is_supported_version, SupportedVersions};
pub use version::{GquicDraft, StreamId, UnassignedWire, VersionNumber, GQUIC_VERSION_0, MAX_GQUIC_VERSION};
