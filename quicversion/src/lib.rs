//! QUIC Version Identification and Negotiation Library
//!
//! QUIC 버전 번호를 분류하고, 클라이언트와 서버가 광고한 버전 목록에서
//! 공통 버전을 선택하는 라이브러리입니다.
//!
//! ## 주요 특징
//!
//! - **버전 분류**: gQUIC 레거시 버전, TLS 버전, 센티널 값을 타입으로 구분
//! - **기능 조회**: IETF STREAM/ACK 프레임 사용 여부, 바이트 순서, 암호 스트림 ID
//! - **버전 협상**: 우리 선호 순서대로 첫 번째 공통 버전을 선택
//! - **Alt-Svc**: HTTP Alt-Svc 헤더용 버전 표현
//!
//! ## 빠른 시작
//!
//! ```rust
//! use quicversion::{SupportedVersions, VersionNumber};
//!
//! let ours = SupportedVersions::global();
//! let theirs = [VersionNumber::VERSION_37, VersionNumber::VERSION_38];
//!
//! let chosen = ours.negotiate(&theirs);
//! assert_eq!(chosen, VersionNumber::VERSION_38);
//! assert!(!chosen.uses_ietf_ack_frame());
//!
//! // 공통 버전이 없으면 센티널 값이 반환됩니다
//! let none = ours.negotiate(&[VersionNumber::VERSION_TLS]);
//! assert_eq!(none, VersionNumber::VERSION_UNSUPPORTED);
//! ```

pub mod config;
pub mod monitoring;
pub mod protocol;

// 편의를 위한 재출력
pub use config::NegotiationConfig;
pub use error::VersionError;
pub use monitoring::metrics::NegotiationMetrics;
pub use protocol::{
    choose_supported_version, is_supported_version, ByteOrder, GquicDraft, StreamId,
    SupportedVersions, VersionNumber,
};

/// 라이브러리 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 에러 타입들
pub mod error {
    use crate::protocol::version::VersionNumber;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum VersionError {
        #[error("Unparsable QUIC version: {input:?}")]
        Parse { input: String },

        #[error("Duplicate version in supported list: {0}")]
        DuplicateVersion(VersionNumber),

        #[error("Sentinel value in supported list: {0}")]
        SentinelInSupportedList(VersionNumber),

        #[error("Supported version list is empty")]
        EmptySupportedList,
    }
}
