//! # Error Types
//!
//! Error handling for the header codec.
//!
//! Every contract violation the codec can detect is surfaced as a [`HeaderError`]
//! value instead of aborting, so a transport engine can drop a malformed packet
//! received from the network and keep going.
//!
//! ## Error Categories
//! - **Construction Errors**: unassigned long packet type, wrong-form field access
//! - **Wire Errors**: truncated buffers, invalid flag bits, malformed fields
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! ## Example Usage
//! ```rust
//! use quic_header::core::header::QuicHeader;
//! use quic_header::error::HeaderError;
//!
//! let truncated = [0xC0u8, 0x00, 0x00];
//! match QuicHeader::decode(&mut &truncated[..]) {
//!     Err(HeaderError::BufferTooShort { needed, available }) => {
//!         assert_eq!((needed, available), (4, 2));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

use crate::core::types::HeaderForm;

// HeaderError is the error type for all header operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum HeaderError {
    #[error("Long header has no packet type assigned")]
    UnassignedLongType,

    #[error("Field `{field}` is not available on a {form} header")]
    InvalidFieldAccess { field: String, form: HeaderForm },

    #[error("Unsupported packet number width code: {0}")]
    UnsupportedPacketNumberWidth(u8),

    #[error("Buffer too short: needed {needed} bytes, {available} available")]
    BufferTooShort { needed: usize, available: usize },

    #[error("Fixed bit is not set")]
    InvalidFixedBit,

    #[error("Packet number {value} is not minimally encoded in {width} bytes")]
    NonMinimalPacketNumber { value: u32, width: usize },

    #[error("Connection ID length {0} exceeds 8 bytes")]
    ConnectionIdTooLong(u8),

    #[error("Connection ID {value:#x} does not fit in {len} bytes")]
    ConnectionIdOverflow { value: u64, len: u8 },

    #[error("Connection ID length mismatch: expected {expected} bytes, got {actual}")]
    ConnectionIdLengthMismatch { expected: u8, actual: u8 },

    #[error("Version negotiation packet cannot carry a payload ({0} bytes given)")]
    VersionNegotiationPayload(usize),

    #[error("Supported version list of {0} bytes is not a multiple of 4")]
    MalformedVersionList(usize),

    #[error("Too many supported versions: {count} (maximum: {max})")]
    TooManyVersions { count: usize, max: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),
}

impl HeaderError {
    pub(crate) fn invalid_access(field: &str, form: HeaderForm) -> Self {
        HeaderError::InvalidFieldAccess {
            field: field.to_string(),
            form,
        }
    }

    /// True for errors caused by bytes received from the wire, as opposed to
    /// misuse of the API by the local caller.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            HeaderError::UnsupportedPacketNumberWidth(_)
                | HeaderError::BufferTooShort { .. }
                | HeaderError::InvalidFixedBit
                | HeaderError::NonMinimalPacketNumber { .. }
                | HeaderError::ConnectionIdTooLong(_)
                | HeaderError::MalformedVersionList(_)
                | HeaderError::TooManyVersions { .. }
        )
    }
}

/// Type alias for Results using HeaderError
pub type Result<T> = std::result::Result<T, HeaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_access_message_names_field_and_form() {
        let err = HeaderError::invalid_access("version", HeaderForm::Short);
        assert_eq!(
            err.to_string(),
            "Field `version` is not available on a short header"
        );
    }

    #[test]
    fn test_malformed_input_classification() {
        assert!(HeaderError::InvalidFixedBit.is_malformed_input());
        assert!(HeaderError::BufferTooShort {
            needed: 4,
            available: 1
        }
        .is_malformed_input());
        assert!(!HeaderError::UnassignedLongType.is_malformed_input());
        assert!(!HeaderError::ConfigError("bad".to_string()).is_malformed_input());
    }
}
