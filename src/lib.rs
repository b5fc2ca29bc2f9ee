//! # quic-header
//!
//! Wire codec for the header of a QUIC-style transport packet.
//!
//! The crate turns an in-memory header into its byte layout and parses that
//! layout back. Connection state, payload protection and loss recovery belong
//! to the transport engine that uses it.
//!
//! ## Quick Start
//! ```rust
//! use quic_header::{PacketNumber, QuicHeader};
//!
//! let header = QuicHeader::initial(0x1122_3344_5566_7788, 1, PacketNumber::new(5));
//! let bytes = header.to_bytes();
//! assert_eq!(bytes[0], 0xC0);
//! assert_eq!(bytes.len(), header.encoded_len());
//!
//! let (decoded, consumed) = QuicHeader::from_bytes(&bytes).expect("valid header");
//! assert_eq!(consumed, bytes.len());
//! assert_eq!(decoded, header);
//! ```
//!
//! ## Modules
//! - [`core`]: header model, serialization, `tokio_util` codec
//! - [`config`]: codec and logging configuration
//! - [`error`]: error type shared by all operations
//! - [`utils`]: logging setup and metrics

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::config::{CodecConfig, HeaderConfig};
pub use crate::core::builder::HeaderBuilder;
pub use crate::core::codec::{HeaderCodec, QuicPacket};
pub use crate::core::header::{LongHeader, QuicHeader, ShortHeader};
pub use crate::core::types::{
    ConnectionId, HeaderForm, LongPacketType, PacketNumber, PacketNumberLength,
};
pub use crate::error::{HeaderError, Result};
