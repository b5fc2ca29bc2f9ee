//! # Core Header Components
//!
//! Header model, wire serialization, and datagram framing.
//!
//! ## Components
//! - **Types**: header form, long packet types, packet numbers, connection IDs
//! - **Header**: long/short header model, shape predicates, size calculation
//! - **Factory / Builder**: ready-made headers per packet kind, field-by-field construction
//! - **Serialization**: encode/decode against `bytes` cursors
//! - **Codec**: `tokio_util` codec for header-prefixed datagrams
//!
//! ## Wire Format
//! ```text
//! Long:  [Flags(1)] [Version(4)] [DCIDLen(1)] [DCID(0-8)] [SCIDLen(1)] [SCID(0-8)] [PacketNumber(4)]
//! Short: [Flags(1)] [DCID(0-8)] [PacketNumber(1/2/4)]
//! ```
//!
//! ## Security
//! - Decoding never panics on untrusted input; every failure is a `HeaderError`
//! - Version negotiation lists are bounded by configuration

pub mod builder;
pub mod codec;
pub mod factory;
pub mod header;
pub mod serialization;
pub mod types;
