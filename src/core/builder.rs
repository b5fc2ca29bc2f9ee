//! # Header Builder
//!
//! Field-by-field construction for callers that do not fit one of the named
//! constructors. Fields are collected without checks and validated once in
//! [`HeaderBuilder::build`], where a long header without a packet type or a
//! field set on the wrong form is reported as an error.
//!
//! ```rust
//! use quic_header::core::builder::HeaderBuilder;
//! use quic_header::core::types::{HeaderForm, LongPacketType, PacketNumber};
//!
//! let header = HeaderBuilder::new()
//!     .form(HeaderForm::Long)
//!     .long_type(LongPacketType::Handshake)
//!     .version(1)
//!     .connection_id(0x1122)
//!     .packet_number(PacketNumber::new(7))
//!     .build()
//!     .expect("valid header");
//! assert!(header.is_handshake());
//! ```

use crate::core::header::{LongHeader, QuicHeader, ShortHeader};
use crate::core::types::{ConnectionId, HeaderForm, LongPacketType, PacketNumber};
use crate::error::{HeaderError, Result};

/// Collects header fields before validating them into a [`QuicHeader`]
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    form: HeaderForm,
    long_type: Option<LongPacketType>,
    version: Option<u32>,
    dcid: Option<ConnectionId>,
    scid: Option<ConnectionId>,
    spin_bit: Option<bool>,
    key_phase_bit: Option<bool>,
    packet_number: PacketNumber,
    supported_versions: Option<Vec<u32>>,
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderBuilder {
    /// Start from an empty short header
    pub fn new() -> Self {
        Self {
            form: HeaderForm::Short,
            long_type: None,
            version: None,
            dcid: None,
            scid: None,
            spin_bit: None,
            key_phase_bit: None,
            packet_number: PacketNumber::default(),
            supported_versions: None,
        }
    }

    pub fn form(mut self, form: HeaderForm) -> Self {
        self.form = form;
        self
    }

    pub fn long_type(mut self, long_type: LongPacketType) -> Self {
        self.long_type = Some(long_type);
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Full-width destination connection ID
    pub fn connection_id(self, connection_id: u64) -> Self {
        self.dcid(ConnectionId::new(connection_id))
    }

    pub fn dcid(mut self, dcid: ConnectionId) -> Self {
        self.dcid = Some(dcid);
        self
    }

    /// Full-width source connection ID
    pub fn source_connection_id(self, connection_id: u64) -> Self {
        self.scid(ConnectionId::new(connection_id))
    }

    pub fn scid(mut self, scid: ConnectionId) -> Self {
        self.scid = Some(scid);
        self
    }

    pub fn spin_bit(mut self, spin_bit: bool) -> Self {
        self.spin_bit = Some(spin_bit);
        self
    }

    pub fn key_phase_bit(mut self, key_phase_bit: bool) -> Self {
        self.key_phase_bit = Some(key_phase_bit);
        self
    }

    pub fn packet_number(mut self, packet_number: PacketNumber) -> Self {
        self.packet_number = packet_number;
        self
    }

    pub fn supported_versions(mut self, versions: Vec<u32>) -> Self {
        self.supported_versions = Some(versions);
        self
    }

    /// Validate the collected fields
    pub fn build(self) -> Result<QuicHeader> {
        match self.form {
            HeaderForm::Long => self.build_long().map(QuicHeader::Long),
            HeaderForm::Short => self.build_short().map(QuicHeader::Short),
        }
    }

    fn build_long(self) -> Result<LongHeader> {
        if self.spin_bit.is_some() {
            return Err(HeaderError::invalid_access("spin_bit", HeaderForm::Long));
        }
        if self.key_phase_bit.is_some() {
            return Err(HeaderError::invalid_access("key_phase_bit", HeaderForm::Long));
        }

        let dcid = self.dcid.unwrap_or_default();
        let scid = self.scid.unwrap_or_default();
        let version = self.version.unwrap_or(0);

        if let Some(versions) = self.supported_versions {
            return Ok(LongHeader::version_negotiation(dcid, scid, versions));
        }

        let packet_type = self.long_type.ok_or(HeaderError::UnassignedLongType)?;
        Ok(LongHeader::new(
            packet_type,
            version,
            dcid,
            scid,
            self.packet_number,
        ))
    }

    fn build_short(self) -> Result<ShortHeader> {
        let misplaced = [
            ("long_type", self.long_type.is_some()),
            ("version", self.version.is_some()),
            ("source_connection_id", self.scid.is_some()),
            ("supported_versions", self.supported_versions.is_some()),
        ];
        if let Some((field, _)) = misplaced.iter().find(|(_, set)| *set) {
            return Err(HeaderError::invalid_access(field, HeaderForm::Short));
        }

        Ok(ShortHeader::new(
            self.dcid,
            self.packet_number,
            self.key_phase_bit.unwrap_or(false),
            self.spin_bit.unwrap_or(false),
        ))
    }
}
