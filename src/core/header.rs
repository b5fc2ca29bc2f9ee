//! # Packet Header Model
//!
//! In-memory representation of a QUIC-style packet header.
//!
//! A header is either [`LongHeader`] (handshake packets: version, both
//! connection IDs, 4-byte packet number) or [`ShortHeader`] (established
//! connections: spin and key phase bits, optional destination connection ID,
//! 1/2/4-byte packet number). [`QuicHeader`] wraps the two and answers the
//! shape questions the rest of the stack asks before touching format-specific
//! fields.
//!
//! ## Wire Layout
//! ```text
//! Long:  [1|1|TT|0000] [Version(4)] [DCIDLen(1)] [DCID] [SCIDLen(1)] [SCID] [PacketNumber(4)]
//! Short: [0|1|S|00|K|PP] [DCID] [PacketNumber(1/2/4)]
//! ```
//!
//! Version negotiation headers carry version 0 and replace the packet number
//! with the list of supported versions.

use std::fmt;

use crate::core::types::{
    ConnectionId, HeaderForm, LongPacketType, PacketNumber, PacketNumberLength,
};
use crate::error::{HeaderError, Result};

/// Flags byte + version + DCID length + SCID length
const LONG_HEADER_FIXED_LEN: usize = 1 + 4 + 1 + 1;

/// Long header fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LongHeader {
    packet_type: LongPacketType,
    version: u32,
    dcid: ConnectionId,
    scid: ConnectionId,
    packet_number: PacketNumber,
    supported_versions: Vec<u32>,
}

impl LongHeader {
    /// Create a long header.
    ///
    /// Version 0 and [`LongPacketType::VersionNegotiation`] imply each other:
    /// either one turns the header into a version negotiation header with no
    /// packet number.
    pub fn new(
        packet_type: LongPacketType,
        version: u32,
        dcid: ConnectionId,
        scid: ConnectionId,
        packet_number: PacketNumber,
    ) -> Self {
        if version == 0 || packet_type == LongPacketType::VersionNegotiation {
            return Self::version_negotiation(dcid, scid, Vec::new());
        }
        Self {
            packet_type,
            version,
            dcid,
            scid,
            packet_number,
            supported_versions: Vec::new(),
        }
    }

    /// Create a version negotiation header advertising `supported_versions`
    pub fn version_negotiation(
        dcid: ConnectionId,
        scid: ConnectionId,
        supported_versions: Vec<u32>,
    ) -> Self {
        Self {
            packet_type: LongPacketType::VersionNegotiation,
            version: 0,
            dcid,
            scid,
            packet_number: PacketNumber::default(),
            supported_versions,
        }
    }

    pub fn packet_type(&self) -> LongPacketType {
        self.packet_type
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn dcid(&self) -> ConnectionId {
        self.dcid
    }

    pub fn scid(&self) -> ConnectionId {
        self.scid
    }

    pub fn packet_number(&self) -> PacketNumber {
        self.packet_number
    }

    pub fn supported_versions(&self) -> &[u32] {
        &self.supported_versions
    }

    pub fn is_version_negotiation(&self) -> bool {
        self.version == 0
    }

    pub fn set_dcid(&mut self, dcid: ConnectionId) {
        self.dcid = dcid;
    }

    pub fn set_scid(&mut self, scid: ConnectionId) {
        self.scid = scid;
    }

    /// Set the packet number. Ignored on version negotiation headers, which
    /// carry none.
    pub fn set_packet_number(&mut self, packet_number: PacketNumber) {
        if !self.is_version_negotiation() {
            self.packet_number = packet_number;
        }
    }

    /// Serialized length in bytes
    pub fn encoded_len(&self) -> usize {
        let tail = if self.is_version_negotiation() {
            4 * self.supported_versions.len()
        } else {
            4
        };
        LONG_HEADER_FIXED_LEN + usize::from(self.dcid.len()) + usize::from(self.scid.len()) + tail
    }
}

/// Short header fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortHeader {
    spin_bit: bool,
    key_phase_bit: bool,
    dcid: Option<ConnectionId>,
    packet_number: PacketNumber,
    packet_number_length: PacketNumberLength,
}

impl ShortHeader {
    /// Create a short header; the packet number length is derived from
    /// `packet_number`.
    pub fn new(
        dcid: Option<ConnectionId>,
        packet_number: PacketNumber,
        key_phase_bit: bool,
        spin_bit: bool,
    ) -> Self {
        Self {
            spin_bit,
            key_phase_bit,
            dcid,
            packet_number,
            packet_number_length: PacketNumberLength::for_packet_number(packet_number),
        }
    }

    pub fn spin_bit(&self) -> bool {
        self.spin_bit
    }

    pub fn key_phase_bit(&self) -> bool {
        self.key_phase_bit
    }

    pub fn dcid(&self) -> Option<ConnectionId> {
        self.dcid
    }

    pub fn packet_number(&self) -> PacketNumber {
        self.packet_number
    }

    pub fn packet_number_length(&self) -> PacketNumberLength {
        self.packet_number_length
    }

    pub fn set_spin_bit(&mut self, spin_bit: bool) {
        self.spin_bit = spin_bit;
    }

    pub fn set_key_phase_bit(&mut self, key_phase_bit: bool) {
        self.key_phase_bit = key_phase_bit;
    }

    pub fn set_dcid(&mut self, dcid: ConnectionId) {
        self.dcid = Some(dcid);
    }

    pub fn clear_dcid(&mut self) {
        self.dcid = None;
    }

    /// Set the packet number and re-derive its encoded width
    pub fn set_packet_number(&mut self, packet_number: PacketNumber) {
        self.packet_number = packet_number;
        self.packet_number_length = PacketNumberLength::for_packet_number(packet_number);
    }

    /// Serialized length in bytes
    pub fn encoded_len(&self) -> usize {
        1 + self.dcid.map_or(0, |cid| usize::from(cid.len())) + self.packet_number_length.width()
    }
}

/// A packet header of either form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuicHeader {
    Long(LongHeader),
    Short(ShortHeader),
}

impl QuicHeader {
    pub fn form(&self) -> HeaderForm {
        match self {
            QuicHeader::Long(_) => HeaderForm::Long,
            QuicHeader::Short(_) => HeaderForm::Short,
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, QuicHeader::Long(_))
    }

    pub fn is_short(&self) -> bool {
        matches!(self, QuicHeader::Short(_))
    }

    /// Always set on the wire
    pub fn fixed_bit(&self) -> bool {
        true
    }

    pub fn has_version(&self) -> bool {
        self.is_long()
    }

    pub fn has_connection_id(&self) -> bool {
        match self {
            QuicHeader::Long(_) => true,
            QuicHeader::Short(short) => short.dcid.is_some(),
        }
    }

    pub fn is_version_negotiation(&self) -> bool {
        matches!(self, QuicHeader::Long(long) if long.is_version_negotiation())
    }

    pub fn is_initial(&self) -> bool {
        self.long_type() == Some(LongPacketType::Initial)
    }

    pub fn is_retry(&self) -> bool {
        self.long_type() == Some(LongPacketType::Retry)
    }

    pub fn is_handshake(&self) -> bool {
        self.long_type() == Some(LongPacketType::Handshake)
    }

    pub fn is_zero_rtt(&self) -> bool {
        self.long_type() == Some(LongPacketType::ZeroRttProtected)
    }

    /// Packet type of a long header, `None` for short headers
    pub fn long_type(&self) -> Option<LongPacketType> {
        match self {
            QuicHeader::Long(long) => Some(long.packet_type),
            QuicHeader::Short(_) => None,
        }
    }

    pub fn as_long(&self) -> Option<&LongHeader> {
        match self {
            QuicHeader::Long(long) => Some(long),
            QuicHeader::Short(_) => None,
        }
    }

    pub fn as_short(&self) -> Option<&ShortHeader> {
        match self {
            QuicHeader::Short(short) => Some(short),
            QuicHeader::Long(_) => None,
        }
    }

    pub fn version(&self) -> Result<u32> {
        match self {
            QuicHeader::Long(long) => Ok(long.version),
            QuicHeader::Short(_) => Err(HeaderError::invalid_access("version", self.form())),
        }
    }

    /// Destination connection ID
    pub fn connection_id(&self) -> Result<ConnectionId> {
        match self {
            QuicHeader::Long(long) => Ok(long.dcid),
            QuicHeader::Short(short) => short
                .dcid
                .ok_or_else(|| HeaderError::invalid_access("connection_id", self.form())),
        }
    }

    pub fn source_connection_id(&self) -> Result<ConnectionId> {
        match self {
            QuicHeader::Long(long) => Ok(long.scid),
            QuicHeader::Short(_) => Err(HeaderError::invalid_access(
                "source_connection_id",
                self.form(),
            )),
        }
    }

    pub fn spin_bit(&self) -> Result<bool> {
        match self {
            QuicHeader::Short(short) => Ok(short.spin_bit),
            QuicHeader::Long(_) => Err(HeaderError::invalid_access("spin_bit", self.form())),
        }
    }

    pub fn key_phase_bit(&self) -> Result<bool> {
        match self {
            QuicHeader::Short(short) => Ok(short.key_phase_bit),
            QuicHeader::Long(_) => Err(HeaderError::invalid_access("key_phase_bit", self.form())),
        }
    }

    pub fn packet_number(&self) -> PacketNumber {
        match self {
            QuicHeader::Long(long) => long.packet_number,
            QuicHeader::Short(short) => short.packet_number,
        }
    }

    /// Encoded packet number width. Long headers always use four bytes.
    pub fn packet_number_length(&self) -> PacketNumberLength {
        match self {
            QuicHeader::Long(_) => PacketNumberLength::Four,
            QuicHeader::Short(short) => short.packet_number_length,
        }
    }

    pub fn packet_number_bits(&self) -> u32 {
        self.packet_number_length().bits()
    }

    /// Versions advertised by a version negotiation header, empty otherwise
    pub fn supported_versions(&self) -> &[u32] {
        match self {
            QuicHeader::Long(long) => &long.supported_versions,
            QuicHeader::Short(_) => &[],
        }
    }

    /// Set the packet number, re-deriving the encoded width on short headers
    pub fn set_packet_number(&mut self, packet_number: PacketNumber) {
        match self {
            QuicHeader::Long(long) => long.set_packet_number(packet_number),
            QuicHeader::Short(short) => short.set_packet_number(packet_number),
        }
    }

    /// Set the destination connection ID. On a short header this also marks
    /// the connection ID as present.
    pub fn set_connection_id(&mut self, dcid: ConnectionId) {
        match self {
            QuicHeader::Long(long) => long.set_dcid(dcid),
            QuicHeader::Short(short) => short.set_dcid(dcid),
        }
    }

    /// Serialized length in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            QuicHeader::Long(long) => long.encoded_len(),
            QuicHeader::Short(short) => short.encoded_len(),
        }
    }

    /// Packet type for long headers, packet number width for short headers
    pub fn type_description(&self) -> &'static str {
        match self {
            QuicHeader::Long(long) => long.packet_type.name(),
            QuicHeader::Short(short) => short.packet_number_length.name(),
        }
    }
}

impl From<LongHeader> for QuicHeader {
    fn from(long: LongHeader) -> Self {
        QuicHeader::Long(long)
    }
}

impl From<ShortHeader> for QuicHeader {
    fn from(short: ShortHeader) -> Self {
        QuicHeader::Short(short)
    }
}

impl fmt::Display for QuicHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}|", self.form().bit())?;
        if let QuicHeader::Short(short) = self {
            write!(
                f,
                "{}|{}|{}|",
                u8::from(short.dcid.is_some()),
                u8::from(short.key_phase_bit),
                u8::from(short.spin_bit)
            )?;
        }
        writeln!(f, "{}|", self.type_description())?;

        if let Ok(dcid) = self.connection_id() {
            writeln!(f, "|ConnectionID {dcid}|")?;
        }

        match self {
            QuicHeader::Long(long) if long.is_version_negotiation() => {
                writeln!(f, "|Version {}|", long.version)?;
                let versions: Vec<String> = long
                    .supported_versions
                    .iter()
                    .map(|v| format!("{v:#010x}"))
                    .collect();
                writeln!(f, "|SupportedVersions {}|", versions.join(","))
            }
            QuicHeader::Long(long) => {
                writeln!(f, "|Version {}|", long.version)?;
                writeln!(f, "|PacketNumber {}|", long.packet_number)
            }
            QuicHeader::Short(short) => writeln!(f, "|PacketNumber {}|", short.packet_number),
        }
    }
}
