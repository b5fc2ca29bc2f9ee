//! # Header Value Types
//!
//! Small value types shared by both header forms: the form itself, the long
//! packet type, packet numbers with their encoded width, and connection IDs.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{HeaderError, Result};

/// Header form bit (bit 7 of the flags byte)
pub const HEADER_FORM_BIT: u8 = 0x80;

/// Fixed bit (bit 6 of the flags byte), always set on the wire
pub const FIXED_BIT: u8 = 0x40;

/// Long packet type bits (bits 5-4)
pub const LONG_PACKET_TYPE_MASK: u8 = 0x30;
pub const LONG_PACKET_TYPE_SHIFT: u8 = 4;

/// Short header spin bit (bit 5)
pub const SPIN_BIT: u8 = 0x20;

/// Short header key phase bit (bit 2)
pub const KEY_PHASE_BIT: u8 = 0x04;

/// Short header packet number length code (bits 1-0)
pub const PACKET_NUMBER_LENGTH_MASK: u8 = 0x03;

/// Widest connection ID representable in this design
pub const MAX_CONNECTION_ID_LEN: u8 = 8;

/// Which of the two wire layouts a header uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderForm {
    Long,
    Short,
}

impl HeaderForm {
    /// Form from the flags byte
    pub fn from_flags(flags: u8) -> Self {
        if flags & HEADER_FORM_BIT != 0 {
            HeaderForm::Long
        } else {
            HeaderForm::Short
        }
    }

    /// Bit 7 of the flags byte for this form
    pub fn bit(self) -> u8 {
        match self {
            HeaderForm::Long => 1,
            HeaderForm::Short => 0,
        }
    }
}

impl fmt::Display for HeaderForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderForm::Long => f.write_str("long"),
            HeaderForm::Short => f.write_str("short"),
        }
    }
}

/// Long header packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LongPacketType {
    Initial,
    ZeroRttProtected,
    Handshake,
    Retry,
    /// Identified on the wire by version 0 rather than by the type bits.
    VersionNegotiation,
}

impl LongPacketType {
    /// 2-bit type code for bits 5-4 of the flags byte
    pub fn code(self) -> u8 {
        match self {
            LongPacketType::Initial => 0x0,
            LongPacketType::ZeroRttProtected => 0x1,
            LongPacketType::Handshake => 0x2,
            LongPacketType::Retry => 0x3,
            LongPacketType::VersionNegotiation => 0x0,
        }
    }

    /// Type from a 2-bit code. Version negotiation is never produced here.
    pub fn from_code(code: u8) -> Self {
        match code & 0x3 {
            0x0 => LongPacketType::Initial,
            0x1 => LongPacketType::ZeroRttProtected,
            0x2 => LongPacketType::Handshake,
            _ => LongPacketType::Retry,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            LongPacketType::Initial => "Initial",
            LongPacketType::ZeroRttProtected => "0-RTT Protected",
            LongPacketType::Handshake => "Handshake",
            LongPacketType::Retry => "Retry",
            LongPacketType::VersionNegotiation => "Version Negotiation",
        }
    }
}

/// Encoded width of a short header packet number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketNumberLength {
    One,
    Two,
    Four,
}

impl PacketNumberLength {
    /// Minimal width able to carry `packet_number`
    pub fn for_packet_number(packet_number: PacketNumber) -> Self {
        match packet_number.value() {
            0..=0xFF => PacketNumberLength::One,
            0x100..=0xFFFF => PacketNumberLength::Two,
            _ => PacketNumberLength::Four,
        }
    }

    /// 2-bit code carried in bits 1-0 of the short header flags byte
    pub fn code(self) -> u8 {
        match self {
            PacketNumberLength::One => 0,
            PacketNumberLength::Two => 1,
            PacketNumberLength::Four => 2,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(PacketNumberLength::One),
            1 => Ok(PacketNumberLength::Two),
            2 => Ok(PacketNumberLength::Four),
            other => Err(HeaderError::UnsupportedPacketNumberWidth(other)),
        }
    }

    /// Width in bytes
    pub fn width(self) -> usize {
        match self {
            PacketNumberLength::One => 1,
            PacketNumberLength::Two => 2,
            PacketNumberLength::Four => 4,
        }
    }

    pub fn bits(self) -> u32 {
        self.width() as u32 * 8
    }

    pub fn name(self) -> &'static str {
        match self {
            PacketNumberLength::One => "1 Octet",
            PacketNumberLength::Two => "2 Octets",
            PacketNumberLength::Four => "4 Octets",
        }
    }
}

/// 32-bit packet sequence number.
///
/// Ordering follows serial-number arithmetic: a number compares greater than
/// another when it lies less than half the sequence space ahead of it, so
/// `PacketNumber::new(1) > PacketNumber::new(u32::MAX)`. Numbers exactly 2^31
/// apart are incomparable. Because the relation is not transitive over the
/// whole space, only `PartialOrd` is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PacketNumber(u32);

impl PacketNumber {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Following sequence number, wrapping at 2^32
    pub fn next(self) -> Self {
        self + 1
    }
}

impl PartialOrd for PacketNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let delta = other.0.wrapping_sub(self.0) as i32;
        match delta {
            0 => Some(Ordering::Equal),
            // exactly half the sequence space apart: undefined
            i32::MIN => None,
            d if d > 0 => Some(Ordering::Less),
            _ => Some(Ordering::Greater),
        }
    }
}

impl Add<u32> for PacketNumber {
    type Output = PacketNumber;

    fn add(self, rhs: u32) -> Self::Output {
        PacketNumber(self.0.wrapping_add(rhs))
    }
}

impl From<u32> for PacketNumber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PacketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection ID of up to 8 bytes.
///
/// `len` is both the value of the length field on long headers and the number
/// of bytes the ID occupies on the wire; the value is written as its low-order
/// `len` bytes in network order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId {
    value: u64,
    len: u8,
}

impl ConnectionId {
    /// Full-width (8 byte) connection ID
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            len: MAX_CONNECTION_ID_LEN,
        }
    }

    /// Connection ID of an explicit width
    pub fn with_len(value: u64, len: u8) -> Result<Self> {
        if len > MAX_CONNECTION_ID_LEN {
            return Err(HeaderError::ConnectionIdTooLong(len));
        }
        if len < MAX_CONNECTION_ID_LEN && value >> (u32::from(len) * 8) != 0 {
            return Err(HeaderError::ConnectionIdOverflow { value, len });
        }
        Ok(Self { value, len })
    }

    /// Zero-length connection ID
    pub const fn empty() -> Self {
        Self { value: 0, len: 0 }
    }

    /// Random connection ID of `len` bytes
    pub fn random(len: u8) -> Result<Self> {
        if len > MAX_CONNECTION_ID_LEN {
            return Err(HeaderError::ConnectionIdTooLong(len));
        }
        let raw: u64 = rand::rng().random();
        let value = if len == MAX_CONNECTION_ID_LEN {
            raw
        } else {
            raw & ((1u64 << (u32::from(len) * 8)) - 1)
        };
        Ok(Self { value, len })
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Width in bytes
    pub const fn len(&self) -> u8 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
