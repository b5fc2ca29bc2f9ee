//! # Header Wire Serialization
//!
//! Encodes a [`QuicHeader`] into any [`BufMut`] and decodes one back from any
//! [`Buf`]. All multi-byte fields are big-endian.
//!
//! Decoding reads exactly the layout encoding writes, including the packet
//! number width code of short headers, so a receiver needs no state beyond
//! the [`CodecConfig`] to recover a header.
//!
//! ## Security
//! - Every read is bounds-checked before it happens; truncated input yields
//!   [`HeaderError::BufferTooShort`] instead of a panic
//! - Connection ID lengths above 8 bytes are rejected before any allocation
//! - Version negotiation lists are capped by `max_supported_versions`

use bytes::{Buf, BufMut};
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::core::header::{LongHeader, QuicHeader, ShortHeader};
use crate::core::types::{
    ConnectionId, HeaderForm, LongPacketType, PacketNumber, PacketNumberLength, FIXED_BIT,
    HEADER_FORM_BIT, KEY_PHASE_BIT, LONG_PACKET_TYPE_MASK, LONG_PACKET_TYPE_SHIFT,
    MAX_CONNECTION_ID_LEN, PACKET_NUMBER_LENGTH_MASK, SPIN_BIT,
};
use crate::error::{HeaderError, Result};
use crate::utils::metrics::global_metrics;

impl QuicHeader {
    /// Flags byte for this header
    pub fn flags(&self) -> u8 {
        match self {
            QuicHeader::Long(long) => {
                HEADER_FORM_BIT | FIXED_BIT | (long.packet_type().code() << LONG_PACKET_TYPE_SHIFT)
            }
            QuicHeader::Short(short) => {
                let mut flags = FIXED_BIT | short.packet_number_length().code();
                if short.spin_bit() {
                    flags |= SPIN_BIT;
                }
                if short.key_phase_bit() {
                    flags |= KEY_PHASE_BIT;
                }
                flags
            }
        }
    }

    /// Write the header into `buf`, returning the number of bytes written.
    ///
    /// Nothing is written if `buf` cannot hold [`QuicHeader::encoded_len`]
    /// bytes.
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<usize> {
        let len = self.encoded_len();
        if buf.remaining_mut() < len {
            global_metrics().encode_error();
            return Err(HeaderError::BufferTooShort {
                needed: len,
                available: buf.remaining_mut(),
            });
        }

        buf.put_u8(self.flags());
        match self {
            QuicHeader::Long(long) => encode_long(long, buf),
            QuicHeader::Short(short) => encode_short(short, buf),
        }

        trace!(form = %self.form(), len, "Encoded header");
        global_metrics().header_encoded(len as u64);
        Ok(len)
    }

    /// Encode into a freshly allocated vector
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        // a Vec grows on demand, so the capacity check cannot fail
        let _ = self.encode(&mut out);
        out
    }

    /// Decode a header using the default [`CodecConfig`].
    ///
    /// Returns the header and the number of bytes consumed.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<(QuicHeader, usize)> {
        Self::decode_with(buf, &CodecConfig::default())
    }

    /// Decode a header from `buf`, advancing it past the header.
    ///
    /// For version negotiation headers the rest of the buffer is taken as the
    /// supported version list.
    pub fn decode_with<B: Buf>(buf: &mut B, config: &CodecConfig) -> Result<(QuicHeader, usize)> {
        let start = buf.remaining();
        match decode_header(buf, config) {
            Ok(header) => {
                let consumed = start - buf.remaining();
                debug_assert_eq!(consumed, header.encoded_len());
                trace!(form = %header.form(), consumed, "Decoded header");
                let metrics = global_metrics();
                metrics.header_decoded(consumed as u64);
                if header.is_version_negotiation() {
                    metrics.version_negotiation_decoded();
                }
                Ok((header, consumed))
            }
            Err(e) => {
                debug!(error = %e, "Rejected header");
                global_metrics().decode_error();
                Err(e)
            }
        }
    }

    /// Decode from a byte slice using the default configuration
    pub fn from_bytes(data: &[u8]) -> Result<(QuicHeader, usize)> {
        let mut cursor = data;
        Self::decode(&mut cursor)
    }
}

fn encode_long<B: BufMut>(long: &LongHeader, buf: &mut B) {
    buf.put_u32(long.version());
    put_connection_id_with_len(long.dcid(), buf);
    put_connection_id_with_len(long.scid(), buf);

    if long.is_version_negotiation() {
        for version in long.supported_versions() {
            buf.put_u32(*version);
        }
    } else {
        buf.put_u32(long.packet_number().value());
    }
}

fn encode_short<B: BufMut>(short: &ShortHeader, buf: &mut B) {
    if let Some(dcid) = short.dcid() {
        put_connection_id(dcid, buf);
    }

    let value = short.packet_number().value();
    match short.packet_number_length() {
        PacketNumberLength::One => buf.put_u8(value as u8),
        PacketNumberLength::Two => buf.put_u16(value as u16),
        PacketNumberLength::Four => buf.put_u32(value),
    }
}

fn put_connection_id<B: BufMut>(cid: ConnectionId, buf: &mut B) {
    if !cid.is_empty() {
        buf.put_uint(cid.value(), usize::from(cid.len()));
    }
}

fn put_connection_id_with_len<B: BufMut>(cid: ConnectionId, buf: &mut B) {
    buf.put_u8(cid.len());
    put_connection_id(cid, buf);
}

fn decode_header<B: Buf>(buf: &mut B, config: &CodecConfig) -> Result<QuicHeader> {
    ensure(buf, 1)?;
    let flags = buf.get_u8();

    if config.require_fixed_bit && flags & FIXED_BIT == 0 {
        return Err(HeaderError::InvalidFixedBit);
    }

    match HeaderForm::from_flags(flags) {
        HeaderForm::Long => decode_long(flags, buf, config).map(QuicHeader::Long),
        HeaderForm::Short => decode_short(flags, buf, config).map(QuicHeader::Short),
    }
}

fn decode_long<B: Buf>(flags: u8, buf: &mut B, config: &CodecConfig) -> Result<LongHeader> {
    let packet_type =
        LongPacketType::from_code((flags & LONG_PACKET_TYPE_MASK) >> LONG_PACKET_TYPE_SHIFT);

    ensure(buf, 4)?;
    let version = buf.get_u32();

    let dcid = get_connection_id_with_len(buf)?;
    let scid = get_connection_id_with_len(buf)?;

    if version == 0 {
        let remaining = buf.remaining();
        if remaining % 4 != 0 {
            return Err(HeaderError::MalformedVersionList(remaining));
        }
        let count = remaining / 4;
        if count > config.max_supported_versions {
            return Err(HeaderError::TooManyVersions {
                count,
                max: config.max_supported_versions,
            });
        }
        let supported_versions = (0..count).map(|_| buf.get_u32()).collect();
        return Ok(LongHeader::version_negotiation(dcid, scid, supported_versions));
    }

    ensure(buf, 4)?;
    let packet_number = PacketNumber::new(buf.get_u32());

    Ok(LongHeader::new(packet_type, version, dcid, scid, packet_number))
}

fn decode_short<B: Buf>(flags: u8, buf: &mut B, config: &CodecConfig) -> Result<ShortHeader> {
    let spin_bit = flags & SPIN_BIT != 0;
    let key_phase_bit = flags & KEY_PHASE_BIT != 0;
    let packet_number_length = PacketNumberLength::from_code(flags & PACKET_NUMBER_LENGTH_MASK)?;

    if config.short_dcid_len > MAX_CONNECTION_ID_LEN {
        return Err(HeaderError::ConfigError(format!(
            "Short header connection ID length too large: {} (maximum: {MAX_CONNECTION_ID_LEN})",
            config.short_dcid_len
        )));
    }

    let dcid = if config.short_dcid_len == 0 {
        None
    } else {
        Some(get_connection_id(buf, config.short_dcid_len)?)
    };

    ensure(buf, packet_number_length.width())?;
    let value = match packet_number_length {
        PacketNumberLength::One => u32::from(buf.get_u8()),
        PacketNumberLength::Two => u32::from(buf.get_u16()),
        PacketNumberLength::Four => buf.get_u32(),
    };
    let packet_number = PacketNumber::new(value);

    // the width is re-derived from the value, so only minimal encodings round-trip
    if PacketNumberLength::for_packet_number(packet_number) != packet_number_length {
        return Err(HeaderError::NonMinimalPacketNumber {
            value,
            width: packet_number_length.width(),
        });
    }

    Ok(ShortHeader::new(
        dcid,
        packet_number,
        key_phase_bit,
        spin_bit,
    ))
}

fn get_connection_id<B: Buf>(buf: &mut B, len: u8) -> Result<ConnectionId> {
    if len > MAX_CONNECTION_ID_LEN {
        return Err(HeaderError::ConnectionIdTooLong(len));
    }
    if len == 0 {
        return Ok(ConnectionId::empty());
    }
    ensure(buf, usize::from(len))?;
    ConnectionId::with_len(buf.get_uint(usize::from(len)), len)
}

fn get_connection_id_with_len<B: Buf>(buf: &mut B) -> Result<ConnectionId> {
    ensure(buf, 1)?;
    let len = buf.get_u8();
    get_connection_id(buf, len)
}

#[inline]
fn ensure<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    let available = buf.remaining();
    if available < needed {
        return Err(HeaderError::BufferTooShort { needed, available });
    }
    Ok(())
}
