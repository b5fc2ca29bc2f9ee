//! # Datagram Codec
//!
//! [`HeaderCodec`] adapts the header serializer to `tokio_util`'s
//! [`Encoder`]/[`Decoder`] traits so it can drive a
//! `tokio_util::udp::UdpFramed` socket directly.
//!
//! Each buffer handed to the decoder is treated as one datagram: the header
//! is parsed from the front and everything after it becomes the payload of
//! the resulting [`QuicPacket`], split off without copying.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::config::CodecConfig;
use crate::core::header::QuicHeader;
use crate::error::{HeaderError, Result};
use crate::utils::metrics::global_metrics;

/// A header together with the (still protected) packet payload behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuicPacket {
    pub header: QuicHeader,
    pub payload: Bytes,
}

impl QuicPacket {
    pub fn new(header: QuicHeader, payload: impl Into<Bytes>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Total size on the wire
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len() + self.payload.len()
    }
}

/// Header codec for datagram framing
#[derive(Debug, Clone, Default)]
pub struct HeaderCodec {
    config: CodecConfig,
}

impl HeaderCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Reject packets the peer could not decode back unchanged: a short
    /// header whose connection ID width differs from the configured one, or a
    /// version negotiation header followed by payload bytes.
    fn check_packet(&self, packet: &QuicPacket) -> Result<()> {
        let header = &packet.header;
        if header.is_version_negotiation() && !packet.payload.is_empty() {
            global_metrics().encode_error();
            return Err(HeaderError::VersionNegotiationPayload(
                packet.payload.len(),
            ));
        }
        if let QuicHeader::Short(short) = header {
            let actual = short.dcid().map_or(0, |cid| cid.len());
            if actual != self.config.short_dcid_len {
                global_metrics().encode_error();
                return Err(HeaderError::ConnectionIdLengthMismatch {
                    expected: self.config.short_dcid_len,
                    actual,
                });
            }
        }
        Ok(())
    }
}

impl Encoder<QuicPacket> for HeaderCodec {
    type Error = HeaderError;

    fn encode(&mut self, item: QuicPacket, dst: &mut BytesMut) -> Result<()> {
        self.check_packet(&item)?;

        dst.reserve(item.encoded_len());
        item.header.encode(dst)?;
        dst.extend_from_slice(&item.payload);
        Ok(())
    }
}

impl Decoder for HeaderCodec {
    type Item = QuicPacket;
    type Error = HeaderError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<QuicPacket>> {
        if src.is_empty() {
            return Ok(None);
        }

        // parse from a view so a truncated header leaves `src` untouched
        let mut view = &src[..];
        let (header, consumed) = match QuicHeader::decode_with(&mut view, &self.config) {
            Ok(decoded) => decoded,
            Err(HeaderError::BufferTooShort { needed, available }) => {
                debug!(needed, available, "Incomplete header, waiting for more data");
                return Ok(None);
            }
            Err(e) => {
                // the datagram cannot be recovered, drop it
                src.clear();
                return Err(e);
            }
        };

        let mut datagram = src.split_to(src.len());
        let payload = datagram.split_off(consumed).freeze();
        Ok(Some(QuicPacket { header, payload }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<QuicPacket>> {
        match self.decode(src)? {
            Some(packet) => Ok(Some(packet)),
            None if src.is_empty() => Ok(None),
            None => {
                debug!(len = src.len(), "Datagram ended inside the header");
                src.clear();
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "datagram ended inside the packet header",
                )
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ConnectionId, PacketNumber};

    #[test]
    fn test_encode_decode_with_payload() {
        let mut codec = HeaderCodec::default();
        let packet = QuicPacket::new(
            QuicHeader::initial(0x1122, 1, PacketNumber::new(9)),
            vec![0xAA, 0xBB, 0xCC],
        );

        let mut buf = BytesMut::new();
        codec.encode(packet.clone(), &mut buf).expect("encode");
        assert_eq!(buf.len(), packet.encoded_len());

        let decoded = codec.decode(&mut buf).expect("decode").expect("packet");
        assert_eq!(decoded, packet);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_truncated_header_waits() {
        let mut codec = HeaderCodec::default();
        let mut buf = BytesMut::from(&[0xC0u8, 0x00, 0x00][..]);
        assert!(codec.decode(&mut buf).expect("no error").is_none());
        assert_eq!(buf.len(), 3);

        assert!(matches!(codec.decode_eof(&mut buf), Err(HeaderError::Io(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_version_negotiation_with_payload_is_rejected() {
        let mut codec = HeaderCodec::default();
        let packet = QuicPacket::new(
            QuicHeader::version_negotiation(5, 1, &[1]),
            Bytes::from_static(b"abcd"),
        );
        let mut buf = BytesMut::new();
        assert!(matches!(
            codec.encode(packet, &mut buf),
            Err(HeaderError::VersionNegotiationPayload(4))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_malformed_datagram_is_dropped() {
        let mut codec = HeaderCodec::default();
        let mut buf = BytesMut::from(&[0x00u8, 0x01, 0x02][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(HeaderError::InvalidFixedBit)
        ));
        assert!(buf.is_empty());
        assert!(codec.decode(&mut buf).expect("no error").is_none());
    }

    #[test]
    fn test_short_dcid_width_must_match_config() {
        let mut codec = HeaderCodec::new(CodecConfig {
            short_dcid_len: 4,
            ..CodecConfig::default()
        });
        let packet = QuicPacket::new(
            QuicHeader::short(1, PacketNumber::new(1), true, false, false),
            Bytes::new(),
        );
        let mut buf = BytesMut::new();
        assert!(matches!(
            codec.encode(packet, &mut buf),
            Err(HeaderError::ConnectionIdLengthMismatch { expected: 4, actual: 8 })
        ));
        assert!(buf.is_empty());

        let narrow = ConnectionId::with_len(1, 4).expect("cid");
        let mut header = QuicHeader::short(0, PacketNumber::new(1), false, false, false);
        header.set_connection_id(narrow);
        let packet = QuicPacket::new(header, Bytes::from_static(b"hi"));
        codec.encode(packet.clone(), &mut buf).expect("encode");
        let decoded = codec.decode(&mut buf).expect("decode").expect("packet");
        assert_eq!(decoded, packet);
    }
}
