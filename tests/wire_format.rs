//! Byte-level checks of the header wire layout
//!
//! These tests pin the exact bytes produced for each header kind so that any
//! accidental change to the wire format shows up as a diff here.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use quic_header::{ConnectionId, LongHeader, LongPacketType, PacketNumber, QuicHeader};

#[test]
fn test_initial_header_bytes() {
    let header = QuicHeader::initial(0x1122_3344_5566_7788, 0x0000_0001, PacketNumber::new(5));
    let bytes = header.to_bytes();

    let mut expected = vec![0xC0];
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    expected.push(0x08);
    expected.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
    expected.push(0x08);
    expected.extend_from_slice(&[0x00; 8]);
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x05]);

    assert_eq!(bytes, expected);
    assert_eq!(header.encoded_len(), expected.len());
}

#[test]
fn test_short_header_bytes() {
    let header = QuicHeader::short(0xAABB, PacketNumber::new(100), true, false, true);
    let bytes = header.to_bytes();

    assert_eq!(
        bytes,
        vec![0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0x64]
    );
    assert_eq!(header.encoded_len(), 10);
}

#[test]
fn test_short_header_flag_bits() {
    let key_phase = QuicHeader::short(0, PacketNumber::new(1), false, true, false);
    assert_eq!(key_phase.to_bytes()[0], 0x44);

    let two_octets = QuicHeader::short(0, PacketNumber::new(256), false, false, false);
    assert_eq!(two_octets.to_bytes(), vec![0x41, 0x01, 0x00]);

    let four_octets = QuicHeader::short(0, PacketNumber::new(65536), false, false, false);
    assert_eq!(four_octets.to_bytes(), vec![0x42, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn test_short_header_without_connection_id_is_two_bytes() {
    let header = QuicHeader::short(0, PacketNumber::new(7), false, false, false);
    assert_eq!(header.encoded_len(), 2);
    assert_eq!(header.to_bytes(), vec![0x40, 0x07]);
}

#[test]
fn test_version_negotiation_has_no_packet_number() {
    let header = QuicHeader::version_negotiation(0x0102_0304_0506_0708, 0x0000_0001, &[]);
    let bytes = header.to_bytes();

    // flags + version + dcid len + dcid + scid len + scid
    assert_eq!(bytes.len(), 1 + 4 + 1 + 8 + 1 + 8);
    assert_eq!(header.encoded_len(), bytes.len());
    assert_eq!(&bytes[1..5], &[0, 0, 0, 0]);

    let initial = QuicHeader::initial(0x0102_0304_0506_0708, 1, PacketNumber::new(0));
    assert_eq!(initial.encoded_len() - header.encoded_len(), 4);
}

#[test]
fn test_version_negotiation_lists_versions() {
    let header = QuicHeader::version_negotiation(1, 0xbabababa, &[0x0000_0001, 0xff00_001d]);
    let bytes = header.to_bytes();
    let tail = &bytes[bytes.len() - 8..];
    assert_eq!(tail, &[0x00, 0x00, 0x00, 0x01, 0xff, 0x00, 0x00, 0x1d]);
}

#[test]
fn test_long_type_bits() {
    let pn = PacketNumber::new(1);
    assert_eq!(QuicHeader::initial(1, 1, pn).to_bytes()[0], 0xC0);
    assert_eq!(QuicHeader::zero_rtt(1, 1, pn).to_bytes()[0], 0xD0);
    assert_eq!(QuicHeader::handshake(1, 1, pn).to_bytes()[0], 0xE0);
    assert_eq!(QuicHeader::retry(1, 1, pn).to_bytes()[0], 0xF0);
}

#[test]
fn test_length_field_matches_connection_id_width() {
    let header = QuicHeader::Long(LongHeader::new(
        LongPacketType::Retry,
        1,
        ConnectionId::with_len(0x0102_03, 3).unwrap(),
        ConnectionId::with_len(0x04, 1).unwrap(),
        PacketNumber::new(1),
    ));
    let bytes = header.to_bytes();
    assert_eq!(
        bytes,
        vec![0xF0, 0, 0, 0, 1, 3, 0x01, 0x02, 0x03, 1, 0x04, 0, 0, 0, 1]
    );
    assert_eq!(header.encoded_len(), bytes.len());
}

#[test]
fn test_display_dump() {
    let header = QuicHeader::initial(0x1122_3344_5566_7788, 1, PacketNumber::new(5));
    assert_eq!(
        header.to_string(),
        "|1|Initial|\n|ConnectionID 1234605616436508552|\n|Version 1|\n|PacketNumber 5|\n"
    );

    let vn = QuicHeader::version_negotiation(3, 1, &[1]);
    assert_eq!(
        vn.to_string(),
        "|1|Version Negotiation|\n|ConnectionID 3|\n|Version 0|\n|SupportedVersions 0x00000001|\n"
    );
}
