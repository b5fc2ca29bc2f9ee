//! Named constructors for the header of each packet kind.

use tracing::trace;

use crate::core::header::{LongHeader, QuicHeader, ShortHeader};
use crate::core::types::{ConnectionId, LongPacketType, PacketNumber};

impl QuicHeader {
    fn long_with_type(
        packet_type: LongPacketType,
        connection_id: u64,
        version: u32,
        packet_number: PacketNumber,
    ) -> Self {
        QuicHeader::Long(LongHeader::new(
            packet_type,
            version,
            ConnectionId::new(connection_id),
            ConnectionId::default(),
            packet_number,
        ))
    }

    /// Initial packet header
    pub fn initial(connection_id: u64, version: u32, packet_number: PacketNumber) -> Self {
        trace!(connection_id, version, %packet_number, "Creating Initial header");
        Self::long_with_type(LongPacketType::Initial, connection_id, version, packet_number)
    }

    /// Handshake packet header
    pub fn handshake(connection_id: u64, version: u32, packet_number: PacketNumber) -> Self {
        trace!(connection_id, version, %packet_number, "Creating Handshake header");
        Self::long_with_type(LongPacketType::Handshake, connection_id, version, packet_number)
    }

    /// 0-RTT protected packet header
    pub fn zero_rtt(connection_id: u64, version: u32, packet_number: PacketNumber) -> Self {
        trace!(connection_id, version, %packet_number, "Creating 0-RTT header");
        Self::long_with_type(
            LongPacketType::ZeroRttProtected,
            connection_id,
            version,
            packet_number,
        )
    }

    /// Retry packet header
    pub fn retry(connection_id: u64, version: u32, packet_number: PacketNumber) -> Self {
        trace!(connection_id, version, %packet_number, "Creating Retry header");
        Self::long_with_type(LongPacketType::Retry, connection_id, version, packet_number)
    }

    /// Short header. The connection ID is only carried when
    /// `connection_id_flag` is set.
    pub fn short(
        connection_id: u64,
        packet_number: PacketNumber,
        connection_id_flag: bool,
        key_phase_bit: bool,
        spin_bit: bool,
    ) -> Self {
        trace!(
            connection_id,
            %packet_number,
            connection_id_flag,
            key_phase_bit,
            spin_bit,
            "Creating short header"
        );
        let dcid = connection_id_flag.then(|| ConnectionId::new(connection_id));
        QuicHeader::Short(ShortHeader::new(
            dcid,
            packet_number,
            key_phase_bit,
            spin_bit,
        ))
    }

    /// Version negotiation header. The version field is always 0; `version`
    /// is the version the peer asked for and is only logged.
    pub fn version_negotiation(
        connection_id: u64,
        version: u32,
        supported_versions: &[u32],
    ) -> Self {
        trace!(
            connection_id,
            requested_version = version,
            supported = supported_versions.len(),
            "Creating Version Negotiation header"
        );
        QuicHeader::Long(LongHeader::version_negotiation(
            ConnectionId::new(connection_id),
            ConnectionId::default(),
            supported_versions.to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PacketNumberLength;

    #[test]
    fn test_long_factories_set_type_and_fields() {
        let pn = PacketNumber::new(5);
        let cases = [
            (QuicHeader::initial(1, 2, pn), LongPacketType::Initial),
            (QuicHeader::handshake(1, 2, pn), LongPacketType::Handshake),
            (QuicHeader::zero_rtt(1, 2, pn), LongPacketType::ZeroRttProtected),
            (QuicHeader::retry(1, 2, pn), LongPacketType::Retry),
        ];
        for (header, ty) in cases {
            assert_eq!(header.long_type(), Some(ty));
            assert_eq!(header.connection_id().ok(), Some(ConnectionId::new(1)));
            assert_eq!(header.source_connection_id().ok(), Some(ConnectionId::new(0)));
            assert_eq!(header.version().ok(), Some(2));
            assert_eq!(header.packet_number(), pn);
        }
        assert!(QuicHeader::initial(1, 2, pn).is_initial());
        assert!(QuicHeader::handshake(1, 2, pn).is_handshake());
        assert!(QuicHeader::zero_rtt(1, 2, pn).is_zero_rtt());
        assert!(QuicHeader::retry(1, 2, pn).is_retry());
    }

    #[test]
    fn test_short_factory_connection_id_flag() {
        let with = QuicHeader::short(0xAABB, PacketNumber::new(300), true, true, false);
        assert!(with.has_connection_id());
        assert_eq!(with.key_phase_bit().ok(), Some(true));
        assert_eq!(with.spin_bit().ok(), Some(false));
        assert_eq!(with.packet_number_length(), PacketNumberLength::Two);

        let without = QuicHeader::short(0xAABB, PacketNumber::new(300), false, true, false);
        assert!(!without.has_connection_id());
        assert!(without.connection_id().is_err());
    }

    #[test]
    fn test_version_negotiation_forces_version_zero() {
        let header = QuicHeader::version_negotiation(9, 0x0000_0001, &[1, 2]);
        assert!(header.is_version_negotiation());
        assert_eq!(header.version().ok(), Some(0));
        assert_eq!(header.long_type(), Some(LongPacketType::VersionNegotiation));
        assert_eq!(header.supported_versions(), &[1, 2]);
    }
}
