#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_header::QuicHeader;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode to exactly the bytes it consumed
    if let Ok((header, consumed)) = QuicHeader::from_bytes(data) {
        assert_eq!(consumed, header.encoded_len());
        let _ = QuicHeader::from_bytes(&header.to_bytes());
    }
});
