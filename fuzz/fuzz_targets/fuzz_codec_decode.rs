#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use quic_header::HeaderCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = HeaderCodec::default();
    let mut buf = BytesMut::from(data);
    let _ = codec.decode_eof(&mut buf);
});
