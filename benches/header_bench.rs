use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use quic_header::{HeaderCodec, PacketNumber, QuicHeader, QuicPacket};
use tokio_util::codec::{Decoder, Encoder};

fn sample_headers() -> Vec<(&'static str, QuicHeader)> {
    vec![
        (
            "initial",
            QuicHeader::initial(0x1122_3344_5566_7788, 1, PacketNumber::new(5)),
        ),
        (
            "short_1b",
            QuicHeader::short(0xAABB, PacketNumber::new(100), true, false, true),
        ),
        (
            "short_4b",
            QuicHeader::short(0xAABB, PacketNumber::new(1 << 20), true, true, false),
        ),
        (
            "version_negotiation",
            QuicHeader::version_negotiation(0xAABB, 1, &[1, 2, 3, 4]),
        ),
    ]
}

#[allow(clippy::unwrap_used)]
fn bench_header_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_encode_decode");

    for (name, header) in sample_headers() {
        group.throughput(Throughput::Bytes(header.encoded_len() as u64));

        group.bench_function(format!("encode_{name}"), |b| {
            let mut buf = Vec::with_capacity(64);
            b.iter(|| {
                buf.clear();
                header.encode(&mut buf).unwrap();
            })
        });

        let bytes = header.to_bytes();
        group.bench_function(format!("decode_{name}"), |b| {
            b.iter(|| {
                let decoded = QuicHeader::from_bytes(&bytes);
                assert!(decoded.is_ok());
            })
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_datagram_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("datagram_codec");
    let payload_sizes = [0usize, 64, 1200];

    for &size in &payload_sizes {
        let header = QuicHeader::short(0xAABB, PacketNumber::new(4242), true, false, false);
        group.throughput(Throughput::Bytes((header.encoded_len() + size) as u64));
        group.bench_function(format!("roundtrip_{size}b"), |b| {
            b.iter_batched(
                || QuicPacket::new(header.clone(), vec![0u8; size]),
                |packet| {
                    let mut codec = HeaderCodec::default();
                    let mut buf = BytesMut::with_capacity(size + 32);
                    codec.encode(packet, &mut buf).unwrap();
                    let decoded = codec.decode(&mut buf).unwrap();
                    assert!(decoded.is_some());
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_header_encode_decode, bench_datagram_codec);
criterion_main!(benches);
