use quic_header::utils::metrics::global_metrics;
use quic_header::{PacketNumber, QuicHeader};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_encode_decode_heavy() {
    use tokio::task::JoinSet;

    let iterations = 20_000u32;
    let before = global_metrics().snapshot().headers_decoded;

    let mut tasks = JoinSet::new();
    for worker in 0..8u64 {
        tasks.spawn(async move {
            let mut buf = Vec::with_capacity(32);
            for i in 0..iterations {
                let pn = PacketNumber::new(i << (worker % 4 * 4));
                let header = if i % 2 == 0 {
                    QuicHeader::initial(worker, 1, pn)
                } else {
                    QuicHeader::short(worker, pn, true, false, true)
                };
                header.encode(&mut buf).unwrap();
                let (decoded, consumed) = QuicHeader::from_bytes(&buf).unwrap();
                assert_eq!(consumed, buf.len());
                assert_eq!(decoded, header);
                buf.clear();
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }

    let decoded = global_metrics().snapshot().headers_decoded - before;
    assert!(decoded >= 8 * u64::from(iterations));
}
