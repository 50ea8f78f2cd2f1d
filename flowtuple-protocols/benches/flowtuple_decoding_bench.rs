#[macro_use]
extern crate criterion;

use bytes::{Buf, Bytes};
use criterion::{black_box, Criterion};

use flowtuple_protocols::types::{CLASS_MAGIC, INTERVAL_MAGIC, OUTER_MAGIC};
use flowtuple_protocols::{FlowRecord, FlowtupleReader, FlowtupleWalker};

// 192.168.1.10 -> 0.10.0.5, TCP 443 -> 51000, SYN, ttl 64
const RECORD_DATA: &[u8] = &[
    0xc0, 0xa8, 0x01, 0x0a, // Source address
    0x0a, 0x00, 0x05, // Destination address (3 octets)
    0x01, 0xbb, // Source port
    0xc7, 0x38, // Destination port
    0x06, // Protocol
    0x02, // Flags
    0x40, // TTL
    0x00, 0x3c, // IP length
    0x00, 0x00, 0x00, 0x03, // Packet count
];

const RECORDS_PER_CLASS: u32 = 1024;

/// One interval with three classes of `RECORDS_PER_CLASS` records each.
fn interval_stream() -> Bytes {
    let mut out = Vec::new();
    out.extend_from_slice(&OUTER_MAGIC.to_be_bytes());
    out.extend_from_slice(&INTERVAL_MAGIC.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    for class_id in 0u16..3 {
        out.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        out.extend_from_slice(&class_id.to_be_bytes());
        out.extend_from_slice(&RECORDS_PER_CLASS.to_be_bytes());
        for _ in 0..RECORDS_PER_CLASS {
            out.extend_from_slice(RECORD_DATA);
        }
        out.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        out.extend_from_slice(&class_id.to_be_bytes());
    }
    out.extend_from_slice(&OUTER_MAGIC.to_be_bytes());
    out.extend_from_slice(&INTERVAL_MAGIC.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&60u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    Bytes::from(out)
}

fn benchmark_record_decoding(c: &mut Criterion) {
    let data = Bytes::from_static(RECORD_DATA);
    let mut record = FlowRecord::default();

    c.bench_function("record_decoding", |b| {
        b.iter(|| {
            let mut reader = data.clone().reader();
            record.read_from(&mut reader).unwrap();
            black_box(&record);
        })
    });
}

fn benchmark_nested_loop(c: &mut Criterion) {
    let data = interval_stream();

    c.bench_function("nested_loop", |b| {
        b.iter(|| {
            let mut reader = FlowtupleReader::new(data.clone().reader());
            let mut record = FlowRecord::default();
            let mut packets = 0u64;
            while reader.read_interval_header().unwrap().is_some() {
                while reader.read_class_header().unwrap().is_some() {
                    while reader.read_record(&mut record).unwrap() {
                        packets += u64::from(record.packet_count);
                    }
                    reader.read_class_tail().unwrap();
                }
                reader.read_interval_tail().unwrap();
            }
            black_box(packets)
        })
    });
}

fn benchmark_walker(c: &mut Criterion) {
    let data = interval_stream();

    c.bench_function("walker", |b| {
        b.iter(|| {
            let walker = FlowtupleWalker::new(FlowtupleReader::new(data.clone().reader()));
            black_box(walker.map(Result::unwrap).count())
        })
    });
}

criterion_group!(
    benches,
    benchmark_record_decoding,
    benchmark_nested_loop,
    benchmark_walker
);
criterion_main!(benches);
