#![allow(dead_code)]

use flowtuple_protocols::types::{CLASS_MAGIC, INTERVAL_MAGIC, OUTER_MAGIC};
use flowtuple_protocols::FlowRecord;

/// Builds flowtuple byte streams for tests.
#[derive(Default)]
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn interval_head(self, number: u16, start: u32) -> Self {
        self.u32(OUTER_MAGIC).u32(INTERVAL_MAGIC).u16(number).u32(start)
    }

    pub fn class_head(self, class_id: u16, key_count: u32) -> Self {
        self.u32(CLASS_MAGIC).u16(class_id).u32(key_count)
    }

    pub fn record(mut self, record: &FlowRecord) -> Self {
        self.buf.extend_from_slice(&record.src_ip.to_be_bytes());
        self.buf.extend_from_slice(&record.dst_ip.to_be_bytes()[1..]);
        self.buf.extend_from_slice(&record.src_port.to_be_bytes());
        self.buf.extend_from_slice(&record.dst_port.to_be_bytes());
        self.buf.push(record.protocol);
        self.buf.push(record.flags);
        self.buf.push(record.ttl);
        self.buf.extend_from_slice(&record.ip_len.to_be_bytes());
        self.buf.extend_from_slice(&record.packet_count.to_be_bytes());
        self
    }

    pub fn class_tail(self, class_id: u16) -> Self {
        self.u32(CLASS_MAGIC).u16(class_id)
    }

    /// Interval trailer including the outer marker that precedes it.
    pub fn interval_tail(self, number: u16, end: u32) -> Self {
        self.u32(OUTER_MAGIC).u32(INTERVAL_MAGIC).u16(number).u32(end)
    }

    pub fn end_of_stream(self) -> Self {
        self.u32(0)
    }

    /// A complete class with `records`.
    pub fn class(self, class_id: u16, records: &[FlowRecord]) -> Self {
        let mut builder = self.class_head(class_id, records.len() as u32);
        for record in records {
            builder = builder.record(record);
        }
        builder.class_tail(class_id)
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// A record with every field derived from `seed`.
pub fn sample_record(seed: u32) -> FlowRecord {
    FlowRecord {
        src_ip: 0x0a00_0000 | seed,
        dst_ip: 0x00c0_a800 | (seed & 0xff),
        src_port: 1024 + seed as u16,
        dst_port: 80,
        protocol: 6,
        flags: 0x12,
        ttl: 64,
        ip_len: 40 + seed as u16,
        packet_count: seed + 1,
    }
}
