//! ## flowtuple-telemetry::metrics
//! Prometheus counters for decoded flowtuple sections.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub intervals: IntCounter,
    pub classes: IntCounter,
    pub records: IntCounter,
    pub packets: IntCounter,
    pub class_records: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let intervals = IntCounter::new("flowtuple_intervals_total", "Intervals decoded")?;
        let classes = IntCounter::new("flowtuple_classes_total", "Classes decoded")?;
        let records = IntCounter::new("flowtuple_records_total", "Flow-tuple records decoded")?;
        let packets = IntCounter::new(
            "flowtuple_packets_total",
            "Sum of packet counts over decoded records",
        )?;
        let class_records = Histogram::with_opts(
            HistogramOpts::new("flowtuple_class_records", "Records per decoded class")
                .buckets(vec![0.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0]),
        )?;

        registry.register(Box::new(intervals.clone()))?;
        registry.register(Box::new(classes.clone()))?;
        registry.register(Box::new(records.clone()))?;
        registry.register(Box::new(packets.clone()))?;
        registry.register(Box::new(class_records.clone()))?;

        Ok(Self {
            registry,
            intervals,
            classes,
            records,
            packets,
            class_records,
        })
    }

    pub fn inc_intervals(&self) {
        self.intervals.inc();
    }

    /// Records a finished class holding `records` records.
    pub fn observe_class(&self, records: u64) {
        self.classes.inc();
        self.class_records.observe(records as f64);
    }

    pub fn observe_record(&self, packet_count: u32) {
        self.records.inc();
        self.packets.inc_by(u64::from(packet_count));
    }

    pub fn gather_metrics(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
