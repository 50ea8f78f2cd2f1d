//! Output for the `dump`, `summary` and `validate` commands.

use std::io::{Read, Write};

use anyhow::Context;
use flowtuple_protocols::{Event, FlowClass, FlowtupleReader, FlowtupleWalker};
use flowtuple_telemetry::MetricsRecorder;

/// Counts accumulated while walking a stream.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Totals {
    pub intervals: u64,
    pub classes: u64,
    pub records: u64,
    pub packets: u64,
    class_records: u64,
}

impl Totals {
    fn observe(&mut self, event: &Event, metrics: Option<&MetricsRecorder>) {
        match event {
            Event::IntervalStart(_) => {
                self.intervals += 1;
                if let Some(m) = metrics {
                    m.inc_intervals();
                }
            }
            Event::ClassStart(_) => self.class_records = 0,
            Event::Record(record) => {
                self.records += 1;
                self.class_records += 1;
                self.packets += u64::from(record.packet_count);
                if let Some(m) = metrics {
                    m.observe_record(record.packet_count);
                }
            }
            Event::ClassEnd { .. } => {
                self.classes += 1;
                if let Some(m) = metrics {
                    m.observe_class(self.class_records);
                }
            }
            Event::IntervalEnd(_) => {}
        }
    }
}

/// How `dump` renders the stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DumpFormat {
    Records,
    Events,
}

fn write_event<W: Write>(out: &mut W, event: &Event, format: DumpFormat) -> std::io::Result<()> {
    match (event, format) {
        (Event::Record(record), _) => writeln!(out, "{record}"),
        (_, DumpFormat::Records) => Ok(()),
        (Event::IntervalStart(h), DumpFormat::Events) => {
            writeln!(out, "# interval {} start {}", h.number, h.start_time)
        }
        (Event::ClassStart(h), DumpFormat::Events) => writeln!(
            out,
            "# class {} ({}) keys {}",
            h.class_id,
            h.class(),
            h.key_count
        ),
        (Event::ClassEnd { class_id }, DumpFormat::Events) => {
            writeln!(out, "# class {} end", class_id)
        }
        (Event::IntervalEnd(t), DumpFormat::Events) => {
            writeln!(out, "# interval {} end {}", t.number, t.end_time)
        }
    }
}

/// Prints records (and optionally framing events) until the end of the
/// stream or until `limit` records have been printed.
pub fn dump<R: Read, W: Write>(
    reader: FlowtupleReader<R>,
    out: &mut W,
    format: DumpFormat,
    limit: Option<u64>,
    metrics: Option<&MetricsRecorder>,
) -> anyhow::Result<Totals> {
    let mut totals = Totals::default();
    for event in FlowtupleWalker::new(reader) {
        let event = event.with_context(|| format!("after {} records", totals.records))?;
        totals.observe(&event, metrics);
        write_event(out, &event, format).context("writing output")?;
        if limit.is_some_and(|limit| totals.records >= limit) {
            break;
        }
    }
    Ok(totals)
}

/// Per-class line of the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    pub interval: u16,
    pub class: FlowClass,
    pub key_count: u32,
    pub records: u64,
    pub packets: u64,
}

/// Collects per-class counts for the whole stream.
pub fn summarize<R: Read>(
    reader: FlowtupleReader<R>,
    metrics: Option<&MetricsRecorder>,
) -> anyhow::Result<(Vec<ClassSummary>, Totals)> {
    let mut totals = Totals::default();
    let mut rows: Vec<ClassSummary> = Vec::new();
    let mut interval = 0;

    for event in FlowtupleWalker::new(reader) {
        let event = event.with_context(|| format!("after {} records", totals.records))?;
        totals.observe(&event, metrics);
        match event {
            Event::IntervalStart(h) => interval = h.number,
            Event::ClassStart(h) => rows.push(ClassSummary {
                interval,
                class: h.class(),
                key_count: h.key_count,
                records: 0,
                packets: 0,
            }),
            Event::Record(record) => {
                if let Some(row) = rows.last_mut() {
                    row.records += 1;
                    row.packets += u64::from(record.packet_count);
                }
            }
            Event::ClassEnd { .. } | Event::IntervalEnd(_) => {}
        }
    }
    Ok((rows, totals))
}

pub fn write_summary<W: Write>(out: &mut W, rows: &[ClassSummary]) -> std::io::Result<()> {
    writeln!(out, "interval|class|keys|records|packets")?;
    for row in rows {
        writeln!(
            out,
            "{}|{}|{}|{}|{}",
            row.interval, row.class, row.key_count, row.records, row.packets
        )?;
    }
    Ok(())
}

/// Walks the whole stream, checking every marker.
pub fn validate<R: Read>(
    reader: FlowtupleReader<R>,
    metrics: Option<&MetricsRecorder>,
) -> anyhow::Result<Totals> {
    let mut totals = Totals::default();
    for event in FlowtupleWalker::new(reader) {
        let event = event.with_context(|| {
            format!(
                "invalid stream after {} intervals, {} records",
                totals.intervals, totals.records
            )
        })?;
        totals.observe(&event, metrics);
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtuple_protocols::types::{CLASS_MAGIC, INTERVAL_MAGIC, OUTER_MAGIC};

    fn record_bytes(seed: u8) -> [u8; 20] {
        [
            10, 0, 0, seed, 0, 1, seed, 0, 53, 0x30, 0x39, 17, 0, 64, 0, 60, 0, 0, 0, seed,
        ]
    }

    fn push_class(out: &mut Vec<u8>, class_id: u16, seeds: &[u8]) {
        out.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        out.extend_from_slice(&class_id.to_be_bytes());
        out.extend_from_slice(&(seeds.len() as u32).to_be_bytes());
        for seed in seeds {
            out.extend_from_slice(&record_bytes(*seed));
        }
        out.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        out.extend_from_slice(&class_id.to_be_bytes());
    }

    fn stream() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&OUTER_MAGIC.to_be_bytes());
        out.extend_from_slice(&INTERVAL_MAGIC.to_be_bytes());
        out.extend_from_slice(&7u16.to_be_bytes());
        out.extend_from_slice(&600u32.to_be_bytes());
        push_class(&mut out, 0, &[1, 2]);
        push_class(&mut out, 1, &[3]);
        out.extend_from_slice(&OUTER_MAGIC.to_be_bytes());
        out.extend_from_slice(&INTERVAL_MAGIC.to_be_bytes());
        out.extend_from_slice(&7u16.to_be_bytes());
        out.extend_from_slice(&660u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out
    }

    #[test]
    fn dump_records() {
        let data = stream();
        let mut out = Vec::new();
        let totals = dump(
            FlowtupleReader::new(data.as_slice()),
            &mut out,
            DumpFormat::Records,
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "10.0.0.1|0.0.1.1|53|12345|17|0|0x40|60|1\n\
             10.0.0.2|0.0.1.2|53|12345|17|0|0x40|60|2\n\
             10.0.0.3|0.0.1.3|53|12345|17|0|0x40|60|3\n"
        );
        assert_eq!(totals.intervals, 1);
        assert_eq!(totals.classes, 2);
        assert_eq!(totals.records, 3);
        assert_eq!(totals.packets, 6);
    }

    #[test]
    fn dump_events_with_limit() {
        let data = stream();
        let mut out = Vec::new();
        let totals = dump(
            FlowtupleReader::new(data.as_slice()),
            &mut out,
            DumpFormat::Events,
            Some(1),
            None,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# interval 7 start 600\n\
             # class 0 (backscatter) keys 2\n\
             10.0.0.1|0.0.1.1|53|12345|17|0|0x40|60|1\n"
        );
        assert_eq!(totals.records, 1);
    }

    #[test]
    fn summary_rows() {
        let data = stream();
        let metrics = MetricsRecorder::new().unwrap();
        let (rows, totals) = summarize(FlowtupleReader::new(data.as_slice()), Some(&metrics)).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class, FlowClass::Backscatter);
        assert_eq!(rows[0].records, 2);
        assert_eq!(rows[0].packets, 3);
        assert_eq!(rows[1].class, FlowClass::IcmpRequest);
        assert_eq!(rows[1].key_count, 1);
        assert_eq!(totals.records, 3);
        assert_eq!(metrics.records.get(), 3);
        assert_eq!(metrics.classes.get(), 2);

        let mut out = Vec::new();
        write_summary(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "interval|class|keys|records|packets\n\
             7|backscatter|2|2|3\n\
             7|icmp_req|1|1|3\n"
        );
    }

    #[test]
    fn validate_reports_corruption() {
        let mut data = stream();
        // Break the class id of the first class trailer.
        let tail_id = 14 + 10 + 40 + 4 + 1;
        data[tail_id] = 9;
        let err = validate(FlowtupleReader::new(data.as_slice()), None).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("invalid stream after 1 intervals, 2 records"));
        assert!(message.contains("header had 0, trailer has 9"));
    }

    #[test]
    fn validate_clean_stream() {
        let data = stream();
        let totals = validate(FlowtupleReader::new(data.as_slice()), None).unwrap();
        assert_eq!(totals.intervals, 1);
        assert_eq!(totals.packets, 6);
    }
}
