//! ## flowtuple-protocols::reader
//! Streaming decoder for the interval / class / record framing.
//!
//! Consumers drive the reader through the nested loop:
//!
//! ```text
//! while let Some(_) = reader.read_interval_header()? {
//!     while let Some(_) = reader.read_class_header()? {
//!         while reader.read_record(&mut record)? { /* use record */ }
//!         reader.read_class_tail()?;
//!     }
//!     reader.read_interval_tail()?;
//! }
//! ```
//!
//! Call order is a usage contract; the reader only validates that the bytes
//! found at each step carry the expected marker.

use std::fmt;
use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{FlowtupleError, Result, Section};
use crate::record::FlowRecord;
use crate::sink::{Diagnostic, DiagnosticSink};
use crate::types::{
    ClassHeader, IntervalHeader, IntervalTrailer, CLASS_MAGIC, END_OF_STREAM, INTERVAL_MAGIC,
    OUTER_MAGIC,
};

/// Bookkeeping for the interval and class currently being read.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct DecoderState {
    interval_number: u16,
    class_id: u16,
    key_count: u32,
    records_read: u32,
}

/// Sequential flowtuple decoder over any byte source.
pub struct FlowtupleReader<R> {
    reader: R,
    state: DecoderState,
    bytes_read: u64,
    sink: Option<Box<dyn DiagnosticSink + Send>>,
}

fn expect_magic(section: Section, expected: u32, found: u32) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(FlowtupleError::StructuralMismatch {
            section,
            expected,
            found,
        })
    }
}

impl<R: Read> FlowtupleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: DecoderState::default(),
            bytes_read: 0,
            sink: None,
        }
    }

    /// Attaches a diagnostic sink that receives interval and class details.
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: DiagnosticSink + Send + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Current interval number, as read from the last interval header.
    pub fn interval_number(&self) -> u16 {
        self.state.interval_number
    }

    /// Current class id, as read from the last class header.
    pub fn class_id(&self) -> u16 {
        self.state.class_id
    }

    /// Number of records the current class declares.
    pub fn key_count(&self) -> u32 {
        self.state.key_count
    }

    /// Records read so far in the current class.
    pub fn records_read(&self) -> u32 {
        self.state.records_read
    }

    /// Total bytes consumed from the source by successful reads.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads an interval header.
    ///
    /// Returns `Ok(None)` at the end of the stream: either the zero sentinel
    /// in place of a marker, or a source that is exhausted exactly at an
    /// interval boundary.
    pub fn read_interval_header(&mut self) -> Result<Option<IntervalHeader>> {
        let magic = match self.read_leading_magic()? {
            Some(magic) => magic,
            None => return Ok(None),
        };
        if magic == END_OF_STREAM {
            return Ok(None);
        }
        expect_magic(Section::Outer, OUTER_MAGIC, magic)?;

        let magic = self.read_u32("interval magic")?;
        if magic == END_OF_STREAM {
            return Ok(None);
        }
        expect_magic(Section::Interval, INTERVAL_MAGIC, magic)?;

        let number = self.read_u16("interval number")?;
        self.emit(Diagnostic::IntervalNumber(number));
        let start_time = self.read_u32("interval start time")?;
        self.emit(Diagnostic::IntervalStart(start_time));

        self.state = DecoderState {
            interval_number: number,
            ..DecoderState::default()
        };
        Ok(Some(IntervalHeader { number, start_time }))
    }

    /// Reads a class header.
    ///
    /// Returns `Ok(None)` when the outer marker is found instead, meaning the
    /// interval has no more classes. The marker is consumed and the caller
    /// continues with [`FlowtupleReader::read_interval_tail`].
    pub fn read_class_header(&mut self) -> Result<Option<ClassHeader>> {
        let magic = self.read_u32("class magic")?;
        if magic == OUTER_MAGIC {
            return Ok(None);
        }
        expect_magic(Section::Class, CLASS_MAGIC, magic)?;

        let class_id = self.read_u16("class id")?;
        self.emit(Diagnostic::ClassId(class_id));
        let key_count = self.read_u32("key count")?;
        self.emit(Diagnostic::KeyCount(key_count));

        self.state.class_id = class_id;
        self.state.key_count = key_count;
        self.state.records_read = 0;
        Ok(Some(ClassHeader {
            class_id,
            key_count,
        }))
    }

    /// Reads the next record of the current class into `record`.
    ///
    /// Returns `Ok(false)` without touching the source once the class's
    /// declared key count has been read.
    pub fn read_record(&mut self, record: &mut FlowRecord) -> Result<bool> {
        if self.state.records_read >= self.state.key_count {
            return Ok(false);
        }
        record.read_from(&mut self.reader)?;
        self.state.records_read += 1;
        self.bytes_read += FlowRecord::WIRE_LEN as u64;
        Ok(true)
    }

    /// By-value form of [`FlowtupleReader::read_record`].
    pub fn next_record(&mut self) -> Result<Option<FlowRecord>> {
        let mut record = FlowRecord::default();
        if self.read_record(&mut record)? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Reads a class trailer and checks it closes the current class.
    pub fn read_class_tail(&mut self) -> Result<u16> {
        let magic = self.read_u32("class trailer magic")?;
        expect_magic(Section::Class, CLASS_MAGIC, magic)?;

        let class_id = self.read_u16("class trailer id")?;
        if class_id != self.state.class_id {
            return Err(FlowtupleError::ConsistencyMismatch {
                section: Section::Class,
                expected: u32::from(self.state.class_id),
                found: u32::from(class_id),
            });
        }
        Ok(class_id)
    }

    /// Reads an interval trailer and checks it closes the current interval.
    pub fn read_interval_tail(&mut self) -> Result<IntervalTrailer> {
        let magic = self.read_u32("interval trailer magic")?;
        expect_magic(Section::Interval, INTERVAL_MAGIC, magic)?;

        let number = self.read_u16("interval trailer number")?;
        self.emit(Diagnostic::IntervalNumber(number));
        if number != self.state.interval_number {
            return Err(FlowtupleError::ConsistencyMismatch {
                section: Section::Interval,
                expected: u32::from(self.state.interval_number),
                found: u32::from(number),
            });
        }

        let end_time = self.read_u32("interval end time")?;
        self.emit(Diagnostic::IntervalEnd(end_time));
        Ok(IntervalTrailer { number, end_time })
    }

    /// Reads the marker that may open an interval, distinguishing a source
    /// exhausted before its first byte from one exhausted part way through.
    fn read_leading_magic(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FlowtupleError::Io(e)),
            }
        }
        self.bytes_read += filled as u64;
        match filled {
            0 => Ok(None),
            4 => Ok(Some(u32::from_be_bytes(buf))),
            _ => Err(FlowtupleError::ShortRead {
                field: "outer magic",
            }),
        }
    }

    fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let value = self
            .reader
            .read_u32::<BigEndian>()
            .map_err(|e| FlowtupleError::from_read(field, e))?;
        self.bytes_read += 4;
        Ok(value)
    }

    fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        let value = self
            .reader
            .read_u16::<BigEndian>()
            .map_err(|e| FlowtupleError::from_read(field, e))?;
        self.bytes_read += 2;
        Ok(value)
    }

    fn emit(&mut self, diag: Diagnostic) {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(&diag);
        }
    }
}

impl<R> fmt::Debug for FlowtupleReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowtupleReader")
            .field("state", &self.state)
            .field("bytes_read", &self.bytes_read)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
