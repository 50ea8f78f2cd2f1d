//! ## flowtuple-protocols::sink
//! Optional diagnostic output for a [`crate::FlowtupleReader`].
//!
//! Sinks are fire-and-forget: nothing they do can change the outcome of a
//! decoding call.

use std::fmt;
use std::io::Write;

/// A single diagnostic emitted while walking the framing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    IntervalNumber(u16),
    IntervalStart(u32),
    IntervalEnd(u32),
    ClassId(u16),
    KeyCount(u32),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IntervalNumber(n) => write!(f, "Interval number: {n}"),
            Diagnostic::IntervalStart(t) => write!(f, "Interval start time: {t}"),
            Diagnostic::IntervalEnd(t) => write!(f, "Interval end time: {t}"),
            Diagnostic::ClassId(id) => write!(f, "Class id: {id}"),
            Diagnostic::KeyCount(n) => write!(f, "Key count: {n}"),
        }
    }
}

/// Receiver for decoder diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diag: &Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn emit(&mut self, diag: &Diagnostic) {
        (**self).emit(diag)
    }
}

/// Forwards diagnostics to `tracing` at debug level.
#[derive(Default, Debug, Copy, Clone)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diag: &Diagnostic) {
        tracing::debug!("{}", diag);
    }
}

/// Writes one line per diagnostic to any writer, e.g. a log file.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for WriterSink<W> {
    fn emit(&mut self, diag: &Diagnostic) {
        // Write failures are dropped; diagnostics never fail a decode.
        let _ = writeln!(self.writer, "{diag}");
    }
}
