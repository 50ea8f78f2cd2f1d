//! # Flowtuple Protocol Decoding
//!
//! Crate for reading binary flowtuple files: nested intervals of typed
//! classes, each holding fixed-width 20-byte flow-tuple records.
//!
//! The format is documented at
//! <http://www.caida.org/tools/measurement/corsaro/docs/formats.html>.

pub mod error;
pub mod reader;
pub mod record;
pub mod sink;
pub mod types;
pub mod walker;

pub use error::{FlowtupleError, Section};
pub use reader::FlowtupleReader;
pub use record::FlowRecord;
pub use sink::{Diagnostic, DiagnosticSink, TracingSink, WriterSink};
pub use types::{ClassHeader, FlowClass, IntervalHeader, IntervalTrailer};
pub use walker::{Event, FlowtupleWalker};
