//! ## flowtuple-protocols::walker
//! Iterator that drives a [`FlowtupleReader`] through the whole nested loop.

use std::io::Read;
use std::iter::FusedIterator;

use crate::error::{FlowtupleError, Result};
use crate::reader::FlowtupleReader;
use crate::record::FlowRecord;
use crate::types::{ClassHeader, IntervalHeader, IntervalTrailer};

/// One step of a flowtuple stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    IntervalStart(IntervalHeader),
    ClassStart(ClassHeader),
    Record(FlowRecord),
    ClassEnd { class_id: u16 },
    IntervalEnd(IntervalTrailer),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Position {
    Stream,
    Interval,
    Class,
    Done,
}

/// Yields every [`Event`] of a stream in order.
///
/// Stops after end of stream or after the first error.
#[derive(Debug)]
pub struct FlowtupleWalker<R> {
    reader: FlowtupleReader<R>,
    position: Position,
}

impl<R: Read> FlowtupleWalker<R> {
    pub fn new(reader: FlowtupleReader<R>) -> Self {
        Self {
            reader,
            position: Position::Stream,
        }
    }

    pub fn reader(&self) -> &FlowtupleReader<R> {
        &self.reader
    }

    pub fn into_reader(self) -> FlowtupleReader<R> {
        self.reader
    }

    fn fail(&mut self, err: FlowtupleError) -> Option<Result<Event>> {
        self.position = Position::Done;
        Some(Err(err))
    }

    fn step(&mut self) -> Result<Option<Event>> {
        match self.position {
            Position::Done => Ok(None),
            Position::Stream => match self.reader.read_interval_header()? {
                Some(header) => {
                    self.position = Position::Interval;
                    Ok(Some(Event::IntervalStart(header)))
                }
                None => {
                    self.position = Position::Done;
                    Ok(None)
                }
            },
            Position::Interval => match self.reader.read_class_header()? {
                Some(header) => {
                    self.position = Position::Class;
                    Ok(Some(Event::ClassStart(header)))
                }
                None => {
                    let trailer = self.reader.read_interval_tail()?;
                    self.position = Position::Stream;
                    Ok(Some(Event::IntervalEnd(trailer)))
                }
            },
            Position::Class => match self.reader.next_record()? {
                Some(record) => Ok(Some(Event::Record(record))),
                None => {
                    let class_id = self.reader.read_class_tail()?;
                    self.position = Position::Interval;
                    Ok(Some(Event::ClassEnd { class_id }))
                }
            },
        }
    }
}

impl<R: Read> Iterator for FlowtupleWalker<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(event) => event.map(Ok),
            Err(err) => self.fail(err),
        }
    }
}

impl<R: Read> FusedIterator for FlowtupleWalker<R> {}
