use std::fmt;
use std::io;

use thiserror::Error;

/// Structural section a marker or identifier belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// The outer `EDGR` marker that opens every interval.
    Outer,
    /// Interval header or trailer.
    Interval,
    /// Class header or trailer.
    Class,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Outer => f.write_str("outer"),
            Section::Interval => f.write_str("interval"),
            Section::Class => f.write_str("class"),
        }
    }
}

/// Errors that can occur while decoding a flowtuple stream.
///
/// End-of-section conditions are not errors; they are reported through the
/// `Option`/`bool` return values of [`crate::FlowtupleReader`].
#[derive(Debug, Error)]
pub enum FlowtupleError {
    /// A magic constant did not match any value expected at this position.
    #[error("Incorrect {section} magic number: expected {expected:#010x}, found {found:#010x}")]
    StructuralMismatch {
        section: Section,
        expected: u32,
        found: u32,
    },
    /// A trailer's identifier disagrees with the one recorded at its header.
    #[error("Incorrect {section} trailer: header had {expected}, trailer has {found}")]
    ConsistencyMismatch {
        section: Section,
        expected: u32,
        found: u32,
    },
    /// The source ran out of bytes in the middle of a field.
    #[error("Short read while decoding {field}")]
    ShortRead { field: &'static str },
    /// Any other error reported by the underlying source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FlowtupleError {
    /// Maps an I/O error from reading `field` into a decoder error.
    ///
    /// `UnexpectedEof` becomes [`FlowtupleError::ShortRead`]; everything else
    /// is passed through unchanged.
    pub(crate) fn from_read(field: &'static str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FlowtupleError::ShortRead { field }
        } else {
            FlowtupleError::Io(err)
        }
    }

    /// Returns true for errors caused by malformed content rather than I/O.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            FlowtupleError::StructuralMismatch { .. } | FlowtupleError::ConsistencyMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FlowtupleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_eof_maps_to_short_read() {
        let err = FlowtupleError::from_read(
            "source address",
            io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        );
        assert!(matches!(
            err,
            FlowtupleError::ShortRead {
                field: "source address"
            }
        ));
    }

    #[test]
    fn test_other_io_errors_pass_through() {
        let err = FlowtupleError::from_read(
            "count",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        match err {
            FlowtupleError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mismatch_messages_include_values() {
        let err = FlowtupleError::StructuralMismatch {
            section: Section::Class,
            expected: 0x5349_5854,
            found: 0xdead_beef,
        };
        assert_eq!(
            err.to_string(),
            "Incorrect class magic number: expected 0x53495854, found 0xdeadbeef"
        );
        assert!(err.is_format_error());

        let err = FlowtupleError::ConsistencyMismatch {
            section: Section::Interval,
            expected: 7,
            found: 8,
        };
        assert_eq!(
            err.to_string(),
            "Incorrect interval trailer: header had 7, trailer has 8"
        );
    }
}
