//! Crate-level error type covering the whole extraction pipeline.
use std::fmt;

use crate::binutil::ParseError;

/// Errors that abort the current operation (usually one module's writer).
///
/// Structural problems discovered while *classifying* candidates are not
/// errors (the classifier silently discards what fails its checks), but a
/// structure that the classifier accepted and a writer then cannot decode
/// surfaces here as [`RipError::Parse`].
#[derive(Debug)]
pub enum RipError {
    /// The ROM could not be read or an output file could not be written.
    Io(std::io::Error),

    /// A Krawall structure was out of its declared ranges or truncated.
    Parse(ParseError),

    /// The requested output format cannot represent this module (for
    /// example S3M output for an instrument-based module, or patterns
    /// that are not 64 rows long).
    UnsupportedTargetFormat(String),

    /// Instrument trimming would need more output instruments than the
    /// target format can address.
    InstrumentLimitExceeded { needed: usize },

    /// The offset search did not find an instrument list, a sample list
    /// and at least one module.
    OffsetsNotFound,
}

impl RipError {
    /// Process exit code used by the command line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            RipError::Io(_) => 2,
            RipError::Parse(_) => 2,
            RipError::UnsupportedTargetFormat(_) => 2,
            RipError::InstrumentLimitExceeded { .. } => 10,
            RipError::OffsetsNotFound => 3,
        }
    }
}

impl fmt::Display for RipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RipError::Io(e) => write!(f, "i/o failure: {}", e),
            RipError::Parse(e) => write!(f, "structurally invalid data: {}", e),
            RipError::UnsupportedTargetFormat(why) => {
                write!(f, "unsupported target format: {}", why)
            }
            RipError::InstrumentLimitExceeded { needed } => {
                write!(f, "too many instruments: module needs {} (maximum 254)", needed)
            }
            RipError::OffsetsNotFound => write!(
                f,
                "could not find the instrument list, sample list and modules"
            ),
        }
    }
}

impl std::error::Error for RipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RipError::Io(e) => Some(e),
            RipError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RipError {
    fn from(e: std::io::Error) -> Self {
        RipError::Io(e)
    }
}

impl From<ParseError> for RipError {
    fn from(e: ParseError) -> Self {
        RipError::Parse(e)
    }
}
