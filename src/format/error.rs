//! Formatter errors.

use crate::serial;

/// Errors returned by [`printf`](super::printf).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A directive had no argument left to consume. Nothing was written.
    MissingArgument,
    /// An argument's kind did not match its directive. Nothing was written.
    ArgumentMismatch,
    /// An unknown directive was rendered as `<BAD MARKER "X">`; holds the first one.
    BadMarker(char),
    /// The format ended with a lone `%`, rendered as `<MISSING MARKER>`.
    MissingMarker,
    /// The output sink failed.
    Io(serial::Error),
}

impl From<serial::Error> for Error {
    fn from(error: serial::Error) -> Self {
        Error::Io(error)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::MissingArgument => defmt::write!(f, "MissingArgument"),
            Error::ArgumentMismatch => defmt::write!(f, "ArgumentMismatch"),
            Error::BadMarker(c) => defmt::write!(f, "BadMarker({=char})", *c),
            Error::MissingMarker => defmt::write!(f, "MissingMarker"),
            Error::Io(e) => defmt::write!(f, "Io({})", e),
        }
    }
}
