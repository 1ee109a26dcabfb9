//! Common error types for serial operations

/// A common error type for serial operations.
///
/// Polled hardware ports never fail on their own; errors only appear when a
/// poll limit is configured or when output goes to a bounded buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The port did not become ready within the configured number of polls.
    Timeout,
    /// A buffer-backed sink has no room left.
    BufferFull,
}

impl Error {
    /// Short human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Error::Timeout => "serial timeout",
            Error::BufferFull => "output buffer full",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::BufferFull => defmt::write!(f, "BufferFull"),
        }
    }
}
