//! Device tree errors.

/// Reasons a blob is rejected. Every one of them fails closed: nothing past
/// the offending read is looked at.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The blob is shorter than its header or its declared total size.
    Truncated,
    /// The first word is not `0xd00dfeed`.
    BadMagic(u32),
    /// The blob needs a newer reader than version 17.
    UnsupportedVersion(u32),
    /// A read or block lies outside the blob.
    OutOfBounds,
    /// A name or string value has no terminating NUL in bounds, or is not text.
    BadString,
    /// A block offset breaks the required alignment.
    BadAlignment,
}

impl Error {
    /// Short description, printed by the boot report.
    pub fn message(&self) -> &'static str {
        match self {
            Error::Truncated => "truncated blob",
            Error::BadMagic(_) => "bad magic",
            Error::UnsupportedVersion(_) => "unsupported version",
            Error::OutOfBounds => "read out of bounds",
            Error::BadString => "unterminated string",
            Error::BadAlignment => "misaligned block",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Truncated => defmt::write!(f, "Truncated"),
            Error::BadMagic(magic) => defmt::write!(f, "BadMagic({=u32:#x})", *magic),
            Error::UnsupportedVersion(v) => defmt::write!(f, "UnsupportedVersion({=u32})", *v),
            Error::OutOfBounds => defmt::write!(f, "OutOfBounds"),
            Error::BadString => defmt::write!(f, "BadString"),
            Error::BadAlignment => defmt::write!(f, "BadAlignment"),
        }
    }
}
