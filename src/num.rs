//! Unsigned integer parsing.
//!
//! [`parse_u64`] reads the longest prefix of digits valid in the requested
//! base and reports how much of the input it consumed, so callers can tell a
//! whole-token number apart from a number followed by garbage.
//!
//! ```rust
//! use fwshell::num::{parse_u64, Parsed};
//!
//! assert_eq!(parse_u64("3f215040", 16), Ok(Parsed::Complete(0x3f21_5040)));
//! assert_eq!(parse_u64("12kb", 10), Ok(Parsed::Partial { value: 12, consumed: 2 }));
//! assert_eq!(parse_u64("", 10), Ok(Parsed::NoDigits));
//! ```

/// Numeric parsing errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The base is outside `2..=36`.
    InvalidBase(u32),
    /// The digits describe a value larger than `u64::MAX`.
    Overflow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidBase(base) => defmt::write!(f, "InvalidBase({=u32})", *base),
            Error::Overflow => defmt::write!(f, "Overflow"),
        }
    }
}

/// How much of the input formed a number.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Parsed {
    /// Every byte was a digit.
    Complete(u64),
    /// A valid prefix of `consumed` bytes was followed by something else.
    Partial {
        /// Value of the prefix.
        value: u64,
        /// Length of the prefix in bytes.
        consumed: usize,
    },
    /// The input is empty or does not start with a digit.
    NoDigits,
}

impl Parsed {
    /// The value if the whole input was consumed.
    pub fn complete(self) -> Option<u64> {
        match self {
            Parsed::Complete(value) => Some(value),
            _ => None,
        }
    }
}

/// Which uppercase letters count as digits.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Uppercase {
    /// `A` to `Z`, same as lowercase.
    #[default]
    Any,
    /// Only `A`; every other uppercase letter ends the number.
    OnlyA,
}

/// Parse `s` as an unsigned number in `base`, letters case-insensitive.
pub fn parse_u64(s: &str, base: u32) -> Result<Parsed, Error> {
    parse_u64_with(s, base, Uppercase::Any)
}

/// Parse `s` as an unsigned number in `base` with the given uppercase rule.
pub fn parse_u64_with(s: &str, base: u32, uppercase: Uppercase) -> Result<Parsed, Error> {
    if !(2..=36).contains(&base) {
        return Err(Error::InvalidBase(base));
    }

    let mut value: u64 = 0;
    for (consumed, &byte) in s.as_bytes().iter().enumerate() {
        let digit = match digit_value(byte, uppercase) {
            Some(digit) if digit < base => digit,
            _ if consumed == 0 => return Ok(Parsed::NoDigits),
            _ => return Ok(Parsed::Partial { value, consumed }),
        };
        value = value
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(Error::Overflow)?;
    }

    if s.is_empty() {
        Ok(Parsed::NoDigits)
    } else {
        Ok(Parsed::Complete(value))
    }
}

fn digit_value(byte: u8, uppercase: Uppercase) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some(u32::from(byte - b'0')),
        b'a'..=b'z' => Some(u32::from(byte - b'a') + 10),
        b'A' if uppercase == Uppercase::OnlyA => Some(10),
        b'A'..=b'Z' if uppercase == Uppercase::Any => Some(u32::from(byte - b'A') + 10),
        _ => None,
    }
}
