//! Constrained `printf`-style formatter.
//!
//! All console text goes through [`printf`]. The directive set is fixed:
//!
//! | Directive | Argument      | Rendering                                  |
//! |-----------|---------------|--------------------------------------------|
//! | `%s`      | [`Arg::Str`]  | the string                                 |
//! | `%c`      | [`Arg::Char`] | the character                              |
//! | `%b`      | [`Arg::Byte`] | 2 lowercase hex digits                     |
//! | `%h`      | [`Arg::Half`] | 8 lowercase hex digits                     |
//! | `%w`      | [`Arg::Word`] | 16 lowercase hex digits                    |
//! | `%i`      | [`Arg::Int`]  | signed decimal                             |
//! | `%%`      | none          | `%`                                        |
//!
//! No width, precision or flags. An unknown directive `X` is rendered as
//! `<BAD MARKER "X">` and formatting carries on; a `%` at the very end is
//! rendered as `<MISSING MARKER>` and formatting stops. Both are reported
//! through the returned [`Error`] once the text has been written.
//!
//! Arguments are checked against the directives before anything is written,
//! so a call with missing or mistyped arguments produces no output at all.
//!
//! ```rust
//! use fwshell::format::{printf, Arg, Error};
//!
//! let mut out: heapless::Vec<u8, 64> = heapless::Vec::new();
//! printf(&mut out, "EL%i at 0x%b", &[Arg::Int(2), Arg::Byte(0x0a)]).unwrap();
//! assert_eq!(&out[..], b"EL2 at 0x0a");
//!
//! out.clear();
//! assert_eq!(printf(&mut out, "%s", &[Arg::Int(1)]), Err(Error::ArgumentMismatch));
//! assert!(out.is_empty());
//! ```

mod error;

pub use error::Error;

use crate::serial::Write;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// One formatter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// `%s`
    Str(&'a str),
    /// `%c`
    Char(char),
    /// `%b`
    Byte(u8),
    /// `%h`
    Half(u32),
    /// `%w`
    Word(u64),
    /// `%i`
    Int(i64),
}

impl Arg<'_> {
    fn matches(&self, directive: char) -> bool {
        matches!(
            (directive, self),
            ('s', Arg::Str(_))
                | ('c', Arg::Char(_))
                | ('b', Arg::Byte(_))
                | ('h', Arg::Half(_))
                | ('w', Arg::Word(_))
                | ('i', Arg::Int(_))
        )
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<u8> for Arg<'_> {
    fn from(value: u8) -> Self {
        Arg::Byte(value)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::Half(value)
    }
}

impl From<u64> for Arg<'_> {
    fn from(value: u64) -> Self {
        Arg::Word(value)
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<isize> for Arg<'_> {
    fn from(value: isize) -> Self {
        Arg::Int(value as i64)
    }
}

/// Counts and sizes print as `%i`; values past `i64::MAX` saturate.
impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Arg::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

fn consumes_argument(directive: char) -> bool {
    matches!(directive, 's' | 'c' | 'b' | 'h' | 'w' | 'i')
}

fn check(format: &str, args: &[Arg<'_>]) -> Result<(), Error> {
    let mut args = args.iter();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.next() {
            None => break,
            Some(directive) if consumes_argument(directive) => match args.next() {
                Some(arg) if arg.matches(directive) => {}
                Some(_) => {
                    warn!("argument does not match %{=char}", directive);
                    return Err(Error::ArgumentMismatch);
                }
                None => {
                    warn!("no argument left for %{=char}", directive);
                    return Err(Error::MissingArgument);
                }
            },
            Some(_) => {}
        }
    }
    Ok(())
}

/// Write `format` to `out`, substituting `args` for the directives in order.
///
/// Arguments beyond the last directive are ignored.
pub fn printf<W: Write + ?Sized>(out: &mut W, format: &str, args: &[Arg<'_>]) -> Result<(), Error> {
    check(format, args)?;

    let mut args = args.iter();
    let mut bad_marker = None;
    let mut rest = format;
    while let Some(pos) = rest.find('%') {
        out.write_str(&rest[..pos])?;
        let mut after = rest[pos + 1..].chars();
        let Some(directive) = after.next() else {
            out.write_str("<MISSING MARKER>")?;
            return Err(Error::MissingMarker);
        };
        if directive == '%' {
            out.write_byte(b'%')?;
        } else if consumes_argument(directive) {
            match args.next() {
                Some(arg) => write_arg(out, arg)?,
                None => return Err(Error::MissingArgument),
            }
        } else {
            out.write_str("<BAD MARKER \"")?;
            write_char(out, directive)?;
            out.write_str("\">")?;
            bad_marker.get_or_insert(directive);
        }
        rest = after.as_str();
    }
    out.write_str(rest)?;

    match bad_marker {
        Some(marker) => Err(Error::BadMarker(marker)),
        None => Ok(()),
    }
}

fn write_arg<W: Write + ?Sized>(out: &mut W, arg: &Arg<'_>) -> Result<(), Error> {
    match *arg {
        Arg::Str(s) => out.write_str(s)?,
        Arg::Char(c) => write_char(out, c)?,
        Arg::Byte(v) => write_hex(out, u64::from(v), 2)?,
        Arg::Half(v) => write_hex(out, u64::from(v), 8)?,
        Arg::Word(v) => write_hex(out, v, 16)?,
        Arg::Int(v) => write_int(out, v)?,
    }
    Ok(())
}

fn write_char<W: Write + ?Sized>(out: &mut W, c: char) -> Result<(), crate::serial::Error> {
    let mut buf = [0u8; 4];
    out.write_str(c.encode_utf8(&mut buf))
}

fn write_hex<W: Write + ?Sized>(out: &mut W, value: u64, digits: u32) -> Result<(), crate::serial::Error> {
    for shift in (0..digits).rev() {
        let nibble = (value >> (shift * 4)) & 0xf;
        out.write_byte(HEX_DIGITS[nibble as usize])?;
    }
    Ok(())
}

fn write_int<W: Write + ?Sized>(out: &mut W, value: i64) -> Result<(), crate::serial::Error> {
    if value < 0 {
        out.write_byte(b'-')?;
    }
    let mut magnitude = value.unsigned_abs();
    let mut digits = [0u8; 20];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }
    out.write_bytes(&digits[start..])
}
