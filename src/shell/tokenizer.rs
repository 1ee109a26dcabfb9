//! Command line tokenizer.
//!
//! Two ways in:
//!
//! - [`Scanner`] walks a byte slice and yields one token at a time. Its
//!   position lives in the scanner itself, so independent scans never
//!   interfere.
//! - [`split`] tokenizes a line buffer in place and returns every token at
//!   once as an [`Argv`].
//!
//! A token is a maximal run of bytes that are neither delimiters nor NUL.
//! Runs of delimiters collapse, leading and trailing delimiters are skipped.

use heapless::Vec;

/// Delimiters between command line tokens.
pub const DELIMITERS: &[u8] = b" \t\r\n";

/// Tokenizer errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A token contains bytes outside 7-bit ASCII.
    InvalidText,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidText => defmt::write!(f, "InvalidText"),
        }
    }
}

/// Caller-owned token cursor.
///
/// ```rust
/// use fwshell::shell::tokenizer::Scanner;
///
/// let mut scanner = Scanner::new(b"  hexdump\t0x80000 64\n");
/// assert_eq!(scanner.next_token(), Some(&b"hexdump"[..]));
/// assert_eq!(scanner.next_token(), Some(&b"0x80000"[..]));
/// assert_eq!(scanner.next_token(), Some(&b"64"[..]));
/// assert_eq!(scanner.next_token(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    delimiters: &'a [u8],
    position: usize,
}

impl<'a> Scanner<'a> {
    /// Scan `input` with the default [`DELIMITERS`].
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_delimiters(input, DELIMITERS)
    }

    /// Scan `input` with a custom delimiter set. NUL always separates tokens.
    pub fn with_delimiters(input: &'a [u8], delimiters: &'a [u8]) -> Self {
        Self {
            input,
            delimiters,
            position: 0,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Next token, or `None` once only delimiters remain.
    pub fn next_token(&mut self) -> Option<&'a [u8]> {
        let input = self.input;
        while self.position < input.len() && self.is_delimiter(input[self.position]) {
            self.position += 1;
        }
        if self.position == input.len() {
            return None;
        }

        let start = self.position;
        while self.position < input.len() && !self.is_delimiter(input[self.position]) {
            self.position += 1;
        }
        Some(&input[start..self.position])
    }

    fn is_delimiter(&self, byte: u8) -> bool {
        byte == 0 || self.delimiters.contains(&byte)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Token views into a tokenized line.
///
/// Holds at most `N` views but counts every token, so a line with too many
/// tokens is visible through [`argc`](Self::argc) exceeding `N`.
#[derive(Debug, Clone, Default)]
pub struct Argv<'a, const N: usize> {
    tokens: Vec<&'a str, N>,
    argc: usize,
}

impl<'a, const N: usize> Argv<'a, N> {
    /// No tokens.
    pub const fn new() -> Self {
        Self {
            tokens: Vec::new(),
            argc: 0,
        }
    }

    fn push(&mut self, token: &'a str) {
        self.argc += 1;
        // Past N only the count grows.
        let _ = self.tokens.push(token);
    }

    /// Number of tokens on the line, including those not stored.
    pub fn argc(&self) -> usize {
        self.argc
    }

    /// Whether some tokens did not fit.
    pub fn is_truncated(&self) -> bool {
        self.argc > self.tokens.len()
    }

    /// The stored tokens.
    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens
    }

    /// First token, the command name.
    pub fn command(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    /// Token at `index`, if stored.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// Iterate over the stored tokens.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().copied()
    }
}

/// Tokenize `line` in place.
///
/// Only the bytes before the first NUL take part. The first delimiter after
/// each token is overwritten with NUL, then all tokens are returned.
///
/// ```rust
/// use fwshell::shell::tokenizer::{split, Argv, DELIMITERS};
///
/// let mut line = *b"echo  one two\n\0";
/// let argv: Argv<'_, 4> = split(&mut line, DELIMITERS).unwrap();
/// assert_eq!(argv.as_slice(), ["echo", "one", "two"]);
/// ```
pub fn split<'a, const N: usize>(line: &'a mut [u8], delimiters: &'a [u8]) -> Result<Argv<'a, N>, Error> {
    let end = line.iter().position(|&b| b == 0).unwrap_or(line.len());
    let line = &mut line[..end];

    let mut position = 0;
    while position < line.len() {
        while position < line.len() && delimiters.contains(&line[position]) {
            position += 1;
        }
        while position < line.len() && !delimiters.contains(&line[position]) {
            position += 1;
        }
        if position < line.len() {
            line[position] = 0;
            position += 1;
        }
    }

    let line: &'a [u8] = line;
    let mut argv = Argv::new();
    for token in Scanner::with_delimiters(line, delimiters) {
        if !token.is_ascii() {
            debug!("rejecting non-ascii token of {=usize} bytes", token.len());
            return Err(Error::InvalidText);
        }
        let token = core::str::from_utf8(token).map_err(|_| Error::InvalidText)?;
        argv.push(token);
    }
    trace!("split line into {=usize} tokens", argv.argc());
    Ok(argv)
}
