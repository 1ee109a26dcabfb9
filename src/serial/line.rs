//! Bounded line reader.

use super::{Error, Read};

/// Read one line from `reader` into `buf`.
///
/// Bytes are stored until either a `\n` has been stored or only one slot is
/// left, which always receives the terminating NUL. Returns the number of
/// bytes stored before the NUL. A zero-length buffer reads nothing.
///
/// A full buffer without a trailing `\n` is not an error: the caller decides
/// what an overlong line means. Only transport errors are returned, and the
/// bytes read so far are still NUL-terminated when that happens.
pub fn read_line<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize, Error> {
    let Some(limit) = buf.len().checked_sub(1) else {
        return Ok(0);
    };

    let mut len = 0;
    while len < limit {
        let byte = match reader.read_byte() {
            Ok(byte) => byte,
            Err(e) => {
                buf[len] = 0;
                return Err(e);
            }
        };
        buf[len] = byte;
        len += 1;
        if byte == b'\n' {
            break;
        }
    }
    buf[len] = 0;
    Ok(len)
}

/// Caller-owned line storage with a runtime-adjustable usable capacity.
///
/// The storage is `N` bytes; the usable capacity can be lowered below `N`
/// (never raised above it), which is how configured line limits are applied
/// without changing the type.
#[derive(Debug, Clone)]
pub struct LineBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
    capacity: usize,
}

impl<const N: usize> LineBuffer<N> {
    /// Empty buffer using all `N` bytes.
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
            capacity: N,
        }
    }

    /// Empty buffer using at most `capacity` bytes (clamped to `N`).
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.set_capacity(capacity);
        buffer
    }

    /// Usable capacity, NUL slot included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the usable capacity. Clears the buffer.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.min(N);
        self.clear();
    }

    /// Forget the stored line.
    pub fn clear(&mut self) {
        self.len = 0;
        if let Some(first) = self.bytes.first_mut() {
            *first = 0;
        }
    }

    /// Replace the contents with the next line read from `reader`.
    pub fn fill<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize, Error> {
        self.len = 0;
        let len = read_line(reader, &mut self.bytes[..self.capacity])?;
        self.len = len;
        Ok(len)
    }

    /// Number of stored bytes, NUL excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the stored line ends with `\n`.
    ///
    /// `false` for an empty buffer and for a line cut short by the capacity.
    pub fn is_complete(&self) -> bool {
        self.as_bytes().last() == Some(&b'\n')
    }

    /// Stored bytes without the NUL.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Stored bytes followed by the NUL, for in-place tokenizing.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        let end = (self.len + 1).min(N);
        &mut self.bytes[..end]
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
