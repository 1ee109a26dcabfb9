//! Bounds-checked reader over a blob.

use super::Error;

/// Structure block tokens.
pub const FDT_BEGIN_NODE: u32 = 0x1;
/// End of a node.
pub const FDT_END_NODE: u32 = 0x2;
/// Property.
pub const FDT_PROP: u32 = 0x3;
/// Padding.
pub const FDT_NOP: u32 = 0x4;
/// End of the structure block.
pub const FDT_END: u32 = 0x9;

/// One structure block token with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Start of a node. The name excludes its NUL and is empty for the root.
    BeginNode(&'a [u8]),
    /// End of the innermost open node.
    EndNode,
    /// Property of the innermost open node.
    Prop {
        /// Offset of the property name in the strings block.
        name_offset: u32,
        /// Raw value.
        value: &'a [u8],
    },
    /// Padding.
    Nop,
    /// End of the structure block.
    End,
    /// A token this reader does not know. Walks stop here.
    Unknown(u32),
}

/// Position in a blob with an upper limit.
///
/// Offsets are absolute within the blob, so alignment is relative to its
/// start. No read ever touches a byte at or past the limit.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    blob: &'a [u8],
    offset: usize,
    limit: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at `offset`, reading no further than `limit`.
    pub fn new(blob: &'a [u8], offset: usize, limit: usize) -> Result<Self, Error> {
        if limit > blob.len() || offset > limit {
            return Err(Error::OutOfBounds);
        }
        Ok(Self { blob, offset, limit })
    }

    /// Current offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.offset
    }

    /// Take the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.remaining() {
            return Err(Error::OutOfBounds);
        }
        let bytes = &self.blob[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let mut word = [0u8; 4];
        word.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_be_bytes(word))
    }

    /// Big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let mut word = [0u8; 8];
        word.copy_from_slice(self.read_bytes(8)?);
        Ok(u64::from_be_bytes(word))
    }

    /// Bytes up to the next NUL, which is consumed but not returned.
    pub fn read_cstr(&mut self) -> Result<&'a [u8], Error> {
        let rest = &self.blob[self.offset..self.limit];
        let len = rest.iter().position(|&b| b == 0).ok_or(Error::BadString)?;
        let bytes = &rest[..len];
        self.offset += len + 1;
        Ok(bytes)
    }

    /// Skip forward to the next multiple of `align`, a power of two.
    pub fn align(&mut self, align: usize) -> Result<(), Error> {
        if !align.is_power_of_two() {
            return Err(Error::BadAlignment);
        }
        let aligned = self
            .offset
            .checked_add(align - 1)
            .map(|end| end & !(align - 1))
            .ok_or(Error::OutOfBounds)?;
        if aligned > self.limit {
            return Err(Error::OutOfBounds);
        }
        self.offset = aligned;
        Ok(())
    }

    /// Read one structure token and its payload, leaving the cursor aligned
    /// on the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, Error> {
        let token = match self.read_u32()? {
            FDT_BEGIN_NODE => {
                let name = self.read_cstr()?;
                self.align(4)?;
                Token::BeginNode(name)
            }
            FDT_END_NODE => Token::EndNode,
            FDT_PROP => {
                let len = self.read_u32()? as usize;
                let name_offset = self.read_u32()?;
                let value = self.read_bytes(len)?;
                self.align(4)?;
                Token::Prop { name_offset, value }
            }
            FDT_NOP => Token::Nop,
            FDT_END => Token::End,
            other => Token::Unknown(other),
        };
        Ok(token)
    }
}
