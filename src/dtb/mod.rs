//! Flattened device tree reader.
//!
//! Reads the blob a bootloader hands over in place, without copying or
//! allocating. The blob layout is:
//!
//! ```text
//! ┌──────────────────┐ 0
//! │ header (40 B)    │  ten big-endian u32 fields
//! ├──────────────────┤ off_mem_rsvmap
//! │ reservations     │  (address, size) u64 pairs, zero pair ends
//! ├──────────────────┤ off_dt_struct
//! │ structure block  │  BEGIN_NODE / PROP / END_NODE / NOP ... END
//! ├──────────────────┤ off_dt_strings
//! │ strings block    │  NUL-terminated property names
//! └──────────────────┘ totalsize
//! ```
//!
//! Every offset and length found in the blob is checked before it is used,
//! so a corrupted or truncated blob yields an [`Error`] instead of a read
//! outside the slice.
//!
//! ```rust
//! use fwshell::dtb::{find_bootarg, Error};
//!
//! assert_eq!(find_bootarg(&[0u8; 64]), Err(Error::BadMagic(0)));
//! ```

mod cursor;
mod error;


use core::ops::Range;

pub use cursor::{Cursor, FDT_BEGIN_NODE, FDT_END, FDT_END_NODE, FDT_NOP, FDT_PROP, Token};
pub use error::Error;

/// First word of every blob.
pub const FDT_MAGIC: u32 = 0xd00d_feed;

/// Size of the blob header.
pub const HEADER_SIZE: usize = 40;

/// Newest `last_comp_version` this reader understands.
pub const LAST_SUPPORTED_VERSION: u32 = 17;

/// Blob header, already byte-swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// `0xd00dfeed` for a valid blob.
    pub magic: u32,
    /// Size of the whole blob.
    pub total_size: u32,
    /// Offset of the structure block.
    pub struct_offset: u32,
    /// Offset of the strings block.
    pub strings_offset: u32,
    /// Offset of the memory reservation map.
    pub reservations_offset: u32,
    /// Format version.
    pub version: u32,
    /// Oldest version this blob is compatible with.
    pub last_compatible_version: u32,
    /// Physical id of the boot CPU.
    pub boot_cpuid: u32,
    /// Size of the strings block (version 3 and later).
    pub strings_size: u32,
    /// Size of the structure block (version 17 and later).
    pub struct_size: u32,
}

impl Header {
    /// Read the header fields from the start of `blob`.
    pub fn parse(blob: &[u8]) -> Result<Self, Error> {
        if blob.len() < HEADER_SIZE {
            return Err(Error::Truncated);
        }
        let mut cursor = Cursor::new(blob, 0, HEADER_SIZE)?;
        Ok(Self {
            magic: cursor.read_u32()?,
            total_size: cursor.read_u32()?,
            struct_offset: cursor.read_u32()?,
            strings_offset: cursor.read_u32()?,
            reservations_offset: cursor.read_u32()?,
            version: cursor.read_u32()?,
            last_compatible_version: cursor.read_u32()?,
            boot_cpuid: cursor.read_u32()?,
            strings_size: cursor.read_u32()?,
            struct_size: cursor.read_u32()?,
        })
    }
}

/// One memory reservation map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// First reserved address.
    pub address: u64,
    /// Size of the reserved range.
    pub size: u64,
}

/// A validated device tree blob.
#[derive(Debug, Clone)]
pub struct Fdt<'a> {
    blob: &'a [u8],
    header: Header,
    structure: Range<usize>,
    strings: Range<usize>,
}

impl<'a> Fdt<'a> {
    /// Validate the header of `blob` and the placement of its blocks.
    ///
    /// Bytes past the declared total size are ignored.
    pub fn new(blob: &'a [u8]) -> Result<Self, Error> {
        let header = Header::parse(blob)?;
        if header.magic != FDT_MAGIC {
            warn!("device tree magic is {=u32:#x}", header.magic);
            return Err(Error::BadMagic(header.magic));
        }

        let total = header.total_size as usize;
        if total < HEADER_SIZE || total > blob.len() {
            return Err(Error::Truncated);
        }
        if header.last_compatible_version > LAST_SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion(header.last_compatible_version));
        }
        let blob = &blob[..total];

        let struct_start = header.struct_offset as usize;
        if struct_start % 4 != 0 {
            return Err(Error::BadAlignment);
        }
        let struct_end = if header.version >= 17 {
            struct_start.checked_add(header.struct_size as usize).ok_or(Error::OutOfBounds)?
        } else {
            total
        };
        if struct_start > struct_end || struct_end > total {
            return Err(Error::OutOfBounds);
        }

        let strings_start = header.strings_offset as usize;
        let strings_end = if header.version >= 3 {
            strings_start.checked_add(header.strings_size as usize).ok_or(Error::OutOfBounds)?
        } else {
            total
        };
        if strings_start > strings_end || strings_end > total {
            return Err(Error::OutOfBounds);
        }

        let reservations = header.reservations_offset as usize;
        if reservations % 8 != 0 {
            return Err(Error::BadAlignment);
        }
        if reservations > total {
            return Err(Error::OutOfBounds);
        }

        debug!(
            "device tree v{=u32}, {=usize} bytes, structure {=usize}..{=usize}",
            header.version,
            total,
            struct_start,
            struct_end
        );
        Ok(Self {
            blob,
            header,
            structure: struct_start..struct_end,
            strings: strings_start..strings_end,
        })
    }

    /// Validate the blob a bootloader left at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point at readable memory holding at least a blob header,
    /// followed by `totalsize` readable bytes counted from `ptr`, which stay
    /// valid and unmodified for `'a`.
    pub unsafe fn from_raw(ptr: *const u8) -> Result<Self, Error> {
        if ptr.is_null() {
            return Err(Error::Truncated);
        }
        // SAFETY: the caller guarantees a readable header at `ptr`.
        let head = unsafe { core::slice::from_raw_parts(ptr, 8) };
        let magic = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
        if magic != FDT_MAGIC {
            return Err(Error::BadMagic(magic));
        }
        let total = u32::from_be_bytes([head[4], head[5], head[6], head[7]]) as usize;
        // SAFETY: the caller guarantees `totalsize` readable bytes at `ptr`.
        let blob = unsafe { core::slice::from_raw_parts(ptr, total) };
        Self::new(blob)
    }

    /// The decoded header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The blob, cut to its declared total size.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.blob
    }

    /// Cursor over the structure block.
    pub fn structure(&self) -> Result<Cursor<'a>, Error> {
        Cursor::new(self.blob, self.structure.start, self.structure.end)
    }

    /// Name stored at `offset` in the strings block.
    pub fn string_at(&self, offset: u32) -> Result<&'a str, Error> {
        let start = self
            .strings
            .start
            .checked_add(offset as usize)
            .filter(|&start| start < self.strings.end)
            .ok_or(Error::OutOfBounds)?;
        let bytes = Cursor::new(self.blob, start, self.strings.end)?.read_cstr()?;
        core::str::from_utf8(bytes).map_err(|_| Error::BadString)
    }

    /// Raw value of property `name` in the node at `path`.
    ///
    /// `path` is absolute (`/chosen`, `/soc/serial@7e215040`); `/` or an
    /// empty path is the root node. A path component matches a node whose
    /// name is equal to it or, when the component has no unit address, whose
    /// name up to `@` is equal to it. The first matching property in
    /// structure order wins.
    pub fn find_property(&self, path: &str, name: &str) -> Result<Option<&'a [u8]>, Error> {
        let wanted = components(path).count();
        let mut cursor = self.structure()?;
        let mut depth = 0usize;
        let mut matched = 0usize;

        loop {
            match cursor.next_token()? {
                Token::BeginNode(node) => {
                    depth += 1;
                    if depth >= 2 && matched == depth - 2 && matched < wanted {
                        if let Some(component) = components(path).nth(matched) {
                            if node_matches(node, component) {
                                matched += 1;
                            }
                        }
                    }
                }
                Token::EndNode => {
                    if depth == 0 {
                        warn!("unbalanced END_NODE at offset {=usize}", cursor.offset());
                        return Ok(None);
                    }
                    if depth >= 2 && matched == depth - 1 {
                        matched -= 1;
                    }
                    depth -= 1;
                    if depth == 0 {
                        return Ok(None);
                    }
                }
                Token::Prop { name_offset, value } => {
                    if depth == wanted + 1 && matched == wanted && self.string_at(name_offset)? == name {
                        return Ok(Some(value));
                    }
                }
                Token::Nop => {}
                Token::End => return Ok(None),
                Token::Unknown(token) => {
                    warn!("unknown structure token {=u32:#x}, stopping", token);
                    return Ok(None);
                }
            }
        }
    }

    /// String value of property `name` in the node at `path`, up to the
    /// first NUL inside the value.
    pub fn find_str(&self, path: &str, name: &str) -> Result<Option<&'a str>, Error> {
        let Some(value) = self.find_property(path, name)? else {
            return Ok(None);
        };
        let len = value.iter().position(|&b| b == 0).ok_or(Error::BadString)?;
        core::str::from_utf8(&value[..len]).map(Some).map_err(|_| Error::BadString)
    }

    /// The kernel command line, `/chosen/bootargs`.
    pub fn bootargs(&self) -> Result<Option<&'a str>, Error> {
        self.find_str("/chosen", "bootargs")
    }

    /// Entries of the memory reservation map.
    pub fn reservations(&self) -> Reservations<'a> {
        Reservations {
            cursor: Cursor::new(self.blob, self.header.reservations_offset as usize, self.blob.len()).ok(),
        }
    }
}

/// Iterator over the memory reservation map.
///
/// Ends at the terminating zero entry. A read past the blob yields one error
/// and then ends.
#[derive(Debug, Clone)]
pub struct Reservations<'a> {
    cursor: Option<Cursor<'a>>,
}

impl Iterator for Reservations<'_> {
    type Item = Result<Reservation, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        let entry = cursor.read_u64().and_then(|address| Ok((address, cursor.read_u64()?)));
        match entry {
            Ok((0, 0)) => {
                self.cursor = None;
                None
            }
            Ok((address, size)) => Some(Ok(Reservation { address, size })),
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }
}

/// Kernel command line from the blob at `blob`.
///
/// `Ok(None)` when the blob is valid but has no `/chosen/bootargs`.
pub fn find_bootarg(blob: &[u8]) -> Result<Option<&str>, Error> {
    Fdt::new(blob)?.bootargs()
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|component| !component.is_empty())
}

fn node_matches(node: &[u8], component: &str) -> bool {
    if node == component.as_bytes() {
        return true;
    }
    !component.contains('@') && node.split(|&b| b == b'@').next() == Some(component.as_bytes())
}
