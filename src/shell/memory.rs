//! Memory access for commands that inspect the address space.

/// Memory read errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Nothing readable is mapped at this address.
    Unmapped(u64),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Unmapped(address) => defmt::write!(f, "Unmapped({=u64:#x})", *address),
        }
    }
}

/// Byte-addressed read access.
pub trait Memory {
    /// Read the byte at `address`.
    fn read_byte(&self, address: u64) -> Result<u8, Error>;
}

/// Reads raw physical addresses.
#[derive(Debug)]
pub struct PhysicalMemory {
    _private: (),
}

impl PhysicalMemory {
    /// Unrestricted physical memory access.
    ///
    /// # Safety
    ///
    /// Every address handed to [`Memory::read_byte`] is dereferenced. The
    /// caller guarantees that reads anywhere in the address space are side
    /// effect free and cannot fault, as on an identity mapped board without
    /// memory protection.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Memory for PhysicalMemory {
    fn read_byte(&self, address: u64) -> Result<u8, Error> {
        let address = usize::try_from(address).map_err(|_| Error::Unmapped(address))?;
        // SAFETY: `new` requires every address to be readable.
        Ok(unsafe { core::ptr::read_volatile(address as *const u8) })
    }
}

/// A byte slice mapped at a fixed base address.
///
/// ```rust
/// use fwshell::shell::memory::{Error, Memory, SliceMemory};
///
/// let memory = SliceMemory::new(0x8_0000, b"boot");
/// assert_eq!(memory.read_byte(0x8_0001), Ok(b'o'));
/// assert_eq!(memory.read_byte(0x8_0004), Err(Error::Unmapped(0x8_0004)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SliceMemory<'a> {
    base: u64,
    bytes: &'a [u8],
}

impl<'a> SliceMemory<'a> {
    /// Map `bytes` at `base`.
    pub fn new(base: u64, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    /// First mapped address.
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl Memory for SliceMemory<'_> {
    fn read_byte(&self, address: u64) -> Result<u8, Error> {
        address
            .checked_sub(self.base)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|offset| self.bytes.get(offset).copied())
            .ok_or(Error::Unmapped(address))
    }
}
