//! Device tree blob assembler for tests and benches.

#![allow(dead_code)]

const FDT_MAGIC: u32 = 0xd00d_feed;
const FDT_BEGIN_NODE: u32 = 0x1;
const FDT_END_NODE: u32 = 0x2;
const FDT_PROP: u32 = 0x3;
const FDT_NOP: u32 = 0x4;
const FDT_END: u32 = 0x9;
const HEADER_SIZE: usize = 40;

/// Field positions in the header, in words.
pub mod field {
    pub const MAGIC: usize = 0;
    pub const TOTAL_SIZE: usize = 1;
    pub const STRUCT_OFFSET: usize = 2;
    pub const STRINGS_OFFSET: usize = 3;
    pub const RESERVATIONS_OFFSET: usize = 4;
    pub const VERSION: usize = 5;
    pub const LAST_COMP_VERSION: usize = 6;
    pub const STRINGS_SIZE: usize = 8;
    pub const STRUCT_SIZE: usize = 9;
}

#[derive(Debug, Clone)]
pub struct FdtBuilder {
    structure: Vec<u8>,
    strings: Vec<u8>,
    reservations: Vec<(u64, u64)>,
    version: u32,
    last_comp_version: u32,
    terminate: bool,
}

impl Default for FdtBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FdtBuilder {
    pub fn new() -> Self {
        Self {
            structure: Vec::new(),
            strings: Vec::new(),
            reservations: Vec::new(),
            version: 17,
            last_comp_version: 16,
            terminate: true,
        }
    }

    pub fn version(&mut self, version: u32, last_comp_version: u32) -> &mut Self {
        self.version = version;
        self.last_comp_version = last_comp_version;
        self
    }

    /// Leave out the final END token.
    pub fn without_end(&mut self) -> &mut Self {
        self.terminate = false;
        self
    }

    pub fn reserve(&mut self, address: u64, size: u64) -> &mut Self {
        self.reservations.push((address, size));
        self
    }

    pub fn begin_node(&mut self, name: &str) -> &mut Self {
        self.token(FDT_BEGIN_NODE);
        self.structure.extend_from_slice(name.as_bytes());
        self.structure.push(0);
        self.pad();
        self
    }

    pub fn end_node(&mut self) -> &mut Self {
        self.token(FDT_END_NODE)
    }

    pub fn nop(&mut self) -> &mut Self {
        self.token(FDT_NOP)
    }

    /// Any token word, known or not.
    pub fn token(&mut self, token: u32) -> &mut Self {
        self.structure.extend_from_slice(&token.to_be_bytes());
        self
    }

    pub fn property(&mut self, name: &str, value: &[u8]) -> &mut Self {
        let name_offset = self.string_offset(name);
        self.token(FDT_PROP);
        self.token(value.len() as u32);
        self.token(name_offset);
        self.structure.extend_from_slice(value);
        self.pad();
        self
    }

    /// String property, NUL appended.
    pub fn property_str(&mut self, name: &str, value: &str) -> &mut Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.property(name, &bytes)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut structure = self.structure.clone();
        if self.terminate {
            structure.extend_from_slice(&FDT_END.to_be_bytes());
        }

        let reservations_offset = HEADER_SIZE;
        let struct_offset = reservations_offset + 16 * (self.reservations.len() + 1);
        let strings_offset = struct_offset + structure.len();
        let total = strings_offset + self.strings.len();

        let mut blob = Vec::with_capacity(total);
        for word in [
            FDT_MAGIC,
            total as u32,
            struct_offset as u32,
            strings_offset as u32,
            reservations_offset as u32,
            self.version,
            self.last_comp_version,
            0,
            self.strings.len() as u32,
            structure.len() as u32,
        ] {
            blob.extend_from_slice(&word.to_be_bytes());
        }
        for &(address, size) in self.reservations.iter().chain([(0, 0)].iter()) {
            blob.extend_from_slice(&address.to_be_bytes());
            blob.extend_from_slice(&size.to_be_bytes());
        }
        blob.extend_from_slice(&structure);
        blob.extend_from_slice(&self.strings);
        blob
    }

    fn string_offset(&mut self, name: &str) -> u32 {
        let mut offset = 0;
        for existing in self.strings.split(|&b| b == 0) {
            if existing == name.as_bytes() && offset < self.strings.len() {
                return offset as u32;
            }
            offset += existing.len() + 1;
        }
        let offset = self.strings.len();
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);
        offset as u32
    }

    fn pad(&mut self) {
        while self.structure.len() % 4 != 0 {
            self.structure.push(0);
        }
    }
}

/// Overwrite header word `index`.
pub fn set_field(blob: &mut [u8], index: usize, value: u32) {
    blob[index * 4..index * 4 + 4].copy_from_slice(&value.to_be_bytes());
}

/// A Raspberry Pi 3 style tree with a command line.
pub fn rpi3_blob(bootargs: &str) -> Vec<u8> {
    FdtBuilder::new()
        .reserve(0x0, 0x1000)
        .begin_node("")
        .property_str("compatible", "raspberrypi,3-model-b")
        .property("#address-cells", &1u32.to_be_bytes())
        .begin_node("chosen")
        .property_str("bootargs", bootargs)
        .end_node()
        .begin_node("soc")
        .begin_node("serial@7e201000")
        .property_str("compatible", "arm,pl011")
        .end_node()
        .begin_node("serial@7e215040")
        .property_str("compatible", "brcm,bcm2835-aux-uart")
        .property_str("status", "okay")
        .end_node()
        .end_node()
        .end_node()
        .build()
}
