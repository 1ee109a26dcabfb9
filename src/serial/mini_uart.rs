//! BCM2837 auxiliary mini UART.
//!
//! Only the register programming lives here. Routing GPIO 14/15 to the mini
//! UART (ALT5) and enabling the AUX block are board setup and happen before
//! [`MiniUart::init`] is called.

use super::SerialPort;

/// Physical address of the mini UART register block on BCM2837.
pub const BCM2837_MINI_UART: usize = 0x3f21_5040;

const LSR_DATA_READY: u32 = 1 << 0;
const LSR_TX_EMPTY: u32 = 1 << 5;

const CNTL_RX_ENABLE: u32 = 1 << 0;
const CNTL_TX_ENABLE: u32 = 1 << 1;

const LCR_8BIT: u32 = 3;
const IIR_CLEAR_FIFOS: u32 = 6;

#[derive(Clone, Copy)]
#[repr(usize)]
enum Register {
    Io = 0x00,
    Ier = 0x04,
    Iir = 0x08,
    Lcr = 0x0c,
    Mcr = 0x10,
    Lsr = 0x14,
    Cntl = 0x20,
    Baud = 0x28,
}

/// Mini UART register block.
#[derive(Debug)]
pub struct MiniUart {
    base: usize,
}

impl MiniUart {
    /// Baud divisor for 115200 baud with the 250 MHz core clock.
    pub const DIVISOR_115200: u32 = 270;

    /// Driver for the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of a mini UART register block (or memory
    /// laid out like one) that stays valid and is not driven by anything else
    /// for the lifetime of the driver.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Program 8-bit mode, interrupts off, FIFOs cleared and the given baud
    /// divisor, then enable the transmitter and receiver.
    pub fn init(&mut self, baud_divisor: u32) {
        self.write(Register::Cntl, 0);
        self.write(Register::Lcr, LCR_8BIT);
        self.write(Register::Mcr, 0);
        self.write(Register::Ier, 0);
        self.write(Register::Iir, IIR_CLEAR_FIFOS);
        self.write(Register::Baud, baud_divisor);
        self.write(Register::Cntl, CNTL_RX_ENABLE | CNTL_TX_ENABLE);
        debug!("mini uart at {=usize:#x} enabled, divisor {=u32}", self.base, baud_divisor);
    }

    fn register(&self, register: Register) -> *mut u32 {
        (self.base + register as usize) as *mut u32
    }

    fn read(&self, register: Register) -> u32 {
        // SAFETY: `new` requires `base` to point at a live register block.
        unsafe { core::ptr::read_volatile(self.register(register)) }
    }

    fn write(&mut self, register: Register, value: u32) {
        // SAFETY: `new` requires `base` to point at a live register block.
        unsafe { core::ptr::write_volatile(self.register(register), value) }
    }
}

impl SerialPort for MiniUart {
    fn can_write(&mut self) -> bool {
        self.read(Register::Lsr) & LSR_TX_EMPTY != 0
    }

    fn write_data(&mut self, byte: u8) {
        self.write(Register::Io, u32::from(byte));
    }

    fn can_read(&mut self) -> bool {
        self.read(Register::Lsr) & LSR_DATA_READY != 0
    }

    fn read_data(&mut self) -> u8 {
        (self.read(Register::Io) & 0xff) as u8
    }
}
