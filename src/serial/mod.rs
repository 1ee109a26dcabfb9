//! Polled serial transport for bring-up consoles.
//!
//! The console talks to exactly one serial link. The link is modelled in two
//! layers:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Line Reader   │───▶│   Transport     │───▶│   SerialPort    │
//! │   / Formatter   │    │ (CR/LF, echo,   │    │ (status flags,  │
//! │                 │◀───│  poll limit)    │◀───│  data register) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! [`SerialPort`] is the hardware boundary: it only reports readiness and
//! moves single bytes. [`Transport`] adds the line discipline the console
//! relies on and implements the byte-level [`Read`] and [`Write`] traits used
//! by the rest of the crate.
//!
//! Everything is busy-polled. A port that never becomes ready blocks forever
//! unless a poll limit is set, in which case the wait ends with
//! [`Error::Timeout`].

#![deny(unsafe_code)]

/// Common error types for serial operations
pub mod error;

/// Bounded line reader.
pub mod line;

/// BCM2837 auxiliary mini UART driver.
#[allow(unsafe_code)]
pub mod mini_uart;

pub use error::Error;
pub use line::{LineBuffer, read_line};

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Read, SerialPort, Write};
}

/// Hardware side of a serial link.
///
/// Implementations expose the raw status flags and data register of a UART.
/// None of the methods block.
pub trait SerialPort {
    /// Whether the transmitter can accept one more byte.
    fn can_write(&mut self) -> bool;
    /// Put one byte in the transmitter. Only called after [`can_write`](Self::can_write) returned `true`.
    fn write_data(&mut self, byte: u8);
    /// Whether at least one received byte is waiting.
    fn can_read(&mut self) -> bool;
    /// Take one received byte. Only called after [`can_read`](Self::can_read) returned `true`.
    fn read_data(&mut self) -> u8;
}

/// Byte source.
pub trait Read {
    /// Block until one byte is available and return it.
    fn read_byte(&mut self) -> Result<u8, Error>;
}

/// Byte sink.
pub trait Write {
    /// Write one byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Error>;

    /// Write every byte of `bytes` in order.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Write a string.
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.write_bytes(s.as_bytes())
    }
}

/// Captures output in a fixed-capacity buffer, byte for byte.
impl<const N: usize> Write for heapless::Vec<u8, N> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.push(byte).map_err(|_| Error::BufferFull)
    }
}

/// Line discipline over a [`SerialPort`].
///
/// - writing `\n` sends `\r\n`,
/// - a received `\r` is returned as `\n`,
/// - with echo enabled, every received byte is written back before it is
///   returned,
/// - with a poll limit, waiting for the port gives up after that many polls.
///
/// # Examples
///
/// ```rust
/// use fwshell::serial::{Read, SerialPort, Transport, Write};
///
/// struct Loopback(Option<u8>);
///
/// impl SerialPort for Loopback {
///     fn can_write(&mut self) -> bool { self.0.is_none() }
///     fn write_data(&mut self, byte: u8) { self.0 = Some(byte); }
///     fn can_read(&mut self) -> bool { self.0.is_some() }
///     fn read_data(&mut self) -> u8 { self.0.take().unwrap_or(0) }
/// }
///
/// let mut transport = Transport::new(Loopback(None));
/// transport.set_echo(false);
/// transport.write_raw(b'\r').unwrap();
/// assert_eq!(transport.read_byte(), Ok(b'\n'));
/// ```
#[derive(Debug)]
pub struct Transport<P> {
    port: P,
    echo: bool,
    poll_limit: Option<u32>,
}

impl<P: SerialPort> Transport<P> {
    /// Wrap a port with echo enabled and unbounded polling.
    pub fn new(port: P) -> Self {
        Self {
            port,
            echo: true,
            poll_limit: None,
        }
    }

    /// Whether received bytes are echoed back.
    pub fn echo(&self) -> bool {
        self.echo
    }

    /// Enable or disable local echo.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo = enabled;
    }

    /// Maximum number of polls per byte, `None` when unbounded.
    pub fn poll_limit(&self) -> Option<u32> {
        self.poll_limit
    }

    /// Bound (or unbound with `None`) the number of polls per byte.
    pub fn set_poll_limit(&mut self, limit: Option<u32>) {
        self.poll_limit = limit;
    }

    /// Shared access to the underlying port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Exclusive access to the underlying port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Unwrap the underlying port.
    pub fn into_inner(self) -> P {
        self.port
    }

    /// Write one byte without newline translation.
    pub fn write_raw(&mut self, byte: u8) -> Result<(), Error> {
        self.wait(P::can_write)?;
        self.port.write_data(byte);
        Ok(())
    }

    fn wait(&mut self, ready: fn(&mut P) -> bool) -> Result<(), Error> {
        let mut polls: u32 = 0;
        while !ready(&mut self.port) {
            if let Some(limit) = self.poll_limit {
                if polls >= limit {
                    warn!("serial port not ready after {=u32} polls", limit);
                    return Err(Error::Timeout);
                }
                polls += 1;
            }
            core::hint::spin_loop();
        }
        Ok(())
    }
}

impl<P: SerialPort> Write for Transport<P> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        if byte == b'\n' {
            self.write_raw(b'\r')?;
        }
        self.write_raw(byte)
    }
}

impl<P: SerialPort> Read for Transport<P> {
    fn read_byte(&mut self) -> Result<u8, Error> {
        self.wait(P::can_read)?;
        let mut byte = self.port.read_data();
        if byte == b'\r' {
            byte = b'\n';
        }
        if self.echo {
            self.write_byte(byte)?;
        }
        Ok(byte)
    }
}
