//! # fwshell - bring-up console for bare-metal boards
//!
//! A small firmware console for single-board computers that runs before any
//! operating system exists. It brings up a polled serial transport, exposes an
//! interactive line-oriented command shell over it, and at boot time extracts
//! the kernel command line from the flattened device tree handed over by the
//! bootloader.
//!
//! ## Features
//!
//! ### Serial transport
//! - **Polled I/O**: busy-waits on the port's ready flags, no interrupts
//! - **Line discipline**: `\n` is sent as `\r\n`, a received `\r` becomes `\n`
//! - **Local echo**: optional, switchable at runtime
//! - **Bounded polling**: optional poll limit that turns a dead line into a
//!   [`serial::Error::Timeout`]
//!
//! ### Formatted output
//! - A `printf`-style interpreter with a fixed directive set (`%s %c %b %h %w %i %%`)
//! - Typed arguments checked against the directives before anything is written
//!
//! ### Command shell
//! - Fixed-capacity line buffer and argument vector, zero allocation
//! - Ordered command registry with `help`, `echo` and `hexdump` built in
//! - Runtime limits from [`config::ConsoleConfig`]
//!
//! ### Device tree
//! - Bounds-checked walk of the flattened device tree structure block
//! - Path based property lookup, `/chosen/bootargs` extraction
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fwshell::config::ConsoleConfig;
//! use fwshell::serial::mini_uart::MiniUart;
//! use fwshell::shell::memory::PhysicalMemory;
//! use fwshell::shell::Shell;
//!
//! // SAFETY: the mini UART registers are mapped at this address on BCM2837.
//! let mut uart = unsafe { MiniUart::new(0x3f21_5040) };
//! uart.init(MiniUart::DIVISOR_115200);
//!
//! // SAFETY: firmware runs identity mapped with no memory protection.
//! let memory = unsafe { PhysicalMemory::new() };
//!
//! let mut shell: Shell<_, _> = Shell::new(uart, memory, ConsoleConfig::default()).unwrap();
//! shell.run();
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging for embedded debugging

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod macros;

/// Polled serial transport, line discipline and line reader.
///
/// Contains the hardware boundary ([`serial::SerialPort`]), the translating
/// [`serial::Transport`] and a reference mini UART driver.
pub mod serial;

/// Constrained `printf`-style output used for all console text.
pub mod format;

/// Unsigned integer parsing with explicit consumption outcomes.
pub mod num;

/// Interactive command shell: tokenizer, registry, built-in commands and loop.
pub mod shell;

/// Flattened device tree (DTB) reader.
pub mod dtb;

/// Boot-time report printed before the shell starts.
pub mod boot;

/// Runtime console configuration.
pub mod config;
