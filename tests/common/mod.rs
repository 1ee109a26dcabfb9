#![allow(dead_code)]

pub mod fdt;

use std::collections::VecDeque;

use fwshell::config::ConsoleConfig;
use fwshell::serial::{SerialPort, Transport};
use fwshell::shell::Shell;
use fwshell::shell::memory::SliceMemory;

/// Polls granted to a test port before a wait gives up.
pub const TEST_POLL_LIMIT: u32 = 8;

/// Base address of [`TEST_MEMORY`] in shell tests.
pub const TEST_MEMORY_BASE: u64 = 0x8_0000;

/// 20 bytes mapped at [`TEST_MEMORY_BASE`].
pub static TEST_MEMORY: [u8; 20] = *b"Hello, hexdump!\n\x00\x01\x7f\xff";

/// Serial port fed from a script, recording everything written to it.
#[derive(Debug, Default)]
pub struct ScriptedPort {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    /// `can_write` reports busy this many times before it reports ready.
    pub busy_writes: usize,
    pub read_polls: usize,
}

impl ScriptedPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &[u8]) -> Self {
        let mut port = Self::new();
        port.feed(input);
        port
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> String {
        let text = self.output_str();
        self.output.clear();
        text
    }
}

impl SerialPort for ScriptedPort {
    fn can_write(&mut self) -> bool {
        if self.busy_writes > 0 {
            self.busy_writes -= 1;
            return false;
        }
        true
    }

    fn write_data(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn can_read(&mut self) -> bool {
        self.read_polls += 1;
        !self.input.is_empty()
    }

    fn read_data(&mut self) -> u8 {
        self.input.pop_front().unwrap_or(0)
    }
}

/// Transport over a scripted port, echo off, bounded polling.
pub fn transport(input: &[u8]) -> Transport<ScriptedPort> {
    let mut transport = Transport::new(ScriptedPort::with_input(input));
    transport.set_echo(false);
    transport.set_poll_limit(Some(TEST_POLL_LIMIT));
    transport
}

/// Default limits, echo off, bounded polling.
pub fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        echo: false,
        poll_limit: Some(TEST_POLL_LIMIT),
        ..ConsoleConfig::default()
    }
}

pub type TestShell = Shell<ScriptedPort, SliceMemory<'static>>;

pub fn test_memory() -> SliceMemory<'static> {
    SliceMemory::new(TEST_MEMORY_BASE, &TEST_MEMORY)
}

/// Shell with default storage and [`test_config`], fed `input`.
pub fn shell(input: &[u8]) -> TestShell {
    shell_with(input, test_config())
}

pub fn shell_with(input: &[u8], config: ConsoleConfig) -> TestShell {
    Shell::new(ScriptedPort::with_input(input), test_memory(), config).unwrap()
}

/// Everything the shell has written so far, cleared afterwards.
pub fn take_output(shell: &mut TestShell) -> String {
    shell.transport_mut().port_mut().take_output()
}
