//! Interactive command shell.
//!
//! The shell reads one line at a time from a [`Transport`], splits it into
//! tokens and runs the command named by the first token. Everything lives in
//! fixed storage: the line buffer holds `LINE` bytes, the argument vector
//! `ARGS` tokens and the registry [`MAX_COMMANDS`] commands.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Line Reader   │───▶│   Tokenizer     │───▶│   Registry      │
//! │   (bounded)     │    │   (in place)    │    │   (dispatch)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!          │                       │                       │
//!          ▼                       ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Overlong line │    │   Too many      │    │   Handler /     │
//! │   diagnostics   │    │   tokens        │    │   unknown cmd   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Session
//!
//! ```text
//! > help
//! List of available commands:
//! - "help": list the available commands.
//! - "echo": print each of its arguments.
//! - "hexdump": dump memory starting at ARG1 for ARG2 bytes.
//! > echo a   b
//! a
//! b
//! > frobnicate
//! Error: unknown command "frobnicate".
//! Use command "help" to get a list of commands.
//! ```
//!
//! # Custom Commands
//!
//! ```rust
//! use fwshell::config::ConsoleConfig;
//! use fwshell::printf;
//! use fwshell::serial::SerialPort;
//! use fwshell::shell::memory::SliceMemory;
//! use fwshell::shell::registry::{Command, CommandResult, Context, ExitStatus};
//! use fwshell::shell::Shell;
//!
//! fn version(ctx: &mut Context<'_>, _argc: usize, _argv: &[&str]) -> CommandResult {
//!     printf!(ctx.out, "fwshell %s\n", "0.1.0")?;
//!     Ok(ExitStatus::SUCCESS)
//! }
//!
//! struct Null;
//!
//! impl SerialPort for Null {
//!     fn can_write(&mut self) -> bool { true }
//!     fn write_data(&mut self, _byte: u8) {}
//!     fn can_read(&mut self) -> bool { false }
//!     fn read_data(&mut self) -> u8 { 0 }
//! }
//!
//! let mut shell: Shell<_, _> =
//!     Shell::new(Null, SliceMemory::new(0, &[]), ConsoleConfig::default()).unwrap();
//! shell.register(Command::new("version", "print the firmware version", version)).unwrap();
//! assert!(shell.registry().find("version").is_some());
//! ```

/// Built-in commands.
pub mod commands;
/// Memory access for inspection commands.
pub mod memory;
/// Command descriptors, registry and dispatch.
pub mod registry;
/// Command line tokenizer.
pub mod tokenizer;

use crate::config::{ConfigError, ConsoleConfig};
use crate::format;
use crate::serial::{self, LineBuffer, SerialPort, Transport, Write};

use memory::Memory;
use registry::{Command, Dispatch, ExitStatus, Registry, RegistryError};
use tokenizer::{Argv, DELIMITERS};

/// Maximum number of commands a shell can hold, built-ins included.
pub const MAX_COMMANDS: usize = 16;

/// Errors that end a shell iteration early.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The transport failed.
    Serial(serial::Error),
    /// Output could not be formatted.
    Format(format::Error),
}

impl From<serial::Error> for Error {
    fn from(error: serial::Error) -> Self {
        Error::Serial(error)
    }
}

impl From<format::Error> for Error {
    fn from(error: format::Error) -> Self {
        match error {
            format::Error::Io(e) => Error::Serial(e),
            other => Error::Format(other),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Serial(e) => defmt::write!(f, "Serial({})", e),
            Error::Format(e) => defmt::write!(f, "Format({})", e),
        }
    }
}

/// What one shell iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line held no tokens.
    Empty,
    /// The line did not fit; `length` characters were discarded.
    LineTooLong {
        /// Characters on the line, newline excluded.
        length: usize,
    },
    /// The line was not 7-bit ASCII.
    InvalidText,
    /// The line held more tokens than allowed.
    TooManyTokens {
        /// Tokens on the line.
        count: usize,
    },
    /// No command matched the first token.
    UnknownCommand,
    /// A command ran.
    Completed(ExitStatus),
}

/// Line-oriented shell over a serial port.
///
/// `LINE` is the line buffer size in bytes (NUL included) and `ARGS` the
/// number of tokens a command can receive. The configured limits may be
/// lower than these but never higher.
#[derive(Debug)]
pub struct Shell<P, M, const LINE: usize = 80, const ARGS: usize = 10> {
    transport: Transport<P>,
    memory: M,
    registry: Registry<MAX_COMMANDS>,
    config: ConsoleConfig,
    line: LineBuffer<LINE>,
}

impl<P: SerialPort, M: Memory, const LINE: usize, const ARGS: usize> Shell<P, M, LINE, ARGS> {
    /// Shell with the built-in commands, configured by `config`.
    pub fn new(port: P, memory: M, config: ConsoleConfig) -> Result<Self, ConfigError> {
        config.validate(LINE, ARGS)?;

        let mut transport = Transport::new(port);
        transport.set_echo(config.echo);
        transport.set_poll_limit(config.poll_limit);

        Ok(Self {
            transport,
            memory,
            registry: Registry::with_builtins(),
            line: LineBuffer::with_capacity(config.line_capacity),
            config,
        })
    }

    /// Add a command after the existing ones.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        self.registry.register(command)
    }

    /// Registered commands.
    pub fn registry(&self) -> &Registry<MAX_COMMANDS> {
        &self.registry
    }

    /// Active configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// The serial transport.
    pub fn transport(&self) -> &Transport<P> {
        &self.transport
    }

    /// The serial transport, mutably. Useful to print before [`run`](Self::run).
    pub fn transport_mut(&mut self) -> &mut Transport<P> {
        &mut self.transport
    }

    /// Memory seen by inspection commands.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Prompt, read one line and act on it.
    pub fn step(&mut self) -> Result<Outcome, Error> {
        self.transport.write_str(self.config.prompt())?;
        self.line.fill(&mut self.transport)?;
        if !self.line.is_complete() {
            return self.discard_long_line();
        }

        let argv: Argv<'_, ARGS> = match tokenizer::split(self.line.as_mut_bytes(), DELIMITERS) {
            Ok(argv) => argv,
            Err(tokenizer::Error::InvalidText) => {
                printf!(&mut self.transport, "Error: command line is not valid ASCII.\n")?;
                return Ok(Outcome::InvalidText);
            }
        };

        let argc = argv.argc();
        if argc == 0 {
            return Ok(Outcome::Empty);
        }
        if argc > self.config.max_args {
            printf!(&mut self.transport, "Error: command formed of %i tokens.\n", argc)?;
            printf!(&mut self.transport, "You cannot use more than %i.\n", self.config.max_args)?;
            return Ok(Outcome::TooManyTokens { count: argc });
        }

        match self.registry.dispatch(&mut self.transport, &self.memory, argv.as_slice())? {
            Dispatch::Unknown => {
                let name = argv.command().unwrap_or_default();
                printf!(&mut self.transport, "Error: unknown command \"%s\".\n", name)?;
                printf!(&mut self.transport, "Use command \"help\" to get a list of commands.\n")?;
                Ok(Outcome::UnknownCommand)
            }
            Dispatch::Completed(status) => {
                if !status.is_success() {
                    printf!(&mut self.transport, "**Command exited with status %i.**\n", status.code())?;
                }
                Ok(Outcome::Completed(status))
            }
        }
    }

    /// Run the shell forever. Transport and output errors are logged and the
    /// next iteration starts.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.step() {
                warn!("shell iteration failed: {}", e);
            }
        }
    }

    fn discard_long_line(&mut self) -> Result<Outcome, Error> {
        let mut total = self.line.len();
        while !self.line.is_complete() {
            total += self.line.fill(&mut self.transport)?;
        }

        let length = total.saturating_sub(1);
        let limit = self.line.capacity().saturating_sub(2);
        printf!(&mut self.transport, "Error: command line formed of %i characters.\n", length)?;
        printf!(&mut self.transport, "You cannot use more than %i.\n", limit)?;
        Ok(Outcome::LineTooLong { length })
    }
}
