//! Command descriptors, registry and dispatch.

use core::fmt;

use heapless::Vec;

use super::commands::BUILTINS;
use super::memory::Memory;
use crate::format;
use crate::serial::Write;

/// Exit status of a command. Zero is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    /// Status 0.
    pub const SUCCESS: Self = ExitStatus(0);
    /// Status 1, used by the built-ins for bad usage.
    pub const FAILURE: Self = ExitStatus(1);

    /// Whether the status is zero.
    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Raw status code.
    pub fn code(self) -> i32 {
        self.0
    }
}

/// What a handler returns. `Err` only for output failures; bad usage is
/// reported on the console and returned as a nonzero status.
pub type CommandResult = Result<ExitStatus, format::Error>;

/// Command handler: context, argument count, arguments (name first).
pub type CommandFn = fn(&mut Context<'_>, usize, &[&str]) -> CommandResult;

/// What a handler can reach while it runs.
pub struct Context<'a> {
    /// Console output.
    pub out: &'a mut dyn Write,
    /// Every registered command, in registration order.
    pub registry: &'a [Command],
    /// Memory visible to inspection commands.
    pub memory: &'a dyn Memory,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// A named command.
#[derive(Clone, Copy)]
pub struct Command {
    /// Name matched against the first token, case-sensitive.
    pub name: &'static str,
    /// One-line description shown by `help`.
    pub description: &'static str,
    /// Handler.
    pub handler: CommandFn,
}

impl Command {
    /// Describe a command.
    pub const fn new(name: &'static str, description: &'static str, handler: CommandFn) -> Self {
        Self {
            name,
            description,
            handler,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registration errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RegistryError {
    /// The command name is empty.
    EmptyName,
    /// No room for another command.
    Full,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RegistryError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RegistryError::EmptyName => defmt::write!(f, "EmptyName"),
            RegistryError::Full => defmt::write!(f, "Full"),
        }
    }
}

/// Result of dispatching a token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran and returned this status.
    Completed(ExitStatus),
    /// No command has that name.
    Unknown,
}

/// Ordered command table holding up to `N` commands.
///
/// Lookup scans in registration order and the first exact match wins, so a
/// later registration under an existing name is never reached.
#[derive(Debug, Clone)]
pub struct Registry<const N: usize> {
    commands: Vec<Command, N>,
}

impl<const N: usize> Registry<N> {
    /// Empty registry.
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Registry holding `help`, `echo` and `hexdump`.
    pub fn with_builtins() -> Self {
        const { assert!(N >= BUILTINS.len(), "registry too small for the built-in commands") };
        let mut registry = Self::new();
        for command in BUILTINS {
            if registry.commands.push(*command).is_err() {
                break;
            }
        }
        registry
    }

    /// Append a command.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        if command.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        self.commands.push(command).map_err(|_| {
            warn!("no room to register a command");
            RegistryError::Full
        })
    }

    /// First command called `name`.
    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Commands in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Commands in registration order.
    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run the command named by `argv[0]` with `argv`.
    pub fn dispatch(&self, out: &mut dyn Write, memory: &dyn Memory, argv: &[&str]) -> Result<Dispatch, format::Error> {
        let Some(command) = argv.first().and_then(|name| self.find(name)) else {
            return Ok(Dispatch::Unknown);
        };
        debug!("dispatching command with {=usize} arguments", argv.len());

        let mut context = Context {
            out,
            registry: &self.commands,
            memory,
        };
        let status = (command.handler)(&mut context, argv.len(), argv)?;
        Ok(Dispatch::Completed(status))
    }
}

impl<const N: usize> Default for Registry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> IntoIterator for &'a Registry<N> {
    type Item = &'a Command;
    type IntoIter = core::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
