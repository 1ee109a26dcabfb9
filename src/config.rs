//! Runtime console configuration.
//!
//! The defaults match the historical console: prompt `"> "`, 80-byte lines,
//! 10 tokens, local echo on and unbounded polling. A configuration can be
//! baked in as JSON and loaded with [`ConsoleConfig::from_json`]; missing
//! fields keep their defaults.
//!
//! ```rust
//! use fwshell::config::ConsoleConfig;
//!
//! let config = ConsoleConfig::from_json(br#"{"prompt":"rpi3> ","echo":false}"#).unwrap();
//! assert_eq!(config.prompt(), "rpi3> ");
//! assert!(!config.echo);
//! assert_eq!(config.line_capacity, 80);
//! ```

use heapless::String;
use serde::{Deserialize, Serialize};

/// Longest prompt a configuration can hold.
pub const MAX_PROMPT_LEN: usize = 16;

/// Default prompt.
pub const DEFAULT_PROMPT: &str = "> ";

/// Default line buffer size, NUL included.
pub const DEFAULT_LINE_CAPACITY: usize = 80;

/// Default maximum number of tokens per command line.
pub const DEFAULT_MAX_ARGS: usize = 10;

/// Smallest usable line capacity: one character, the newline and the NUL.
pub const MIN_LINE_CAPACITY: usize = 3;

/// Configuration errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    /// `line_capacity` is below [`MIN_LINE_CAPACITY`] or above the line storage.
    LineCapacity,
    /// `max_args` is zero or above the argument storage.
    ArgumentCount,
    /// The JSON text could not be parsed.
    Parse,
    /// The output buffer is too small for the JSON text.
    Encode,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::LineCapacity => defmt::write!(f, "LineCapacity"),
            ConfigError::ArgumentCount => defmt::write!(f, "ArgumentCount"),
            ConfigError::Parse => defmt::write!(f, "Parse"),
            ConfigError::Encode => defmt::write!(f, "Encode"),
        }
    }
}

/// Console settings applied when a shell is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Printed before every line is read.
    pub prompt: String<MAX_PROMPT_LEN>,
    /// Line buffer size in bytes, NUL included.
    pub line_capacity: usize,
    /// Maximum number of tokens, command name included.
    pub max_args: usize,
    /// Echo received bytes back.
    pub echo: bool,
    /// Give up waiting for the port after this many polls.
    pub poll_limit: Option<u32>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let mut prompt = String::new();
        let _ = prompt.push_str(DEFAULT_PROMPT);
        Self {
            prompt,
            line_capacity: DEFAULT_LINE_CAPACITY,
            max_args: DEFAULT_MAX_ARGS,
            echo: true,
            poll_limit: None,
        }
    }
}

impl ConsoleConfig {
    /// Parse a JSON object. Absent fields take their default.
    pub fn from_json(json: &[u8]) -> Result<Self, ConfigError> {
        let (config, _) = serde_json_core::from_slice::<Self>(json).map_err(|_| {
            warn!("console configuration is not valid JSON");
            ConfigError::Parse
        })?;
        Ok(config)
    }

    /// Write the configuration as JSON into `buf`, returning the length.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, ConfigError> {
        serde_json_core::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Check the limits against the storage a shell provides.
    pub fn validate(&self, line_storage: usize, arg_storage: usize) -> Result<(), ConfigError> {
        if self.line_capacity < MIN_LINE_CAPACITY || self.line_capacity > line_storage {
            return Err(ConfigError::LineCapacity);
        }
        if self.max_args == 0 || self.max_args > arg_storage {
            return Err(ConfigError::ArgumentCount);
        }
        Ok(())
    }
}
