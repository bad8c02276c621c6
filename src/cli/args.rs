//! CLI argument definitions for `uniport`

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use uniport::config::ConfigOverrides;
use uniport::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to
/// lowercase strings for config storage and to [`Level`] for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `base_url`,
        /// `output_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Run the interactive portal session.
    ///
    /// This is the default when no subcommand is given: log in, browse
    /// grades, and save offered-course details.
    Session {
        /// Portal base URL (overrides config `base_url`)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Report output directory (overrides config `output_dir`)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

/// Top-level CLI arguments
#[derive(Debug, Parser)]
#[command(name = "uniport", version, about = "University portal registration reports")]
pub struct Cli {
    /// Set the log level for this run
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Write log output to a file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Collect CLI flags into config overrides for this run
    #[must_use]
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let (base_url, output) = match &self.command {
            Some(Command::Session { base_url, output }) => (base_url.clone(), output.clone()),
            _ => (None, None),
        };
        ConfigOverrides {
            level: self.log_level.map(|l| l.to_string()),
            file: self
                .log_file
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            verbose: if self.verbose { Some(true) } else { None },
            base_url,
            output_dir: output.map(|p| p.to_string_lossy().into_owned()),
        }
    }
}
