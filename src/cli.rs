//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments of
//! the compiler.

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for the Jack compiler.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The path to a .jack source file or to a directory of .jack files.
    #[arg(index = 1)]
    pub path: std::path::PathBuf,

    /// Whether to also dump the token stream of each file (for debugging).
    #[arg(long)]
    pub dump_tokens: bool,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of the compiler.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// A log level, where also warnings are logged.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the compiler, e.g.,
    /// which files are compiled.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the compiler.
    #[value(alias("3"))]
    Debug,

    /// Log extra information, including non-important errors.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
