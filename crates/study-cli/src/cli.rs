//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "study",
    version,
    about = "Run scripted study sessions",
    long_about = "Run scripted study sessions.\n\n\
                  Drives ghost snapshots, study states and the evaluation log\n\
                  from a command script and writes the session result file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a command script against a session.
    Run(RunArgs),

    /// Write an example session config.
    InitConfig(InitConfigArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Command script, one command per line.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Session config file.
    #[arg(long = "config", value_name = "PATH", default_value = "study.toml")]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct InitConfigArgs {
    /// Where to write the config.
    #[arg(value_name = "PATH", default_value = "study.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long = "force")]
    pub force: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
