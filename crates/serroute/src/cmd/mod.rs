use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod send;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a device and print routed commands and data lines.
    Watch(WatchArgs),
    /// Send a single command line.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Wire delimiter, named rather than escaped on the command line.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum DelimiterArg {
    Lf,
    Crlf,
    Cr,
}

impl DelimiterArg {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            DelimiterArg::Lf => b"\n",
            DelimiterArg::Crlf => b"\r\n",
            DelimiterArg::Cr => b"\r",
        }
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    /// Baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Line delimiter.
    #[arg(long, value_enum, default_value = "lf")]
    pub delimiter: DelimiterArg,
    /// JSON file mapping routing paths to body schemas.
    #[arg(long, value_name = "FILE")]
    pub endpoints: Option<PathBuf>,
    /// Exit after printing N lines.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    /// Baud rate.
    #[arg(long, default_value = "9600")]
    pub baud: u32,
    /// Line delimiter.
    #[arg(long, value_enum, default_value = "lf")]
    pub delimiter: DelimiterArg,
    /// Routing path for the command (e.g. /drive).
    #[arg(long, conflicts_with = "raw")]
    pub path: Option<String>,
    /// Query parameter as key=value; repeatable.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
    /// Send this exact line instead of composing a command.
    #[arg(long, conflicts_with_all = ["path", "params"])]
    pub raw: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
