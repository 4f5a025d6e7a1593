use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use objwire_codec::Format;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect and send one value.
    Send(SendArgs),
    /// Accept connections and print every value received.
    Serve(ServeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, output: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args),
        Command::Serve(args) => serve::run(args, output),
        Command::Version(args) => version::run(args),
    }
}

/// Payload format names accepted on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Msgpack,
    Json,
    Xml,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Msgpack => Format::MsgPack,
            FormatArg::Json => Format::Json,
            FormatArg::Xml => Format::Xml,
        }
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Host to connect to.
    #[arg(long, env = "OBJWIRE_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port to connect to.
    #[arg(long, env = "OBJWIRE_PORT", default_value = "5000")]
    pub port: u16,
    /// Payload format.
    #[arg(long, short = 'f', value_enum, default_value = "json")]
    pub format: FormatArg,
    /// Value to send, as JSON text. Default: a sample record.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the value to send from a JSON file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Connect, read and write timeout (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "OBJWIRE_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port to bind (0 picks a free port).
    #[arg(long, env = "OBJWIRE_PORT", default_value = "5000")]
    pub port: u16,
    /// Handle a single connection, then exit.
    #[arg(long)]
    pub once: bool,
    /// Drop a connection that stays silent this long (e.g. 30s, 500ms).
    #[arg(long)]
    pub read_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
