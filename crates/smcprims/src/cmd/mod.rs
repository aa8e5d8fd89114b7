use clap::{Args, Subcommand};
use smcprims::client::{open_with_config, ClientConfig, SmcClient};
use smcprims::transport::SmcConnection;
use smcprims::Key;

use crate::exit::{smc_error, CliResult};
use crate::output::OutputFormat;

pub mod fans;
pub mod list;
pub mod read;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every key with its decoded value.
    List(ListArgs),
    /// Read one key.
    Read(ReadArgs),
    /// Write one key.
    Write(WriteArgs),
    /// Show fan speeds and modes.
    Fans(FansArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: ClientConfig) -> CliResult<i32> {
    match command {
        Command::List(args) => list::run(args, format, config),
        Command::Read(args) => read::run(args, format, config),
        Command::Write(args) => write::run(args, format, config),
        Command::Fans(args) => fans::run(args, format, config),
        Command::Version(args) => version::run(args),
    }
}

pub(crate) fn open_client(config: ClientConfig) -> CliResult<SmcClient<SmcConnection>> {
    open_with_config(config).map_err(|err| smc_error("open failed", err))
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Four-character key, e.g. TC0P.
    pub key: Key,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Four-character key, e.g. F0Tg.
    pub key: Key,
    /// Raw value as hex pairs, e.g. 1f40.
    #[arg(conflicts_with = "value", required_unless_present = "value")]
    pub hex: Option<String>,
    /// Number encoded according to the key's type.
    #[arg(long, value_name = "NUMBER")]
    pub value: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct FansArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
