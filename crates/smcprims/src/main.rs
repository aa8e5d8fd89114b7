mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use smcprims::{ClientConfig, DecodeOptions, FixedPointMode};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "smcprims", version, about = "System Management Controller key tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "SMCPRIMS_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "SMCPRIMS_LOG_LEVEL",
        default_value = "warn",
        global = true
    )]
    log_level: LogLevel,

    /// Decode fixed-point values without dropping low fractional bits.
    #[arg(long, env = "SMCPRIMS_EXACT_FP", global = true)]
    exact_fp: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let fixed_point = if self.exact_fp {
            FixedPointMode::Exact
        } else {
            FixedPointMode::Legacy
        };
        ClientConfig {
            decode: DecodeOptions { fixed_point },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = cli.client_config();
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
