use smcprims::codec::parse_hex;
use smcprims::ClientConfig;
use tracing::info;

use crate::cmd::{open_client, WriteArgs};
use crate::exit::{smc_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_values, KeyValue, OutputFormat};

pub fn run(args: WriteArgs, format: OutputFormat, config: ClientConfig) -> CliResult<i32> {
    // Parse before touching the device.
    let hex = match &args.hex {
        Some(text) => Some(
            parse_hex(text)
                .map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex value: {err}")))?,
        ),
        None => None,
    };

    let mut client = open_client(config)?;
    let written = match (hex, &args.value) {
        (Some(buf), _) => {
            client
                .write_key(args.key, &buf)
                .map_err(|err| smc_error("write failed", err))?;
            buf
        }
        (None, Some(number)) => client
            .write_value(args.key, number)
            .map_err(|err| smc_error("write failed", err))?,
        (None, None) => {
            return Err(CliError::new(DATA_INVALID, "nothing to write"));
        }
    };
    info!(key = %args.key, bytes = %written.to_hex(), "key written");

    let record = client
        .read_key(args.key)
        .map_err(|err| smc_error("read back failed", err))?;
    let value = client.decode(&record);
    print_values(&[KeyValue { record, value }], format);

    Ok(SUCCESS)
}
