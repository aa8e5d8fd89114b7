use smcprims::ClientConfig;
use tracing::warn;

use crate::cmd::{open_client, ReadArgs};
use crate::exit::{smc_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_values, KeyValue, OutputFormat};

pub fn run(args: ReadArgs, format: OutputFormat, config: ClientConfig) -> CliResult<i32> {
    let mut client = open_client(config)?;
    let record = client
        .read_key(args.key)
        .map_err(|err| smc_error("read failed", err))?;

    if record.is_empty() {
        warn!(key = %args.key, "device returned no data");
        return Err(CliError::new(
            FAILURE,
            format!("key {} not found or empty", args.key),
        ));
    }

    let value = client.decode(&record);
    print_values(&[KeyValue { record, value }], format);
    Ok(SUCCESS)
}
