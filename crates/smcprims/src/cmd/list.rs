use smcprims::ClientConfig;

use crate::cmd::{open_client, ListArgs};
use crate::exit::{smc_error, CliResult, SUCCESS};
use crate::output::{print_values, KeyValue, OutputFormat};

pub fn run(_args: ListArgs, format: OutputFormat, config: ClientConfig) -> CliResult<i32> {
    let mut client = open_client(config)?;
    let records = client
        .list()
        .map_err(|err| smc_error("list failed", err))?;

    let values: Vec<KeyValue> = records
        .into_iter()
        .filter(|record| !record.is_empty())
        .map(|record| KeyValue {
            value: client.decode(&record),
            record,
        })
        .collect();
    print_values(&values, format);

    Ok(SUCCESS)
}
