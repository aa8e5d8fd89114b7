use smcprims::ClientConfig;

use crate::cmd::{open_client, FansArgs};
use crate::exit::{smc_error, CliResult, SUCCESS};
use crate::output::{print_fans, OutputFormat};

pub fn run(_args: FansArgs, format: OutputFormat, config: ClientConfig) -> CliResult<i32> {
    let mut client = open_client(config)?;
    let fans = client.fans().map_err(|err| smc_error("fan report failed", err))?;
    print_fans(&fans, format);
    Ok(SUCCESS)
}
