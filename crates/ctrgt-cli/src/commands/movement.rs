//! Stock movement subcommand

use crate::commands::{parse_record, run, CliResult};
use crate::GlobalArgs;
use clap::Args;
use ctrgt_engine::{EngineCommand, MovementRequest};

#[derive(Debug, Args)]
pub struct MovementArgs {
    /// Movement payload, e.g. {"productId": "inve_…", "qty": 3, "tipo": "input"}
    #[arg(long)]
    pub data: String,
}

pub fn execute(global: &GlobalArgs, args: MovementArgs) -> CliResult {
    let request = MovementRequest::from_record(parse_record(&args.data)?)?;
    run(global, EngineCommand::MovementRecord(request))
}
