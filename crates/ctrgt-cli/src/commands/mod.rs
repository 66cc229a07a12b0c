//! Subcommand implementations

pub mod backup;
pub mod init;
pub mod movement;
pub mod records;
pub mod user;

use crate::GlobalArgs;
use ctrgt_core::errors::ExError;
use ctrgt_core::model::Record;
use ctrgt_engine::{Backend, EngineCommand, EngineCommandResult};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the backend, apply one command, print the result and close
pub fn run(global: &GlobalArgs, cmd: EngineCommand) -> CliResult {
    print_json(&execute(global, cmd)?)
}

/// Open the backend, apply one command and close
pub fn execute(
    global: &GlobalArgs,
    cmd: EngineCommand,
) -> Result<EngineCommandResult, Box<dyn std::error::Error>> {
    let mut backend = Backend::open(&global.store_config())?;
    let result = backend.apply(cmd);
    backend.close()?;
    Ok(result?)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a `--data` argument into a record
pub fn parse_record(data: &str) -> Result<Record, Box<dyn std::error::Error>> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| ExError::from(e).with_op("parse_data"))?;
    Ok(Record::from_json(value)?)
}
