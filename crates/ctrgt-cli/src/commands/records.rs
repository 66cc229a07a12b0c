//! Generic record subcommands

use crate::commands::{execute, parse_record, run, CliResult};
use crate::GlobalArgs;
use clap::Args;
use ctrgt_engine::EngineCommand;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Collection name (e.g. categories, inventory, movements)
    pub collection: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub collection: String,

    /// Record fields as a JSON object
    #[arg(long)]
    pub data: String,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub collection: String,

    pub id: String,

    /// Fields to rewrite as a JSON object
    #[arg(long)]
    pub data: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub collection: String,

    pub id: String,
}

pub fn list(global: &GlobalArgs, args: ListArgs) -> CliResult {
    run(
        global,
        EngineCommand::RecordList {
            collection: args.collection,
        },
    )
}

pub fn create(global: &GlobalArgs, args: CreateArgs) -> CliResult {
    let fields = parse_record(&args.data)?;
    run(
        global,
        EngineCommand::RecordCreate {
            collection: args.collection,
            fields,
        },
    )
}

pub fn update(global: &GlobalArgs, args: UpdateArgs) -> CliResult {
    let fields = parse_record(&args.data)?;
    run(
        global,
        EngineCommand::RecordUpdate {
            collection: args.collection,
            id: args.id,
            fields,
        },
    )
}

/// Prints nothing on success
pub fn delete(global: &GlobalArgs, args: DeleteArgs) -> CliResult {
    execute(
        global,
        EngineCommand::RecordDelete {
            collection: args.collection,
            id: args.id,
        },
    )?;
    Ok(())
}
