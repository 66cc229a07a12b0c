//! Backup and restore subcommands

use crate::commands::{print_json, run, CliResult};
use crate::GlobalArgs;
use clap::Args;
use ctrgt_core::errors::ExError;
use ctrgt_core::model::Snapshot;
use ctrgt_engine::{Backend, EngineCommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Write the snapshot here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Snapshot file produced by `backup`
    #[arg(long)]
    pub file: PathBuf,
}

pub fn backup(global: &GlobalArgs, args: BackupArgs) -> CliResult {
    let Some(out) = args.out else {
        return run(global, EngineCommand::SnapshotDump);
    };

    let mut backend = Backend::open(&global.store_config())?;
    let snapshot = backend.dump();
    backend.close()?;
    let snapshot = snapshot?;

    std::fs::write(&out, serde_json::to_string_pretty(&snapshot)?)
        .map_err(|e| ExError::from(e).with_op("write_backup"))?;
    let rows: usize = snapshot.values().map(Vec::len).sum();
    print_json(&serde_json::json!({
        "message": "Backup written",
        "file": out.display().to_string(),
        "rows": rows,
    }))
}

pub fn restore(global: &GlobalArgs, args: RestoreArgs) -> CliResult {
    let contents = std::fs::read_to_string(&args.file)
        .map_err(|e| ExError::from(e).with_op("read_backup"))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .map_err(|e| ExError::from(e).with_op("parse_backup"))?;
    run(global, EngineCommand::SnapshotRestore(snapshot))
}
