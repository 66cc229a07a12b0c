//! CtrGT CLI
//!
//! Operator interface for the records backend. Every subcommand opens the
//! database, runs one engine command and prints the result as JSON.

use clap::{Args, Parser, Subcommand};
use ctrgt_core::logging_facility::{self, Profile};
use ctrgt_store::{DumpMode, StoreConfig};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ctrgt")]
#[command(about = "CtrGT - Records, stock and backup management", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "CTRGT_DB", default_value = "ctrgt.db")]
    pub db: PathBuf,

    /// Log profile (development | production)
    #[arg(long, global = true, env = "CTRGT_LOG_PROFILE", default_value = "production")]
    pub log: Profile,

    /// Read all collections in one transaction when backing up
    #[arg(long, global = true)]
    pub consistent_dump: bool,
}

impl GlobalArgs {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            dump_mode: if self.consistent_dump {
                DumpMode::SingleTransaction
            } else {
                DumpMode::CollectionAtATime
            },
            ..StoreConfig::file(&self.db)
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database and schema if missing
    Init,
    /// List every record of a collection
    List(commands::records::ListArgs),
    /// Create a record from a JSON object
    Create(commands::records::CreateArgs),
    /// Rewrite fields of one record
    Update(commands::records::UpdateArgs),
    /// Delete one record
    Delete(commands::records::DeleteArgs),
    /// Record a stock movement
    Movement(commands::movement::MovementArgs),
    /// Write a JSON snapshot of every collection
    Backup(commands::backup::BackupArgs),
    /// Replace collections from a JSON snapshot
    Restore(commands::backup::RestoreArgs),
    /// User registration and login
    User(commands::user::UserArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.global.log);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli.global),
        Commands::List(args) => commands::records::list(&cli.global, args),
        Commands::Create(args) => commands::records::create(&cli.global, args),
        Commands::Update(args) => commands::records::update(&cli.global, args),
        Commands::Delete(args) => commands::records::delete(&cli.global, args),
        Commands::Movement(args) => commands::movement::execute(&cli.global, args),
        Commands::Backup(args) => commands::backup::backup(&cli.global, args),
        Commands::Restore(args) => commands::backup::restore(&cli.global, args),
        Commands::User(args) => commands::user::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
