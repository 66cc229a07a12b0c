//! Database initialization

use crate::commands::{print_json, CliResult};
use crate::GlobalArgs;
use ctrgt_engine::Backend;

pub fn execute(global: &GlobalArgs) -> CliResult {
    let backend = Backend::open(&global.store_config())?;
    backend.close()?;
    print_json(&serde_json::json!({
        "message": "Database ready",
        "db": global.db.display().to_string(),
    }))
}
