#![allow(dead_code)]

use ctrgt_core::credentials::Argon2Hasher;
use ctrgt_core::model::Record;
use ctrgt_engine::Backend;
use ctrgt_store::StoreConfig;

/// In-memory backend with a fast argon2 parameter set
pub fn backend() -> Backend {
    Backend::open_with_hasher(&StoreConfig::in_memory(), Box::new(cheap_hasher())).unwrap()
}

pub fn cheap_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(1024, 1, 1).unwrap()
}

pub fn product(name: &str, stock: i64) -> Record {
    Record::new()
        .with("name", name)
        .with("currentStock", stock)
        .with("minStock", 0_i64)
        .with("unit", "pcs")
}

pub fn category(name: &str) -> Record {
    Record::new().with("name", name).with("type", "expense")
}

pub fn stock_of(backend: &Backend, product_id: &str) -> i64 {
    backend
        .connection()
        .query_row(
            "SELECT currentStock FROM inventory WHERE id = ?1",
            [product_id],
            |row| row.get(0),
        )
        .unwrap()
}
