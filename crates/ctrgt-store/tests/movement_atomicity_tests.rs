// Integration tests for the stock movement transaction

use ctrgt_core::errors::ExErrorKind;
use ctrgt_core::model::{FieldValue, Record};
use ctrgt_core::registry::EntityRegistry;
use ctrgt_store::db::open_in_memory;
use ctrgt_store::{MovementRepo, RecordRepo};
use rusqlite::Connection;

fn seed_product(conn: &Connection, id: &str, stock: i64) {
    let inventory = EntityRegistry::standard().inventory();
    RecordRepo::insert(
        conn,
        inventory,
        &Record::new()
            .with("id", id)
            .with("name", "Bolt")
            .with("currentStock", stock)
            .with("minStock", 0_i64)
            .with("createdAt", "2026-01-01T00:00:00.000Z"),
    )
    .unwrap();
}

fn stock_of(conn: &Connection, id: &str) -> i64 {
    conn.query_row(
        "SELECT currentStock FROM inventory WHERE id = ?1",
        [id],
        |row| row.get(0),
    )
    .unwrap()
}

fn movement(id: &str, product_id: &str, qty: i64, tipo: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("productId", product_id)
        .with("qty", qty)
        .with("tipo", tipo)
}

#[test]
fn test_movement_updates_stock_and_appends_ledger() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    seed_product(&conn, "inve_1", 10);

    MovementRepo::apply(
        &mut conn,
        registry.inventory(),
        registry.movements(),
        "inve_1",
        -3,
        &movement("move_1", "inve_1", 3, "output"),
    )
    .unwrap();

    assert_eq!(stock_of(&conn, "inve_1"), 7);
    let ledger = RecordRepo::list(&conn, registry.movements()).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].get("qty"), Some(&FieldValue::Integer(3)));
}

#[test]
fn test_unknown_product_writes_nothing() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();

    let err = MovementRepo::apply(
        &mut conn,
        registry.inventory(),
        registry.movements(),
        "inve_missing",
        5,
        &movement("move_1", "inve_missing", 5, "input"),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.record_id(), Some("inve_missing"));
    assert_eq!(RecordRepo::count(&conn, registry.movements()).unwrap(), 0);
}

#[test]
fn test_failed_ledger_insert_rolls_back_stock() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    seed_product(&conn, "inve_1", 10);
    conn.execute_batch(
        "CREATE TRIGGER reject_ledger BEFORE INSERT ON input_and_output_products
         BEGIN SELECT RAISE(ABORT, 'ledger unavailable'); END;",
    )
    .unwrap();

    let err = MovementRepo::apply(
        &mut conn,
        registry.inventory(),
        registry.movements(),
        "inve_1",
        4,
        &movement("move_1", "inve_1", 4, "input"),
    )
    .unwrap_err();

    assert!(err.message().contains("ledger unavailable"));
    assert_eq!(stock_of(&conn, "inve_1"), 10);
    assert_eq!(RecordRepo::count(&conn, registry.movements()).unwrap(), 0);
}

#[test]
fn test_duplicate_movement_id_rolls_back_stock() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    seed_product(&conn, "inve_1", 10);

    MovementRepo::apply(
        &mut conn,
        registry.inventory(),
        registry.movements(),
        "inve_1",
        2,
        &movement("move_1", "inve_1", 2, "input"),
    )
    .unwrap();

    let err = MovementRepo::apply(
        &mut conn,
        registry.inventory(),
        registry.movements(),
        "inve_1",
        2,
        &movement("move_1", "inve_1", 2, "input"),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Conflict);
    assert_eq!(stock_of(&conn, "inve_1"), 12);
}

#[test]
fn test_stock_may_go_negative() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    seed_product(&conn, "inve_1", 1);

    MovementRepo::apply(
        &mut conn,
        registry.inventory(),
        registry.movements(),
        "inve_1",
        -5,
        &movement("move_1", "inve_1", 5, "output"),
    )
    .unwrap();

    assert_eq!(stock_of(&conn, "inve_1"), -4);
}
