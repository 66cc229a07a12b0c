// Integration tests for atomic stock movements

mod common;

use common::{backend, product, stock_of};
use ctrgt_core::errors::ExErrorKind;
use ctrgt_core::model::{FieldValue, Record};
use ctrgt_engine::MovementRequest;

#[test]
fn test_input_movement_adds_stock_and_one_ledger_row() {
    let mut backend = backend();
    let id = backend.create("inventory", product("Bolt", 10)).unwrap().id().unwrap();

    let movement = backend
        .record_movement(MovementRequest::new(&id, 3, "input").with_field("destination", "shelf"))
        .unwrap();

    assert_eq!(stock_of(&backend, &id), 13);
    assert!(movement.id().unwrap().starts_with("move_"));
    assert!(movement.contains_key("date"));

    let ledger = backend.list("movements").unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].get("productId"), Some(&FieldValue::from(id.as_str())));
    assert_eq!(ledger[0].get("destination"), Some(&FieldValue::from("shelf")));
}

#[test]
fn test_output_movement_subtracts_stock() {
    let mut backend = backend();
    let id = backend.create("inventory", product("Bolt", 10)).unwrap().id().unwrap();

    backend
        .record_movement(MovementRequest::new(&id, 4, "output"))
        .unwrap();

    assert_eq!(stock_of(&backend, &id), 6);
}

#[test]
fn test_forced_insert_failure_leaves_stock_untouched() {
    let mut backend = backend();
    let id = backend.create("inventory", product("Bolt", 10)).unwrap().id().unwrap();
    backend
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_ledger BEFORE INSERT ON input_and_output_products
             BEGIN SELECT RAISE(ABORT, 'ledger unavailable'); END;",
        )
        .unwrap();

    let result = backend.record_movement(MovementRequest::new(&id, 3, "input"));

    assert!(result.is_err());
    assert_eq!(stock_of(&backend, &id), 10);
    assert!(backend.list("movements").unwrap().is_empty());
}

#[test]
fn test_unknown_product_is_not_found_and_changes_nothing() {
    let mut backend = backend();
    let id = backend.create("inventory", product("Bolt", 10)).unwrap().id().unwrap();

    let err = backend
        .record_movement(MovementRequest::new("inve_missing", 3, "input"))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(stock_of(&backend, &id), 10);
    assert!(backend.list("movements").unwrap().is_empty());
}

#[test]
fn test_invalid_requests_fail_before_storage() {
    let mut backend = backend();
    let id = backend.create("inventory", product("Bolt", 10)).unwrap().id().unwrap();

    for request in [
        MovementRequest::new(&id, 0, "input"),
        MovementRequest::new(&id, -2, "input"),
        MovementRequest::new("", 1, "input"),
        MovementRequest::new(&id, 1, ""),
    ] {
        let err = backend.record_movement(request).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
    }
    assert_eq!(stock_of(&backend, &id), 10);
}

#[test]
fn test_request_from_payload() {
    let mut backend = backend();
    let id = backend.create("inventory", product("Bolt", 10)).unwrap().id().unwrap();

    let request = MovementRequest::from_record(
        Record::new()
            .with("productId", id.as_str())
            .with("qty", 2.0)
            .with("tipo", "input")
            .with("value", 9.5),
    )
    .unwrap();
    let movement = backend.record_movement(request).unwrap();

    assert_eq!(movement.get("qty"), Some(&FieldValue::Integer(2)));
    assert_eq!(movement.get("value"), Some(&FieldValue::Real(9.5)));
    assert_eq!(stock_of(&backend, &id), 12);
}
