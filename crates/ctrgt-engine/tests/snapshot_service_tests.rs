// Integration tests for dump and restore

mod common;

use common::{backend, category, cheap_hasher, product};
use ctrgt_core::errors::ExErrorKind;
use ctrgt_core::model::{FieldValue, Record, Snapshot};
use ctrgt_core_types::Sensitive;
use ctrgt_engine::{Backend, MovementRequest, RegisterRequest};
use ctrgt_store::{DumpMode, StoreConfig};

fn populated() -> Backend {
    let mut backend = backend();
    backend.create("categories", category("Food")).unwrap();
    let product_id = backend
        .create("inventory", product("Bolt", 5))
        .unwrap()
        .id()
        .unwrap();
    backend
        .record_movement(MovementRequest::new(&product_id, 2, "input"))
        .unwrap();
    backend
        .register(RegisterRequest::new("ana", "s3cret").with_group("admin"))
        .unwrap();
    backend
}

fn strip_user_ids(snapshot: &mut Snapshot) {
    if let Some(users) = snapshot.get_mut("users") {
        for user in users {
            user.remove("id");
        }
    }
}

#[test]
fn test_dump_excludes_credentials() {
    let mut backend = populated();

    let snapshot = backend.dump().unwrap();

    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot["users"].len(), 1);
    assert!(!snapshot["users"][0].contains_key("password_hash"));
    assert_eq!(snapshot["input_and_output_products"].len(), 1);
}

#[test]
fn test_dump_then_restore_reproduces_records() {
    let mut source = populated();
    let snapshot = source.dump().unwrap();

    let mut target = backend();
    target.create("categories", category("Stale")).unwrap();
    let ack = target.restore(snapshot.clone()).unwrap();
    assert_eq!(ack.restored["categories"], 1);

    let mut restored = target.dump().unwrap();
    let mut expected = snapshot;
    strip_user_ids(&mut restored);
    strip_user_ids(&mut expected);
    assert_eq!(restored, expected);

    let user = &target.dump().unwrap()["users"][0];
    assert_eq!(user.get("username"), Some(&FieldValue::from("ana")));
    assert_eq!(user.get("user_group"), Some(&FieldValue::from("admin")));
    assert_eq!(user.get("is_active"), Some(&FieldValue::Integer(1)));
}

#[test]
fn test_restored_users_get_default_password() {
    let mut source = populated();
    let snapshot = source.dump().unwrap();

    let mut target = backend();
    target.restore(snapshot).unwrap();

    assert!(target
        .authenticate("ana", &Sensitive::from("123456"))
        .is_ok());
    assert!(target
        .authenticate("ana", &Sensitive::from("s3cret"))
        .is_err());
}

#[test]
fn test_restore_with_bad_row_loses_no_data() {
    let mut backend = populated();
    let before = backend.dump().unwrap();

    let mut snapshot = Snapshot::new();
    snapshot.insert("users".to_string(), vec![]);
    snapshot.insert(
        "categories".to_string(),
        vec![
            Record::new()
                .with("id", "cate_ok")
                .with("name", "Ok")
                .with("type", "income"),
            Record::new()
                .with("id", "cate_bad")
                .with("name", "Bad")
                .with("type", "bogus"),
        ],
    );

    let err = backend.restore(snapshot).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.root_kind(), ExErrorKind::Validation);
    assert_eq!(backend.dump().unwrap(), before);
}

#[test]
fn test_restore_rejects_unknown_collection_before_writing() {
    let mut backend = populated();
    let before = backend.dump().unwrap();

    let mut snapshot = Snapshot::new();
    snapshot.insert("categories".to_string(), vec![]);
    snapshot.insert("orders".to_string(), vec![]);

    let err = backend.restore(snapshot).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
    assert_eq!(backend.dump().unwrap(), before);
}

#[test]
fn test_restore_rejects_rows_without_ids() {
    let mut backend = populated();
    let before = backend.dump().unwrap();

    for id in [None, Some(FieldValue::Null), Some(FieldValue::from(""))] {
        let mut row = Record::new().with("name", "Orphan").with("type", "income");
        if let Some(id) = id {
            row.insert("id", id);
        }
        let mut snapshot = Snapshot::new();
        snapshot.insert("categories".to_string(), vec![row]);

        let err = backend.restore(snapshot).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Validation);
        assert_eq!(err.collection(), Some("categories"));
        assert_eq!(backend.dump().unwrap(), before);
    }
}

#[test]
fn test_single_transaction_dump_matches_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("ctrgt.db");

    let mut default_mode = Backend::open_with_hasher(
        &StoreConfig::file(&path),
        Box::new(cheap_hasher()),
    )
    .unwrap();
    default_mode.create("categories", category("Food")).unwrap();
    let first = default_mode.dump().unwrap();
    default_mode.close().unwrap();

    let config = StoreConfig {
        dump_mode: DumpMode::SingleTransaction,
        ..StoreConfig::file(&path)
    };
    let mut consistent = Backend::open_with_hasher(&config, Box::new(cheap_hasher())).unwrap();
    assert_eq!(consistent.dump().unwrap(), first);
    consistent.close().unwrap();
}
