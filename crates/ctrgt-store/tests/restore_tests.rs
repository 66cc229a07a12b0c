// Integration tests for snapshot dump and restore

use ctrgt_core::errors::ExErrorKind;
use ctrgt_core::model::{FieldValue, Record};
use ctrgt_core::registry::{EntityRegistry, CATEGORIES, MOVEMENTS, USERS};
use ctrgt_store::db::open_in_memory;
use ctrgt_store::snapshot::{dump_collections, replace_collections};
use ctrgt_store::{DumpMode, RecordRepo};

fn category(id: &str, kind: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("name", id)
        .with("type", kind)
}

#[test]
fn test_dump_lists_every_collection() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    let categories = registry.lookup(CATEGORIES).unwrap();
    RecordRepo::insert(&conn, categories, &category("cate_1", "expense")).unwrap();

    for mode in [DumpMode::CollectionAtATime, DumpMode::SingleTransaction] {
        let snapshot = dump_collections(&mut conn, &registry, mode).unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[CATEGORIES].len(), 1);
        assert!(snapshot[MOVEMENTS].is_empty());
        assert!(snapshot[USERS].is_empty());
    }
}

#[test]
fn test_replace_collections_swaps_contents() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    let categories = registry.lookup(CATEGORIES).unwrap();
    RecordRepo::insert(&conn, categories, &category("cate_old", "expense")).unwrap();

    let plan = vec![(
        categories,
        vec![category("cate_a", "income"), category("cate_b", "expense")],
    )];
    let ack = replace_collections(&mut conn, &plan).unwrap();

    assert_eq!(ack.restored[CATEGORIES], 2);
    let ids: Vec<_> = RecordRepo::list(&conn, categories)
        .unwrap()
        .iter()
        .filter_map(|r| r.id())
        .collect();
    assert_eq!(ids, vec!["cate_a", "cate_b"]);
}

#[test]
fn test_failing_row_rolls_back_every_collection() {
    let mut conn = open_in_memory().unwrap();
    let registry = EntityRegistry::standard();
    let categories = registry.lookup(CATEGORIES).unwrap();
    let users = registry.users();
    RecordRepo::insert(&conn, categories, &category("cate_keep", "expense")).unwrap();
    RecordRepo::insert(
        &conn,
        users,
        &Record::new()
            .with("username", "ana")
            .with("password_hash", "h"),
    )
    .unwrap();

    let plan = vec![
        (users, Vec::new()),
        (
            categories,
            vec![category("cate_new", "income"), category("cate_bad", "bogus")],
        ),
    ];
    let err = replace_collections(&mut conn, &plan).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.op(), Some("restore"));
    assert_eq!(err.root_kind(), ExErrorKind::Validation);
    assert_eq!(
        err.source_error().and_then(|e| e.record_id()),
        Some("cate_bad")
    );

    // users were emptied first in the plan and must be back
    assert_eq!(RecordRepo::count(&conn, users).unwrap(), 1);
    let kept = RecordRepo::list(&conn, categories).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].get("id"), Some(&FieldValue::from("cate_keep")));
}
