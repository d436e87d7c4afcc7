//! Product store persistence through the public API.

mod common;

use barcode_scanner::ProductRecord;
use barcode_scanner::ProductStore;
use barcode_scanner::store::{FIELD_BRAND, FIELD_CATEGORY, FIELD_NAME};
use common::*;

#[test]
fn test_seed_entries_are_written_on_first_load() {
    let (_dir, path, store) = seeded_store();

    let codes: Vec<&str> = store.iter().map(|(code, _)| code).collect();
    assert_eq!(codes, [FOUND_CODE, "7896051020158"]);
    assert_eq!(store.get(FOUND_CODE).unwrap().name(), Some(FOUND_NAME));

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.as_object().unwrap().len(), 2);
    assert_eq!(on_disk[FOUND_CODE]["marca"], "Glade");
}

#[test]
fn test_missing_codes_are_not_errors() {
    let (_dir, _path, store) = seeded_store();
    for code in [MISSING_CODE, "", "abc", "7894650940175"] {
        assert!(store.get(code).is_none());
    }
}

#[test]
fn test_every_add_round_trips_through_the_file() {
    let (_dir, path, mut store) = seeded_store();
    let products = [
        ("7891000100103", "Leite Condensado", "Moça", "Alimentos"),
        ("7894900011517", "Refrigerante", "Coca-Cola", "Bebidas"),
        ("7891024134702", "Sabonete", "Protex", "Higiene"),
    ];

    for (code, name, brand, category) in products {
        let record = ProductRecord::from_iter([
            (FIELD_NAME, name),
            (FIELD_BRAND, brand),
            (FIELD_CATEGORY, category),
        ]);
        store.add(code, record.clone()).unwrap();
        assert_eq!(store.get(code), Some(&record));

        // Persisted before the call returns.
        let reloaded = ProductStore::load(&path).unwrap();
        assert_eq!(reloaded.get(code), Some(&record));
    }

    assert_eq!(ProductStore::load(&path).unwrap().len(), 5);
}

#[test]
fn test_hand_edited_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(
        &path,
        r#"{"123": {"nome": "Arroz", "marca": "Tio João", "categoria": "Alimentos", "peso": "5kg"}}"#,
    )
    .unwrap();

    let store = ProductStore::load(&path).unwrap();
    assert_eq!(store.len(), 1);
    let record = store.get("123").unwrap();
    assert_eq!(record.brand(), Some("Tio João"));
    assert_eq!(record.get("peso"), Some("5kg"));
}

#[test]
fn test_corrupt_file_is_replaced_on_next_add() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let mut store = ProductStore::load(&path).unwrap();
    assert!(store.is_empty());

    store
        .add(MISSING_CODE, ProductRecord::from_iter([(FIELD_NAME, "Test")]))
        .unwrap();
    let reloaded = ProductStore::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
}
