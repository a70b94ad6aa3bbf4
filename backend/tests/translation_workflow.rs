//! End-to-end workflows through the CSV-backed `Backend`.

use std::collections::BTreeMap;

use shared::{UnitListFilters, UnitListRequest};
use tempfile::TempDir;
use trans_unit_backend::domain::models::FileNaming;
use trans_unit_backend::domain::QueryError;
use trans_unit_backend::storage::FileStorage;
use trans_unit_backend::{Backend, TranslationConfig};

fn backend_in(temp_dir: &TempDir) -> Backend {
    let config = TranslationConfig {
        managed_locales: vec!["en".to_string(), "fr".to_string()],
        ..Default::default()
    };
    let path = temp_dir.path().join("translation_config.yaml");
    config.save(&path).unwrap();
    Backend::open(&path).unwrap()
}

fn request(locales: &[&str], filters: Option<UnitListFilters>) -> UnitListRequest {
    UnitListRequest {
        locales: Some(locales.iter().map(|l| l.to_string()).collect()),
        rows: 20,
        page: 1,
        filters,
    }
}

#[test]
fn hello_scenario_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);
    let manager = &backend.trans_unit_manager;

    let mut unit = manager.create("hello", "messages", true).unwrap();
    assert!(manager.add_translation(&mut unit, "en", "Hi", None, true).unwrap().is_some());
    assert!(manager.add_translation(&mut unit, "en", "Yo", None, true).unwrap().is_none());
    assert_eq!(unit.translation("en").unwrap().content.as_deref(), Some("Hi"));

    let updated = manager
        .update_translation(&mut unit, "en", "Hello", true, false)
        .unwrap()
        .unwrap();
    assert_eq!(updated.content.as_deref(), Some("Hello"));
    assert!(manager
        .update_translation(&mut unit, "en", "Hello", true, true)
        .unwrap()
        .is_none());

    drop(backend);
    let reopened = backend_in(&temp_dir);
    let stored = reopened
        .query_service
        .find_by_key_and_domain("hello", "messages")
        .unwrap()
        .unwrap();
    assert_eq!(stored.translation("en").unwrap().content.as_deref(), Some("Hello"));
    assert_eq!(stored.translations.len(), 1);
}

#[test]
fn all_domains_are_distinct_and_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);

    for (domain, key) in [("b", "one"), ("a", "two"), ("b", "three")] {
        backend.trans_unit_for(domain, key).unwrap();
    }

    assert_eq!(backend.query_service.all_domains().unwrap(), vec!["a", "b"]);
}

#[test]
fn trans_unit_for_creates_only_once() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);

    let first = backend.trans_unit_for("messages", "hello").unwrap();
    let second = backend.trans_unit_for("messages", "hello").unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(backend.query_service.count(None, None).unwrap(), 1);
}

#[test]
fn listing_with_unmatched_content_filter_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);
    let manager = &backend.trans_unit_manager;

    let mut unit = backend.trans_unit_for("messages", "hello").unwrap();
    manager.add_translation(&mut unit, "en", "Hi", None, true).unwrap();

    let mut filters = UnitListFilters::default();
    filters.content.insert("en".to_string(), "zzz-no-match".to_string());

    let response = backend
        .list_trans_units(&request(&["en"], Some(filters)))
        .unwrap();
    assert!(response.trans_units.is_empty());
    assert_eq!(response.total, 0);

    let response = backend.list_trans_units(&request(&["en"], None)).unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.trans_units[0].key, "hello");
}

#[test]
fn search_flag_off_ignores_domain_filter() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);
    let manager = &backend.trans_unit_manager;

    let mut unit = backend.trans_unit_for("bar", "hello").unwrap();
    manager.add_translation(&mut unit, "en", "Hi", None, true).unwrap();

    let filters: UnitListFilters =
        serde_json::from_str(r#"{"_search": "false", "domain": "foo"}"#).unwrap();
    let response = backend
        .list_trans_units(&request(&["en"], Some(filters)))
        .unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.trans_units[0].domain, "bar");
}

#[test]
fn unknown_sort_column_is_rejected_before_reading() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);

    let filters = UnitListFilters {
        sidx: Some("password".to_string()),
        ..Default::default()
    };
    let result = backend.list_trans_units(&request(&["en"], Some(filters)));
    assert!(matches!(result, Err(QueryError::UnsupportedSortColumn(_))));
}

#[test]
fn default_request_uses_config() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);

    let request = backend.default_list_request();
    assert_eq!(request.locales, Some(vec!["en".to_string(), "fr".to_string()]));
    assert_eq!(request.rows, 20);
    assert!(backend.list_trans_units(&request).unwrap().trans_units.is_empty());
}

#[test]
fn file_import_then_manual_edit_then_reimport() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);
    let manager = &backend.trans_unit_manager;
    let query = &backend.query_service;

    let en_file = backend
        .storage
        .insert_file(&FileNaming::new("messages", "en", "yml"), "translations")
        .unwrap();

    // Import from the file
    let mut unit = backend.trans_unit_for("messages", "hello").unwrap();
    manager
        .add_translation(&mut unit, "en", "Hi", Some(&en_file), true)
        .unwrap();
    assert!(query.translations_for_file(en_file.id, true).unwrap().is_empty());

    // A translator edits English and adds French
    let mut edits = BTreeMap::new();
    edits.insert("en", "Hello there");
    edits.insert("fr", "Salut");
    manager.update_translations_content(&mut unit, edits, true).unwrap();

    let fr = unit.translation("fr").unwrap().clone();
    assert!(fr.modified_manually);
    let fr_file = backend.storage.find_file(fr.file_id.unwrap()).unwrap().unwrap();
    assert_eq!(fr_file.name, "messages.fr.yml");

    // Re-importing the file must not clobber the edit
    assert!(manager
        .update_translation(&mut unit, "en", "Hi", true, true)
        .unwrap()
        .is_none());

    let exported = query.translations_for_file(en_file.id, true).unwrap();
    assert_eq!(exported.get("hello"), Some(Some("Hello there")));

    // Reopening keeps the registered files
    drop(backend);
    let reopened = backend_in(&temp_dir);
    let found = reopened
        .storage
        .find_file_by_location("translations", "messages.fr.yml")
        .unwrap();
    assert_eq!(found.map(|f| f.id), Some(fr_file.id));
    assert!(temp_dir.path().join("data").join("files.csv").exists());
}

#[test]
fn menus_list_locale_domains_and_counts() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);
    let manager = &backend.trans_unit_manager;

    let mut hello = backend.trans_unit_for("messages", "hello").unwrap();
    manager.add_translation(&mut hello, "fr", "Salut", None, true).unwrap();
    let mut required = backend.trans_unit_for("validators", "required").unwrap();
    manager.add_translation(&mut required, "en", "Required", None, true).unwrap();
    backend.trans_unit_for("messages", "bye").unwrap();

    let pairs: Vec<(String, String)> = backend
        .locale_domains()
        .unwrap()
        .into_iter()
        .map(|pair| (pair.locale, pair.domain))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("en".to_string(), "validators".to_string()),
            ("fr".to_string(), "messages".to_string()),
        ]
    );

    let counts: Vec<(String, usize)> = backend
        .domain_counts()
        .unwrap()
        .into_iter()
        .map(|count| (count.domain, count.count))
        .collect();
    assert_eq!(
        counts,
        vec![("messages".to_string(), 2), ("validators".to_string(), 1)]
    );
}

#[test]
fn saving_an_edited_row_flags_manual_changes() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);
    let manager = &backend.trans_unit_manager;

    let en_file = backend
        .storage
        .insert_file(&FileNaming::new("messages", "en", "yml"), "translations")
        .unwrap();
    let mut unit = backend.trans_unit_for("messages", "hello").unwrap();
    manager
        .add_translation(&mut unit, "en", "Hi", Some(&en_file), true)
        .unwrap();

    let row = backend
        .list_trans_units(&request(&["en", "fr"], None))
        .unwrap()
        .trans_units
        .remove(0);

    let mut contents = BTreeMap::new();
    contents.insert("en".to_string(), "Hi".to_string());
    contents.insert("fr".to_string(), "Salut".to_string());
    let saved = backend.save_edited_row(row, &contents).unwrap();

    let en = saved.translations.iter().find(|t| t.locale == "en").unwrap();
    assert!(!en.modified_manually);
    let fr = saved.translations.iter().find(|t| t.locale == "fr").unwrap();
    assert!(fr.modified_manually);

    let fr_file = backend.file(fr.file_id.unwrap()).unwrap().unwrap();
    assert_eq!(fr_file.name, "messages.fr.yml");
    assert_eq!(fr_file.path, "translations");
    assert!(backend.file(9_999).unwrap().is_none());
}

#[test]
fn unsaved_rows_cannot_be_edited() {
    let temp_dir = TempDir::new().unwrap();
    let backend = backend_in(&temp_dir);

    let row = shared::TransUnit {
        id: 0,
        domain: "messages".to_string(),
        key: "hello".to_string(),
        translations: Vec::new(),
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
    };
    let contents = BTreeMap::from([("en".to_string(), "Hi".to_string())]);
    assert!(backend.save_edited_row(row, &contents).is_err());
    assert_eq!(backend.query_service.count(None, None).unwrap(), 0);
}
