use minide_settings::{Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesStore::load(&path).expect("load defaults");
    assert_eq!(store.preferences().project.default_name, "my-project");
    assert_eq!(store.preferences().project.default_copy_folder, "copy");
    assert_eq!(store.preferences().share.base_url, "http://localhost");
    assert_eq!(store.preferences().logging.level, "warn");
    assert!(!path.exists(), "loading defaults must not create the file");
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join(".minide").join("preferences.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.project.default_name = "playground".to_string();
            prefs.share.base_url = "https://share.example/".to_string();
            prefs.logging.level = "DEBUG".to_string();
        })
        .expect("save");

    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert_eq!(reloaded.preferences().project.default_name, "playground");
    assert_eq!(reloaded.preferences().share.base_url, "https://share.example");
    assert_eq!(reloaded.preferences().logging.level, "debug");
}

#[test]
fn blank_and_unknown_values_fall_back_to_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "project": { "default_name": "  ", "default_copy_folder": "" },
            "logging": { "level": "loud" }
        }"#,
    )
    .expect("write legacy prefs");

    let store = PreferencesStore::load(&path).expect("load legacy file");
    let prefs = store.preferences();
    assert_eq!(prefs.version, 1, "version 0 should be upgraded");
    assert_eq!(prefs.project.default_name, "my-project");
    assert_eq!(prefs.project.default_copy_folder, "copy");
    assert_eq!(prefs.logging.level, "warn");
    assert_eq!(prefs.share.base_url, "http://localhost");
}

#[test]
fn import_keeps_backup_of_previous_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    let mut store = PreferencesStore::load(&path).expect("defaults");
    store.save().expect("initial save");

    let incoming = temp.path().join("incoming.json");
    fs::write(&incoming, r#"{ "project": { "default_copy_folder": "backup" } }"#)
        .expect("write incoming");
    store.import_from(&incoming).expect("import");

    assert_eq!(store.preferences().project.default_copy_folder, "backup");
    assert!(path.with_extension("bak").exists());
    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert_eq!(reloaded.preferences().project.default_copy_folder, "backup");
}

#[test]
fn export_writes_pretty_json() {
    let temp = tempdir().expect("tempdir");
    let store = PreferencesStore::load(temp.path().join("preferences.json")).expect("defaults");
    let out = temp.path().join("exports").join("prefs.json");
    store.export_to(&out).expect("export");

    let contents = fs::read_to_string(&out).expect("read export");
    assert!(contents.contains("\"default_copy_folder\": \"copy\""));
}
