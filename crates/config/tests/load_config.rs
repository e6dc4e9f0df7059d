use fstore_config::{AppConfig, ConfigError, load_config};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("fstore.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn loads_values_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [storage]
        root_path = "/var/lib/fstore"
        imbrication_level = 5

        [logging]
        level = "debug"
        json = true
        "#,
    );

    let cfg: AppConfig = load_config(Some(&path)).unwrap();

    assert_eq!(cfg.storage.root_path, PathBuf::from("/var/lib/fstore"));
    assert_eq!(cfg.storage.imbrication_level, 5);
    assert!(cfg.storage.create);
    assert!(!cfg.storage.serialize_writes);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert!(cfg.logging.console);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let cfg: AppConfig = load_config(Some(&path)).unwrap();

    assert_eq!(cfg.storage.root_path, PathBuf::from("./storage"));
    assert_eq!(cfg.storage.imbrication_level, 3);
    assert_eq!(cfg.logging.level, "info");
    assert!(cfg.logging.path.is_none());
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config::<AppConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
}

#[test]
fn malformed_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[storage]\nimbrication_level = \"deep\"\n");

    let err = load_config::<AppConfig>(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}

#[test]
fn default_file_is_optional() {
    // The crate directory carries no `fstore.*` file.
    let cfg = load_config::<AppConfig>(None::<&str>).unwrap();
    assert_eq!(cfg.storage.imbrication_level, 3);
    assert!(cfg.storage.create);
}
