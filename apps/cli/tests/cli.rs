use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `fstore` invocation isolated in `dir`, quiet on stderr.
fn fstore(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("fstore");
    cmd.current_dir(dir.path())
        .env("FSTORE__LOGGING__LEVEL", "error")
        .arg("--root")
        .arg(dir.path().join("store"));
    cmd
}

fn input(dir: &TempDir, file: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn create_read_update_delete_round() {
    let dir = TempDir::new().unwrap();
    let first = input(&dir, "first.txt", "hello");
    let second = input(&dir, "second.txt", "world");

    fstore(&dir).args(["create", "test_file_1"]).arg(&first).assert().success();
    assert!(dir.path().join("store/te/st/_f/test_file_1.storage").is_file());

    fstore(&dir).args(["read", "test_file_1"]).assert().success().stdout("hello");

    fstore(&dir).args(["update", "test_file_1"]).arg(&second).assert().success();
    fstore(&dir).args(["read", "test_file_1"]).assert().success().stdout("world");

    fstore(&dir).args(["count"]).assert().success().stdout("1\n");
    fstore(&dir).args(["delete", "test_file_1"]).assert().success();
    fstore(&dir).args(["count"]).assert().success().stdout("0\n");
}

#[test]
fn duplicate_create_fails_with_error_chain() {
    let dir = TempDir::new().unwrap();
    let data = input(&dir, "data.txt", "x");

    fstore(&dir).args(["create", "dup"]).arg(&data).assert().success();
    fstore(&dir)
        .args(["create", "dup"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    fstore(&dir)
        .args(["read", "no/slashes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid item name"));
}

#[test]
fn scan_prints_sorted_matches() {
    let dir = TempDir::new().unwrap();
    let data = input(&dir, "data.txt", "x");
    for name in ["test_file_2", "foo", "test_file_1", "bar"] {
        fstore(&dir).args(["create", name]).arg(&data).assert().success();
    }

    fstore(&dir)
        .args(["scan", ".+est.*"])
        .assert()
        .success()
        .stdout("test_file_1\ntest_file_2\n");
    fstore(&dir)
        .args(["scan", "**"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn read_to_output_file() {
    let dir = TempDir::new().unwrap();
    let data = input(&dir, "data.txt", "payload");
    let output = dir.path().join("copy.txt");

    fstore(&dir).args(["create", "blob"]).arg(&data).assert().success();
    fstore(&dir)
        .args(["read", "blob", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout("");
    assert_eq!(std::fs::read_to_string(output).unwrap(), "payload");
}

#[test]
fn config_file_and_env_layers_apply() {
    let dir = TempDir::new().unwrap();
    let data = input(&dir, "data.txt", "x");
    let config = input(&dir, "custom.toml", "[storage]\nimbrication_level = 1\n");

    fstore(&dir)
        .arg("--config")
        .arg(&config)
        .args(["create", "abcdef"])
        .arg(&data)
        .assert()
        .success();
    assert!(dir.path().join("store/ab/abcdef.storage").is_file());

    fstore(&dir)
        .env("FSTORE__STORAGE__IMBRICATION_LEVEL", "2")
        .args(["create", "ghijkl"])
        .arg(&data)
        .assert()
        .success();
    assert!(dir.path().join("store/gh/ij/ghijkl.storage").is_file());
}

#[test]
fn explicit_missing_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    fstore(&dir)
        .args(["--config", "absent.toml", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
}

#[test]
fn zero_imbrication_level_is_fatal() {
    let dir = TempDir::new().unwrap();
    fstore(&dir)
        .args(["--imbrication-level", "0", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot open storage"));
    assert!(!dir.path().join("store").exists());
}
