use std::fs;

use probsql::settings::{Settings, CONDITION_COLUMN};
use probsql::ProbsqlError;

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.condition_column, CONDITION_COLUMN);
    assert_eq!(settings.log_filter, "info");
    assert!(settings.validate().is_ok());
}

#[test]
fn missing_file_gives_defaults() {
    let settings = Settings::load("no_such_probsql_settings_file").unwrap();
    assert_eq!(settings.condition_column, CONDITION_COLUMN);
}

#[test]
fn file_overrides_defaults() {
    let dir = std::env::temp_dir().join(format!("probsql-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("custom.toml");
    fs::write(&path, "condition_column = \"prob_cond\"\nlog_filter = \"probsql=debug\"\n").unwrap();

    let settings = Settings::load(dir.join("custom").to_str().unwrap()).unwrap();
    assert_eq!(settings.condition_column, "prob_cond");
    assert_eq!(settings.log_filter, "probsql=debug");

    fs::write(&path, "condition_column = \"1 bad name\"\n").unwrap();
    assert!(matches!(Settings::load(dir.join("custom").to_str().unwrap()), Err(ProbsqlError::Config(_))));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn column_names_must_be_identifiers() {
    let too_long = "x".repeat(64);
    let longest = "x".repeat(63);
    for name in ["", "1abc", "with space", "semi;colon", too_long.as_str()] {
        let settings = Settings { condition_column: name.to_string(), ..Settings::default() };
        assert!(matches!(settings.validate(), Err(ProbsqlError::Config(_))), "{name}");
    }
    for name in ["_c", "cond_1", longest.as_str()] {
        let settings = Settings { condition_column: name.to_string(), ..Settings::default() };
        assert!(settings.validate().is_ok(), "{name}");
    }
}

#[test]
fn log_filter_is_checked() {
    let settings = Settings { log_filter: "probsql=loud".to_string(), ..Settings::default() };
    assert!(matches!(settings.validate(), Err(ProbsqlError::Config(_))));
}
