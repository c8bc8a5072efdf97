//! Loading `config.toml` from disk.

use std::io::Write;

use overunder::error::{ConfigError, Error};
use overunder::infrastructure::config::settings::Config;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_every_section() {
    let file = config_file(
        r#"
[ledger]
total_supply = 250
max_symbol_len = 8

[accounts]
min_len = 2
max_len = 12

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.book_settings().total_supply, 250);
    assert_eq!(config.book_settings().max_symbol_len, 8);
    assert_eq!(config.accounts.min_len, 2);
    assert_eq!(config.accounts.max_len, 12);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn partial_logging_section_keeps_other_defaults() {
    let file = config_file("[logging]\nlevel = \"info\"\n");
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.ledger.total_supply, 100_000_000);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn missing_file_is_an_error_for_load() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn rejects_zero_values() {
    for (contents, field) in [
        ("[ledger]\ntotal_supply = 0\n", "total_supply"),
        ("[ledger]\nmax_symbol_len = 0\n", "max_symbol_len"),
        ("[accounts]\nmin_len = 0\n", "min_len"),
    ] {
        let file = config_file(contents);
        match Config::load(file.path()) {
            Err(Error::Config(ConfigError::InvalidValue { field: got, .. })) => {
                assert_eq!(got, field);
            }
            other => panic!("expected invalid {field}, got {other:?}"),
        }
    }
}

#[test]
fn rejects_negative_supply() {
    let file = config_file("[ledger]\ntotal_supply = -5\n");
    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}
