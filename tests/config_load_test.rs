//! `AppConfig::load` against real files and environment variables
//!
//! Environment variables are process-wide, so every scenario lives in one
//! test and runs in sequence.

use std::env;
use std::fs;

use qna_api::config::{AppConfig, LogFormat};
use tempfile::TempDir;

const VARS: &[&str] = &[
    "QNA_CONFIG",
    "DATABASE_URL",
    "QNA_DATABASE__URL",
    "QNA_DATABASE__MAX_CONNECTIONS",
    "QNA_SERVER__PORT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn load_layers_file_env_and_database_url() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    let without_db = temp_dir.path().join("without_db.toml");
    fs::write(
        &without_db,
        "[server]\nport = 9090\n\n[logging]\nformat = \"text\"\n",
    )
    .unwrap();

    let with_db = temp_dir.path().join("with_db.toml");
    fs::write(&with_db, "[database]\nurl = \"sqlite://from-file.db\"\n").unwrap();

    // DATABASE_URL fills an unset database.url; nested keys use "__"
    env::set_var("QNA_CONFIG", &without_db);
    env::set_var("DATABASE_URL", "postgres://qna@db:5432/qna");
    env::set_var("QNA_DATABASE__MAX_CONNECTIONS", "3");

    let config = AppConfig::load().unwrap();
    assert_eq!(config.database.url, "postgres://qna@db:5432/qna");
    assert_eq!(config.database.max_connections, 3);
    assert_eq!(config.server.port, 9090);
    assert!(matches!(config.logging.format, LogFormat::Text));
    assert_eq!(config.logging.level, "info");

    // environment overrides the file
    env::set_var("QNA_SERVER__PORT", "7000");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.server.port, 7000);

    // without DATABASE_URL the local SQLite default applies
    env::remove_var("DATABASE_URL");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.database.url, "sqlite://qna.db");

    // a configured url wins over DATABASE_URL
    env::set_var("QNA_CONFIG", &with_db);
    env::set_var("DATABASE_URL", "postgres://ignored/qna");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.database.url, "sqlite://from-file.db");

    env::set_var("QNA_DATABASE__URL", "sqlite::memory:");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.database.url, "sqlite::memory:");

    // a missing config file is not an error
    clear_env();
    env::set_var("QNA_CONFIG", temp_dir.path().join("absent.toml"));
    let config = AppConfig::load().unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.database.max_connections, 10);

    clear_env();
}
