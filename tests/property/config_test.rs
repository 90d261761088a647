//! Configuration loading tests
//!
//! Environment-variable tests run serially since they share the process
//! environment.

use gamechat::backend::server::ServerConfig;
use gamechat::shared::ConfigError;
use serial_test::serial;
use std::io::Write;

#[test]
fn test_toml_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 4100").unwrap();
    writeln!(file, "message_history = 25").unwrap();
    writeln!(file, "websocket_path = \"/chat\"").unwrap();

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, 4100);
    assert_eq!(config.message_history, 25);
    assert_eq!(config.websocket_path, "/chat");
    // Untouched keys keep their defaults
    assert_eq!(config.outbound_queue, ServerConfig::default().outbound_queue);
}

#[test]
fn test_bad_toml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();

    assert!(matches!(ServerConfig::from_file(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(ServerConfig::from_file(&path), Err(ConfigError::Io { .. })));
}

#[test]
#[serial]
fn test_load_reads_file_then_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 4100").unwrap();
    writeln!(file, "bcrypt_cost = 4").unwrap();

    std::env::set_var("GAMECHAT_CONFIG", file.path());
    std::env::set_var("SERVER_PORT", "4200");
    std::env::set_var("JWT_SECRET", "from-env");
    let loaded = ServerConfig::load();
    std::env::remove_var("GAMECHAT_CONFIG");
    std::env::remove_var("SERVER_PORT");
    std::env::remove_var("JWT_SECRET");

    let config = loaded.unwrap();
    assert_eq!(config.port, 4200);
    assert_eq!(config.jwt_secret, "from-env");
    assert_eq!(config.bcrypt_cost, 4);
    assert!(!config.uses_default_secret());
}

#[test]
#[serial]
fn test_load_rejects_bad_environment_value() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 4100").unwrap();

    std::env::set_var("GAMECHAT_CONFIG", file.path());
    std::env::set_var("MESSAGE_HISTORY", "lots");
    let loaded = ServerConfig::load();
    std::env::remove_var("GAMECHAT_CONFIG");
    std::env::remove_var("MESSAGE_HISTORY");

    assert!(matches!(loaded, Err(ConfigError::InvalidValue { key: "MESSAGE_HISTORY", .. })));
}
