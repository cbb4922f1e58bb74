//! File-backed configuration and ticket loading

use std::fs;

use tempfile::TempDir;

use supportdesk::config::{ClassificationStrategy, Config};
use supportdesk::types::load_tickets;
use supportdesk::DeskError;

#[test]
fn test_config_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::offline();
    config.retrieval.top_k = 3;
    config.classifier.strategy = ClassificationStrategy::Generative;
    config.save(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[retrieval]\ntop_k = 7\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.retrieval.top_k, 7);
    assert_eq!(loaded.retrieval.chunk_size, Config::default().retrieval.chunk_size);
    assert_eq!(loaded.generator, Config::default().generator);
}

#[test]
fn test_invalid_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[retrieval]\nchunk_size = 50\nchunk_overlap = 50\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DeskError::ConfigError(_)));
}

#[test]
fn test_malformed_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[retrieval\n").unwrap();

    assert!(Config::load_from_file(&path).is_err());
}

#[test]
fn test_load_tickets_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tickets.json");
    fs::write(
        &path,
        r#"[
            {"ticket_id": "TICKET-245", "subject": "Snowflake", "description": "connection fails"},
            {"subject": "Glossary"}
        ]"#,
    )
    .unwrap();

    let tickets = load_tickets(&path).unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].ticket_id, "TICKET-245");
    assert_eq!(tickets[1].description, "");
}

#[test]
fn test_load_tickets_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = load_tickets(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DeskError::IoError(_)));
}

#[test]
fn test_load_tickets_not_an_array() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tickets.json");
    fs::write(&path, r#"{"subject": "single"}"#).unwrap();

    let err = load_tickets(&path).unwrap_err();
    assert!(matches!(err, DeskError::SerializationError(_)));
}
