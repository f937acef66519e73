use roibridge_settings::{Config, ServerSettings};
use tempfile::TempDir;

fn sample() -> Config {
    let mut config = Config::new();
    config.servers.push(
        ServerSettings::new("lab", "omero.example.org")
            .with_port(4064)
            .with_username("alice"),
    );
    config.servers.push(ServerSettings::new("local", "127.0.0.1").with_port(14064));
    config.transfer.update_existing = false;
    config.transfer.default_collection_name = Some("Imported".to_string());
    config
}

#[test]
fn test_toml_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    sample().save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn test_json_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    sample().save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.server("lab").and_then(|s| s.username.clone()), Some("alice".to_string()));
    assert!(!loaded.transfer.update_existing);
}

#[test]
fn test_missing_fields_take_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[[servers]]
name = "lab"
host = "omero.example.org"
"#,
    )
    .unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    let lab = loaded.server("lab").unwrap();
    assert_eq!(lab.port, 4064);
    assert_eq!(lab.timeout_ms, 30_000);
    assert!(loaded.transfer.update_existing);
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    assert!(sample().save_to_file(&path).is_err());

    std::fs::write(&path, "servers: []").unwrap();
    assert!(Config::load_from_file(&path).is_err());
}

#[test]
fn test_invalid_file_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[[servers]]
name = "lab"
host = "a"

[[servers]]
name = "lab"
host = "b"
"#,
    )
    .unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Duplicate server name"));
}
