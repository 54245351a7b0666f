use pomwalk_core::config::{dirs_path, PomwalkConfig};

#[test]
fn test_default_local_repository() {
    let config = PomwalkConfig::default();
    assert_eq!(config.repository.local, "~/.m2/repository");
}

#[test]
fn test_default_resolve_settings() {
    let config = PomwalkConfig::default();
    assert_eq!(config.resolve.max_concurrent_reads, 8);
    assert!(config.resolve.environment);
    assert_eq!(config.watch.debounce_ms, 300);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config: PomwalkConfig = toml::from_str("").unwrap();
    assert_eq!(config.repository.local, "~/.m2/repository");
    assert_eq!(config.resolve.max_concurrent_reads, 8);
}

#[test]
fn test_parse_from_toml() {
    let toml = r#"
[repository]
local = "/srv/m2"

[resolve]
max-concurrent-reads = 2
environment = false

[watch]
debounce-ms = 50
"#;
    let config: PomwalkConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.repository.local, "/srv/m2");
    assert_eq!(config.resolve.max_concurrent_reads, 2);
    assert!(!config.resolve.environment);
    assert_eq!(config.watch.debounce_ms, 50);
}

#[test]
fn test_load_from_missing_file_returns_defaults() {
    let config =
        PomwalkConfig::load_from(std::path::Path::new("/nonexistent/pomwalk/config.toml")).unwrap();
    assert_eq!(config.resolve.max_concurrent_reads, 8);
}

#[test]
fn test_load_from_invalid_file_is_config_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[resolve\nbroken").unwrap();
    let err = PomwalkConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "got: {err}");
}

#[test]
fn test_dirs_path_contains_pomwalk() {
    assert!(dirs_path().ends_with(".pomwalk"));
}
