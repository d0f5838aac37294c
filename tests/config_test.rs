use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tpology::config::*;

#[test]
fn test_default_config_has_yaml_patterns() {
    let config = TpologyConfig::default();
    assert!(config.include.iter().any(|p| p == "*.yaml"));
    assert!(config.exclude.iter().any(|p| p == ".git/**"));
    assert_eq!(config.inventory_ref, "main");
    assert!(!config.strict_duplicates);
    assert!(config.git_cache_dir.ends_with("tpology/git"));
}

#[test]
fn test_missing_config_is_default() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(&dir.path().join("config.toml")).unwrap();
    assert_eq!(loaded, TpologyConfig::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILENAME);
    let config = TpologyConfig {
        inventory: "https://example.com/inventory.git".to_string(),
        inventory_local: Some(PathBuf::from("/srv/inventory")),
        strict_duplicates: true,
        ..TpologyConfig::default()
    };
    save_config(&path, &config).unwrap();
    assert!(!path.with_extension("toml.partial").exists());
    let loaded = load_config(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "inventory_ref = \"release\"\n").unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.inventory_ref, "release");
    assert_eq!(loaded.include, TpologyConfig::default().include);
}

#[test]
fn test_invalid_config_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "strict_duplicates = \"maybe\"\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_should_include_file() {
    let config = TpologyConfig::default();
    assert!(should_include_file("providers.yaml", &config));
    assert!(should_include_file("clusters/gcp.yml", &config));
    assert!(should_include_file("clusters/GCP.YAML", &config));
    assert!(!should_include_file("README.md", &config));
    assert!(!should_include_file(".git/config.yaml", &config));
}

#[test]
fn test_load_options_follow_config() {
    let config = TpologyConfig {
        strict_duplicates: true,
        ..TpologyConfig::default()
    };
    let options = config.load_options();
    assert!(options.strict_duplicates);
    assert_eq!(options.include, config.include);
}

#[test]
fn test_save_config_under_a_file_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let err = save_config(&blocker.join(CONFIG_FILENAME), &TpologyConfig::default()).unwrap_err();
    assert!(err.to_string().contains("cannot create tpology config directory"));
}

#[test]
fn test_config_toml_lists_settings() {
    let text = config_toml(&TpologyConfig::default()).unwrap();
    assert!(text.contains("inventory_ref = \"main\""));
    assert!(text.contains("strict_duplicates = false"));
    assert!(!text.contains("inventory_local"));
}
