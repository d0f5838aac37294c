use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TpologyError};
use crate::inventory::LoadOptions;

/// Name of the configuration file inside the tpology config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the per-user directory holding tpology config and cache.
pub const TPOLOGY_DIR: &str = "tpology";

/// Tool configuration.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TpologyConfig {
    /// URL of the remote inventory repository.
    pub inventory: String,
    /// Branch or tag checked out from the remote inventory.
    pub inventory_ref: String,
    /// Local inventory directory; takes precedence over the remote.
    pub inventory_local: Option<PathBuf>,
    /// Directory holding cloned inventory repositories.
    pub git_cache_dir: PathBuf,
    /// Glob patterns for manifests to load.
    pub include: Vec<String>,
    /// Glob patterns for files to skip.
    pub exclude: Vec<String>,
    /// Reject duplicate kind/name pairs instead of keeping the last one.
    pub strict_duplicates: bool,
}

impl Default for TpologyConfig {
    fn default() -> Self {
        Self {
            inventory: String::new(),
            inventory_ref: "main".to_string(),
            inventory_local: None,
            git_cache_dir: default_git_cache_dir(),
            include: vec!["*.yaml".to_string(), "*.yml".to_string()],
            exclude: vec![".git/**".to_string()],
            strict_duplicates: false,
        }
    }
}

impl TpologyConfig {
    /// File-selection and duplicate settings for an inventory load.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            strict_duplicates: self.strict_duplicates,
        }
    }
}

/// `<user cache dir>/tpology/git`, falling back to the temp directory.
pub fn default_git_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(TPOLOGY_DIR)
        .join("git")
}

/// `<user config dir>/tpology/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(TPOLOGY_DIR)
        .join(CONFIG_FILENAME)
}

/// Loads the configuration from `config_path`.
///
/// A missing file yields the default configuration.
pub fn load_config(config_path: &Path) -> Result<TpologyConfig> {
    if !config_path.exists() {
        return Ok(TpologyConfig::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| TpologyError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    toml::from_str(&contents).map_err(|e| TpologyError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })
}

/// The configuration as it is written to `config.toml`.
pub fn config_toml(config: &TpologyConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| config_error(format!("cannot encode tpology settings: {}", e)))
}

/// Writes the configuration next to `config_path` under a staging name, then
/// renames it into place so readers never see a half-written file.
pub fn save_config(config_path: &Path, config: &TpologyConfig) -> Result<()> {
    let text = config_toml(config)?;

    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir).map_err(|e| {
            config_error(format!(
                "cannot create tpology config directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    let staging = config_path.with_extension("toml.partial");
    fs::write(&staging, text)
        .map_err(|e| config_error(format!("cannot stage {}: {}", staging.display(), e)))?;
    if let Err(e) = fs::rename(&staging, config_path) {
        let _ = fs::remove_file(&staging);
        return Err(config_error(format!(
            "cannot install {}: {}",
            config_path.display(),
            e
        )));
    }
    Ok(())
}

fn config_error(message: String) -> TpologyError {
    TpologyError::Config { message }
}

/// Determines whether a manifest should be loaded under the configuration's
/// include and exclude patterns.
pub fn should_include_file(file_path: &str, config: &TpologyConfig) -> bool {
    matches_patterns(file_path, &config.include, &config.exclude)
}

/// `true` if `file_path` matches an include pattern and no exclude pattern.
/// Matching ignores case so `A.YAML` is picked up like `a.yaml`.
pub fn matches_patterns(file_path: &str, include: &[String], exclude: &[String]) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let matches = |patterns: &[String]| {
        patterns.iter().any(|p| {
            Pattern::new(p)
                .map(|pattern| pattern.matches_with(file_path, match_opts))
                .unwrap_or(false)
        })
    };

    !matches(exclude) && matches(include)
}
