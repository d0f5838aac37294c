use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{load_config, TpologyConfig};
use crate::errors::{Result, TpologyError};
use crate::git;
use crate::inventory::Inventory;

/// Locates and loads the inventory described by a configuration.
pub struct Tpology {
    config: TpologyConfig,
}

impl Tpology {
    pub fn new(config: TpologyConfig) -> Self {
        Self { config }
    }

    /// Reads the configuration at `config_path`; a missing file means
    /// defaults.
    pub fn open(config_path: &Path) -> Result<Self> {
        Ok(Self::new(load_config(config_path)?))
    }

    pub fn config(&self) -> &TpologyConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TpologyConfig {
        &mut self.config
    }

    /// Directory to load manifests from.
    ///
    /// A local inventory wins; otherwise the remote repository is fetched
    /// into the git cache first.
    pub fn inventory_path(&self) -> Result<PathBuf> {
        if let Some(local) = &self.config.inventory_local {
            return Ok(local.clone());
        }
        if self.config.inventory.is_empty() {
            return Err(TpologyError::Config {
                message: "no inventory configured; set `inventory` or `inventory_local`"
                    .to_string(),
            });
        }
        info!(
            url = %self.config.inventory,
            branch = %self.config.inventory_ref,
            "using remote inventory"
        );
        git::fetch(
            &self.config.inventory,
            &self.config.inventory_ref,
            &self.config.git_cache_dir,
        )
    }

    /// Loads the configured inventory.
    pub fn load_inventory(&self) -> Result<Inventory> {
        let path = self.inventory_path()?;
        Inventory::load(&path, &self.config.load_options())
    }
}
