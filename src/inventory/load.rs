use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use super::Inventory;
use crate::config::{self, TpologyConfig};
use crate::errors::{Result, TpologyError};
use crate::resource;

/// Controls which files a directory load picks up and how duplicates are
/// treated.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Glob patterns, relative to the load root, a manifest must match.
    pub include: Vec<String>,
    /// Glob patterns that exclude a file even when it matches `include`.
    pub exclude: Vec<String>,
    /// Fail on a repeated kind/name instead of replacing the earlier resource.
    pub strict_duplicates: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        TpologyConfig::default().load_options()
    }
}

impl LoadOptions {
    pub fn should_include(&self, rel_path: &str) -> bool {
        config::matches_patterns(rel_path, &self.include, &self.exclude)
    }
}

impl Inventory {
    /// Loads every manifest under `path` into a new inventory.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let mut inv = Self::new();
        inv.load_into(path, options)?;
        Ok(inv)
    }

    /// Loads every manifest under `path` into this inventory and returns the
    /// number of resources read.
    ///
    /// Files are visited in sorted order. On error, resources added from
    /// earlier files stay in the inventory.
    pub fn load_into(&mut self, path: &Path, options: &LoadOptions) -> Result<usize> {
        if !path.exists() {
            return Err(TpologyError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_file() {
            return self.load_file_with(path, options.strict_duplicates);
        }

        let mut count = 0;
        let mut files = 0;
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| TpologyError::Io(e.into()))?;
            // Symlinked manifests count; symlinked directories are not entered.
            if !entry.path().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(path).unwrap_or(entry.path());
            let rel = rel.to_string_lossy().replace('\\', "/");
            if !options.should_include(&rel) {
                debug!(path = %rel, "skipping file");
                continue;
            }
            count += self.load_file_with(entry.path(), options.strict_duplicates)?;
            files += 1;
        }

        info!(
            root = %path.display(),
            files,
            resources = count,
            "loaded inventory"
        );
        Ok(count)
    }

    /// Adds every resource in one manifest, replacing duplicates.
    pub fn load_resource_file(&mut self, path: &Path) -> Result<usize> {
        self.load_file_with(path, false)
    }

    fn load_file_with(&mut self, path: &Path, strict: bool) -> Result<usize> {
        let resources = resource::load_file(path)?;
        let count = resources.len();
        for r in resources {
            if strict {
                self.insert_strict(r)?;
            } else {
                self.add_resource(r);
            }
        }
        Ok(count)
    }
}
