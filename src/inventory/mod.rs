/// Loading inventories from manifest directories.
mod load;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::warn;

use crate::errors::{Result, TpologyError};
use crate::resource::Resource;

pub use load::LoadOptions;

/// The complete, unresolved set of resources grouped by kind then name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    resources: BTreeMap<String, BTreeMap<String, Resource>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory from resources, later duplicates replacing earlier
    /// ones.
    pub fn from_resources<I: IntoIterator<Item = Resource>>(resources: I) -> Self {
        let mut inv = Self::new();
        for r in resources {
            inv.add_resource(r);
        }
        inv
    }

    /// Inserts a resource, replacing any existing resource with the same kind
    /// and name.
    pub fn add_resource(&mut self, r: Resource) {
        let by_name = self.resources.entry(r.kind().to_string()).or_default();
        if let Some(previous) = by_name.insert(r.name().to_string(), r) {
            let current = &by_name[previous.name()];
            warn!(
                resource = %previous.qualified_name(),
                replaced = %provenance(&previous),
                by = %provenance(current),
                "duplicate resource replaced"
            );
        }
    }

    /// Inserts a resource, failing instead of replacing an existing one.
    pub fn insert_strict(&mut self, r: Resource) -> Result<()> {
        let by_name = self.resources.entry(r.kind().to_string()).or_default();
        match by_name.entry(r.name().to_string()) {
            Entry::Occupied(existing) => Err(TpologyError::DuplicateResource {
                kind: r.kind().to_string(),
                name: r.name().to_string(),
                first: provenance(existing.get()),
                second: provenance(&r),
            }),
            Entry::Vacant(slot) => {
                slot.insert(r);
                Ok(())
            }
        }
    }

    /// Looks up one resource.
    pub fn get(&self, kind: &str, name: &str) -> Option<&Resource> {
        self.resources.get(kind).and_then(|m| m.get(name))
    }

    /// All kinds present, in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// The name → resource mapping of one kind.
    pub fn resources_of_kind(&self, kind: &str) -> Option<&BTreeMap<String, Resource>> {
        self.resources.get(kind)
    }

    /// All resources ordered by kind then name.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values().flat_map(|m| m.values())
    }

    /// Total number of resources.
    pub fn len(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn provenance(r: &Resource) -> String {
    r.loaded_from()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<memory>".to_string())
}
