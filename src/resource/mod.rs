/// Payload value tree.
mod value;

/// Manifest decoding and encoding.
mod io;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Result, TpologyError};

pub use io::{decode_reader, decode_str, encode, load_file};
pub use value::{mapping, Value};

/// Field names that carry resource metadata and therefore cannot be kinds.
pub const RESERVED_FIELDS: [&str; 3] = ["name", "description", "owner"];

/// Returns `true` if `kind` collides with a reserved metadata field.
pub fn is_reserved_kind(kind: &str) -> bool {
    RESERVED_FIELDS.contains(&kind)
}

/// A named, kinded unit of inventory data.
///
/// On the wire a resource is a flat mapping holding the optional reserved
/// fields plus exactly one other key; that key is the kind and its value is
/// the payload:
///
/// ```yaml
/// name: gcp-dev
/// owner: gcp-team
/// cluster:
///   provider: gcp
/// ```
#[derive(Debug, Clone)]
pub struct Resource {
    kind: String,
    name: String,
    description: String,
    owner: String,
    pub data: Value,
    loaded_from: Option<PathBuf>,
}

impl Resource {
    /// Creates a resource with an empty payload.
    pub fn new(kind: &str, name: &str, description: &str, owner: &str) -> Result<Self> {
        if is_reserved_kind(kind) {
            return Err(TpologyError::ReservedKind {
                kind: kind.to_string(),
            });
        }
        Ok(Self {
            kind: kind.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            owner: owner.to_string(),
            data: Value::Null,
            loaded_from: None,
        })
    }

    /// Kind of the resource; never a reserved field name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Replaces the payload.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Manifest this resource was decoded from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    pub(crate) fn set_loaded_from(&mut self, path: &Path) {
        self.loaded_from = Some(path.to_path_buf());
    }

    /// `kind/name`, unique across an inventory.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }

    /// Builds a resource from one decoded wire document.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Mapping(map) => map,
            other => {
                return Err(shape_error(format!(
                    "resource must be a mapping, found {}",
                    other.type_name()
                )))
            }
        };

        let name = take_field(&mut fields, "name")?;
        let description = take_field(&mut fields, "description")?;
        let owner = take_field(&mut fields, "owner")?;

        if fields.len() > 1 {
            return Err(shape_error("resource has more than one kind".to_string()));
        }
        let (kind, data) = fields
            .pop_first()
            .ok_or_else(|| shape_error("resource has no kind".to_string()))?;

        Ok(Self {
            kind,
            name,
            description,
            owner,
            data,
            loaded_from: None,
        })
    }

    /// Renders the flat wire mapping.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from(self.name.as_str()));
        map.insert(
            "description".to_string(),
            Value::from(self.description.as_str()),
        );
        map.insert("owner".to_string(), Value::from(self.owner.as_str()));
        map.insert(self.kind.clone(), self.data.clone());
        Value::Mapping(map)
    }
}

/// Provenance is diagnostic only and does not take part in equality.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.description == other.description
            && self.owner == other.owner
            && self.data == other.data
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("owner", &self.owner)?;
        map.serialize_entry(&self.kind, &self.data)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Resource::from_value(value).map_err(D::Error::custom)
    }
}

fn shape_error(message: String) -> TpologyError {
    TpologyError::Shape {
        message,
        path: None,
    }
}

/// Removes a reserved field, defaulting to the empty string when absent.
fn take_field(fields: &mut BTreeMap<String, Value>, field: &str) -> Result<String> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(shape_error(format!(
            "field `{}` must be a string, found {}",
            field,
            other.type_name()
        ))),
    }
}
