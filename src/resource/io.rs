use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{Resource, Value};
use crate::errors::{Result, TpologyError};

/// Decodes a YAML stream holding zero or more resource documents.
///
/// Empty documents are skipped. Decoding stops at the first malformed
/// document.
pub fn decode_str(text: &str) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|e| TpologyError::Decode {
            message: e.to_string(),
            path: None,
        })?;
        if value.is_null() {
            continue;
        }
        resources.push(Resource::from_value(value)?);
    }
    Ok(resources)
}

/// Decodes a resource stream from any reader.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Vec<Resource>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    decode_str(&text)
}

/// Loads every resource from a manifest file, recording the file as each
/// resource's provenance.
pub fn load_file(path: &Path) -> Result<Vec<Resource>> {
    let text = fs::read_to_string(path)?;
    let mut resources = decode_str(&text).map_err(|e| e.with_path(path))?;
    for r in &mut resources {
        r.set_loaded_from(path);
    }
    debug!(
        path = %path.display(),
        count = resources.len(),
        "decoded manifest"
    );
    Ok(resources)
}

/// Encodes resources as a `---` separated YAML stream in the flat wire shape.
pub fn encode(resources: &[Resource]) -> Result<String> {
    let mut out = String::new();
    for (i, r) in resources.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        let doc = serde_yaml::to_string(r).map_err(|e| TpologyError::Render {
            message: format!("failed to encode {}: {}", r.qualified_name(), e),
        })?;
        out.push_str(&doc);
    }
    Ok(out)
}
