use super::structured::{to_json, to_yaml, yaml_string};
use super::table::{kind_table, resource_table, Table, TableFormat};
use crate::errors::Result;
use crate::resource::Resource;

/// Resource listing as `table`, `markdown`, `csv`, `json` or `yaml`.
pub fn list_resources(resources: &[&Resource], format: &str) -> Result<String> {
    match format {
        "json" => Ok(to_json(resources)? + "\n"),
        "yaml" => to_yaml(resources),
        other => render_table(&resource_table(resources.iter().copied())?, other),
    }
}

/// Kind listing in the same formats as [`list_resources`]. The structured
/// forms are a plain sequence of kind names.
pub fn list_kinds(kinds: &[&str], format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(kinds)? + "\n"),
        "yaml" => yaml_string(kinds),
        other => render_table(&kind_table(kinds.iter().copied())?, other),
    }
}

fn render_table(table: &Table, format: &str) -> Result<String> {
    table.render(format.parse::<TableFormat>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kinds_structured() {
        let kinds = ["cluster", "provider"];
        assert_eq!(
            list_kinds(&kinds, "json").unwrap(),
            "[\n  \"cluster\",\n  \"provider\"\n]\n"
        );
        assert_eq!(list_kinds(&kinds, "yaml").unwrap(), "- cluster\n- provider\n");
        assert_eq!(list_kinds(&kinds, "csv").unwrap(), "Name\ncluster\nprovider\n");
    }

    #[test]
    fn test_unknown_listing_format() {
        assert!(list_kinds(&["cluster"], "xml").is_err());
        assert!(list_resources(&[], "xml").is_err());
    }
}
