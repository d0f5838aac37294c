use std::fs;

use tempfile::TempDir;
use tpology::config::{save_config, TpologyConfig};
use tpology::errors::TpologyError;
use tpology::graph::{build_graph, ResolvedValue};
use tpology::render::write_dot;
use tpology::tpology::Tpology;

fn write_inventory(root: &std::path::Path) {
    fs::create_dir_all(root.join("clusters")).unwrap();
    fs::write(
        root.join("providers.yaml"),
        r#"
name: gcp
description: Google Cloud Platform
owner: platform
provider:
  type: gcp
"#,
    )
    .unwrap();
    fs::write(
        root.join("clusters/dev.yaml"),
        r#"
name: gcp-dev
description: dev cluster
owner: platform
cluster:
  provider: gcp
  region: us-east1
---
name: gcp-prod
description: prod cluster
owner: platform
cluster:
  provider: gcp
  region: us-east1
"#,
    )
    .unwrap();
    fs::write(
        root.join("environments.yml"),
        r#"
name: dev
environment:
  clusters:
    - cluster: gcp-dev
      namespace: dev
"#,
    )
    .unwrap();
}

#[test]
fn test_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let inventory_dir = dir.path().join("inventory");
    write_inventory(&inventory_dir);

    let config_path = dir.path().join("config.toml");
    let config = TpologyConfig {
        inventory_local: Some(inventory_dir.clone()),
        ..TpologyConfig::default()
    };
    save_config(&config_path, &config).unwrap();

    // Load
    let app = Tpology::open(&config_path).unwrap();
    assert_eq!(app.inventory_path().unwrap(), inventory_dir);
    let inventory = app.load_inventory().unwrap();
    assert_eq!(inventory.len(), 4);

    // Build
    let graph = build_graph(&inventory).unwrap();
    let env = graph.find("environment/dev").unwrap();
    let cluster = graph.find("cluster/gcp-dev").unwrap();
    let first = env
        .resolved_data()
        .get("clusters")
        .and_then(|c| c.at(0))
        .unwrap();
    assert_eq!(first.get("cluster").and_then(|v| v.as_node()), Some(cluster.id()));
    assert_eq!(
        first.get("namespace"),
        Some(&ResolvedValue::String("dev".to_string()))
    );

    // Traverse
    let provider = graph.find("provider/gcp").unwrap();
    let dependents = graph.dependents(provider.id(), 8);
    assert_eq!(dependents.len(), 3);

    // Render
    let mut out = Vec::new();
    write_dot(&mut out, &graph).unwrap();
    let dot = String::from_utf8(out).unwrap();
    assert!(dot.contains("\"environment/dev\" -> \"cluster/gcp-dev\";"));
}

#[test]
fn test_dangling_reference_in_files() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path());
    fs::write(
        dir.path().join("broken.yaml"),
        "name: staging\nenvironment:\n  clusters:\n    - cluster: gcp-staging\n",
    )
    .unwrap();

    let app = Tpology::new(TpologyConfig {
        inventory_local: Some(dir.path().to_path_buf()),
        ..TpologyConfig::default()
    });
    let inventory = app.load_inventory().unwrap();
    match build_graph(&inventory) {
        Err(TpologyError::DanglingReference { name, target, .. }) => {
            assert_eq!(name, "staging");
            assert_eq!(target, "gcp-staging");
        }
        other => panic!("expected dangling reference, got {:?}", other.map(|g| g.len())),
    }
}

#[test]
fn test_no_inventory_configured() {
    let app = Tpology::new(TpologyConfig::default());
    assert!(matches!(
        app.inventory_path(),
        Err(TpologyError::Config { .. })
    ));
}
