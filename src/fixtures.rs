//! Sample inventory shared by unit and integration tests.

use crate::resource::{mapping, Resource, Value};

fn resource(kind: &str, name: &str, description: &str, owner: &str, data: Value) -> Resource {
    Resource::new(kind, name, description, owner)
        .expect("fixture kinds are not reserved")
        .with_data(data)
}

fn provider(name: &str, description: &str) -> Resource {
    resource(
        "provider",
        name,
        description,
        &format!("{name}-team"),
        mapping([("type", name.to_string()), ("account", format!("{name}-account"))]),
    )
}

fn cluster(name: &str, provider: &str, region: &str, zone: &str) -> Resource {
    resource(
        "cluster",
        name,
        &format!("{name} cluster"),
        &format!("{provider}-team"),
        mapping([
            ("provider", provider.to_string()),
            ("project", format!("{name}-project")),
            ("region", region.to_string()),
            ("zone", zone.to_string()),
        ]),
    )
}

fn environment(name: &str, description: &str, clusters: [&str; 2]) -> Resource {
    let entries = clusters
        .iter()
        .map(|c| mapping([("cluster", *c), ("namespace", name)]))
        .collect::<Vec<_>>();
    resource(
        "environment",
        name,
        description,
        &format!("{name}-team"),
        mapping([("clusters", Value::List(entries))]),
    )
}

fn application(name: &str, description: &str) -> Resource {
    resource(
        "application",
        name,
        description,
        &format!("{name}-team"),
        mapping([
            (
                "git",
                mapping([
                    ("repo", format!("{name}-repo")),
                    ("branch", format!("{name}-branch")),
                    ("path", format!("{name}-path")),
                ]),
            ),
            (
                "deployments",
                Value::List(vec![
                    mapping([("environment", "dev")]),
                    mapping([("environment", "prod")]),
                ]),
            ),
        ]),
    )
}

/// Two providers, four clusters, two environments and two applications,
/// wired together by references.
pub fn sample_resources() -> Vec<Resource> {
    vec![
        provider("gcp", "Google Cloud Platform"),
        provider("aws", "Amazon Web Services"),
        cluster("gcp-dev", "gcp", "us-east1", "us-east1-b"),
        cluster("gcp-prod", "gcp", "us-east1", "us-east1-b"),
        cluster("aws-dev", "aws", "us-east-1", "us-east-1b"),
        cluster("aws-prod", "aws", "us-east-1", "us-east-1b"),
        environment("dev", "Development Environment", ["gcp-dev", "aws-dev"]),
        environment("prod", "Production Environment", ["gcp-prod", "aws-prod"]),
        application("app1", "Application 1"),
        application("app2", "Application 2"),
    ]
}
