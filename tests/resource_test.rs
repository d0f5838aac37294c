use std::fs;

use tempfile::TempDir;
use tpology::errors::TpologyError;
use tpology::resource::*;

/// A resource exercising every payload shape.
fn rich_resource() -> Resource {
    Resource::new("cluster", "gcp-dev", "Dev cluster", "gcp-team")
        .expect("cluster is not reserved")
        .with_data(mapping([
            ("provider", Value::from("gcp")),
            ("nodes", Value::Integer(3)),
            ("cpu", Value::Float(1.5)),
            ("autoscale", Value::Bool(true)),
            ("labels", Value::Null),
            (
                "zones",
                Value::List(vec![Value::from("us-east1-b"), Value::from("us-east1-c")]),
            ),
            ("network", mapping([("vpc", "default")])),
        ]))
}

#[test]
fn test_new_rejects_reserved_words() {
    for kind in ["name", "description", "owner"] {
        match Resource::new(kind, "x", "", "") {
            Err(TpologyError::ReservedKind { kind: k }) => assert_eq!(k, kind),
            other => panic!("expected ReservedKind for '{}', got {:?}", kind, other),
        }
    }
}

#[test]
fn test_new_has_empty_payload() {
    let r = Resource::new("provider", "gcp", "Google", "team").unwrap();
    assert_eq!(r.kind(), "provider");
    assert_eq!(r.description(), "Google");
    assert!(r.data.is_null());
    assert!(r.loaded_from().is_none());
}

#[test]
fn test_yaml_roundtrip() {
    let r = rich_resource();
    let text = serde_yaml::to_string(&r).unwrap();
    let decoded: Resource = serde_yaml::from_str(&text).unwrap();
    assert_eq!(r, decoded);
}

#[test]
fn test_json_roundtrip() {
    let r = rich_resource();
    let text = serde_json::to_string(&r).unwrap();
    let decoded: Resource = serde_json::from_str(&text).unwrap();
    assert_eq!(r, decoded);
}

#[test]
fn test_encoded_shape_is_flat() {
    let r = rich_resource();
    let value: serde_json::Value = serde_json::to_value(&r).unwrap();
    let obj = value.as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["cluster", "description", "name", "owner"]);
    assert_eq!(obj["cluster"]["provider"], "gcp");
}

#[test]
fn test_encode_then_decode_stream() {
    let a = rich_resource();
    let b = Resource::new("provider", "gcp", "", "").unwrap().with_data(mapping([("type", "gcp")]));
    let text = encode(&[a.clone(), b.clone()]).unwrap();
    assert!(text.contains("---"));
    assert_eq!(decode_str(&text).unwrap(), vec![a, b]);
}

#[test]
fn test_decode_missing_metadata_defaults_to_empty() {
    let resources = decode_str("cluster:\n  provider: gcp\n").unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].name(), "");
    assert_eq!(resources[0].description(), "");
    assert_eq!(resources[0].owner(), "");
}

#[test]
fn test_deserialize_rejects_two_kinds() {
    let err = serde_yaml::from_str::<Resource>("name: x\na: 1\nb: 2\n").unwrap_err();
    assert!(err.to_string().contains("more than one kind"));
}

#[test]
fn test_decode_rejects_non_mapping_document() {
    let err = decode_str("- a\n- b\n").unwrap_err();
    assert!(matches!(err, TpologyError::Shape { .. }));
}

#[test]
fn test_decode_reader() {
    let text = b"name: a\nprovider: {}\n";
    let resources = decode_reader(&text[..]).unwrap();
    assert_eq!(resources[0].kind(), "provider");
}

#[test]
fn test_load_file_records_provenance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("providers.yaml");
    fs::write(&path, "name: gcp\nprovider: {}\n---\nname: aws\nprovider: {}\n").unwrap();

    let resources = load_file(&path).unwrap();
    assert_eq!(resources.len(), 2);
    for r in &resources {
        assert_eq!(r.loaded_from(), Some(path.as_path()));
    }
}

#[test]
fn test_load_file_error_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "name: a\n").unwrap();

    let err = load_file(&path).unwrap_err();
    match &err {
        TpologyError::Shape { path: Some(p), .. } => assert_eq!(p, &path),
        other => panic!("expected shape error with path, got {:?}", other),
    }
    assert!(err.to_string().contains("bad.yaml"));
}

#[test]
fn test_load_file_missing() {
    let dir = TempDir::new().unwrap();
    let err = load_file(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, TpologyError::Io(_)));
}

#[test]
fn test_large_integer_survives_reencode() {
    let decoded = decode_str("name: a\nthing:\n  n: 18446744073709551615\n").unwrap();
    assert_eq!(decoded[0].data.get("n"), Some(&Value::UInt(u64::MAX)));

    let text = encode(&decoded).unwrap();
    assert!(text.contains("n: 18446744073709551615"));
    assert_eq!(decode_str(&text).unwrap(), decoded);
}
