#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::Workspace;
use openapi_catalog::config::{ConfigError, GeneratorConfig};
use std::path::Path;

#[test]
fn test_load_yaml_config() {
    let ws = Workspace::new();
    let path = ws.write(
        "generator.yml",
        r#"services:
  - path: ./specs/orders.yml
    id: orders-api
    name: Orders
    owners: [orders-team]
  - path: https://example.com/payments/openapi.json
domain:
  id: commerce
  name: Commerce
  version: 0.0.1
saveParsedSpecFile: true
"#,
    );
    let config = GeneratorConfig::load(&path).unwrap();
    assert_eq!(config.services.len(), 2);
    assert_eq!(config.services[0].name.as_deref(), Some("Orders"));
    assert_eq!(config.services[1].id, None);
    assert!(config.save_parsed_spec_file);
    assert_eq!(config.domain.as_ref().unwrap().id, "commerce");

    let config = config.with_catalog_dir(Some("./catalog".into()));
    assert!(config.validate().is_ok());
    assert_eq!(config.catalog_dir().unwrap(), Path::new("./catalog"));
}

#[test]
fn test_load_toml_config() {
    let ws = Workspace::new();
    let path = ws.write(
        "generator.toml",
        r#"saveParsedSpecFile = false
catalogDir = "docs/catalog"

[[services]]
path = "specs/orders.yml"
owners = ["orders-team"]

[domain]
id = "commerce"
name = "Commerce"
version = "1.0.0"
"#,
    );
    let config = GeneratorConfig::load(&path).unwrap();
    assert_eq!(config.services[0].path, "specs/orders.yml");
    assert_eq!(config.services[0].owners, vec!["orders-team".to_string()]);
    assert_eq!(config.catalog_dir().unwrap(), Path::new("docs/catalog"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_config_is_parse_error() {
    let ws = Workspace::new();
    let path = ws.write("generator.yml", "services: {not: [a, list}\n");
    let err = GeneratorConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config"));
}

#[test]
fn test_missing_services_key_is_parse_error() {
    let ws = Workspace::new();
    let path = ws.write("generator.yml", "saveParsedSpecFile: true\n");
    assert!(matches!(
        GeneratorConfig::load(&path),
        Err(ConfigError::Parse { .. })
    ));
}
