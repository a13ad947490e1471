#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{orders_spec, Workspace};
use openapi_catalog::catalog::{CatalogExt, Collection, FsCatalog, Service};
use openapi_catalog::cli::{run_command, Commands};

#[test]
fn test_generate_command_writes_catalog() {
    let ws = Workspace::new();
    let spec = ws.write("orders.yml", &orders_spec("1.0.0", "Place an order"));
    let config = ws.write(
        "generator.yml",
        &format!(
            "services:\n  - path: {}\n    owners: [orders-team]\n",
            spec.display()
        ),
    );

    run_command(Commands::Generate {
        config,
        catalog_dir: Some(ws.catalog_dir()),
        save_parsed_spec: true,
    })
    .unwrap();

    let catalog = FsCatalog::new(ws.catalog_dir());
    let service: Service = catalog
        .get_entity(Collection::Services, "orders-api", None)
        .unwrap()
        .unwrap();
    assert_eq!(service.owners, vec!["orders-team".to_string()]);
    let stored = std::fs::read_to_string(ws.catalog_dir().join("services/orders-api/orders.yml"))
        .unwrap();
    assert!(!stored.contains("$ref"));
}

#[test]
fn test_generate_without_services_is_config_error() {
    let ws = Workspace::new();
    let config = ws.write("generator.yml", "services: []\n");
    let err = run_command(Commands::Generate {
        config,
        catalog_dir: Some(ws.catalog_dir()),
        save_parsed_spec: false,
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "Config lists no services");
    assert!(!ws.catalog_dir().exists());
}

#[test]
fn test_inspect_command_reads_spec() {
    let ws = Workspace::new();
    let spec = ws.write("orders.yml", &orders_spec("1.0.0", "Place an order"));
    run_command(Commands::Inspect {
        spec: spec.to_string_lossy().into_owned(),
    })
    .unwrap();
}
