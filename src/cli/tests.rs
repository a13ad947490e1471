//! Unit tests for CLI commands

use crate::cli::{run_command, Cli, Commands};
use clap::Parser;
use std::path::Path;

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "openapi-catalog-gen",
        "generate",
        "--config",
        "generator.yml",
        "--catalog-dir",
        "catalog",
        "--save-parsed-spec",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            config,
            catalog_dir,
            save_parsed_spec,
        } => {
            assert_eq!(config, Path::new("generator.yml"));
            assert_eq!(catalog_dir.as_deref(), Some(Path::new("catalog")));
            assert!(save_parsed_spec);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_inspect_command_parses_url() {
    let cli = Cli::try_parse_from([
        "openapi-catalog-gen",
        "-v",
        "inspect",
        "--spec",
        "https://example.com/openapi.yml",
    ])
    .unwrap();
    assert!(cli.verbose);
    match cli.command {
        Commands::Inspect { spec } => assert_eq!(spec, "https://example.com/openapi.yml"),
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_generate_requires_config() {
    assert!(Cli::try_parse_from(["openapi-catalog-gen", "generate"]).is_err());
}

#[test]
fn test_generate_with_missing_config_file_fails() {
    let err = run_command(Commands::Generate {
        config: "does/not/exist.yml".into(),
        catalog_dir: Some("catalog".into()),
        save_parsed_spec: false,
    })
    .unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}
