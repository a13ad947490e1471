use crate::catalog::FsCatalog;
use crate::config::GeneratorConfig;
use crate::generator::{fallback_message_id, generate_catalog};
use crate::logging::{init_logging, LogConfig};
use crate::spec::{extract_operations, load_document, SpecSource, MESSAGE_ID_EXTENSION};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for the OpenAPI catalog generator
///
/// Reads OpenAPI specifications and writes domains, services and messages
/// into a documentation catalog directory.
#[derive(Parser)]
#[command(name = "openapi-catalog-gen", version)]
#[command(about = "Generate catalog entries from OpenAPI specifications", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate or update catalog entries for every configured spec
    Generate {
        /// Generator config file (YAML, or TOML by extension)
        #[arg(short, long, env = "CATALOG_GEN_CONFIG")]
        config: PathBuf,

        /// Catalog root directory; falls back to `catalogDir` in the config
        /// and then to the PROJECT_DIR environment variable
        #[arg(long)]
        catalog_dir: Option<PathBuf>,

        /// Store the `$ref`-resolved spec instead of the source text
        #[arg(long, default_value_t = false)]
        save_parsed_spec: bool,
    },
    /// Print the messages a spec would produce, without touching a catalog
    Inspect {
        /// Path or http(s) URL of the OpenAPI specification
        #[arg(short, long)]
        spec: String,
    },
}

/// Parse arguments, set up logging and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    init_logging(&log_config)?;
    run_command(cli.command)
}

pub fn run_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            config,
            catalog_dir,
            save_parsed_spec,
        } => {
            let mut config = GeneratorConfig::load(&config)?.with_catalog_dir(catalog_dir);
            config.save_parsed_spec_file |= save_parsed_spec;
            config.validate()?;

            let mut catalog = FsCatalog::new(config.catalog_dir()?);
            tracing::info!(
                catalog = %catalog.root().display(),
                services = config.services.len(),
                "🚀 Generating catalog"
            );
            let report = generate_catalog(&config, &mut catalog);
            for skipped in &report.skipped {
                eprintln!("⚠️  Skipped {}: {}", skipped.path, skipped.reason);
            }
            Ok(())
        }
        Commands::Inspect { spec } => {
            let doc = load_document(&SpecSource::parse(&spec))?;
            println!("{} {}", doc.title(), doc.version());
            for operation in extract_operations(&doc) {
                let id = operation
                    .extension_str(MESSAGE_ID_EXTENSION)
                    .map(str::to_string)
                    .or_else(|| operation.operation_id.clone())
                    .unwrap_or_else(|| fallback_message_id(doc.title(), &operation));
                println!(
                    "{:<7} {:<40} {:<8} {:<9} {}",
                    operation.method.as_str(),
                    operation.path,
                    operation.kind,
                    operation.action,
                    id
                );
            }
            Ok(())
        }
    }
}
