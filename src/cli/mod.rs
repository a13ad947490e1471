//! # CLI Module
//!
//! Command-line interface of the `openapi-catalog-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Process every spec listed in a config file into a catalog directory:
//!
//! ```bash
//! openapi-catalog-gen generate --config generator.yml --catalog-dir ./catalog
//! PROJECT_DIR=./catalog openapi-catalog-gen generate --config generator.toml
//! ```
//!
//! Options:
//! - `--config <FILE>` - Generator config, YAML or TOML (required)
//! - `--catalog-dir <DIR>` - Catalog root (else `catalogDir` or `PROJECT_DIR`)
//! - `--save-parsed-spec` - Store the `$ref`-resolved spec instead of the source
//!
//! Specs that fail to load are logged and skipped; the command only fails on
//! configuration errors.
//!
//! ### `inspect`
//!
//! List the messages a spec would produce (method, path, kind, direction, id):
//!
//! ```bash
//! openapi-catalog-gen inspect --spec openapi.yml
//! ```
//!
//! Logging is configured through `CATALOG_GEN_LOG_*` variables (see
//! [`crate::logging`]); `-v` raises the level to debug.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, run_command, Cli, Commands};
