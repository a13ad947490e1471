//! # openapi-catalog
//!
//! **openapi-catalog** turns OpenAPI 3 specifications into entries of a
//! file-based documentation catalog: one *service* per document, one
//! *message* (event, command or query) per operation, and optionally a
//! *domain* grouping the services.
//!
//! Re-running the generator is safe. Entities are merged into what is already
//! in the catalog: hand-written markdown, owners, repository metadata and
//! curated `sends` lists survive, and a new API version archives the previous
//! record instead of overwriting it.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Load (file or URL), validate and `$ref`-resolve documents; extract operations
//! - **[`generator`]** - Build services and messages, render markdown, drive a run
//! - **[`reconcile`]** - Create / version / update decisions against the catalog
//! - **[`catalog`]** - The [`Catalog`](catalog::Catalog) trait, filesystem and in-memory stores
//! - **[`config`]** - Generator configuration (YAML or TOML)
//! - **[`cli`]** - The `openapi-catalog-gen` command line
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`validator`]** - Structural validation issues
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(openapi-catalog-gen)
//!     participant Spec as spec::load_document
//!     participant Gen as generator
//!     participant Rec as reconcile
//!     participant Cat as Catalog
//!
//!     CLI->>Spec: load_document(path or URL)
//!     Spec-->>CLI: SpecDocument
//!     CLI->>Gen: build_service(&ServiceSpec, &doc)
//!     Gen->>Rec: reconcile_domain(domain, service ref)
//!     Rec->>Cat: get / version / write
//!     loop every operation
//!         Gen->>Gen: build_message(&doc, &op)
//!         Gen->>Rec: reconcile_message(built)
//!         Rec->>Cat: get / remove or version / write / add_file
//!     end
//!     Gen->>Rec: reconcile_service(service, sends/receives, spec file)
//!     Rec->>Cat: get / files / remove or version / write / add_file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use openapi_catalog::catalog::FsCatalog;
//! use openapi_catalog::config::GeneratorConfig;
//! use openapi_catalog::generator::generate_catalog;
//!
//! let config = GeneratorConfig::load("generator.yml".as_ref())?
//!     .with_catalog_dir(Some("./catalog".into()));
//! config.validate()?;
//! let mut catalog = FsCatalog::new(config.catalog_dir()?);
//! let report = generate_catalog(&config, &mut catalog);
//! println!("{report}");
//! ```
//!
//! ## Vendor extensions
//!
//! | Extension                        | Effect                                  |
//! |----------------------------------|-----------------------------------------|
//! | `x-eventcatalog-message-type`    | `event`, `command` or `query` (default) |
//! | `x-eventcatalog-message-action`  | `sends`; anything else is `receives`    |
//! | `x-eventcatalog-message-id`      | message id override                     |
//! | `x-eventcatalog-message-name`    | message name override                   |
//! | `x-eventcatalog-message-version` | message version override                |

pub mod catalog;
pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod reconcile;
pub mod spec;
pub mod validator;

pub use catalog::{Catalog, CatalogExt, Collection, FsCatalog, InMemoryCatalog};
pub use config::{ConfigError, GeneratorConfig};
pub use generator::{generate_catalog, RunReport};
pub use spec::{load_document, SpecDocument, SpecError, SpecSource};
