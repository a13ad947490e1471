//! # Spec Module
//!
//! Loading, validation and operation extraction for OpenAPI 3 documents.
//!
//! - [`load_document`] reads a spec from a local path or an `http(s)` URL,
//!   parses YAML or JSON, validates it structurally and resolves `$ref`s.
//! - [`extract_operations`] flattens `paths` into [`Operation`]s, each tagged
//!   with a [`MessageKind`] and a [`MessageAction`] read from the
//!   `x-eventcatalog-*` vendor extensions.
//! - [`operation_schemas`] looks up parameters, request body and responses of
//!   one operation in the resolved document.
//!
//! ```rust,ignore
//! use openapi_catalog::spec::{extract_operations, load_document, SpecSource};
//!
//! let doc = load_document(&SpecSource::parse("openapi.yml"))?;
//! for op in extract_operations(&doc) {
//!     println!("{} {} → {} ({})", op.method, op.path, op.kind, op.action);
//! }
//! ```

mod load;
mod operations;
mod resolve;
mod types;

pub use load::*;
pub use operations::*;
pub use resolve::*;
pub use types::*;
