//! # Catalog Module
//!
//! The documentation catalog the generator writes into, behind the [`Catalog`]
//! trait so reconciliation can run against the filesystem ([`FsCatalog`]) or
//! an in-memory store ([`InMemoryCatalog`]).
//!
//! ## Model
//!
//! Every record is a [`Document`]: YAML frontmatter plus a markdown body,
//! keyed by `(collection, id, version)`. For each id there is at most one
//! *latest* record; older ones are archived by [`Catalog::version`]. Files
//! (specifications, JSON schemas) are attached to a single record and move
//! with it when it is archived.
//!
//! Typed access goes through [`Entity`] and the blanket [`CatalogExt`]:
//!
//! ```rust,ignore
//! use openapi_catalog::catalog::{CatalogExt, Collection, InMemoryCatalog, Service};
//!
//! let catalog = InMemoryCatalog::new();
//! let latest: Option<Service> = catalog.get_entity(Collection::Services, "pets", None)?;
//! ```

mod entities;
mod fs;
mod memory;

pub use entities::*;
pub use fs::FsCatalog;
pub use memory::InMemoryCatalog;

use crate::spec::MessageKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Top-level folders of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Domains,
    Services,
    Events,
    Commands,
    Queries,
}

impl Collection {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Domains => "domains",
            Collection::Services => "services",
            Collection::Events => "events",
            Collection::Commands => "commands",
            Collection::Queries => "queries",
        }
    }
}

impl From<MessageKind> for Collection {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Event => Collection::Events,
            MessageKind::Command => Collection::Commands,
            MessageKind::Query => Collection::Queries,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A catalog record: frontmatter and markdown body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub frontmatter: serde_yaml::Mapping,
    pub markdown: String,
}

impl Document {
    pub fn id(&self) -> Option<&str> {
        self.frontmatter.get("id").and_then(serde_yaml::Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.frontmatter
            .get("version")
            .and_then(serde_yaml::Value::as_str)
    }

    /// `(id, version)` of the record, failing when either is missing.
    pub fn key(&self) -> anyhow::Result<(&str, &str)> {
        match (self.id(), self.version()) {
            (Some(id), Some(version)) => Ok((id, version)),
            _ => anyhow::bail!("catalog document is missing `id` or `version`"),
        }
    }
}

/// A file attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub file_name: String,
    pub content: String,
}

impl CatalogFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        CatalogFile {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Read/write primitives of a documentation catalog.
///
/// `version: None` always means the latest record of an id.
pub trait Catalog {
    /// Fetch a record; `None` when the id (or that version of it) does not exist.
    fn get(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Option<Document>>;

    /// Write a record as the latest one for its id.
    ///
    /// Overwrites a latest record with the same version. Fails if the latest
    /// record has another version; archive it with [`Catalog::version`] first.
    fn write(&mut self, collection: Collection, document: Document) -> anyhow::Result<()>;

    /// Archive the latest record of `id` (and its files) under its own version.
    fn version(&mut self, collection: Collection, id: &str) -> anyhow::Result<()>;

    /// Delete a record and its attached files.
    fn remove(
        &mut self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<()>;

    /// Attach (or replace) a file on the record `id@version`.
    fn add_file(
        &mut self,
        collection: Collection,
        id: &str,
        version: &str,
        file: &CatalogFile,
    ) -> anyhow::Result<()>;

    /// Files attached to a record, sorted by name.
    fn files(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Vec<CatalogFile>>;
}

/// A typed catalog record.
pub trait Entity: Serialize + DeserializeOwned {
    fn id(&self) -> &str;
    fn version(&self) -> &str;
    fn markdown(&self) -> &str;
    fn set_markdown(&mut self, markdown: String);

    fn to_document(&self) -> anyhow::Result<Document> {
        match serde_yaml::to_value(self)? {
            serde_yaml::Value::Mapping(frontmatter) => Ok(Document {
                frontmatter,
                markdown: self.markdown().to_string(),
            }),
            _ => anyhow::bail!("entity `{}` did not serialize to a mapping", self.id()),
        }
    }

    fn from_document(document: Document) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        let mut entity: Self =
            serde_yaml::from_value(serde_yaml::Value::Mapping(document.frontmatter))?;
        entity.set_markdown(document.markdown);
        Ok(entity)
    }
}

/// Typed helpers over any [`Catalog`].
pub trait CatalogExt: Catalog {
    fn get_entity<E: Entity>(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Option<E>> {
        self.get(collection, id, version)?
            .map(E::from_document)
            .transpose()
    }

    fn write_entity<E: Entity>(&mut self, collection: Collection, entity: &E) -> anyhow::Result<()> {
        self.write(collection, entity.to_document()?)
    }
}

impl<C: Catalog + ?Sized> CatalogExt for C {}

/// Reject ids and file names that would escape their record directory.
pub(crate) fn ensure_safe_segment(kind: &str, segment: &str) -> anyhow::Result<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        anyhow::bail!("invalid catalog {kind} `{segment}`");
    }
    Ok(())
}
