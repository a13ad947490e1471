use super::{ensure_safe_segment, Catalog, CatalogFile, Collection, Document};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Record {
    document: Document,
    files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
struct Entry {
    latest: Option<Record>,
    versioned: BTreeMap<String, Record>,
}

impl Entry {
    fn record(&self, version: Option<&str>) -> Option<&Record> {
        match version {
            None => self.latest.as_ref(),
            Some(wanted) => self
                .latest
                .as_ref()
                .filter(|r| r.document.version() == Some(wanted))
                .or_else(|| self.versioned.get(wanted)),
        }
    }

    fn record_mut(&mut self, version: &str) -> Option<&mut Record> {
        let latest_matches = self
            .latest
            .as_ref()
            .is_some_and(|r| r.document.version() == Some(version));
        if latest_matches {
            self.latest.as_mut()
        } else {
            self.versioned.get_mut(version)
        }
    }
}

/// A [`Catalog`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: BTreeMap<(Collection, String), Entry>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids with a latest record in `collection`, sorted.
    pub fn ids(&self, collection: Collection) -> Vec<String> {
        self.entries
            .iter()
            .filter(|((c, _), entry)| *c == collection && entry.latest.is_some())
            .map(|((_, id), _)| id.clone())
            .collect()
    }

    /// Archived versions of `id`, sorted.
    pub fn versions(&self, collection: Collection, id: &str) -> Vec<String> {
        self.entries
            .get(&(collection, id.to_string()))
            .map(|entry| entry.versioned.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Catalog for InMemoryCatalog {
    fn get(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Option<Document>> {
        Ok(self
            .entries
            .get(&(collection, id.to_string()))
            .and_then(|entry| entry.record(version))
            .map(|record| record.document.clone()))
    }

    fn write(&mut self, collection: Collection, document: Document) -> anyhow::Result<()> {
        let (id, version) = document.key()?;
        ensure_safe_segment("id", id)?;
        let entry = self.entries.entry((collection, id.to_string())).or_default();
        match entry.latest.as_mut() {
            Some(existing) if existing.document.version() == Some(version) => {
                existing.document = document;
            }
            Some(existing) => anyhow::bail!(
                "{collection}/{id} already has a latest record at version {}; version it before writing {version}",
                existing.document.version().unwrap_or("<none>")
            ),
            None => {
                entry.latest = Some(Record {
                    document,
                    files: BTreeMap::new(),
                });
            }
        }
        Ok(())
    }

    fn version(&mut self, collection: Collection, id: &str) -> anyhow::Result<()> {
        let Some(entry) = self.entries.get_mut(&(collection, id.to_string())) else {
            return Ok(());
        };
        let Some(version) = entry
            .latest
            .as_ref()
            .map(|latest| latest.document.key().map(|(_, v)| v.to_string()))
            .transpose()?
        else {
            return Ok(());
        };
        if let Some(latest) = entry.latest.take() {
            entry.versioned.insert(version, latest);
        }
        Ok(())
    }

    fn remove(
        &mut self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<()> {
        let key = (collection, id.to_string());
        let Some(entry) = self.entries.get_mut(&key) else {
            return Ok(());
        };
        let latest_matches = entry
            .latest
            .as_ref()
            .is_some_and(|r| version.is_none() || r.document.version() == version);
        if latest_matches {
            entry.latest = None;
        } else if let Some(version) = version {
            entry.versioned.remove(version);
        }
        if entry.latest.is_none() && entry.versioned.is_empty() {
            self.entries.remove(&key);
        }
        Ok(())
    }

    fn add_file(
        &mut self,
        collection: Collection,
        id: &str,
        version: &str,
        file: &CatalogFile,
    ) -> anyhow::Result<()> {
        ensure_safe_segment("file name", &file.file_name)?;
        let record = self
            .entries
            .get_mut(&(collection, id.to_string()))
            .and_then(|entry| entry.record_mut(version))
            .ok_or_else(|| anyhow::anyhow!("{collection}/{id}@{version} does not exist"))?;
        record
            .files
            .insert(file.file_name.clone(), file.content.clone());
        Ok(())
    }

    fn files(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Vec<CatalogFile>> {
        Ok(self
            .entries
            .get(&(collection, id.to_string()))
            .and_then(|entry| entry.record(version))
            .map(|record| {
                record
                    .files
                    .iter()
                    .map(|(name, content)| CatalogFile::new(name, content))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogExt, Service};

    fn service(version: &str) -> Service {
        Service {
            id: "pets".into(),
            name: "Pets".into(),
            version: version.into(),
            markdown: format!("v{version}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_get_version_cycle() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .write_entity(Collection::Services, &service("1.0.0"))
            .unwrap();
        catalog
            .add_file(
                Collection::Services,
                "pets",
                "1.0.0",
                &CatalogFile::new("openapi.yml", "a"),
            )
            .unwrap();

        assert!(catalog
            .write_entity(Collection::Services, &service("2.0.0"))
            .is_err());

        catalog.version(Collection::Services, "pets").unwrap();
        assert!(catalog.get(Collection::Services, "pets", None).unwrap().is_none());
        catalog
            .write_entity(Collection::Services, &service("2.0.0"))
            .unwrap();

        let latest: Service = catalog
            .get_entity(Collection::Services, "pets", None)
            .unwrap()
            .unwrap();
        assert_eq!(latest.version, "2.0.0");
        let old: Service = catalog
            .get_entity(Collection::Services, "pets", Some("1.0.0"))
            .unwrap()
            .unwrap();
        assert_eq!(old.markdown, "v1.0.0");
        assert_eq!(
            catalog
                .files(Collection::Services, "pets", Some("1.0.0"))
                .unwrap(),
            vec![CatalogFile::new("openapi.yml", "a")]
        );
        assert!(catalog
            .files(Collection::Services, "pets", None)
            .unwrap()
            .is_empty());
        assert_eq!(catalog.versions(Collection::Services, "pets"), vec!["1.0.0"]);
    }

    #[test]
    fn test_remove_latest_drops_files() {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .write_entity(Collection::Services, &service("1.0.0"))
            .unwrap();
        catalog
            .add_file(
                Collection::Services,
                "pets",
                "1.0.0",
                &CatalogFile::new("openapi.yml", "a"),
            )
            .unwrap();
        catalog
            .remove(Collection::Services, "pets", Some("1.0.0"))
            .unwrap();
        assert!(catalog.ids(Collection::Services).is_empty());
        assert!(catalog
            .add_file(
                Collection::Services,
                "pets",
                "1.0.0",
                &CatalogFile::new("openapi.yml", "a")
            )
            .is_err());
    }

    #[test]
    fn test_version_keeps_unkeyed_latest() {
        let mut catalog = InMemoryCatalog::new();
        catalog.entries.insert(
            (Collection::Services, "pets".to_string()),
            Entry {
                latest: Some(Record::default()),
                versioned: BTreeMap::new(),
            },
        );
        assert!(catalog.version(Collection::Services, "pets").is_err());
        assert!(catalog
            .get(Collection::Services, "pets", None)
            .unwrap()
            .is_some());
        assert!(catalog.versions(Collection::Services, "pets").is_empty());
    }
}
