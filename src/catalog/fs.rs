//! Filesystem-backed catalog.
//!
//! Layout under the catalog root:
//!
//! ```text
//! services/
//! └── pets-api/
//!     ├── index.mdx            # latest record: frontmatter + markdown
//!     ├── openapi.yml          # attached files
//!     └── versioned/
//!         └── 0.1.0/
//!             ├── index.mdx    # archived record
//!             └── openapi.yml
//! ```

use super::{ensure_safe_segment, Catalog, CatalogFile, Collection, Document};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "index.mdx";
const VERSIONED_DIR: &str = "versioned";

/// A catalog stored as markdown files under a root directory.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    root: PathBuf,
}

impl FsCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsCatalog { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_dir(&self, collection: Collection, id: &str) -> anyhow::Result<PathBuf> {
        ensure_safe_segment("id", id)?;
        Ok(self.root.join(collection.dir_name()).join(id))
    }

    /// Directory holding `id@version`, if that record exists.
    fn record_dir(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Option<PathBuf>> {
        let dir = self.entity_dir(collection, id)?;
        let latest = read_document(&dir.join(INDEX_FILE))?;
        match (version, latest) {
            (None, Some(_)) => Ok(Some(dir)),
            (None, None) => Ok(None),
            (Some(wanted), Some(doc)) if doc.version() == Some(wanted) => Ok(Some(dir)),
            (Some(wanted), _) => {
                ensure_safe_segment("version", wanted)?;
                let archived = dir.join(VERSIONED_DIR).join(wanted);
                if archived.join(INDEX_FILE).is_file() {
                    Ok(Some(archived))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

impl Catalog for FsCatalog {
    fn get(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Option<Document>> {
        match self.record_dir(collection, id, version)? {
            Some(dir) => read_document(&dir.join(INDEX_FILE)),
            None => Ok(None),
        }
    }

    fn write(&mut self, collection: Collection, document: Document) -> anyhow::Result<()> {
        let (id, version) = document.key()?;
        let dir = self.entity_dir(collection, id)?;
        let index = dir.join(INDEX_FILE);
        if let Some(existing) = read_document(&index)? {
            if existing.version() != Some(version) {
                anyhow::bail!(
                    "{collection}/{id} already has a latest record at version {}; version it before writing {version}",
                    existing.version().unwrap_or("<none>")
                );
            }
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        fs::write(&index, render_document(&document)?)
            .with_context(|| format!("Failed to write {}", index.display()))?;
        Ok(())
    }

    fn version(&mut self, collection: Collection, id: &str) -> anyhow::Result<()> {
        let dir = self.entity_dir(collection, id)?;
        let Some(latest) = read_document(&dir.join(INDEX_FILE))? else {
            tracing::debug!(%collection, id, "nothing to version");
            return Ok(());
        };
        let (_, version) = latest.key()?;
        ensure_safe_segment("version", version)?;
        let target = dir.join(VERSIONED_DIR).join(version);
        if target.exists() {
            fs::remove_dir_all(&target)
                .with_context(|| format!("Failed to replace {}", target.display()))?;
        }
        fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create directory {}", target.display()))?;
        for entry in record_entries(&dir)? {
            let name = entry.file_name().unwrap_or_default().to_owned();
            fs::rename(&entry, target.join(&name)).with_context(|| {
                format!("Failed to move {} into {}", entry.display(), target.display())
            })?;
        }
        Ok(())
    }

    fn remove(
        &mut self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(dir) = self.record_dir(collection, id, version)? else {
            return Ok(());
        };
        let entity_dir = self.entity_dir(collection, id)?;
        if dir == entity_dir {
            for entry in record_entries(&dir)? {
                let removed = if entry.is_dir() {
                    fs::remove_dir_all(&entry)
                } else {
                    fs::remove_file(&entry)
                };
                removed.with_context(|| format!("Failed to remove {}", entry.display()))?;
            }
            if fs::read_dir(&dir)?.next().is_none() {
                fs::remove_dir(&dir)?;
            }
        } else {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
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
        if file.file_name == INDEX_FILE {
            anyhow::bail!("`{INDEX_FILE}` is reserved for the record itself");
        }
        let dir = self
            .record_dir(collection, id, Some(version))?
            .with_context(|| format!("{collection}/{id}@{version} does not exist"))?;
        let path = dir.join(&file.file_name);
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn files(
        &self,
        collection: Collection,
        id: &str,
        version: Option<&str>,
    ) -> anyhow::Result<Vec<CatalogFile>> {
        let Some(dir) = self.record_dir(collection, id, version)? else {
            return Ok(Vec::new());
        };
        let mut files = Vec::new();
        for entry in record_entries(&dir)? {
            let name = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !entry.is_file() || name == INDEX_FILE {
                continue;
            }
            let content = fs::read_to_string(&entry)
                .with_context(|| format!("Failed to read {}", entry.display()))?;
            files.push(CatalogFile::new(name, content));
        }
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }
}

/// Everything in a record directory except the archive folder.
fn record_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry?;
        if entry.file_name() == VERSIONED_DIR {
            continue;
        }
        entries.push(entry.path());
    }
    Ok(entries)
}

fn read_document(path: &Path) -> anyhow::Result<Option<Document>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_document(&text)
        .with_context(|| format!("Malformed catalog record {}", path.display()))
        .map(Some)
}

/// Split `---\n<yaml>---\n<markdown>` into a [`Document`].
pub(crate) fn parse_document(text: &str) -> anyhow::Result<Document> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
        .context("missing frontmatter start delimiter")?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let markdown = &rest[offset + line.len()..];
            let frontmatter = if yaml.trim().is_empty() {
                serde_yaml::Mapping::new()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok(Document {
                frontmatter,
                markdown: markdown.to_string(),
            });
        }
        offset += line.len();
    }
    anyhow::bail!("missing frontmatter end delimiter")
}

pub(crate) fn render_document(document: &Document) -> anyhow::Result<String> {
    let yaml = serde_yaml::to_string(&document.frontmatter)?;
    Ok(format!("---\n{yaml}---\n{}", document.markdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_round_trip_keeps_markdown_verbatim() {
        let text = "---\nid: pets\nversion: 1.0.0\n---\n\n## Title\n\n---\nnot a delimiter\n";
        let doc = parse_document(text).unwrap();
        assert_eq!(doc.id(), Some("pets"));
        assert_eq!(doc.markdown, "\n## Title\n\n---\nnot a delimiter\n");
        assert_eq!(render_document(&doc).unwrap(), text);
    }

    #[test]
    fn test_parse_requires_delimiters() {
        assert!(parse_document("id: pets\n").is_err());
        assert!(parse_document("---\nid: pets\n").is_err());
    }
}
