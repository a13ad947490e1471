use std::collections::BTreeMap;

use super::slug::slugify;
use super::templates::service_markdown;
use crate::catalog::{Badge, Service, OPENAPI_SPECIFICATION_KEY};
use crate::config::ServiceSpec;
use crate::spec::SpecDocument;

/// Summaries at or above this many characters are dropped.
pub const SUMMARY_MAX_CHARS: usize = 150;

/// Name of the attached spec file when the source has no usable file name.
pub const DEFAULT_SCHEMA_FILE: &str = "openapi.yml";

/// `text` when it is short enough to be a summary.
pub(crate) fn short_summary(text: Option<&str>) -> String {
    text.filter(|t| t.chars().count() < SUMMARY_MAX_CHARS)
        .unwrap_or_default()
        .to_string()
}

/// Derive the service record for one configured document.
///
/// `sends`/`receives` are left empty; the reconciler fills them from the
/// processed messages.
pub fn build_service(spec: &ServiceSpec, doc: &SpecDocument) -> anyhow::Result<Service> {
    let id = match spec.id.as_deref().filter(|id| !id.trim().is_empty()) {
        Some(id) => id.to_string(),
        None => slugify(doc.title()),
    };
    if id.is_empty() {
        anyhow::bail!(
            "cannot derive a service id from title `{}`; set `id` in the config",
            doc.title()
        );
    }

    let schema_path = doc
        .source
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_SCHEMA_FILE.to_string());

    let mut specifications = BTreeMap::new();
    specifications.insert(OPENAPI_SPECIFICATION_KEY.to_string(), schema_path.clone());

    Ok(Service {
        id,
        name: spec
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| doc.title().to_string()),
        version: doc.version().to_string(),
        summary: short_summary(doc.description()),
        schema_path,
        specifications,
        badges: doc.tags().into_iter().map(Badge::blue).collect(),
        sends: Vec::new(),
        receives: Vec::new(),
        owners: spec.owners.clone(),
        repository: None,
        markdown: service_markdown(doc)?,
    })
}
