use super::{carried_markdown, warn_if_older};
use crate::catalog::{Catalog, CatalogExt, Collection, Message, ResourceRef};
use crate::generator::BuiltMessage;
use anyhow::Context;

/// Write a derived message into its collection and attach its schema files.
///
/// Returns the reference the owning service should list.
pub fn reconcile_message<C: Catalog + ?Sized>(
    catalog: &mut C,
    built: &BuiltMessage,
) -> anyhow::Result<ResourceRef> {
    let collection = Collection::from(built.kind);
    let mut message = built.message.clone();

    let latest: Option<Message> = catalog
        .get_entity(collection, &message.id, None)
        .with_context(|| format!("Failed to read {collection}/{}", message.id))?;

    if let Some(latest) = latest {
        message.markdown = carried_markdown(latest.markdown, message.markdown);
        if latest.version == message.version {
            catalog.remove(collection, &message.id, Some(&latest.version))?;
        } else {
            warn_if_older(collection, &message.id, &latest.version, &message.version);
            tracing::info!(
                %collection,
                id = %message.id,
                from = %latest.version,
                to = %message.version,
                "📦 Versioning message"
            );
            catalog.version(collection, &message.id)?;
        }
    }

    catalog.write_entity(collection, &message)?;
    for file in &built.files {
        catalog
            .add_file(collection, &message.id, &message.version, file)
            .with_context(|| {
                format!(
                    "Failed to attach {} to {collection}/{}",
                    file.file_name, message.id
                )
            })?;
    }
    tracing::debug!(%collection, id = %message.id, version = %message.version, "message written");

    Ok(message.reference())
}
