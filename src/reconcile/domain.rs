use super::warn_if_older;
use crate::catalog::{Catalog, CatalogExt, Collection, Domain, ResourceRef};
use crate::config::DomainSpec;
use crate::generator::domain_markdown;

/// Make sure the configured domain exists at its version and lists `service`.
///
/// A latest domain at another version is archived first. When the configured
/// version is itself archived, that record (markdown, services and files) is
/// restored as latest instead of being recreated. A reference that is already
/// listed with the same id and version is not added again.
pub fn reconcile_domain<C: Catalog + ?Sized>(
    catalog: &mut C,
    spec: &DomainSpec,
    service: &ResourceRef,
) -> anyhow::Result<Domain> {
    let collection = Collection::Domains;
    let latest: Option<Domain> = catalog.get_entity(collection, &spec.id, None)?;

    let mut domain = match latest {
        Some(current) if current.version == spec.version => current,
        current => {
            let archived: Option<Domain> =
                catalog.get_entity(collection, &spec.id, Some(&spec.version))?;
            let archived_files = match &archived {
                Some(_) => catalog.files(collection, &spec.id, Some(&spec.version))?,
                None => Vec::new(),
            };
            if let Some(current) = &current {
                warn_if_older(collection, &spec.id, &current.version, &spec.version);
                tracing::info!(
                    id = %spec.id,
                    from = %current.version,
                    to = %spec.version,
                    "📦 Versioning domain"
                );
                catalog.version(collection, &spec.id)?;
            }
            match archived {
                Some(domain) => {
                    tracing::info!(
                        id = %spec.id,
                        version = %spec.version,
                        "♻️ Restoring archived domain"
                    );
                    catalog.remove(collection, &spec.id, Some(&spec.version))?;
                    catalog.write_entity(collection, &domain)?;
                    for file in &archived_files {
                        catalog.add_file(collection, &spec.id, &spec.version, file)?;
                    }
                    domain
                }
                None => {
                    tracing::info!(id = %spec.id, version = %spec.version, "✅ Creating domain");
                    Domain {
                        id: spec.id.clone(),
                        name: spec.name.clone(),
                        version: spec.version.clone(),
                        services: Vec::new(),
                        markdown: domain_markdown()?,
                    }
                }
            }
        }
    };

    if domain.services.contains(service) {
        tracing::debug!(domain = %domain.id, service = %service.id, "service already listed");
    } else {
        domain.services.push(service.clone());
    }
    catalog.write_entity(collection, &domain)?;
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogFile, InMemoryCatalog};

    fn spec(version: &str) -> DomainSpec {
        DomainSpec {
            id: "orders".into(),
            name: "Orders".into(),
            version: version.into(),
        }
    }

    #[test]
    fn test_create_and_append_once() {
        let mut catalog = InMemoryCatalog::new();
        let api = ResourceRef::new("orders-api", "1.0.0");
        reconcile_domain(&mut catalog, &spec("0.0.1"), &api).unwrap();
        let domain = reconcile_domain(&mut catalog, &spec("0.0.1"), &api).unwrap();
        assert_eq!(domain.services, vec![api.clone()]);
        assert!(domain.markdown.contains("<NodeGraph />"));

        let next = ResourceRef::new("orders-api", "2.0.0");
        let domain = reconcile_domain(&mut catalog, &spec("0.0.1"), &next).unwrap();
        assert_eq!(domain.services, vec![api, next]);
    }

    #[test]
    fn test_new_domain_version_archives_old() {
        let mut catalog = InMemoryCatalog::new();
        let api = ResourceRef::new("orders-api", "1.0.0");
        reconcile_domain(&mut catalog, &spec("0.0.1"), &api).unwrap();
        let domain = reconcile_domain(&mut catalog, &spec("0.0.2"), &api).unwrap();
        assert_eq!(domain.version, "0.0.2");
        assert_eq!(domain.services, vec![api]);
        assert_eq!(catalog.versions(Collection::Domains, "orders"), vec!["0.0.1"]);
    }

    #[test]
    fn test_archived_version_is_restored_not_recreated() {
        let mut catalog = InMemoryCatalog::new();
        let a = ResourceRef::new("a", "1.0.0");
        let b = ResourceRef::new("b", "1.0.0");
        let mut first = reconcile_domain(&mut catalog, &spec("0.0.1"), &a).unwrap();
        first.markdown = "Curated notes".into();
        catalog.write_entity(Collection::Domains, &first).unwrap();
        catalog
            .add_file(
                Collection::Domains,
                "orders",
                "0.0.1",
                &CatalogFile::new("diagram.md", "flow"),
            )
            .unwrap();

        reconcile_domain(&mut catalog, &spec("0.0.2"), &a).unwrap();
        let restored = reconcile_domain(&mut catalog, &spec("0.0.1"), &b).unwrap();
        assert_eq!(restored.markdown, "Curated notes");
        assert_eq!(restored.services, vec![a.clone(), b.clone()]);
        assert_eq!(catalog.versions(Collection::Domains, "orders"), vec!["0.0.2"]);
        assert_eq!(
            catalog.files(Collection::Domains, "orders", None).unwrap(),
            vec![CatalogFile::new("diagram.md", "flow")]
        );

        reconcile_domain(&mut catalog, &spec("0.0.2"), &a).unwrap();
        let archived: Domain = catalog
            .get_entity(Collection::Domains, "orders", Some("0.0.1"))
            .unwrap()
            .unwrap();
        assert_eq!(archived.markdown, "Curated notes");
        assert_eq!(archived.services, vec![a, b]);
    }
}
