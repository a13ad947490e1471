use super::{carried_markdown, dedupe_by_id, merge_refs, warn_if_older, Directions};
use crate::catalog::{Catalog, CatalogExt, CatalogFile, Collection, Service};
use anyhow::Context;

/// Merge a derived service into the catalog and attach its spec file.
///
/// `derived` holds the references collected from this run's messages;
/// `spec_file` is the OpenAPI document to store next to the record (its name
/// is the service's `schemaPath`). Specification files listed in the previous
/// record's `specifications` are carried over to the new one.
pub fn reconcile_service<C: Catalog + ?Sized>(
    catalog: &mut C,
    incoming: Service,
    derived: Directions,
    spec_file: &CatalogFile,
) -> anyhow::Result<Service> {
    let collection = Collection::Services;
    let mut service = incoming;
    let latest: Option<Service> = catalog
        .get_entity(collection, &service.id, None)
        .with_context(|| format!("Failed to read {collection}/{}", service.id))?;

    let mut carried_files = Vec::new();

    match latest {
        None => {
            service.sends = dedupe_by_id(derived.sends);
            service.receives = dedupe_by_id(derived.receives);
        }
        Some(latest) => {
            service.markdown = carried_markdown(latest.markdown, service.markdown);
            service.sends = merge_refs(latest.sends, derived.sends);
            if !latest.owners.is_empty() {
                service.owners = latest.owners;
            }
            if latest.repository.is_some() {
                service.repository = latest.repository;
            }

            let mut specifications = latest.specifications;
            specifications.extend(std::mem::take(&mut service.specifications));
            service.specifications = specifications;

            let previous_files = catalog.files(collection, &service.id, None)?;
            for file_name in service.specifications.values() {
                if *file_name == spec_file.file_name {
                    continue;
                }
                match previous_files.iter().find(|f| &f.file_name == file_name) {
                    Some(file) => carried_files.push(file.clone()),
                    None => tracing::debug!(
                        id = %service.id,
                        file = %file_name,
                        "specification file not found on previous record"
                    ),
                }
            }

            if latest.version == service.version {
                service.receives =
                    dedupe_by_id(latest.receives.into_iter().chain(derived.receives));
                catalog.remove(collection, &service.id, Some(&latest.version))?;
            } else {
                warn_if_older(collection, &service.id, &latest.version, &service.version);
                tracing::info!(
                    id = %service.id,
                    from = %latest.version,
                    to = %service.version,
                    "📦 Versioning service"
                );
                service.receives = dedupe_by_id(derived.receives);
                catalog.version(collection, &service.id)?;
            }
        }
    }

    catalog.write_entity(collection, &service)?;
    catalog
        .add_file(collection, &service.id, &service.version, spec_file)
        .with_context(|| format!("Failed to attach spec file to {}", service.id))?;
    for file in &carried_files {
        catalog.add_file(collection, &service.id, &service.version, file)?;
    }

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, Repository, ResourceRef, OPENAPI_SPECIFICATION_KEY};

    fn service(version: &str) -> Service {
        let mut service = Service {
            id: "orders-api".into(),
            name: "Orders API".into(),
            version: version.into(),
            schema_path: "orders.yml".into(),
            markdown: "generated".into(),
            ..Default::default()
        };
        service
            .specifications
            .insert(OPENAPI_SPECIFICATION_KEY.into(), "orders.yml".into());
        service
    }

    fn spec_file(content: &str) -> CatalogFile {
        CatalogFile::new("orders.yml", content)
    }

    fn refs(ids: &[&str]) -> Vec<ResourceRef> {
        ids.iter().map(|id| ResourceRef::new(*id, "1.0.0")).collect()
    }

    fn latest(catalog: &InMemoryCatalog) -> Service {
        catalog
            .get_entity(Collection::Services, "orders-api", None)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_create() {
        let mut catalog = InMemoryCatalog::new();
        let derived = Directions {
            sends: refs(&["a"]),
            receives: refs(&["b", "b"]),
        };
        reconcile_service(&mut catalog, service("1.0.0"), derived, &spec_file("v1")).unwrap();
        let stored = latest(&catalog);
        assert_eq!(stored.sends, refs(&["a"]));
        assert_eq!(stored.receives, refs(&["b"]));
        assert_eq!(
            catalog.files(Collection::Services, "orders-api", None).unwrap(),
            vec![spec_file("v1")]
        );
    }

    #[test]
    fn test_same_version_merges_receives_and_keeps_user_fields() {
        let mut catalog = InMemoryCatalog::new();
        let mut first = service("1.0.0");
        first.markdown = "hand written".into();
        first.owners = vec!["team-orders".into()];
        first.repository = Some(Repository {
            language: Some("rust".into()),
            url: None,
        });
        first
            .specifications
            .insert("asyncapiPath".into(), "asyncapi.yml".into());
        let derived = Directions {
            sends: refs(&["shipped"]),
            receives: refs(&["get-order"]),
        };
        reconcile_service(&mut catalog, first, derived, &spec_file("v1")).unwrap();
        catalog
            .add_file(
                Collection::Services,
                "orders-api",
                "1.0.0",
                &CatalogFile::new("asyncapi.yml", "async"),
            )
            .unwrap();

        let derived = Directions {
            sends: vec![],
            receives: refs(&["list-orders", "get-order"]),
        };
        reconcile_service(&mut catalog, service("1.0.0"), derived, &spec_file("v1b")).unwrap();

        let stored = latest(&catalog);
        assert_eq!(stored.markdown, "hand written");
        assert_eq!(stored.owners, vec!["team-orders".to_string()]);
        assert_eq!(stored.repository.unwrap().language.as_deref(), Some("rust"));
        assert_eq!(stored.sends, refs(&["shipped"]));
        assert_eq!(stored.receives, refs(&["get-order", "list-orders"]));
        assert_eq!(
            stored.specifications.get("asyncapiPath").map(String::as_str),
            Some("asyncapi.yml")
        );
        assert_eq!(
            catalog.files(Collection::Services, "orders-api", None).unwrap(),
            vec![
                CatalogFile::new("asyncapi.yml", "async"),
                spec_file("v1b")
            ]
        );
        assert!(catalog.versions(Collection::Services, "orders-api").is_empty());
    }

    #[test]
    fn test_new_version_archives_and_resets_receives() {
        let mut catalog = InMemoryCatalog::new();
        let derived = Directions {
            sends: refs(&["shipped"]),
            receives: refs(&["get-order"]),
        };
        reconcile_service(&mut catalog, service("0.1.0"), derived, &spec_file("v0")).unwrap();

        let derived = Directions {
            sends: refs(&["cancelled"]),
            receives: refs(&["list-orders"]),
        };
        reconcile_service(&mut catalog, service("1.0.0"), derived, &spec_file("v1")).unwrap();

        let stored = latest(&catalog);
        assert_eq!(stored.version, "1.0.0");
        assert_eq!(stored.receives, refs(&["list-orders"]));
        assert_eq!(stored.sends, refs(&["shipped", "cancelled"]));
        assert_eq!(catalog.versions(Collection::Services, "orders-api"), vec!["0.1.0"]);
        assert_eq!(
            catalog
                .files(Collection::Services, "orders-api", Some("0.1.0"))
                .unwrap(),
            vec![spec_file("v0")]
        );
    }
}
