use super::message::build_message;
use super::service::build_service;
use crate::catalog::{Catalog, CatalogFile, ResourceRef};
use crate::config::{GeneratorConfig, ServiceSpec};
use crate::reconcile::{reconcile_domain, reconcile_message, reconcile_service, Directions};
use crate::spec::{extract_operations, load_document, MessageAction, SpecError, SpecSource};
use crate::validator::print_issues;
use std::fmt;

/// A spec that made it into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSpec {
    pub path: String,
    pub service: ResourceRef,
    pub sends: usize,
    pub receives: usize,
}

/// A spec that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSpec {
    pub path: String,
    pub reason: String,
}

/// Outcome of [`generate_catalog`], specs in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: Vec<ProcessedSpec>,
    pub skipped: Vec<SkippedSpec>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spec(s) processed, {} skipped",
            self.processed.len(),
            self.skipped.len()
        )
    }
}

/// Process every configured spec, in order, against `catalog`.
///
/// A spec that fails to load or to reconcile is logged and skipped; the run
/// always continues with the next one.
pub fn generate_catalog<C: Catalog + ?Sized>(
    config: &GeneratorConfig,
    catalog: &mut C,
) -> RunReport {
    if config.license_key.is_some() {
        tracing::debug!("license key provided");
    }

    let mut report = RunReport::default();
    for spec in &config.services {
        tracing::info!(path = %spec.path, "📄 Processing spec");
        match process_spec(config, spec, catalog) {
            Ok(processed) => {
                tracing::info!(
                    service = %processed.service.id,
                    version = %processed.service.version,
                    sends = processed.sends,
                    receives = processed.receives,
                    "✅ Service written"
                );
                report.processed.push(processed);
            }
            Err(err) => {
                if let Some(SpecError::Invalid { source, issues }) = err.downcast_ref::<SpecError>()
                {
                    print_issues(source, issues);
                }
                let reason = format!("{err:#}");
                tracing::error!(path = %spec.path, error = %reason, "❌ Skipping spec");
                report.skipped.push(SkippedSpec {
                    path: spec.path.clone(),
                    reason,
                });
            }
        }
    }
    tracing::info!("{report}");
    report
}

fn process_spec<C: Catalog + ?Sized>(
    config: &GeneratorConfig,
    spec: &ServiceSpec,
    catalog: &mut C,
) -> anyhow::Result<ProcessedSpec> {
    let doc = load_document(&SpecSource::parse(&spec.path))?;
    let service = build_service(spec, &doc)?;

    if let Some(domain) = &config.domain {
        reconcile_domain(catalog, domain, &service.reference())?;
    }

    let mut directions = Directions::default();
    for operation in extract_operations(&doc) {
        let reconciled = build_message(&doc, &operation).and_then(|built| {
            tracing::debug!(
                method = %operation.method,
                path = %operation.path,
                id = %built.message.id,
                kind = %built.kind,
                action = %built.action,
                "operation"
            );
            reconcile_message(&mut *catalog, &built).map(|reference| (built.action, reference))
        });
        match reconciled {
            Ok((MessageAction::Sends, reference)) => directions.sends.push(reference),
            Ok((MessageAction::Receives, reference)) => directions.receives.push(reference),
            Err(err) => {
                let reason = format!("{err:#}");
                tracing::warn!(
                    method = %operation.method,
                    path = %operation.path,
                    error = %reason,
                    "⚠️ Skipping operation"
                );
            }
        }
    }

    let content = if config.save_parsed_spec_file {
        doc.parsed_text()?
    } else {
        doc.raw_text.clone()
    };
    let spec_file = CatalogFile::new(service.schema_path.clone(), content);

    let service = reconcile_service(catalog, service, directions, &spec_file)?;
    Ok(ProcessedSpec {
        path: spec.path.clone(),
        service: service.reference(),
        sends: service.sends.len(),
        receives: service.receives.len(),
    })
}
