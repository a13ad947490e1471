//! # Reconcile Module
//!
//! Merges freshly derived entities into an existing catalog.
//!
//! For every entity the decision is taken against the *latest* cataloged
//! record with the same id:
//!
//! | Latest record          | Action                                               |
//! |------------------------|------------------------------------------------------|
//! | none                   | write the derived entity                             |
//! | other version          | archive it ([`Catalog::version`]), write the new one |
//! | same version           | remove it, write the merged entity                   |
//!
//! In the last two cases user-owned content is carried over: markdown for
//! every entity; `sends`, owners, repository and extra specification files for
//! services; `receives` only when the version matches.
//!
//! [`Catalog::version`]: crate::catalog::Catalog::version

mod domain;
mod message;
mod service;

pub use domain::reconcile_domain;
pub use message::reconcile_message;
pub use service::reconcile_service;

use crate::catalog::{Collection, ResourceRef};
use std::collections::HashSet;

/// Message references collected for a service while processing its operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directions {
    pub sends: Vec<ResourceRef>,
    pub receives: Vec<ResourceRef>,
}

/// Drop references whose id was already seen; the first occurrence wins.
pub fn dedupe_by_id(refs: impl IntoIterator<Item = ResourceRef>) -> Vec<ResourceRef> {
    let mut seen = HashSet::new();
    refs.into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

/// Append `derived` to `prior`, one reference per id.
///
/// A derived reference whose id is already listed replaces that entry in
/// place, so carried-over lists follow message version bumps.
pub fn merge_refs(prior: Vec<ResourceRef>, derived: Vec<ResourceRef>) -> Vec<ResourceRef> {
    let mut merged = dedupe_by_id(prior);
    for reference in dedupe_by_id(derived) {
        match merged.iter_mut().find(|r| r.id == reference.id) {
            Some(existing) => *existing = reference,
            None => merged.push(reference),
        }
    }
    merged
}

/// Markdown to keep: the cataloged body unless it is blank.
pub(crate) fn carried_markdown(cataloged: String, derived: String) -> String {
    if cataloged.trim().is_empty() {
        derived
    } else {
        cataloged
    }
}

/// Warn when `incoming` is not newer than `current`.
///
/// Only applies when both parse as semver; the run proceeds either way.
pub(crate) fn warn_if_older(collection: Collection, id: &str, current: &str, incoming: &str) {
    let (Ok(current_v), Ok(incoming_v)) = (
        semver::Version::parse(current),
        semver::Version::parse(incoming),
    ) else {
        return;
    };
    if incoming_v <= current_v {
        tracing::warn!(
            %collection,
            id,
            current,
            incoming,
            "⚠️  Older version detected; archiving {current} in favour of {incoming}"
        );
    }
}
