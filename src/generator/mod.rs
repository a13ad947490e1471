//! # Generator Module
//!
//! Turns OpenAPI documents into catalog entities and drives a full run.
//!
//! ## Overview
//!
//! - [`build_service`] maps a document to a [`Service`](crate::catalog::Service):
//!   id from config or the slugified title, version from `info.version`, one
//!   badge per document tag, default markdown.
//! - [`build_message`] maps an operation to a [`BuiltMessage`]: id from
//!   `x-eventcatalog-message-id`, `operationId` or [`fallback_message_id`],
//!   method and tag badges, markdown with parameters, request body and
//!   responses, plus the JSON files to attach.
//! - [`generate_catalog`] processes every configured spec against a
//!   [`Catalog`](crate::catalog::Catalog) and returns a [`RunReport`].
//!
//! ## Run order (per spec)
//!
//! ```text
//! load → build service → reconcile domain → for each operation:
//!        build message → reconcile message → collect sends/receives
//!      → reconcile service → attach spec file
//! ```
//!
//! The builders are pure; all catalog access lives in [`crate::reconcile`].
//!
//! ## Templates
//!
//! Markdown bodies are rendered with Askama from `templates/service.md`,
//! `templates/message.md` and `templates/domain.md`. They are only used for
//! entities that have no markdown yet; existing bodies are never replaced.

mod message;
mod run;
mod service;
mod slug;
mod templates;

pub use message::{build_message, fallback_message_id, BuiltMessage};
pub use run::{generate_catalog, ProcessedSpec, RunReport, SkippedSpec};
pub use service::{build_service, DEFAULT_SCHEMA_FILE, SUMMARY_MAX_CHARS};
pub use slug::slugify;
pub use templates::{
    domain_markdown, message_markdown, response_file_name, service_markdown, REQUEST_BODY_FILE,
};
