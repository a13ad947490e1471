use super::service::short_summary;
use super::slug::slugify;
use super::templates::{message_markdown, response_file_name, REQUEST_BODY_FILE};
use crate::catalog::{Badge, CatalogFile, Message, Sidebar};
use crate::spec::{
    operation_schemas, MessageAction, MessageKind, Operation, SpecDocument, MESSAGE_ID_EXTENSION,
    MESSAGE_NAME_EXTENSION, MESSAGE_VERSION_EXTENSION,
};

/// A message derived from one operation, with the files to attach to it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltMessage {
    pub message: Message,
    pub kind: MessageKind,
    pub action: MessageAction,
    /// `request-body.json` then one `response-<status>.json` per response
    pub files: Vec<CatalogFile>,
}

/// Id used when an operation has neither `operationId` nor an id override.
///
/// `<api-slug>_<METHOD>`, then `_<path with '/' as '_'>` unless the path is `/`.
pub fn fallback_message_id(api_title: &str, operation: &Operation) -> String {
    let mut id = format!("{}_{}", slugify(api_title), operation.method.as_str());
    if operation.path != "/" {
        id.push('_');
        id.push_str(&operation.path.replace('/', "_"));
    }
    id
}

pub fn build_message(doc: &SpecDocument, operation: &Operation) -> anyhow::Result<BuiltMessage> {
    if operation.operation_id.is_none() {
        tracing::warn!(
            method = %operation.method,
            path = %operation.path,
            "⚠️  No operationId found; schemas cannot be looked up. \
             Add an operationId or set {MESSAGE_ID_EXTENSION} to give the message a stable id"
        );
    }

    let id = operation
        .extension_str(MESSAGE_ID_EXTENSION)
        .map(str::to_string)
        .or_else(|| operation.operation_id.clone())
        .unwrap_or_else(|| fallback_message_id(doc.title(), operation));
    let name = operation
        .extension_str(MESSAGE_NAME_EXTENSION)
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());
    let version = operation
        .extension_str(MESSAGE_VERSION_EXTENSION)
        .unwrap_or(doc.version())
        .to_string();

    let summary = match operation.summary.as_deref() {
        Some(summary) => summary.to_string(),
        None => short_summary(operation.description.as_deref()),
    };

    let method = operation.method.as_str().to_string();
    let mut badges = vec![Badge::blue(method.clone())];
    badges.extend(operation.tags.iter().map(|tag| Badge::blue(format!("tag:{tag}"))));

    let schemas = operation_schemas(doc, operation.operation_id.as_deref());

    let mut files = Vec::new();
    if let Some(body) = &schemas.request_body {
        files.push(CatalogFile::new(
            REQUEST_BODY_FILE,
            serde_json::to_string_pretty(body)?,
        ));
    }
    for (status, body) in &schemas.responses {
        files.push(CatalogFile::new(
            response_file_name(status),
            serde_json::to_string_pretty(body.value())?,
        ));
    }

    let message = Message {
        id,
        name,
        version,
        summary,
        schema_path: if schemas.request_body.is_some() {
            REQUEST_BODY_FILE.to_string()
        } else {
            String::new()
        },
        badges,
        sidebar: Some(Sidebar { badge: method }),
        markdown: message_markdown(operation, &schemas)?,
    };

    Ok(BuiltMessage {
        message,
        kind: operation.kind,
        action: operation.action,
        files,
    })
}
