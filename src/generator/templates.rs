use askama::Template;
use serde_json::Value;

use crate::spec::{
    ExternalDocs, Operation, OperationSchemas, ParameterLocation, ParameterMeta, ResponseBody,
    SpecDocument,
};

/// File name of the attached request body schema.
pub const REQUEST_BODY_FILE: &str = "request-body.json";

/// File name of the attached body for a response status.
pub fn response_file_name(status: &str) -> String {
    format!("response-{status}.json")
}

/// Template data for the default service markdown
#[derive(Template)]
#[template(path = "service.md", escape = "none")]
pub struct ServiceMarkdownTemplate {
    pub description: String,
    pub external_docs_label: String,
    pub external_docs_url: String,
}

/// Template for the default domain markdown
#[derive(Template)]
#[template(path = "domain.md", escape = "none")]
pub struct DomainMarkdownTemplate;

/// Parameters sharing one location (`Path`, `Query`, …)
#[derive(Debug, Clone)]
pub struct ParameterGroup {
    pub title: String,
    /// Pre-rendered list items
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseSection {
    pub status: String,
    /// Attached schema file; empty for inline responses
    pub schema_file: String,
    /// Pretty-printed response object for inline responses
    pub inline_json: String,
}

/// Template data for the default message markdown
#[derive(Template)]
#[template(path = "message.md", escape = "none")]
pub struct MessageMarkdownTemplate {
    pub external_docs_label: String,
    pub external_docs_url: String,
    pub has_schemas: bool,
    pub parameter_groups: Vec<ParameterGroup>,
    pub has_request_body: bool,
    pub responses: Vec<ResponseSection>,
}

fn external_docs_parts(docs: Option<&ExternalDocs>) -> (String, String) {
    match docs {
        Some(docs) => (
            docs.description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| docs.url.clone()),
            docs.url.clone(),
        ),
        None => (String::new(), String::new()),
    }
}

pub fn service_markdown(doc: &SpecDocument) -> anyhow::Result<String> {
    let (external_docs_label, external_docs_url) =
        external_docs_parts(doc.external_docs().as_ref());
    let template = ServiceMarkdownTemplate {
        description: doc.description().unwrap_or_default().to_string(),
        external_docs_label,
        external_docs_url,
    };
    Ok(template.render()?)
}

pub fn domain_markdown() -> anyhow::Result<String> {
    Ok(DomainMarkdownTemplate.render()?)
}

pub fn message_markdown(
    operation: &Operation,
    schemas: &OperationSchemas,
) -> anyhow::Result<String> {
    let (external_docs_label, external_docs_url) =
        external_docs_parts(operation.external_docs.as_ref());

    let responses = schemas
        .responses
        .iter()
        .map(|(status, body)| -> anyhow::Result<ResponseSection> {
            Ok(match body {
                ResponseBody::Schema(_) => ResponseSection {
                    status: status.clone(),
                    schema_file: response_file_name(status),
                    inline_json: String::new(),
                },
                ResponseBody::Inline(value) => ResponseSection {
                    status: status.clone(),
                    schema_file: String::new(),
                    inline_json: serde_json::to_string_pretty(value)?,
                },
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let template = MessageMarkdownTemplate {
        external_docs_label,
        external_docs_url,
        has_schemas: !schemas.parameters.is_empty()
            || schemas.request_body.is_some()
            || !responses.is_empty(),
        parameter_groups: group_parameters(&schemas.parameters),
        has_request_body: schemas.request_body.is_some(),
        responses,
    };
    Ok(template.render()?)
}

/// Group parameters by location, locations in path/query/header/cookie order.
fn group_parameters(parameters: &[ParameterMeta]) -> Vec<ParameterGroup> {
    let locations = [
        ParameterLocation::Path,
        ParameterLocation::Query,
        ParameterLocation::Header,
        ParameterLocation::Cookie,
    ];
    locations
        .iter()
        .filter_map(|location| {
            let lines: Vec<String> = parameters
                .iter()
                .filter(|p| &p.location == location)
                .map(parameter_line)
                .collect();
            (!lines.is_empty()).then(|| ParameterGroup {
                title: location.to_string(),
                lines,
            })
        })
        .collect()
}

fn parameter_line(param: &ParameterMeta) -> String {
    let mut line = format!("- **{}**", param.name);
    if let Some(kind) = param
        .schema
        .as_ref()
        .and_then(|schema| schema.get("type"))
        .and_then(Value::as_str)
    {
        line.push_str(&format!(" (`{kind}`)"));
    }
    if param.required {
        line.push_str(" (required)");
    }
    if let Some(description) = param.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(": ");
        line.push_str(description);
    }
    line
}
