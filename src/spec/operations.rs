use super::load::METHODS;
use super::types::{
    ExternalDocs, MessageAction, MessageKind, Operation, OperationSchemas, ParameterLocation,
    ParameterMeta, ResponseBody, SpecDocument, EXTENSION_PREFIX, MESSAGE_ACTION_EXTENSION,
    MESSAGE_TYPE_EXTENSION,
};
use http::Method;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Extract every operation of the document.
///
/// One [`Operation`] per path and HTTP verb, paths in declaration order and
/// verbs in declaration order within each path. Malformed path items and
/// operations are logged and skipped; a document without `paths` yields an
/// empty list.
pub fn extract_operations(doc: &SpecDocument) -> Vec<Operation> {
    let mut operations = Vec::new();

    let Some(paths) = doc.raw.get("paths").and_then(Value::as_object) else {
        tracing::debug!(source = %doc.source, "document has no paths");
        return operations;
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            tracing::warn!(path = %path, "⚠️  Skipping malformed path item");
            continue;
        };
        for (method_str, raw_operation) in item {
            let lower = method_str.to_ascii_lowercase();
            if !METHODS.contains(&lower.as_str()) {
                continue;
            }
            let Some(raw_operation) = raw_operation.as_object() else {
                tracing::warn!(path = %path, method = %method_str, "⚠️  Skipping malformed operation");
                continue;
            };
            let method = match Method::from_bytes(lower.to_ascii_uppercase().as_bytes()) {
                Ok(method) => method,
                Err(err) => {
                    tracing::warn!(path = %path, method = %method_str, error = %err, "⚠️  Skipping operation");
                    continue;
                }
            };
            operations.push(build_operation(path, method, raw_operation));
        }
    }

    operations
}

fn build_operation(path: &str, method: Method, raw: &Map<String, Value>) -> Operation {
    let extensions: BTreeMap<String, Value> = raw
        .iter()
        .filter(|(key, _)| key.starts_with(EXTENSION_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let string_field = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let tags = raw
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let external_docs = raw
        .get("externalDocs")
        .and_then(|docs| serde_json::from_value::<ExternalDocs>(docs.clone()).ok());

    Operation {
        path: path.to_string(),
        method,
        operation_id: string_field("operationId"),
        summary: string_field("summary"),
        description: string_field("description"),
        kind: MessageKind::from_extension(extensions.get(MESSAGE_TYPE_EXTENSION)),
        action: MessageAction::from_extension(extensions.get(MESSAGE_ACTION_EXTENSION)),
        tags,
        external_docs,
        extensions,
    }
}

/// Find an operation in the `$ref`-resolved tree by its `operationId`.
///
/// Returns the operation object together with the parameters declared on its
/// path item.
fn find_operation<'a>(
    doc: &'a SpecDocument,
    operation_id: &str,
) -> Option<(&'a Map<String, Value>, Option<&'a Vec<Value>>)> {
    let paths = doc.resolved.get("paths")?.as_object()?;
    for item in paths.values() {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (method, operation) in item {
            if !METHODS.contains(&method.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Some(operation) = operation.as_object() else {
                continue;
            };
            if operation.get("operationId").and_then(Value::as_str) == Some(operation_id) {
                let shared = item.get("parameters").and_then(Value::as_array);
                return Some((operation, shared));
            }
        }
    }
    None
}

/// Parameters, request body and responses for the operation with `operation_id`.
///
/// An id that matches nothing yields empty schemas rather than an error.
pub fn operation_schemas(doc: &SpecDocument, operation_id: Option<&str>) -> OperationSchemas {
    let Some((operation, shared)) = operation_id.and_then(|id| find_operation(doc, id)) else {
        return OperationSchemas::default();
    };

    let mut parameters = Vec::new();
    if let Some(shared) = shared {
        parameters.extend(extract_parameters(shared));
    }
    if let Some(own) = operation.get("parameters").and_then(Value::as_array) {
        for param in extract_parameters(own) {
            // operation-level parameters override path-level ones
            parameters.retain(|p: &ParameterMeta| {
                !(p.name == param.name && p.location == param.location)
            });
            parameters.push(param);
        }
    }

    OperationSchemas {
        parameters,
        request_body: extract_request_schema(operation),
        responses: extract_responses(operation),
    }
}

/// Extract parameter metadata from a resolved `parameters` array.
pub fn extract_parameters(params: &[Value]) -> Vec<ParameterMeta> {
    params
        .iter()
        .filter_map(|param| {
            let name = param.get("name")?.as_str()?.to_string();
            let location = ParameterLocation::parse(param.get("in")?.as_str()?)?;
            Some(ParameterMeta {
                required: location == ParameterLocation::Path
                    || param
                        .get("required")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                name,
                location,
                description: param
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                schema: param.get("schema").cloned(),
            })
        })
        .collect()
}

/// Request body schema, preferring `application/json` over other media types.
pub fn extract_request_schema(operation: &Map<String, Value>) -> Option<Value> {
    let content = operation
        .get("requestBody")?
        .get("content")?
        .as_object()?;
    content
        .get("application/json")
        .and_then(|media| media.get("schema"))
        .or_else(|| content.values().find_map(|media| media.get("schema")))
        .cloned()
}

/// Responses by status code, in declaration order.
///
/// JSON-schema-backed responses yield their schema; any other response yields
/// the response object itself.
pub fn extract_responses(operation: &Map<String, Value>) -> Vec<(String, ResponseBody)> {
    let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
        return Vec::new();
    };
    responses
        .iter()
        .map(|(status, response)| {
            let schema = response
                .get("content")
                .and_then(|content| content.get("application/json"))
                .and_then(|media| media.get("schema"));
            let body = match schema {
                Some(schema) => ResponseBody::Schema(schema.clone()),
                None => ResponseBody::Inline(response.clone()),
            };
            (status.clone(), body)
        })
        .collect()
}
