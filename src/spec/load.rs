use super::resolve::resolve_refs;
use super::types::{SpecDocument, SpecFormat, SpecSource};
use crate::validator::{fail_if_issues, ValidationIssue};
use serde_json::Value;
use std::fmt;

pub(crate) const METHODS: [&str; 8] = [
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// Why an OpenAPI document could not be loaded.
#[derive(Debug)]
pub enum SpecError {
    /// Local file could not be read
    Io {
        source: String,
        error: std::io::Error,
    },
    /// Remote server answered with a non-success status
    Fetch { url: String, status: u16 },
    /// Remote request failed before a status was received
    Request { url: String, message: String },
    /// Content is neither valid YAML nor valid JSON
    Parse { source: String, message: String },
    /// Parsed, but not a usable OpenAPI 3 document
    Invalid {
        source: String,
        issues: Vec<ValidationIssue>,
    },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::Io { source, error } => {
                write!(f, "Failed to read OpenAPI file {source}: {error}")
            }
            SpecError::Fetch { url, status } => {
                write!(f, "Failed to fetch file: {url}, status: {status}")
            }
            SpecError::Request { url, message } => {
                write!(f, "Failed to fetch file: {url}: {message}")
            }
            SpecError::Parse { source, message } => {
                write!(f, "Failed to parse OpenAPI file {source}: {message}")
            }
            SpecError::Invalid { source, issues } => write!(
                f,
                "OpenAPI file {source} is invalid ({} issue(s))",
                issues.len()
            ),
        }
    }
}

impl std::error::Error for SpecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpecError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Read the source bytes of a spec, from disk or over HTTP.
///
/// # Errors
///
/// [`SpecError::Io`] for unreadable files, [`SpecError::Fetch`] when a remote
/// server answers with a non-success status.
pub fn read_source(source: &SpecSource) -> Result<String, SpecError> {
    match source {
        SpecSource::Local(path) => std::fs::read_to_string(path).map_err(|error| SpecError::Io {
            source: source.to_string(),
            error,
        }),
        SpecSource::Remote(url) => {
            tracing::debug!(url = %url, "fetching remote spec");
            let response =
                reqwest::blocking::get(url.as_str()).map_err(|err| SpecError::Request {
                    url: url.to_string(),
                    message: err.to_string(),
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(SpecError::Fetch {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            response.text().map_err(|err| SpecError::Request {
                url: url.to_string(),
                message: err.to_string(),
            })
        }
    }
}

/// Load, validate and resolve an OpenAPI document.
pub fn load_document(source: &SpecSource) -> Result<SpecDocument, SpecError> {
    let text = read_source(source)?;
    parse_document(source.clone(), text)
}

/// Parse and validate already-read spec text.
pub fn parse_document(source: SpecSource, text: String) -> Result<SpecDocument, SpecError> {
    let file_name = source.file_name();
    let format = SpecFormat::detect(file_name.as_deref(), &text);
    let parsed: Result<Value, String> = match format {
        SpecFormat::Yaml => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
        SpecFormat::Json => serde_json::from_str(&text).map_err(|e| e.to_string()),
    };
    let mut raw = parsed.map_err(|message| SpecError::Parse {
        source: source.to_string(),
        message,
    })?;

    strip_unknown_verbs(&mut raw);

    let info = validate_document(&raw).map_err(|issues| SpecError::Invalid {
        source: source.to_string(),
        issues,
    })?;

    let resolved = resolve_refs(&raw, source.base_dir());

    Ok(SpecDocument {
        source,
        format,
        raw_text: text,
        raw,
        resolved,
        info,
    })
}

/// Drop path-item keys that are neither HTTP verbs nor allowed path-item fields.
fn strip_unknown_verbs(val: &mut Value) {
    if let Some(Value::Object(paths_map)) = val.get_mut("paths") {
        for item in paths_map.values_mut() {
            if let Value::Object(obj) = item {
                let keys: Vec<String> = obj.keys().cloned().collect();
                for k in keys {
                    let lk = k.to_ascii_lowercase();
                    let keep = match lk.as_str() {
                        "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                        m if METHODS.contains(&m) => true,
                        _ => k.starts_with("x-"),
                    };
                    if !keep {
                        tracing::debug!(key = %k, "ignoring unknown path item key");
                        obj.shift_remove(&k);
                    }
                }
            }
        }
    }
}

/// Structural validation of a parsed document.
///
/// Collects every structural issue instead of stopping at the first one, then
/// deserializes the whole document into [`oas3::OpenApiV3Spec`]. On success
/// the typed `info` object is returned.
pub fn validate_document(raw: &Value) -> Result<oas3::spec::Info, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let Some(root) = raw.as_object() else {
        return Err(vec![ValidationIssue::new(
            "$",
            "NotAnObject",
            "document root must be an object",
        )]);
    };

    match root.get("openapi").and_then(Value::as_str) {
        Some(version) if version.starts_with("3.") => {}
        Some(version) => issues.push(ValidationIssue::new(
            "openapi",
            "UnsupportedVersion",
            format!("OpenAPI version {version} is not supported, expected 3.x"),
        )),
        None if root.contains_key("swagger") => issues.push(ValidationIssue::new(
            "swagger",
            "UnsupportedVersion",
            "Swagger 2.0 documents are not supported, convert to OpenAPI 3.x",
        )),
        None => issues.push(ValidationIssue::new(
            "openapi",
            "MissingField",
            "`openapi` version field is required",
        )),
    }

    match root.get("info") {
        Some(Value::Object(info)) => {
            for field in ["title", "version"] {
                let blank = info
                    .get(field)
                    .and_then(Value::as_str)
                    .is_none_or(|v| v.trim().is_empty());
                if blank {
                    issues.push(ValidationIssue::new(
                        format!("info.{field}"),
                        "MissingField",
                        format!("`info.{field}` must be a non-empty string"),
                    ));
                }
            }
        }
        Some(_) => issues.push(ValidationIssue::new(
            "info",
            "InvalidInfo",
            "`info` must be an object",
        )),
        None => issues.push(ValidationIssue::new(
            "info",
            "MissingField",
            "`info` object is required",
        )),
    }

    match root.get("paths") {
        None => {}
        Some(Value::Object(paths)) => {
            for (path, item) in paths {
                let location = format!("paths.{path}");
                if !path.starts_with('/') {
                    issues.push(ValidationIssue::new(
                        &location,
                        "InvalidPath",
                        "path must start with '/'",
                    ));
                }
                let Some(item) = item.as_object() else {
                    issues.push(ValidationIssue::new(
                        &location,
                        "InvalidPathItem",
                        "path item must be an object",
                    ));
                    continue;
                };
                for (method, operation) in item {
                    if METHODS.contains(&method.to_ascii_lowercase().as_str())
                        && !operation.is_object()
                    {
                        issues.push(ValidationIssue::new(
                            format!("{location}.{method}"),
                            "InvalidOperation",
                            "operation must be an object",
                        ));
                    }
                }
            }
        }
        Some(_) => issues.push(ValidationIssue::new(
            "paths",
            "InvalidPaths",
            "`paths` must be an object",
        )),
    }

    fail_if_issues(issues)?;

    match serde_json::from_value::<oas3::OpenApiV3Spec>(raw.clone()) {
        Ok(spec) => Ok(spec.info),
        Err(err) => Err(vec![ValidationIssue::new(
            "$",
            "InvalidDocument",
            err.to_string(),
        )]),
    }
}
