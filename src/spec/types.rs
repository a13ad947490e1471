use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Prefix shared by every vendor extension the generator understands.
pub const EXTENSION_PREFIX: &str = "x-eventcatalog-";
/// `event`, `command` or `query` (default `query`)
pub const MESSAGE_TYPE_EXTENSION: &str = "x-eventcatalog-message-type";
/// `sends` marks the operation as outbound; anything else means `receives`
pub const MESSAGE_ACTION_EXTENSION: &str = "x-eventcatalog-message-action";
pub const MESSAGE_ID_EXTENSION: &str = "x-eventcatalog-message-id";
pub const MESSAGE_NAME_EXTENSION: &str = "x-eventcatalog-message-name";
pub const MESSAGE_VERSION_EXTENSION: &str = "x-eventcatalog-message-version";

/// Where an OpenAPI document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Local(PathBuf),
    Remote(Url),
}

impl SpecSource {
    /// Classify a configured path: `http(s)://` URLs are remote, everything else is a file.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            if let Ok(url) = Url::parse(location) {
                return SpecSource::Remote(url);
            }
        }
        SpecSource::Local(PathBuf::from(location))
    }

    /// Last path segment of the source (`openapi.yml` for `./specs/openapi.yml`).
    pub fn file_name(&self) -> Option<String> {
        match self {
            SpecSource::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            SpecSource::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        }
    }

    /// Directory used to resolve relative `$ref` files; remote sources have none.
    pub fn base_dir(&self) -> Option<&Path> {
        match self {
            SpecSource::Local(path) => path.parent(),
            SpecSource::Remote(_) => None,
        }
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecSource::Local(path) => write!(f, "{}", path.display()),
            SpecSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Serialization format of the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// Pick the format from the file extension, falling back to sniffing the content.
    pub fn detect(file_name: Option<&str>, content: &str) -> Self {
        let lower = file_name.map(str::to_ascii_lowercase).unwrap_or_default();
        if lower.ends_with(".json") {
            SpecFormat::Json
        } else if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            SpecFormat::Yaml
        } else if content.trim_start().starts_with('{') {
            SpecFormat::Json
        } else {
            SpecFormat::Yaml
        }
    }
}

/// `externalDocs` object of a document or an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A parsed and validated OpenAPI document.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    pub source: SpecSource,
    pub format: SpecFormat,
    /// Source bytes exactly as read
    pub raw_text: String,
    /// Parsed tree, `$ref`s untouched, declaration order preserved
    pub raw: Value,
    /// Parsed tree with every resolvable `$ref` inlined
    pub resolved: Value,
    pub info: oas3::spec::Info,
}

impl SpecDocument {
    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn version(&self) -> &str {
        &self.info.version
    }

    pub fn description(&self) -> Option<&str> {
        self.info
            .description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }

    /// Names of the document-level tags, in declaration order.
    pub fn tags(&self) -> Vec<String> {
        self.raw
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn external_docs(&self) -> Option<ExternalDocs> {
        self.raw
            .get("externalDocs")
            .and_then(|docs| serde_json::from_value(docs.clone()).ok())
    }

    /// The `$ref`-resolved document re-serialized in the source format.
    pub fn parsed_text(&self) -> anyhow::Result<String> {
        Ok(match self.format {
            SpecFormat::Yaml => serde_yaml::to_string(&self.resolved)?,
            SpecFormat::Json => serde_json::to_string_pretty(&self.resolved)?,
        })
    }
}

/// Which catalog collection a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Event,
    Command,
    Query,
}

impl MessageKind {
    /// Read `x-eventcatalog-message-type`; absent or unknown values mean `query`.
    pub fn from_extension(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("event") => MessageKind::Event,
            Some("command") => MessageKind::Command,
            _ => MessageKind::Query,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Event => "event",
            MessageKind::Command => "command",
            MessageKind::Query => "query",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a message relative to the service that owns the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageAction {
    Sends,
    Receives,
}

impl MessageAction {
    /// Only an explicit `sends` flips the default.
    pub fn from_extension(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("sends") => MessageAction::Sends,
            _ => MessageAction::Receives,
        }
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageAction::Sends => write!(f, "sends"),
            MessageAction::Receives => write!(f, "receives"),
        }
    }
}

/// One HTTP method on one path of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub path: String,
    pub method: Method,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub kind: MessageKind,
    pub action: MessageAction,
    pub tags: Vec<String>,
    pub external_docs: Option<ExternalDocs>,
    /// Every `x-eventcatalog-*` key of the operation, verbatim
    pub extensions: BTreeMap<String, Value>,
}

impl Operation {
    /// String value of a captured vendor extension.
    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
            ParameterLocation::Cookie => write!(f, "Cookie"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Value>,
}

/// A documented response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `content.application/json.schema` of the response
    Schema(Value),
    /// The response object itself, for responses without a JSON schema
    Inline(Value),
}

impl ResponseBody {
    pub fn value(&self) -> &Value {
        match self {
            ResponseBody::Schema(value) | ResponseBody::Inline(value) => value,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, ResponseBody::Schema(_))
    }
}

/// Parameters, request body and responses of one operation, `$ref`s resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationSchemas {
    pub parameters: Vec<ParameterMeta>,
    pub request_body: Option<Value>,
    /// Status code → body, in declaration order
    pub responses: Vec<(String, ResponseBody)>,
}
