use super::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the OpenAPI file in a service's `specifications` map.
pub const OPENAPI_SPECIFICATION_KEY: &str = "openapiPath";

/// Reference from one record to another (`sends`, `receives`, domain services).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    pub version: String,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        ResourceRef {
            id: id.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub content: String,
    pub text_color: String,
    pub background_color: String,
}

impl Badge {
    pub fn blue(content: impl Into<String>) -> Self {
        Badge {
            content: content.into(),
            text_color: "blue".to_string(),
            background_color: "blue".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Repository {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidebar {
    pub badge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub services: Vec<ResourceRef>,
    #[serde(skip)]
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema_path: String,
    /// Specification kind (`openapiPath`, `asyncapiPath`, …) → attached file name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specifications: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub sends: Vec<ResourceRef>,
    #[serde(default)]
    pub receives: Vec<ResourceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(skip)]
    pub markdown: String,
}

impl Service {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id, &self.version)
    }
}

/// An event, command or query; the kind is the collection it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<Sidebar>,
    #[serde(skip)]
    pub markdown: String,
}

impl Message {
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(&self.id, &self.version)
    }
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn version(&self) -> &str {
                    &self.version
                }

                fn markdown(&self) -> &str {
                    &self.markdown
                }

                fn set_markdown(&mut self, markdown: String) {
                    self.markdown = markdown;
                }
            }
        )*
    };
}

impl_entity!(Domain, Service, Message);
