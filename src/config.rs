//! Generator configuration
//!
//! Loaded from a YAML or TOML file (chosen by extension):
//!
//! ```yaml
//! services:
//!   - path: ./specs/orders.yml
//!     id: orders-api
//!     owners: [orders-team]
//!   - path: https://example.com/payments/openapi.json
//! domain:
//!   id: orders
//!   name: Orders
//!   version: 0.0.1
//! saveParsedSpecFile: false
//! ```
//!
//! The catalog root is not part of the file's required content: it comes from
//! `--catalog-dir` or the `PROJECT_DIR` environment variable (see
//! [`GeneratorConfig::with_catalog_dir`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the catalog root.
pub const CATALOG_DIR_ENV: &str = "PROJECT_DIR";

/// One OpenAPI document to turn into a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Local path or `http(s)` URL of the document
    pub path: String,
    /// Service id; the slugified document title when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Service name; the document title when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Owners given to newly created services
    #[serde(default)]
    pub owners: Vec<String>,
}

/// Domain every generated service is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub id: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub services: Vec<ServiceSpec>,
    #[serde(default)]
    pub domain: Option<DomainSpec>,
    /// Attach the `$ref`-resolved document instead of the source text
    #[serde(default)]
    pub save_parsed_spec_file: bool,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

/// Fatal configuration problems, reported before any spec is processed.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    MissingCatalogDir,
    NoServices,
    MissingServicePath {
        index: usize,
    },
    InvalidDomain {
        field: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Failed to parse config {}: {}", path.display(), message)
            }
            ConfigError::MissingCatalogDir => write!(
                f,
                "No catalog directory: pass --catalog-dir or set {CATALOG_DIR_ENV}"
            ),
            ConfigError::NoServices => write!(f, "Config lists no services"),
            ConfigError::MissingServicePath { index } => {
                write!(f, "services[{index}] has no path")
            }
            ConfigError::InvalidDomain { field } => {
                write!(f, "domain.{field} must not be empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GeneratorConfig {
    /// Load from a `.toml` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            toml::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Set the catalog root, preferring `dir` (the CLI flag) over the file's
    /// `catalogDir` and the `PROJECT_DIR` environment variable.
    pub fn with_catalog_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.catalog_dir = dir.or(self.catalog_dir).or_else(|| {
            std::env::var_os(CATALOG_DIR_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        });
        self
    }

    pub fn catalog_dir(&self) -> Result<&Path, ConfigError> {
        self.catalog_dir
            .as_deref()
            .ok_or(ConfigError::MissingCatalogDir)
    }

    /// Check everything the run depends on before touching the catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog_dir()?;
        if self.services.is_empty() {
            return Err(ConfigError::NoServices);
        }
        if let Some(index) = self
            .services
            .iter()
            .position(|service| service.path.trim().is_empty())
        {
            return Err(ConfigError::MissingServicePath { index });
        }
        if let Some(domain) = &self.domain {
            for (field, value) in [
                ("id", &domain.id),
                ("name", &domain.name),
                ("version", &domain.version),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidDomain { field });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(services: Vec<ServiceSpec>) -> GeneratorConfig {
        GeneratorConfig {
            services,
            catalog_dir: Some(PathBuf::from("/tmp/catalog")),
            ..Default::default()
        }
    }

    fn service(path: &str) -> ServiceSpec {
        ServiceSpec {
            path: path.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_yaml_camel_case_fields() {
        let yaml = r#"
services:
  - path: ./orders.yml
    id: orders-api
    owners: [team-a]
domain: { id: orders, name: Orders, version: 1.0.0 }
saveParsedSpecFile: true
licenseKey: abc
"#;
        let config: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.services[0].id.as_deref(), Some("orders-api"));
        assert_eq!(config.services[0].owners, vec!["team-a".to_string()]);
        assert!(config.save_parsed_spec_file);
        assert_eq!(config.license_key.as_deref(), Some("abc"));
        assert_eq!(config.domain.unwrap().version, "1.0.0");
    }

    #[test]
    fn test_validate() {
        assert!(config(vec![service("a.yml")]).validate().is_ok());
        assert!(matches!(
            config(vec![]).validate(),
            Err(ConfigError::NoServices)
        ));
        assert!(matches!(
            config(vec![service("a.yml"), service(" ")]).validate(),
            Err(ConfigError::MissingServicePath { index: 1 })
        ));

        let mut bad_domain = config(vec![service("a.yml")]);
        bad_domain.domain = Some(DomainSpec {
            id: "orders".into(),
            name: "".into(),
            version: "1.0.0".into(),
        });
        assert!(matches!(
            bad_domain.validate(),
            Err(ConfigError::InvalidDomain { field: "name" })
        ));

        let mut no_root = config(vec![service("a.yml")]);
        no_root.catalog_dir = None;
        assert!(matches!(
            no_root.validate(),
            Err(ConfigError::MissingCatalogDir)
        ));
    }

    #[test]
    fn test_flag_wins_over_file() {
        let resolved = config(vec![]).with_catalog_dir(Some(PathBuf::from("/flag")));
        assert_eq!(resolved.catalog_dir().unwrap(), Path::new("/flag"));
    }
}
