//! Storefront configuration.
//!
//! Configuration is read from `storefront.toml` (or a `.json` file with the
//! same shape). Every field has a default, so an empty file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default product catalog endpoint.
pub const DEFAULT_PRODUCTS_ENDPOINT: &str = "https://fakestoreapi.com/products";

/// Default number of work units in the simulated calculation.
pub const DEFAULT_TOTAL_UNITS: u64 = 10_000_000;

/// Default number of work units executed per scheduling turn.
pub const DEFAULT_CHUNK_SIZE: u64 = 500_000;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Country/VAT banner settings.
    #[serde(default)]
    pub banner: BannerConfig,

    /// Product catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Simulated workload settings.
    #[serde(default)]
    pub workload: WorkloadConfig,

    /// How section failures are shown.
    #[serde(default)]
    pub errors: ErrorConfig,
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let config: Self = if is_json(path) {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: display,
                source,
            })?
        } else {
            Self::from_toml(&content).map_err(|e| match e {
                ConfigError::Toml { source, .. } => ConfigError::Toml {
                    path: display,
                    source,
                },
                other => other,
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Render config as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save config to a file, picking the format from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            self.to_toml()?
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workload.total_units == 0 {
            return Err(ConfigError::Invalid(
                "workload.total_units must be positive".to_string(),
            ));
        }
        if self.workload.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "workload.chunk_size must be positive".to_string(),
            ));
        }
        if self.catalog.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "catalog.endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Country/VAT banner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerConfig {
    /// Country name shown in the banner.
    #[serde(default = "default_country")]
    pub country: String,

    /// VAT rate in percent.
    #[serde(default = "default_vat_percent")]
    pub vat_percent: u32,
}

fn default_country() -> String {
    "France".to_string()
}

fn default_vat_percent() -> u32 {
    20
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            vat_percent: default_vat_percent(),
        }
    }
}

/// Product catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL returning a JSON array of products.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_PRODUCTS_ENDPOINT.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Simulated workload settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Total number of unit computations.
    #[serde(default = "default_total_units")]
    pub total_units: u64,

    /// Units executed per scheduling turn.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

fn default_total_units() -> u64 {
    DEFAULT_TOTAL_UNITS
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            total_units: default_total_units(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// How a section that failed to populate is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// The section stays empty; the failure is only logged.
    Silent,
    /// The section shows an error message.
    #[default]
    Visible,
}

impl std::str::FromStr for ErrorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "visible" => Ok(Self::Visible),
            other => Err(ConfigError::Invalid(format!(
                "unknown error mode '{}', expected 'silent' or 'visible'",
                other
            ))),
        }
    }
}

/// Error presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorConfig {
    #[serde(default)]
    pub mode: ErrorMode,
}

/// Generate a commented default `storefront.toml`.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront page configuration

[banner]
country = "France"
vat_percent = 20

[catalog]
endpoint = "{endpoint}"

[workload]
total_units = {total}
chunk_size = {chunk}

[errors]
# "visible" shows an error message in a section that failed to load,
# "silent" leaves it empty.
mode = "visible"
"#,
        endpoint = DEFAULT_PRODUCTS_ENDPOINT,
        total = DEFAULT_TOTAL_UNITS,
        chunk = DEFAULT_CHUNK_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = StorefrontConfig::from_toml("").unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.banner.country, "France");
        assert_eq!(config.banner.vat_percent, 20);
        assert_eq!(config.workload.total_units, 10_000_000);
        assert_eq!(config.workload.chunk_size, 500_000);
        assert_eq!(config.errors.mode, ErrorMode::Visible);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = StorefrontConfig::from_toml(&generate_default_config()).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = StorefrontConfig::default();
        config.banner.country = "Germany".to_string();
        config.banner.vat_percent = 19;
        config.errors.mode = ErrorMode::Silent;

        let text = config.to_toml().unwrap();
        let parsed = StorefrontConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_section() {
        let config = StorefrontConfig::from_toml("[workload]\nchunk_size = 1000\n").unwrap();
        assert_eq!(config.workload.chunk_size, 1000);
        assert_eq!(config.workload.total_units, DEFAULT_TOTAL_UNITS);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let mut config = StorefrontConfig::default();
        config.workload.chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = StorefrontConfig::default();
        config.workload.total_units = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_error_mode_from_str() {
        assert_eq!("silent".parse::<ErrorMode>().unwrap(), ErrorMode::Silent);
        assert_eq!("Visible".parse::<ErrorMode>().unwrap(), ErrorMode::Visible);
        assert!("loud".parse::<ErrorMode>().is_err());
    }

    #[test]
    fn test_load_and_save_json() {
        let path = std::env::temp_dir().join(format!(
            "storefront-config-test-{}.json",
            std::process::id()
        ));
        let mut config = StorefrontConfig::default();
        config.catalog.endpoint = "http://localhost:9999/products".to_string();

        config.save(&path).unwrap();
        let loaded = StorefrontConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StorefrontConfig::load("/nonexistent/storefront.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
