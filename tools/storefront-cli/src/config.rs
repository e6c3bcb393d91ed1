//! CLI configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_commerce::Currency;
use storefront_data::BackendConfig;

/// Environment variable overriding `backend.url`.
pub const BACKEND_URL_ENV: &str = "STOREFRONT_BACKEND_URL";
/// Environment variable overriding `backend.api_token`.
pub const API_TOKEN_ENV: &str = "STOREFRONT_API_TOKEN";

/// Errors loading or interpreting the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// CLI configuration file (`storefront.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorefrontConfig {
    /// Backend connection.
    #[serde(default)]
    pub backend: BackendSection,

    /// Local cart persistence.
    #[serde(default)]
    pub cart: CartSection,

    /// Checkout tunables.
    #[serde(default)]
    pub checkout: CheckoutSection,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        let parsed = if path.ends_with(".json") {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_string(),
            message,
        })
    }

    /// Apply `STOREFRONT_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(BACKEND_URL_ENV) {
            self.backend.url = url;
        }
        if let Some(token) = get(API_TOKEN_ENV) {
            self.backend.api_token = Some(token);
        }
        self
    }

    /// Configured currency.
    pub fn currency(&self) -> Result<Currency, ConfigError> {
        Currency::from_code(&self.backend.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.backend.currency.clone()))
    }

    /// Connection settings for the backend client.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("backend.timeout_secs"));
        }

        let mut config = BackendConfig::new(&self.backend.url)
            .with_timeout(Duration::from_secs(self.backend.timeout_secs))
            .with_currency(self.currency()?);
        if let Some(token) = &self.backend.api_token {
            config = config.with_api_token(token);
        }
        Ok(config)
    }

    /// How long a checkout waits for the backend before giving up.
    pub fn submit_timeout(&self) -> Result<Duration, ConfigError> {
        match self.checkout.submit_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout("checkout.submit_timeout_secs")),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSection {
    /// Base URL of the backend REST API.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// ISO currency code prices are quoted in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_backend_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            currency: default_currency(),
        }
    }
}

/// Cart persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartSection {
    /// Directory holding the persisted cart (default: platform data dir).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Branch whose cart to use; each branch keeps its own cart.
    #[serde(default)]
    pub branch: Option<String>,
}

/// Checkout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSection {
    /// Seconds to wait for the order to be accepted.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
}

fn default_submit_timeout_secs() -> u64 {
    30
}

impl Default for CheckoutSection {
    fn default() -> Self {
        Self {
            submit_timeout_secs: default_submit_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.backend.url, "http://localhost:8080/api");
        assert_eq!(config.currency().unwrap(), Currency::USD);
        assert_eq!(config.submit_timeout().unwrap(), Duration::from_secs(30));
        assert!(config.cart.branch.is_none());
    }

    #[test]
    fn test_load_toml_with_partial_sections() {
        let (_dir, path) = write_config(
            "storefront.toml",
            r#"
[backend]
url = "https://api.pizzeria.example/v1"
currency = "BRL"

[cart]
branch = "centro"
"#,
        );

        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.backend.url, "https://api.pizzeria.example/v1");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.currency().unwrap(), Currency::BRL);
        assert_eq!(config.cart.branch.as_deref(), Some("centro"));
        assert_eq!(config.checkout.submit_timeout_secs, 30);
    }

    #[test]
    fn test_load_json() {
        let (_dir, path) = write_config(
            "storefront.json",
            r#"{"checkout": {"submit_timeout_secs": 5}}"#,
        );

        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.submit_timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_errors() {
        let (_dir, path) = write_config("storefront.toml", "[backend\nurl = ");
        assert!(matches!(
            StorefrontConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            StorefrontConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = StorefrontConfig::default().with_overrides(|name| match name {
            BACKEND_URL_ENV => Some("https://staging.example/api".to_string()),
            API_TOKEN_ENV => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.backend.url, "https://staging.example/api");
        assert!(config.backend.api_token.is_none());
    }

    #[test]
    fn test_backend_config() {
        let mut config = StorefrontConfig::default();
        config.backend.api_token = Some("s3cret".to_string());
        config.backend.timeout_secs = 3;

        let backend = config.backend_config().unwrap();
        assert_eq!(backend.api_token.as_deref(), Some("s3cret"));
        assert_eq!(backend.timeout, Duration::from_secs(3));

        config.backend.currency = "XYZ".to_string();
        assert!(matches!(
            config.backend_config(),
            Err(ConfigError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = StorefrontConfig::default();
        config.checkout.submit_timeout_secs = 0;
        assert!(matches!(
            config.submit_timeout(),
            Err(ConfigError::ZeroTimeout(_))
        ));
    }
}
