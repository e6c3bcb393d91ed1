//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::debug;

use storefront_cache::{cache_key, FileStore};
use storefront_commerce::cart::{CartStore, DEFAULT_CART_KEY};
use storefront_commerce::catalog::Catalog;
use storefront_commerce::checkout::CheckoutSettings;
use storefront_data::BackendClient;

use crate::config::StorefrontConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: StorefrontConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = match config_path {
            Some(path) => StorefrontConfig::load(path)?,
            None => Self::find_config(&cwd).unwrap_or_default(),
        };

        Ok(Self {
            config: config.with_env_overrides(),
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<StorefrontConfig> {
        for dir in start.ancestors() {
            for name in CONFIG_NAMES {
                let config_path = dir.join(name);
                if !config_path.exists() {
                    continue;
                }
                match StorefrontConfig::load(config_path.to_str()?) {
                    Ok(config) => {
                        debug!(path = %config_path.display(), "using config file");
                        return Some(config);
                    }
                    Err(e) => debug!(error = %e, "skipping unreadable config file"),
                }
            }
        }
        None
    }

    /// Directory holding the persisted cart.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.cart.data_dir {
            Some(dir) => self.resolve_path(dir),
            None => dirs_path().join("storefront"),
        }
    }

    /// Storage key of the cart; one cart per branch.
    pub fn cart_key(&self) -> String {
        match self.config.cart.branch.as_deref().filter(|b| !b.is_empty()) {
            Some(branch) => cache_key!(DEFAULT_CART_KEY, branch),
            None => DEFAULT_CART_KEY.to_string(),
        }
    }

    /// Open the persisted cart.
    pub fn cart_store(&self) -> Result<CartStore<FileStore>> {
        let dir = self.data_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;
        Ok(CartStore::open(store, self.cart_key(), self.config.currency()?))
    }

    /// Client for the configured backend.
    pub fn backend(&self) -> Result<BackendClient> {
        let config = self.config.backend_config()?;
        BackendClient::new(&config)
            .with_context(|| format!("Invalid backend configuration for {}", config.base_url))
    }

    /// Catalog reader over the backend.
    pub fn catalog(&self) -> Result<Catalog<BackendClient>> {
        Ok(Catalog::new(self.backend()?))
    }

    /// Checkout settings from the backend, with the configured submit timeout.
    pub async fn checkout_settings(&self) -> Result<CheckoutSettings> {
        let settings = self.catalog()?.checkout_settings().await;
        Ok(settings.with_submit_timeout(self.config.submit_timeout()?))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(config: StorefrontConfig, cwd: &Path) -> Context {
        Context {
            config,
            output: Output::new(false, true),
            cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn test_cart_key_per_branch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        assert_eq!(context(config.clone(), dir.path()).cart_key(), "cart");

        config.cart.branch = Some("centro".to_string());
        assert_eq!(context(config, dir.path()).cart_key(), "cart:centro");
    }

    #[test]
    fn test_relative_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        config.cart.data_dir = Some(PathBuf::from(".storefront"));

        let ctx = context(config, dir.path());
        assert_eq!(ctx.data_dir(), dir.path().join(".storefront"));
    }

    #[test]
    fn test_cart_persists_across_contexts() {
        use storefront_commerce::catalog::Product;
        use storefront_commerce::{Currency, Money};

        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        config.cart.data_dir = Some(dir.path().join("data"));

        let ctx = context(config.clone(), dir.path());
        let mut cart = ctx.cart_store().unwrap();
        let pizza = Product::new("1", "Margherita", Money::from_minor(1800, Currency::USD));
        cart.add_item(&pizza, 2, None).unwrap();

        let reopened = context(config, dir.path()).cart_store().unwrap();
        assert_eq!(reopened.item_count(), 2);
    }

    #[test]
    fn test_finds_config_in_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("storefront.toml"),
            "[cart]\nbranch = \"norte\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Context::find_config(&nested).unwrap();
        assert_eq!(config.cart.branch.as_deref(), Some("norte"));
    }
}
