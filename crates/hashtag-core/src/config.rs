//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`APP_HASHTAGS__TAGGING_ENABLED=false` reaches `hashtags.tagging_enabled`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::registry::DEFAULT_COMPOSER_CONTEXT;
use crate::types::TypePriority;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Load a single explicit file, still honouring `APP_*` overrides.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"));
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `[hashtags]` section merged over `HashtagSettings::default()`.
    pub fn hashtag_settings(&self) -> anyhow::Result<HashtagSettings> {
        self.figment
            .clone()
            .join(Serialized::default("hashtags", HashtagSettings::default()))
            .extract_inner("hashtags")
            .map_err(|e| anyhow::anyhow!("Failed to read 'hashtags' settings: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.hashtag_settings()?;
        if settings.default_search_limit == 0 {
            anyhow::bail!("hashtags.default_search_limit must be at least 1");
        }
        if settings.default_context.trim().is_empty() {
            anyhow::bail!("hashtags.default_context must not be blank");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagSettings {
    pub catalog_path: String,
    pub tagging_enabled: bool,
    pub default_search_limit: usize,
    pub default_context: String,
    /// Extra `(type, context, priority)` entries layered over the defaults.
    pub priorities: Vec<TypePriority>,
}

impl Default for HashtagSettings {
    fn default() -> Self {
        Self {
            catalog_path: "catalog.toml".to_string(),
            tagging_enabled: true,
            default_search_limit: 5,
            default_context: DEFAULT_COMPOSER_CONTEXT.to_string(),
            priorities: Vec::new(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
