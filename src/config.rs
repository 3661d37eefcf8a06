//! Server configuration.
//!
//! Load order: `itemreviews.toml` → environment variables → defaults.
//!
//! Environment variables:
//!   ITEMREVIEWS_CONFIG      # TOML file path (default: itemreviews.toml, optional)
//!   ITEMREVIEWS_DATABASE    # SQLite file path (default: itemreviews.db)
//!   ITEMREVIEWS_BIND        # Listen address (default: 127.0.0.1:3004)
//!   ITEMREVIEWS_ON_DELETE   # restrict | cascade (default: restrict)
//!   ITEMREVIEWS_DEBUG       # any non-empty value turns on debug logging

use crate::error::{Result, StoreError};
use crate::schema::DeletePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "itemreviews.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub bind_addr: String,
    /// Applied to both review foreign keys when the schema is first created.
    pub delete_policy: DeletePolicy,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "itemreviews.db".to_string(),
            bind_addr: "127.0.0.1:3004".to_string(),
            delete_policy: DeletePolicy::Restrict,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let path = lookup("ITEMREVIEWS_CONFIG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        Self::load(Path::new(&path), lookup)
    }

    /// Reads `config_path` when it exists, then applies overrides from `lookup`.
    pub fn load<F>(config_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).map_err(|e| {
                StoreError::Config(format!("cannot read {}: {}", config_path.display(), e))
            })?;
            toml::from_str(&content).map_err(|e| {
                StoreError::Config(format!("invalid {}: {}", config_path.display(), e))
            })?
        } else {
            Self::default()
        };
        config.with_overrides(lookup)
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for unset or empty keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("ITEMREVIEWS_DATABASE") {
            self.database_path = path;
        }
        if let Some(addr) = get("ITEMREVIEWS_BIND") {
            self.bind_addr = addr;
        }
        if let Some(policy) = get("ITEMREVIEWS_ON_DELETE") {
            self.delete_policy = policy.parse()?;
        }
        if get("ITEMREVIEWS_DEBUG").is_some() {
            self.debug = true;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ITEMREVIEWS_DATABASE", "/tmp/reviews.db"),
            ("ITEMREVIEWS_BIND", "0.0.0.0:8080"),
            ("ITEMREVIEWS_ON_DELETE", "CASCADE"),
            ("ITEMREVIEWS_DEBUG", "1"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, "/tmp/reviews.db");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.delete_policy, DeletePolicy::Cascade);
        assert!(config.debug);
    }

    #[test]
    fn test_invalid_delete_policy_is_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("ITEMREVIEWS_ON_DELETE", "nullify")]))
            .unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_load_reads_toml_then_env() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            "delete_policy = \"cascade\"\ndatabase_path = \"/var/lib/reviews.db\"\ndebug = true\n",
        )
        .unwrap();

        let config = AppConfig::load(&path, lookup(&[])).unwrap();
        assert_eq!(config.delete_policy, DeletePolicy::Cascade);
        assert_eq!(config.database_path, "/var/lib/reviews.db");
        assert_eq!(config.bind_addr, "127.0.0.1:3004");
        assert!(config.debug);

        let config = AppConfig::load(
            &path,
            lookup(&[("ITEMREVIEWS_ON_DELETE", "restrict")]),
        )
        .unwrap();
        assert_eq!(config.delete_policy, DeletePolicy::Restrict);
        assert_eq!(config.database_path, "/var/lib/reviews.db");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("missing.toml"), lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "delete_policy = \"nullify\"\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path, lookup(&[])),
            Err(StoreError::Config(_))
        ));
    }
}
