use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SaypiConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub pool_size: u32,
    pub default_owner: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_saypi_dir()
            .join("say.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            pool_size: 8,
            default_owner: "default".into(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// Returns `~/.saypi/`, or `.saypi/` when no home directory is known.
pub fn default_saypi_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".saypi")
}

/// Returns the default config file path: `~/.saypi/config.toml`
pub fn default_config_path() -> PathBuf {
    default_saypi_dir().join("config.toml")
}

impl SaypiConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            SaypiConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (SAYPI_DB, SAYPI_OWNER, SAYPI_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SAYPI_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("SAYPI_OWNER") {
            self.storage.default_owner = val;
        }
        if let Ok(val) = std::env::var("SAYPI_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.storage.pool_size > 0, "storage.pool_size must be at least 1");
        anyhow::ensure!(
            self.pagination.default_limit <= crate::say::MAX_LIMIT,
            "pagination.default_limit must be at most {}",
            crate::say::MAX_LIMIT
        );
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SaypiConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.storage.default_owner, "default");
        assert_eq!(config.storage.pool_size, 8);
        assert_eq!(config.pagination.default_limit, 10);
        assert!(config.storage.db_path.ends_with("say.db"));
        config.validate().unwrap();
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"

[storage]
db_path = "/tmp/test.db"
default_owner = "alice"

[pagination]
default_limit = 25
"#;
        let config: SaypiConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.storage.default_owner, "alice");
        assert_eq!(config.pagination.default_limit, 25);
        // defaults still apply for unset fields
        assert_eq!(config.storage.pool_size, 8);
    }

    #[test]
    fn oversized_default_limit_is_rejected() {
        let mut config = SaypiConfig::default();
        config.pagination.default_limit = crate::say::MAX_LIMIT + 1;
        assert!(config.validate().is_err());

        config.pagination.default_limit = 10;
        config.storage.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = SaypiConfig::load_from(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.pagination.default_limit, 10);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = SaypiConfig::default();
        std::env::set_var("SAYPI_DB", "/tmp/override.db");
        std::env::set_var("SAYPI_OWNER", "env-owner");
        std::env::set_var("SAYPI_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.storage.default_owner, "env-owner");
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("SAYPI_DB");
        std::env::remove_var("SAYPI_OWNER");
        std::env::remove_var("SAYPI_LOG_LEVEL");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/say.db"), PathBuf::from("/var/say.db"));
    }
}
