use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `sqlite` or `memory`
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Maximum number of stored images
    #[serde(default = "default_max_files")]
    pub max_files: u64,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "data/ribbit.db".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

fn default_max_files() -> u64 {
    200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
        }
    }
}

impl StorageConfig {
    /// Body limit for the HTTP layer: the file itself plus room for multipart framing
    pub fn transport_body_limit(&self) -> usize {
        (self.max_file_size as usize).saturating_add(1024 * 1024)
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.ensure_directories()?;
        tracing::info!(
            "Storage config: backend={}, max_files={}, max_file_size={}",
            config.storage.backend,
            config.storage.max_files,
            config.storage.max_file_size
        );
        Ok(config)
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config = Self::from_toml(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides
    /// Format: RIBBIT_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(val) = lookup("RIBBIT_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("RIBBIT_CONF_SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Database overrides
        if let Some(val) = lookup("RIBBIT_CONF_DATABASE_PATH") {
            self.database.path = val;
        }
        if let Some(max) = lookup("RIBBIT_CONF_DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.max_connections = max;
        }

        // Storage overrides
        if let Some(val) = lookup("RIBBIT_CONF_STORAGE_BACKEND") {
            if !val.trim().is_empty() {
                self.storage.backend = val.trim().to_lowercase();
            }
        }
        if let Some(size) = lookup("RIBBIT_CONF_STORAGE_MAX_FILE_SIZE").and_then(|v| v.parse().ok()) {
            self.storage.max_file_size = size;
        }
        if let Some(files) = lookup("RIBBIT_CONF_STORAGE_MAX_FILES").and_then(|v| v.parse().ok()) {
            self.storage.max_files = files;
        }
    }

    /// Ensure the database directory exists when the durable backend is in use
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if self.storage.backend != "sqlite" {
            return Ok(());
        }
        if let Some(parent) = Path::new(&self.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_limits() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.backend, "sqlite");
        assert_eq!(config.storage.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.storage.max_files, 200);
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let config = Config::from_toml(
            r#"
            [storage]
            backend = "memory"
            max_files = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.max_files, 3);
        assert_eq!(config.storage.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn env_overrides_replace_values_and_skip_garbage() {
        let vars: HashMap<&str, &str> = [
            ("RIBBIT_CONF_SERVER_PORT", "not-a-port"),
            ("RIBBIT_CONF_STORAGE_MAX_FILES", "50"),
            ("RIBBIT_CONF_STORAGE_BACKEND", " Memory "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.max_files, 50);
        assert_eq!(config.storage.backend, "memory");
    }

    #[test]
    fn transport_limit_leaves_room_for_framing() {
        let storage = StorageConfig {
            max_file_size: 100,
            ..StorageConfig::default()
        };
        assert_eq!(storage.transport_body_limit(), 100 + 1024 * 1024);
    }
}
