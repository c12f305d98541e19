use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub storage: StorageConfig,
    /// Maximum request body size in bytes. Entry bodies travel inside JSON, so this caps entry size.
    pub max_body_size: u64,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    /// Directory holding the metadata database
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for entry bodies; drafts and published bodies live in subdirectories
    pub content_root: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            content_root: "./assets/blog".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = NodeConfig::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let data_dir = std::env::var("DATA_DIR").unwrap_or(defaults.data_dir);

        let content_root = std::env::var("CONTENT_ROOT")
            .unwrap_or_else(|_| StorageConfig::default().content_root);

        let max_body_size = match std::env::var("MAX_BODY_SIZE") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::ValidationError(format!("MAX_BODY_SIZE must be a byte count, got '{raw}'"))
            })?,
            Err(_) => 10 * 1024 * 1024, // 10MB
        };

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            storage: StorageConfig { content_root },
            max_body_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.node.data_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "DATA_DIR cannot be empty".to_string(),
            ));
        }

        if self.storage.content_root.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "CONTENT_ROOT cannot be empty".to_string(),
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
