use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Maximum upload size in bytes for a single form post
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: String,
    /// Directory holding the managed copies of uploaded attachments
    pub attachments_dir: String,
    /// Delete managed copies when their record is deleted. Off by default: copies are retained.
    pub prune_attachments_on_delete: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./concorsi_rita.db".to_string(),
            attachments_dir: "./bandi_pdf".to_string(),
            prune_attachments_on_delete: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let host = std::env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a port number, got '{raw}'"))
            })?,
            Err(_) => 8080,
        };

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./concorsi_rita.db".to_string());

        let attachments_dir =
            std::env::var("ATTACHMENTS_DIR").unwrap_or_else(|_| "./bandi_pdf".to_string());

        let prune_attachments_on_delete = std::env::var("PRUNE_ATTACHMENTS_ON_DELETE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let config = Config {
            server: ServerConfig { host, port },
            storage: StorageConfig {
                database_path,
                attachments_dir,
                prune_attachments_on_delete,
            },
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_HOST cannot be empty".to_string(),
            ));
        }

        if self.storage.database_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "DATABASE_PATH cannot be empty".to_string(),
            ));
        }

        if self.storage.attachments_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ATTACHMENTS_DIR cannot be empty".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.storage.prune_attachments_on_delete {
            tracing::warn!("Attachment pruning enabled: deleting a record removes its copies");
        }

        Ok(())
    }
}
