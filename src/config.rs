use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// PostgreSQL schema whose tables are introspected
    #[validate(length(min = 1, message = "Database schema cannot be empty"))]
    pub db_schema: String,

    /// Directory containing the frontend build served at /
    #[validate(length(min = 1, message = "Static directory cannot be empty"))]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            db_schema: "public".to_string(),
            static_dir: "build".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("SCHEMASCOPE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("SCHEMASCOPE_PORT", "8080")?,
            db_schema: env::var("SCHEMASCOPE_DB_SCHEMA").unwrap_or_else(|_| "public".to_string()),
            static_dir: env::var("SCHEMASCOPE_STATIC_DIR").unwrap_or_else(|_| "build".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            http_host: cli.http_host,
            http_port: cli.http_port,
            db_schema: cli.db_schema,
            static_dir: cli.static_dir,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (CLI overrides environment)
    pub fn merge(&mut self, other: Self) {
        self.http_host = other.http_host;
        self.http_port = other.http_port;
        self.db_schema = other.db_schema;
        self.static_dir = other.static_dir;
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub db_schema: String,
    pub static_dir: String,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.db_schema, "public");
        assert_eq!(config.static_dir, "build");
    }

    #[test]
    fn test_invalid_port_range() {
        let config = ServerConfig {
            http_port: 0, // Invalid
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_host() {
        let config = ServerConfig {
            http_host: "".to_string(), // Invalid
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_db_schema() {
        let config = ServerConfig {
            db_schema: "".to_string(), // Invalid
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("SCHEMASCOPE_PORT", "9090");
        env::set_var("SCHEMASCOPE_DB_SCHEMA", "omop");
        let config = ServerConfig::from_env().unwrap();
        env::remove_var("SCHEMASCOPE_PORT");
        env::remove_var("SCHEMASCOPE_DB_SCHEMA");

        assert_eq!(config.http_port, 9090);
        assert_eq!(config.db_schema, "omop");
        assert_eq!(config.http_host, "0.0.0.0");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unparseable_port() {
        env::set_var("SCHEMASCOPE_PORT", "not-a-port");
        let result = ServerConfig::from_env();
        env::remove_var("SCHEMASCOPE_PORT");

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_yaml_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "http_host: 127.0.0.1\nhttp_port: 3000\ndb_schema: omop\nstatic_dir: dist"
        )
        .unwrap();

        let config = ServerConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.db_schema, "omop");
        assert_eq!(config.static_dir, "dist");
    }
}
