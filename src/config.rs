// src/config.rs - Configuration management
use serde::Deserialize;
use std::env;
use anyhow::{Context, Result};
use std::path::Path;
use std::fs;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: u64,
    pub client_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub max_request_size: usize,
    pub require_https: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            keep_alive: 30,
            client_timeout: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:farm_ledger.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
            idle_timeout: 600,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://127.0.0.1:8080".to_string(),
                "http://localhost:8080".to_string(),
            ],
            max_request_size: 256 * 1024,
            require_https: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let mut config = if let Ok(config_file) = env::var("CONFIG_FILE") {
        let path = Path::new(&config_file);
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", config_file))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", config_file))?
    } else {
        Config::default()
    };

    override_with_env(&mut config);

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn override_with_env(config: &mut Config) {
    if let Ok(host) = env::var("BIND_ADDRESS") {
        config.server.host = host;
    }
    if let Ok(port_str) = env::var("FARM_PORT") {
        if let Ok(port) = port_str.parse::<u16>() {
            config.server.port = port;
        }
    }
    if let Ok(workers_str) = env::var("FARM_WORKERS") {
        if let Ok(workers) = workers_str.parse::<usize>() {
            config.server.workers = Some(workers);
        }
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    }
    if let Ok(max_conn_str) = env::var("DATABASE_MAX_CONNECTIONS") {
        if let Ok(max_conn) = max_conn_str.parse::<u32>() {
            config.database.max_connections = max_conn;
        }
    }
    if let Ok(min_conn_str) = env::var("DATABASE_MIN_CONNECTIONS") {
        if let Ok(min_conn) = min_conn_str.parse::<u32>() {
            config.database.min_connections = min_conn;
        }
    }
    if let Ok(origins_str) = env::var("ALLOWED_ORIGINS") {
        config.security.allowed_origins = origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(level) = env::var("RUST_LOG") {
        config.logging.level = level;
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be at least 1"));
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(anyhow::anyhow!(
                "max_connections ({}) must be >= min_connections ({})",
                self.database.max_connections,
                self.database.min_connections
            ));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port must not be 0"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        env::var("FARM_ENV").map(|v| v == "production").unwrap_or(false)
    }

    pub fn print_startup_info(&self) {
        log::info!("🌾 Farm ledger starting up...");
        log::info!("🌐 Server: {}:{}", self.server.host, self.server.port);
        log::info!("💾 Database: {}", self.database.url);
        log::info!("📊 Logging: {} level", self.logging.level);

        if !self.is_production() {
            log::warn!("🚧 Running in development mode");
        }
    }
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite:farm_ledger.db");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());

        config.database.url = "sqlite::memory:".to_string();
        assert!(config.validate().is_ok());

        config.database.max_connections = 1;
        config.database.min_connections = 5;
        assert!(config.validate().is_err());

        config.database.min_connections = 0;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_parsing_keeps_defaults_for_missing_sections() -> Result<()> {
        let toml_content = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [database]
        url = "sqlite:/var/lib/farm/ledger.db"
        "#;

        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(toml_content.as_bytes())?;

        let config_str = fs::read_to_string(temp_file.path())?;
        let config: Config = toml::from_str(&config_str)?;

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.keep_alive, 30);
        assert_eq!(config.database.url, "sqlite:/var/lib/farm/ledger.db");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.level, "info");
        Ok(())
    }
}
