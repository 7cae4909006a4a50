//! Configuration for Ticklist.
//!
//! YAML file with every section defaulted. Search order:
//! 1. Explicit `--config` path
//! 2. ~/.config/ticklist/ticklist.yml
//! 3. ./ticklist.yml
//! 4. Defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TicklistError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,

    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| TicklistError::Config(format!("invalid server.bind '{}': {}", self.bind, e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub journal_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ticklist")
                .join("ticklist.db"),
            busy_timeout_ms: 5000,
            journal_path: None,
        }
    }
}

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub session_ttl_hours: u64,
    pub secure_cookies: bool,
    pub oauth: Option<OAuthConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "ticklist_session".to_string(),
            session_ttl_hours: 24 * 7,
            secure_cookies: false,
            oauth: None,
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours as i64)
    }
}

/// OAuth 2.0 authorization-code provider settings (GitHub-shaped by default)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_url: String,
    pub redirect_url: String,
    pub scope: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            user_url: "https://api.github.com/user".to_string(),
            redirect_url: "http://127.0.0.1:3000/auth/callback".to_string(),
            scope: "read:user".to_string(),
        }
    }
}

impl OAuthConfig {
    fn validate(&self) -> Result<()> {
        let required = [
            ("client_id", &self.client_id),
            ("authorize_url", &self.authorize_url),
            ("token_url", &self.token_url),
            ("user_url", &self.user_url),
            ("redirect_url", &self.redirect_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(TicklistError::Config(format!("auth.oauth.{} must be set", field)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
            source: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::discover(config_path)?;
        config.apply_env(std::env::var("PORT").ok().as_deref())?;
        config.validate()?;
        Ok(config)
    }

    fn discover(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                return Self::load_from_file(&primary_config);
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            return Self::load_from_file(&fallback_config);
        }

        Ok(Self::default())
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| TicklistError::Config(format!("failed to parse config: {}", e)))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| TicklistError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// `PORT` replaces the port of `server.bind`, keeping the host.
    fn apply_env(&mut self, port: Option<&str>) -> Result<()> {
        if let Some(port) = port {
            let port: u16 = port
                .parse()
                .map_err(|e| TicklistError::Config(format!("invalid PORT '{}': {}", port, e)))?;
            let mut addr = self.server.bind_addr()?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.server.bind_addr()?;
        if self.auth.cookie_name.trim().is_empty() {
            return Err(TicklistError::Config("auth.cookie_name must be set".to_string()));
        }
        if let Some(oauth) = &self.auth.oauth {
            oauth.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.auth.cookie_name, "ticklist_session");
        assert!(config.auth.oauth.is_none());
        assert!(config.storage.db_path.ends_with("ticklist/ticklist.db"));
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = Config::from_yaml(
            r#"
server:
  bind: "0.0.0.0:8080"
storage:
  journal_path: /tmp/journal.jsonl
"#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.max_body_bytes, 64 * 1024);
        assert_eq!(config.storage.busy_timeout_ms, 5000);
        assert_eq!(config.storage.journal_path, Some(PathBuf::from("/tmp/journal.jsonl")));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_oauth_section_uses_github_defaults() {
        let config = Config::from_yaml(
            r#"
auth:
  oauth:
    client_id: abc
    client_secret: shh
"#,
        )
        .unwrap();
        let oauth = config.auth.oauth.as_ref().unwrap();
        assert_eq!(oauth.client_id, "abc");
        assert!(oauth.token_url.contains("github.com"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oauth_without_client_id_is_rejected() {
        let config = Config::from_yaml("auth:\n  oauth:\n    client_secret: shh\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_invalid_bind_is_rejected() {
        let config = Config::from_yaml("server:\n  bind: not-an-address\n").unwrap();
        assert!(matches!(config.validate(), Err(TicklistError::Config(_))));
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = Config::default();
        config.apply_env(Some("4000")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:4000");

        assert!(config.apply_env(Some("abc")).is_err());
    }

    #[test]
    fn test_load_explicit_file_records_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ticklist.yml");
        fs::write(&path, "logging:\n  level: debug\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.source, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        assert!(Config::discover(Some(&missing)).is_err());
    }

    #[test]
    fn test_session_ttl() {
        let config = Config::default();
        assert_eq!(config.auth.session_ttl(), chrono::Duration::days(7));
    }
}
