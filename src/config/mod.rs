use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub pages_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        Self {
            environment,
            server: ServerConfig { port: 8080 },
            storage: StorageConfig {
                pages_dir: PathBuf::from("pages"),
            },
            session: SessionConfig {
                cookie_name: "wikid_session".to_string(),
            },
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides; WIKID_PORT wins over the generic PORT
        if let Some(port) = env::var("WIKID_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // Storage overrides
        if let Ok(v) = env::var("WIKID_PAGES_DIR") {
            if !v.is_empty() {
                self.storage.pages_dir = PathBuf::from(v);
            }
        }

        // Session overrides
        if let Ok(v) = env::var("WIKID_SESSION_COOKIE") {
            if !v.is_empty() {
                self.session.cookie_name = v;
            }
        }

        self
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
