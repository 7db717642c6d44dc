// src/config.rs
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MODEL_DIR_NAME: &str = "Model";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            database_path: "predictions.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
        }
    }
}

/// `Model/` beside the executable when present, else the one shipped in the crate root.
fn default_model_dir() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(MODEL_DIR_NAME)));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => Path::new(env!("CARGO_MANIFEST_DIR")).join(MODEL_DIR_NAME),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(dir) = lookup("MODEL_DIR") {
            cfg.model_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            cfg.database_path = path;
        }
        if let Some(path) = lookup("SCHEMA_PATH") {
            cfg.schema_path = path;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            cfg.bind_addr = addr.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "BIND_ADDR",
                expected: "socket address",
                value: addr.clone(),
            })?;
        }
        if let Some(n) = lookup("MAX_WORKERS") {
            cfg.max_workers = n
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "MAX_WORKERS",
                    expected: "positive integer",
                    value: n.clone(),
                })?;
        }

        Ok(cfg)
    }
}
