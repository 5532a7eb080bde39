// Process configuration read from the environment

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Connection settings for the graph store
#[derive(Clone)]
pub struct GraphSettings {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy)]
pub struct PasswordSettings {
    /// Iteration count; higher values take strictly longer
    pub work_factor: u32,
    pub memory_kib: u32,
}

/// Everything the server needs at startup
#[derive(Clone)]
pub struct Settings {
    pub graph: GraphSettings,
    pub jwt_secret: String,
    pub password: PasswordSettings,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, applying defaults for optional keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let optional = |key: &'static str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            graph: GraphSettings {
                uri: required("NEO4J_URI")?,
                username: optional("NEO4J_USERNAME", "neo4j"),
                password: required("NEO4J_PASSWORD")?,
                database: optional("NEO4J_DATABASE", "neo4j"),
                max_connections: parse("NEO4J_MAX_CONNECTIONS", optional("NEO4J_MAX_CONNECTIONS", "16"))?,
            },
            jwt_secret: required("JWT_SECRET")?,
            password: PasswordSettings {
                work_factor: parse("PASSWORD_WORK_FACTOR", optional("PASSWORD_WORK_FACTOR", "2"))?,
                memory_kib: parse("PASSWORD_MEMORY_KIB", optional("PASSWORD_MEMORY_KIB", "19456"))?,
            },
            host: optional("HOST", "0.0.0.0"),
            port: parse("PORT", optional("PORT", "3000"))?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
