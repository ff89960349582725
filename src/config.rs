//! Settings read from the environment (after `.env` has been loaded).

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::store::IdPolicy;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Where todos are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for TodoBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(TodoBackend::Sqlite),
            "memory" => Ok(TodoBackend::Memory),
            other => Err(format!("unknown backend '{other}' (expected sqlite or memory)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub todo_backend: TodoBackend,
    pub id_policy: IdPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid { key: "BIND_ADDR", message: e.to_string() })?;
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let todo_backend = parse_or_default("TODO_BACKEND", lookup("TODO_BACKEND"))?;
        let id_policy = parse_or_default("ID_POLICY", lookup("ID_POLICY"))?;
        Ok(Self { bind_addr, database_url, todo_backend, id_policy })
    }
}

fn parse_or_default<T>(key: &'static str, raw: Option<String>) -> Result<T, ConfigError>
where
    T: FromStr<Err = String> + Default,
{
    match raw {
        Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid { key, message }),
        None => Ok(T::default()),
    }
}
