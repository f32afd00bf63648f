//! Settings read from the environment.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use forum_votes_ledger::LedgerConfig;
use tracing::warn;

use crate::ServerError;

/// Default listen port.
const DEFAULT_PORT: u16 = 5000;

/// Default per store call timeout in milliseconds.
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

/// Default number of attempts for a contended vote.
const DEFAULT_VOTE_MAX_ATTEMPTS: usize = 5;

/// Default PostgreSQL pool size.
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Where posts are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL through `DATABASE_URL`.
    Postgres,
    /// Process memory. Everything is lost on shutdown.
    Memory,
}

impl StoreBackend {
    /// Valid values: "postgres" or "memory" (case-insensitive).
    fn parse(value: &str) -> Result<Self, ServerError> {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(ServerError::config(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

/// Service settings.
///
/// ## Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL URL (required for the postgres backend)
/// - `STORE_BACKEND`: `postgres` (default) or `memory`
/// - `HOST`: listen address (default: 0.0.0.0)
/// - `PORT`: listen port (default: 5000)
/// - `STORE_TIMEOUT_MS`: bound for each store call (default: 5000)
/// - `VOTE_MAX_ATTEMPTS`: attempts for a contended vote (default: 5)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `RUN_MIGRATIONS`: apply embedded migrations at startup (default: true)
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub ledger: LedgerConfig,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND") {
            Some(value) => StoreBackend::parse(&value)?,
            None => StoreBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        match (store_backend, &database_url) {
            (StoreBackend::Postgres, None) => {
                return Err(ServerError::config("DATABASE_URL must be set"));
            }
            (StoreBackend::Memory, Some(_)) => {
                warn!("DATABASE_URL is ignored with STORE_BACKEND=memory");
            }
            _ => {}
        }

        let store_timeout_ms: u64 = parse_var(&lookup, "STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;
        if store_timeout_ms == 0 {
            return Err(ServerError::config("STORE_TIMEOUT_MS must be greater than 0"));
        }
        let max_attempts: usize = parse_var(&lookup, "VOTE_MAX_ATTEMPTS", DEFAULT_VOTE_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ServerError::config("VOTE_MAX_ATTEMPTS must be at least 1"));
        }

        let ledger = LedgerConfig::default()
            .with_store_timeout(Duration::from_millis(store_timeout_ms))
            .with_max_attempts(max_attempts);

        Ok(Self {
            host: parse_var(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            store_backend,
            database_url,
            database_max_connections: parse_var(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            run_migrations: parse_var(&lookup, "RUN_MIGRATIONS", true)?,
            ledger,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ServerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ServerError::config(format!("Invalid {key} '{raw}': {e}"))),
        None => Ok(default),
    }
}
