//! PostgreSQL settings for the execution history and workflow tables.

use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Connection and pool settings.
///
/// `DATABASE_URL`, when set and non-empty, wins over the discrete
/// `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`
/// and `POSTGRES_DATABASE` settings. Pool sizing always comes from
/// `POSTGRES_MAX_CONNECTIONS` and `POSTGRES_ACQUIRE_TIMEOUT_SECONDS`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip)]
    pub url: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "campaign".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let mut config: DatabaseConfig = envy::prefixed("POSTGRES_").from_iter(vars.iter().cloned())?;
        config.url = vars
            .into_iter()
            .find(|(key, _)| key == "DATABASE_URL")
            .map(|(_, value)| value)
            .filter(|value| !value.trim().is_empty());
        Ok(config)
    }

    /// Connect options from `DATABASE_URL` or the discrete settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is not a valid PostgreSQL URL.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database)),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds.max(1))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
        }
    }
}
