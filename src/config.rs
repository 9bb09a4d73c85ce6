use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::Context;
use tracing::info;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_minutes: i64,
    pub store_retries: u32,
    pub store_retry_base_ms: u64,
    /// Mounts `/dev/login/{user_id}`. Never on in production.
    pub dev_login: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: var_or("DATABASE_URL", "sqlite://swipematch.db?mode=rwc".to_owned())?,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:8080".to_owned())?,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 16)?,
            session_minutes: var_or("SESSION_MINUTES", 60)?,
            store_retries: var_or("STORE_RETRIES", 3)?,
            store_retry_base_ms: var_or("STORE_RETRY_BASE_MS", 25)?,
            dev_login: var_or("DEV_LOGIN", false)?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.store_retries.max(1),
            base_delay: Duration::from_millis(self.store_retry_base_ms),
        }
    }
}

fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenv::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("invalid {key}: {raw:?}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
