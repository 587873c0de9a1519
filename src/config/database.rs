use std::env;
use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::core::{AppError, Result};

/// MySQL connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open while idle
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            min_connections: parse_var("DATABASE_POOL_SIZE", 10)?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 20)?,
            acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.url.starts_with("mysql://") {
            return Err(AppError::Configuration(
                "DATABASE_URL must be a mysql:// URL".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(AppError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// URL with the password masked, for logs
    pub fn redacted_url(&self) -> String {
        let Some(rest) = self.url.strip_prefix("mysql://") else {
            return self.url.clone();
        };

        match rest.split_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("mysql://{}:***@{}", user, host)
            }
            None => self.url.clone(),
        }
    }

    pub async fn create_pool(&self) -> Result<MySqlPool> {
        tracing::debug!(
            url = %self.redacted_url(),
            min_connections = self.min_connections,
            max_connections = self.max_connections,
            "Connecting to MySQL"
        );

        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(&self.url)
            .await
            .map_err(AppError::Database)
    }

    /// Apply pending migrations from `migrations/`
    pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }
}
