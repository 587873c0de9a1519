use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod logging;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub penalty: PenaltyConfig,
    pub payment_gateway: PaymentGatewayConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key used to sign bearer tokens
    pub token_secret: String,
    pub token_ttl_hours: i64,
}

/// Overdue installment policy
#[derive(Debug, Clone)]
pub struct PenaltyConfig {
    /// Penalty charged per day late
    pub daily_amount: Decimal,
    /// Seconds between penalty job runs
    pub check_interval_secs: u64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            daily_amount: Decimal::new(10_000, 0),
            check_interval_secs: 86_400,
        }
    }
}

/// Placeholder gateway used to build synthetic payment URLs
#[derive(Debug, Clone)]
pub struct PaymentGatewayConfig {
    pub base_url: String,
}

impl Default for PaymentGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://app.sandbox.midtrans.com".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let penalty_defaults = PenaltyConfig::default();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            auth: AuthConfig {
                token_secret: env::var("AUTH_TOKEN_SECRET").map_err(|_| {
                    AppError::Configuration("AUTH_TOKEN_SECRET not set".to_string())
                })?,
                token_ttl_hours: env::var("AUTH_TOKEN_TTL_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid AUTH_TOKEN_TTL_HOURS".to_string())
                    })?,
            },
            penalty: PenaltyConfig {
                daily_amount: match env::var("PENALTY_DAILY_AMOUNT") {
                    Ok(raw) => Decimal::from_str(&raw).map_err(|_| {
                        AppError::Configuration("Invalid PENALTY_DAILY_AMOUNT".to_string())
                    })?,
                    Err(_) => penalty_defaults.daily_amount,
                },
                check_interval_secs: match env::var("PENALTY_CHECK_INTERVAL_SECS") {
                    Ok(raw) => raw.parse().map_err(|_| {
                        AppError::Configuration("Invalid PENALTY_CHECK_INTERVAL_SECS".to_string())
                    })?,
                    Err(_) => penalty_defaults.check_interval_secs,
                },
            },
            payment_gateway: PaymentGatewayConfig {
                base_url: env::var("PAYMENT_GATEWAY_BASE_URL")
                    .unwrap_or_else(|_| PaymentGatewayConfig::default().base_url),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;

        if self.auth.token_secret.len() < 32 {
            return Err(AppError::Configuration(
                "AUTH_TOKEN_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.auth.token_ttl_hours <= 0 {
            return Err(AppError::Configuration(
                "Token TTL hours must be greater than 0".to_string(),
            ));
        }

        if self.penalty.daily_amount < Decimal::ZERO {
            return Err(AppError::Configuration(
                "Daily penalty amount cannot be negative".to_string(),
            ));
        }

        if self.penalty.check_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Penalty check interval must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.app.log_format.as_str(), "pretty" | "json") {
            return Err(AppError::Configuration(format!(
                "Unsupported LOG_FORMAT '{}'",
                self.app.log_format
            )));
        }

        Ok(())
    }
}
