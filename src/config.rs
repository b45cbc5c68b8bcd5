/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWT_SECRET, トークン有効期間など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 署名用シークレットは Debug に出さない
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use thiserror::Error;

use crate::services::auth::TokenConfig;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 15;
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub request_timeout: StdDuration,

    pub token: TokenConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // database_url may embed a password
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("request_timeout", &self.request_timeout)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .map(StdDuration::from_secs)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => StdDuration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        };

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }
        if app_env.is_production() && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };
        let validity =
            Duration::try_seconds(ttl_seconds).ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            request_timeout,
            token: TokenConfig::new(secret.into_bytes(), validity),
        })
    }
}
