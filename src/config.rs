use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    /// How often the daily reset check runs after startup.
    pub reset_interval: Duration,

    // Rate limiting, 0 disables it
    pub rate_per_min: u32,

    /// When set, every API route requires a bearer JWT signed with it.
    pub jwt_secret: Option<String>,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_addr = match var("SERVER_ADDR") {
            Some(addr) => addr,
            None => format!("0.0.0.0:{}", parse_or(var("PORT"), "PORT", 3000u16)?),
        };

        let database_url = match (var("DATABASE_URL"), var("DB_PATH")) {
            (Some(url), _) => url,
            (None, Some(path)) => format!("sqlite://{}", path),
            (None, None) if Path::new("/data").is_dir() => {
                "sqlite:///data/database.sqlite".to_string()
            }
            (None, None) => "sqlite://database.sqlite".to_string(),
        };

        let reset_secs: u64 = parse_or(var("RESET_INTERVAL_SECS"), "RESET_INTERVAL_SECS", 60)?;
        if reset_secs == 0 {
            bail!("RESET_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            database_url,
            server_addr,
            api_prefix: var("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            reset_interval: Duration::from_secs(reset_secs),
            rate_per_min: parse_or(var("RATE_PER_MIN"), "RATE_PER_MIN", 1000)?,
            jwt_secret: var("JWT_SECRET"),
            log_dir: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(var("LOG_LEVEL"), "LOG_LEVEL", tracing::Level::INFO)?,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, value)),
        None => Ok(default),
    }
}
