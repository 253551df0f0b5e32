use chrono::Duration;
use std::fmt::Display;
use std::str::FromStr;

use crate::core::models::code::{Policy, MAX_LENGTH};
use crate::error::Error;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub code_policy: Policy,
    /// (username, password) of the account to create at start-up.
    pub admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| get(key).filter(|v| !v.is_empty()).ok_or_else(|| Error::ConfigError(format!("{} must be set", key)));
        let session_minutes: i64 = positive(&get, "SESSION_TTL_MINUTES", 30)?;
        let code_length: usize = positive(&get, "CODE_LENGTH", 5)?;
        if code_length > MAX_LENGTH {
            return Err(Error::ConfigError(format!("CODE_LENGTH must be at most {}", MAX_LENGTH)));
        }
        let admin = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        };
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            max_connections: positive(&get, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse(&get, "PORT", 8000)?,
            jwt_secret: required("JWT_SECRET")?,
            session_ttl: Duration::minutes(session_minutes),
            code_policy: Policy {
                length: code_length,
                max_attempts: positive(&get, "CODE_MAX_ATTEMPTS", 16)?,
            },
            admin,
        })
    }
}

fn parse<F, T>(get: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| Error::ConfigError(format!("invalid {}: {}", key, e))),
    }
}

fn positive<F, T>(get: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: Display,
{
    let value = parse(get, key, default)?;
    if value <= T::default() {
        return Err(Error::ConfigError(format!("{} must be positive", key)));
    }
    Ok(value)
}
