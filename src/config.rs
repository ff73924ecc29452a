use std::str::FromStr;

use derive_more::Display;

const DEFAULT_JWT_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_RATE_LIMIT_REPLENISH_MS: u64 = 100;
const DEFAULT_RATE_LIMIT_BURST: u32 = 30;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ConfigError {
    #[display(fmt = "env {} is not set", _0)]
    Missing(&'static str),
    #[display(fmt = "env {} has an invalid value", _0)]
    Invalid(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub secret_key: String,
    /// `None` runs the server on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_expiry_secs: i64,
    /// Interval after which one request of the burst quota is restored.
    pub rate_limit_replenish_ms: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let port = required("PORT")?
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid("PORT"))?;
        Ok(Config {
            port,
            secret_key: required("SECRET_KEY")?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_expiry_secs: parse("JWT_EXPIRY_SECS", lookup("JWT_EXPIRY_SECS"))?
                .unwrap_or(DEFAULT_JWT_EXPIRY_SECS),
            rate_limit_replenish_ms: parse(
                "RATE_LIMIT_REPLENISH_MS",
                lookup("RATE_LIMIT_REPLENISH_MS"),
            )?
            .unwrap_or(DEFAULT_RATE_LIMIT_REPLENISH_MS),
            rate_limit_burst: parse("RATE_LIMIT_BURST", lookup("RATE_LIMIT_BURST"))?
                .unwrap_or(DEFAULT_RATE_LIMIT_BURST),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| v.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key)))
        .transpose()
}
