use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub templates_glob: String,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub bcrypt_cost: u32,
    pub session_idle_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "study.db".into(),
            bind_addr: "127.0.0.1:5000".into(),
            templates_glob: "templates/**/*.html".into(),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 256,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_idle_days: 1,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; unset names keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl_secs = parse_or(&lookup, "CACHE_TTL_SECS", "a number of seconds", defaults.cache_ttl.as_secs())?;
        let cache_capacity = parse_or(&lookup, "CACHE_CAPACITY", "a positive integer", defaults.cache_capacity)?;
        if cache_capacity == 0 {
            return Err(invalid("CACHE_CAPACITY", "a positive integer", "0"));
        }

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", "an integer between 4 and 31", defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(invalid("BCRYPT_COST", "an integer between 4 and 31", &bcrypt_cost.to_string()));
        }

        let session_idle_days = parse_or(&lookup, "SESSION_IDLE_DAYS", "a positive number of days", defaults.session_idle_days)?;
        if session_idle_days < 1 {
            return Err(invalid("SESSION_IDLE_DAYS", "a positive number of days", &session_idle_days.to_string()));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            templates_glob: lookup("TEMPLATES_GLOB").unwrap_or(defaults.templates_glob),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_capacity,
            bcrypt_cost,
            session_idle_days,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(name, expected, &raw)),
        None => Ok(default),
    }
}

fn invalid(name: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        expected,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "study.db");
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "/tmp/other.db"),
            ("CACHE_TTL_SECS", "30"),
            ("CACHE_CAPACITY", "8"),
            ("BCRYPT_COST", "4"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "/tmp/other.db");
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn rejects_bad_values() {
        let err = config_from(&[("CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("CACHE_TTL_SECS"));

        assert!(config_from(&[("CACHE_CAPACITY", "0")]).is_err());
        assert!(config_from(&[("BCRYPT_COST", "2")]).is_err());
        assert!(config_from(&[("SESSION_IDLE_DAYS", "0")]).is_err());
    }
}
