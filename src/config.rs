use std::{env, fmt::Display, str::FromStr};

use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, warn};

use crate::payment::gateway::DEFAULT_API_URL;
use crate::domain::value_objects::DEFAULT_CURRENCY;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
    #[error("{0} must be set when DATABASE_URL is configured")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct RazorpayKeys {
    pub key_id: String,
    pub key_secret: String,
}

impl std::fmt::Debug for RazorpayKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayKeys").field("key_id", &self.key_id).finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub razorpay: Option<RazorpayKeys>,
    pub razorpay_api_url: String,
    pub nats_url: Option<String>,
    pub currency: String,
    pub seed_catalog: bool,
}

impl Config {
    /// Reads the process environment. Call after `dotenvy::dotenv()`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let database_url = var("DATABASE_URL");

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if database_url.is_some() => return Err(ConfigError::Missing("JWT_SECRET")),
            None => {
                warn!("JWT_SECRET not set, generating an ephemeral secret; sessions end on restart");
                rand::thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect()
            }
        };

        let razorpay = match (var("RAZORPAY_KEY_ID"), var("RAZORPAY_KEY_SECRET")) {
            (Some(key_id), Some(key_secret)) => Some(RazorpayKeys { key_id, key_secret }),
            (id, secret) => {
                warn!(key_id = id.is_some(), key_secret = secret.is_some(), "Razorpay keys missing, checkout disabled");
                None
            }
        };

        Ok(Self {
            port: parse(&var, "PORT", "8083")?,
            db_max_connections: parse(&var, "DB_MAX_CONNECTIONS", "10")?,
            seed_catalog: parse(&var, "SEED_CATALOG", "false")?,
            razorpay_api_url: var("RAZORPAY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            nats_url: var("NATS_URL"),
            currency: var("CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            database_url,
            jwt_secret,
            razorpay,
        })
    }
}

fn parse<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid { key, reason: e.to_string(), value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8083);
        assert_eq!(config.currency, "INR");
        assert!(config.razorpay.is_none());
        assert!(config.database_url.is_none());
        assert_eq!(config.jwt_secret.len(), 48);
        assert_eq!(config.razorpay_api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_keys_and_overrides() {
        let config = load(&[("PORT", "9000"), ("RAZORPAY_KEY_ID", "rzp_test_1"), ("RAZORPAY_KEY_SECRET", "s"), ("JWT_SECRET", "j")]).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.razorpay.as_ref().map(|k| k.key_id.as_str()), Some("rzp_test_1"));
        assert!(!format!("{:?}", config.razorpay).contains("key_secret"));
        assert!(load(&[("RAZORPAY_KEY_ID", "only-id")]).unwrap().razorpay.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(load(&[("PORT", "eighty")]), Err(ConfigError::Invalid { key: "PORT", .. })));
        assert!(matches!(load(&[("DATABASE_URL", "postgres://x")]), Err(ConfigError::Missing("JWT_SECRET"))));
    }
}
