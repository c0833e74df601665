use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Provision the fixed wallet set at startup if missing. Off by
    /// default; production wallets are provisioned out-of-band.
    pub seed_wallets: bool,
    /// Default row cap for transaction history reads.
    pub history_limit: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let seed_wallets = match env_map
            .get("SEED_WALLETS")
            .map(|s| s.as_str())
            .unwrap_or("false")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SEED_WALLETS".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let history_limit = env_map
            .get("HISTORY_LIMIT")
            .map(|s| s.as_str())
            .unwrap_or("100")
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "HISTORY_LIMIT".to_string(),
                    "must be a valid i64".to_string(),
                )
            })?;
        if history_limit <= 0 {
            return Err(ConfigError::InvalidValue(
                "HISTORY_LIMIT".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Config {
            port,
            database_path,
            seed_wallets,
            history_limit,
        })
    }
}
