use crate::error::ConfigError;
use log::info;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:fight_vote.db";
const DEFAULT_MEMORY_PATH: &str = ".fight_vote/local_storage.json";
const DEFAULT_POLL_SECONDS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub memory_path: PathBuf,
    pub poll_interval: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = var_or(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL);
        let memory_path = PathBuf::from(var_or(&lookup, "VOTE_MEMORY_PATH", DEFAULT_MEMORY_PATH));

        let poll_seconds = var_or(&lookup, "TALLY_POLL_SECONDS", &DEFAULT_POLL_SECONDS.to_string());
        let poll_seconds = match poll_seconds.trim().parse::<u64>() {
            Ok(0) => {
                return Err(ConfigError::Invalid {
                    key: "TALLY_POLL_SECONDS",
                    reason: "must be at least 1".to_string(),
                })
            }
            Ok(seconds) => seconds,
            Err(e) => {
                return Err(ConfigError::Invalid {
                    key: "TALLY_POLL_SECONDS",
                    reason: e.to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            memory_path,
            poll_interval: Duration::from_secs(poll_seconds),
        })
    }
}

fn var_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
