use once_cell::sync::Lazy;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tripcounter_common::gateway::RetryPolicy;

pub static CONF: Lazy<Config> = Lazy::new(|| Config::from_env().expect("Failed to load config"));

const LOG_LEVEL_VAR: &str = "TRIPCOUNTER_LOG_LEVEL";
const DATA_DIR_VAR: &str = "TRIPCOUNTER_DATA_DIR";
const ACTIX_WORKER_COUNT_VAR: &str = "TRIPCOUNTER_ACTIX_WORKER_COUNT";
const TABLE_OPEN_MAX_ATTEMPTS_VAR: &str = "TRIPCOUNTER_TABLE_OPEN_MAX_ATTEMPTS";
const TABLE_OPEN_BACKOFF_MS_VAR: &str = "TRIPCOUNTER_TABLE_OPEN_BACKOFF_MS";

pub struct Config {
    pub log_level: String,
    // None selects the in-memory table backend
    pub data_dir: Option<PathBuf>,
    pub actix_worker_count: usize,
    pub table_open_max_attempts: u32,
    pub table_open_backoff: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        let conf = Config {
            log_level: env_var_or(LOG_LEVEL_VAR, String::from("info")),
            data_dir: std::env::var(DATA_DIR_VAR).ok().map(PathBuf::from),
            actix_worker_count: env_var_or(ACTIX_WORKER_COUNT_VAR, num_cpus::get()),
            table_open_max_attempts: env_var_or(TABLE_OPEN_MAX_ATTEMPTS_VAR, 3),
            table_open_backoff: Duration::from_millis(env_var_or(TABLE_OPEN_BACKOFF_MS_VAR, 250)),
        };

        if conf.actix_worker_count == 0 {
            return Err(ConfigError::InvalidVar(ACTIX_WORKER_COUNT_VAR));
        }

        if conf.table_open_max_attempts == 0 {
            return Err(ConfigError::InvalidVar(TABLE_OPEN_MAX_ATTEMPTS_VAR));
        }

        Ok(conf)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.table_open_max_attempts,
            initial_backoff: self.table_open_backoff,
        }
    }
}

/// One-shot report of which config vars are set, run from `main` before the
/// server starts.
pub fn startup_report() {
    for var in [
        LOG_LEVEL_VAR,
        DATA_DIR_VAR,
        ACTIX_WORKER_COUNT_VAR,
        TABLE_OPEN_MAX_ATTEMPTS_VAR,
        TABLE_OPEN_BACKOFF_MS_VAR,
    ] {
        match std::env::var(var) {
            Ok(_) => log::info!("{var}: set"),
            Err(_) => log::info!("{var}: not set (using default)"),
        }
    }
}

fn env_var_or<T: FromStr>(key: &'static str, default: T) -> T {
    let Ok(var) = std::env::var(key) else {
        return default;
    };

    var.parse().unwrap_or(default)
}

#[derive(Clone, Copy, Debug)]
pub enum ConfigError {
    InvalidVar(&'static str),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVar(key) => write!(f, "Environment variable '{}' is invalid", key),
        }
    }
}
