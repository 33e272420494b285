//! Runtime configuration, read from the environment.

use crate::allocator::Strategy;
use crate::error::{SchedulerError, SchedulerResult};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP service listens on
    pub bind_addr: String,

    /// Default allocation backend when a request names none
    pub strategy: Strategy,

    /// env_logger filter used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            strategy: Strategy::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `TIMETABLE_*` environment variables
    pub fn from_env() -> SchedulerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SchedulerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("TIMETABLE_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let strategy = match lookup("TIMETABLE_STRATEGY") {
            Some(value) => value.parse::<Strategy>().map_err(|e| match e {
                SchedulerError::InvalidConfig { reason, .. } => {
                    SchedulerError::invalid_config("TIMETABLE_STRATEGY", reason)
                }
                other => other,
            })?,
            None => defaults.strategy,
        };

        let log_level = lookup("TIMETABLE_LOG").unwrap_or(defaults.log_level);

        Ok(Self {
            bind_addr,
            strategy,
            log_level,
        })
    }
}
