use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::num::ParseIntError;

use crate::workflows::admission::{ReviewPolicy, ReviewerId, DEFAULT_MIN_REVIEWERS};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub review: ReviewPolicy,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let min_reviewers = match env::var("APP_MIN_REVIEWERS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|source| ConfigError::InvalidMinReviewers { value: raw, source })?,
            Err(_) => DEFAULT_MIN_REVIEWERS,
        };

        let arbiters = match env::var("APP_ARBITER_REVIEWERS") {
            Ok(raw) => parse_arbiters(&raw)?,
            Err(_) => BTreeSet::new(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            review: ReviewPolicy::new(arbiters, min_reviewers),
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Comma-separated reviewer ids, e.g. `APP_ARBITER_REVIEWERS=1,42`.
fn parse_arbiters(raw: &str) -> Result<BTreeSet<ReviewerId>, ConfigError> {
    let mut arbiters = BTreeSet::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part
            .parse::<u64>()
            .map_err(|source| ConfigError::InvalidArbiterList {
                value: raw.to_string(),
                source,
            })?;
        arbiters.insert(ReviewerId(id));
    }
    Ok(arbiters)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMinReviewers { value: String, source: ParseIntError },
    InvalidArbiterList { value: String, source: ParseIntError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMinReviewers { value, .. } => {
                write!(f, "APP_MIN_REVIEWERS must be a non-negative integer, got '{value}'")
            }
            ConfigError::InvalidArbiterList { value, .. } => {
                write!(
                    f,
                    "APP_ARBITER_REVIEWERS must be a comma-separated list of reviewer ids, got '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidMinReviewers { source, .. } => Some(source),
            ConfigError::InvalidArbiterList { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_MIN_REVIEWERS");
        env::remove_var("APP_ARBITER_REVIEWERS");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.review.min_reviewers(), DEFAULT_MIN_REVIEWERS);
        assert!(!config.review.is_arbiter(ReviewerId(1)));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn parses_arbiter_list_with_spaces() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ARBITER_REVIEWERS", "1, 42,");
        let config = AppConfig::load().expect("config loads");
        assert!(config.review.is_arbiter(ReviewerId(1)));
        assert!(config.review.is_arbiter(ReviewerId(42)));
        assert!(!config.review.is_arbiter(ReviewerId(7)));
    }

    #[test]
    fn rejects_non_numeric_arbiter() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ARBITER_REVIEWERS", "1,chief");
        let err = AppConfig::load().expect_err("non-numeric arbiter id rejected");
        assert!(matches!(err, ConfigError::InvalidArbiterList { .. }));
    }

    #[test]
    fn min_reviewers_of_zero_is_clamped_to_one() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MIN_REVIEWERS", "0");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.review.min_reviewers(), 1);
    }
}
