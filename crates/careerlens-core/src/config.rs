use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_SCRAPER_ENDPOINT: &str =
    "https://api.apify.com/v2/acts/curious_coder~linkedin-profile-scraper/run-sync-get-dataset-items";
const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let scraper_api_token = require("APIFY_API_TOKEN")?;
    let firestore_project_id = require("FIRESTORE_PROJECT_ID")?;
    let openai_api_key = require("OPENAI_API_KEY")?;
    let openai_assistant_id = require("OPENAI_ASSISTANT_ID")?;

    let env = parse_environment(&or_default("CAREERLENS_ENV", "development"))?;

    let raw_bind = or_default("CAREERLENS_BIND_ADDR", "0.0.0.0:3001");
    let bind_addr = raw_bind
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "CAREERLENS_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("CAREERLENS_LOG_LEVEL", "info");
    let request_timeout_secs = parse_num("CAREERLENS_REQUEST_TIMEOUT_SECS", "600")?;
    let rate_limit_per_minute = parse_usize("CAREERLENS_RATE_LIMIT_PER_MINUTE", "60")?;

    let firestore_base_url = or_default("CAREERLENS_FIRESTORE_BASE_URL", DEFAULT_FIRESTORE_BASE_URL);
    let firestore_api_key = lookup("FIRESTORE_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let credentials_collection = or_default("CAREERLENS_CREDENTIALS_COLLECTION", "linkedin_cookies");

    let scraper_endpoint = or_default("CAREERLENS_SCRAPER_ENDPOINT", DEFAULT_SCRAPER_ENDPOINT);
    let scraper_timeout_secs = parse_num("CAREERLENS_SCRAPER_TIMEOUT_SECS", "120")?;
    let scraper_max_attempts = parse_u32("CAREERLENS_SCRAPER_MAX_ATTEMPTS", "3")?;

    let openai_base_url = or_default("CAREERLENS_OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
    let llm_timeout_secs = parse_num("CAREERLENS_LLM_TIMEOUT_SECS", "30")?;
    let llm_max_attempts = parse_u32("CAREERLENS_LLM_MAX_ATTEMPTS", "3")?;
    let llm_retry_backoff_ms = parse_num("CAREERLENS_LLM_RETRY_BACKOFF_MS", "2000")?;
    let llm_poll_interval_ms = parse_num("CAREERLENS_LLM_POLL_INTERVAL_MS", "2000")?;
    let llm_max_polls = parse_u32("CAREERLENS_LLM_MAX_POLLS", "30")?;

    if scraper_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAREERLENS_SCRAPER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if llm_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAREERLENS_LLM_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        rate_limit_per_minute,
        firestore_base_url,
        firestore_project_id,
        firestore_api_key,
        credentials_collection,
        scraper_endpoint,
        scraper_api_token,
        scraper_timeout_secs,
        scraper_max_attempts,
        openai_base_url,
        openai_api_key,
        openai_assistant_id,
        llm_timeout_secs,
        llm_max_attempts,
        llm_retry_backoff_ms,
        llm_poll_interval_ms,
        llm_max_polls,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAREERLENS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
