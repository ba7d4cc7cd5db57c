//! Shared configuration and domain vocabulary for careerlens.

mod app_config;
mod config;
pub mod objectives;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use objectives::{ObjectiveInfo, ObjectiveTag, DEFAULT_OBJECTIVE, OBJECTIVE_CATALOG};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
