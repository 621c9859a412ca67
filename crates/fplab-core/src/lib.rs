//! Shared domain types for fplab: the signal catalogue, typed feature records,
//! the submission wire format, and environment-driven application config.

pub mod app_config;
pub mod config;
pub mod extensions;
pub mod record;
pub mod signal;
pub mod submission;
pub mod value;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use extensions::{ExtensionFlags, EXTENSION_MARKERS};
pub use record::{behaviour_key, FeatureRecord, BLOCKED_BEHAVIOUR_KEY};
pub use signal::{Signal, TimingClass};
pub use submission::{BehaviourSubmission, RunConfig, TestingSubmission};
pub use value::{SignalValue, UnavailableReason};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
