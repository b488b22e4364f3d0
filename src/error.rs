//! Configuration errors. Anything reported here is fatal and is raised before a
//! single worker or connection exists.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Port must be 1-65535, got {0}")]
    InvalidPort(i64),

    #[error("--threads must be >= 1, got {0}")]
    InvalidThreads(i64),

    #[error("--{name} must be a finite number of seconds >= 0, got {value}")]
    NegativeSeconds { name: &'static str, value: f64 },

    #[error("--{name} must be a finite number of seconds > 0, got {value}")]
    NonPositiveSeconds { name: &'static str, value: f64 },

    #[error("--{name} is too large to be a number of seconds, got {value}")]
    SecondsOutOfRange { name: &'static str, value: f64 },

    #[error("--target must not be empty")]
    EmptyHost,

    #[error("--target must be printable ASCII without whitespace, got {0:?}")]
    InvalidHost(String),

    #[error("--path must start with '/' and be printable ASCII without whitespace, got {0:?}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
