use std::io;
use std::net::AddrParseError;
use thiserror::Error;

// Unified error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("No available upstream servers")]
    NoUpstreamAvailable,

    #[error("Invalid shutdown timeout")]
    InvalidShutdownTimeout,

    #[error("Server error: {0}")]
    Server(String),
}

impl From<AddrParseError> for AppError {
    fn from(err: AddrParseError) -> Self {
        Self::Config(ConfigError::InvalidListenAddress(err.to_string()))
    }
}

// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadError(#[from] io::Error),

    #[error("YAML parsing error: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid server listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

// Relay failure surfaced to the client as 502 Bad Gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Proxy error")]
    Proxy,

    #[error("All upstream servers failed. Last error: {0}")]
    Exhausted(String),
}
