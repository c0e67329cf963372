use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is already monitored")]
    AlreadyMonitored(String),

    #[error("{0} is not monitored")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Host {name:?} has an invalid address {address:?}")]
    InvalidAddress { name: String, address: String },
}
