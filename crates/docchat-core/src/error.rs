use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid chat settings: {0}")]
    InvalidSettings(String),

    #[error("Tool '{tool}' failed: {reason}")]
    Tool { tool: String, reason: String },

    #[error("Backend call failed: {0}")]
    Backend(#[source] anyhow::Error),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self { Error::InvalidConfig(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, Error>;
