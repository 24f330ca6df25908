use thiserror::Error;

/// Errors raised by the signal engine.
///
/// Short history is not an error: it propagates as `None` through the
/// metrics and surfaces as "data unavailable".
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{indicator} requires {expected} inputs ({required}), got {actual}")]
    MissingInput {
        indicator: String,
        required: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
