use thiserror::Error;

/// Error type for invalid inputs and parameters.
#[derive(Error, Debug)]
pub enum GhgError {
    #[error("Input shape mismatch: {0}")]
    InputShape(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Precondition violated: {0}")]
    Precondition(String),
    #[error("Could not read configuration: {0}")]
    Config(String),
}

impl From<rand_distr::NormalError> for GhgError {
    fn from(e: rand_distr::NormalError) -> Self {
        GhgError::InvalidParameter(format!("normal distribution: {e}"))
    }
}

impl From<toml::de::Error> for GhgError {
    fn from(e: toml::de::Error) -> Self {
        GhgError::Config(e.to_string())
    }
}

/// Convenience type for `Result<T, GhgError>`.
pub type GhgResult<T> = Result<T, GhgError>;
