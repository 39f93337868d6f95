use thiserror::Error;

pub type AxisResult<T> = Result<T, AxisError>;

#[derive(Debug, Error)]
pub enum AxisError {
    #[error("invalid axis configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid viewport input: {0}")]
    InvalidViewport(String),

    #[error("axis invariant violated: {0}")]
    InvariantViolation(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
