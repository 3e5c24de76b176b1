//! Core error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown order side: {0}")]
    UnknownSide(String),

    #[error("Negative value: {0}")]
    NegativeValue(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
