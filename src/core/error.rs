//! Error types for the options desk

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Order rejected: {0}")]
    Order(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DeskResult<T> = Result<T, DeskError>;

impl DeskError {
    pub fn invalid_symbol(msg: impl Into<String>) -> Self {
        Self::InvalidSymbol(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn order(msg: impl Into<String>) -> Self {
        Self::Order(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Reject non-positive or non-finite prices before they reach a formula.
pub(crate) fn ensure_positive(name: &str, value: f64) -> DeskResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DeskError::invalid_input(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("strike", 180.0).is_ok());
        assert!(matches!(
            ensure_positive("strike", 0.0),
            Err(DeskError::InvalidInput(_))
        ));
        assert!(ensure_positive("price", -1.0).is_err());
        assert!(ensure_positive("price", f64::NAN).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = DeskError::invalid_symbol("empty");
        assert_eq!(err.to_string(), "Invalid symbol: empty");
    }
}
