use alloy_primitives::U256;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolScaleError {
    #[error("Token decimals {decimals} exceed the supported precision of {max}")]
    InvalidDecimals { decimals: u8, max: u8 },

    #[error("Price rate {rate} would downscale a token with {decimals} decimals")]
    InvalidPriceRate { rate: U256, decimals: u8 },

    #[error("Malformed pool snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Fixed-point arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    #[error("Division by zero in {0}")]
    DivisionByZero(&'static str),

    #[error("Mismatched column lengths: expected {expected}, got {actual}")]
    MismatchedLengths { expected: usize, actual: usize },

    #[error("Invalid slippage tolerance: {0}")]
    InvalidTolerance(String),

    #[error("Pool has no amplification parameter")]
    MissingAmplification,

    #[error("{0} did not converge")]
    NoConvergence(&'static str),

    #[error("Unsupported pool type: {0}")]
    UnsupportedPoolType(String),

    #[error("Token index {index} out of range for a pool of {len} tokens")]
    InvalidTokenIndex { index: usize, len: usize },

    #[error("Pool calculation error: {0}")]
    CalculationError(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for PoolScaleError {
    fn from(err: serde_json::Error) -> Self {
        PoolScaleError::Json(err.to_string())
    }
}

pub type Result<T, E = PoolScaleError> = std::result::Result<T, E>;
