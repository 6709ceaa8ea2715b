use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ComparisonError {
    /// Savings do not cover the minimum deposit; a normal outcome, not a crash.
    #[error(
        "You need at least {percent}% of the house purchase price as savings to buy a house (${required:.2})"
    )]
    InsufficientSavings {
        percent: f64,
        required: f64,
        available: f64,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("loan term must be at least one year")]
    InvalidLoanTerm,
}
