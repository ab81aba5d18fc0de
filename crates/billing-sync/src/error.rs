//! Error types for webhook parsing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    /// The payload was not valid JSON or did not have the event envelope shape.
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Unknown subscription status: {0}")]
    UnknownStatus(String),

    #[error("Invalid timestamp in field {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: i64 },
}

pub type Result<T> = std::result::Result<T, BillingError>;
