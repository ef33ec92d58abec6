//! Error types for the multi-account sender

use thiserror::Error;

/// Per-account failure taxonomy
#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Could not derive address: {0}")]
    InvalidKey(String),

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("RPC error during {operation}: {message}")]
    Rpc { operation: String, message: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Timeout waiting for receipt of {tx_hash} after {timeout_secs}s")]
    ConfirmationTimeout { tx_hash: String, timeout_secs: u64 },
}

impl SenderError {
    pub fn connection(message: impl ToString) -> Self {
        SenderError::Connection {
            message: message.to_string(),
        }
    }

    pub fn rpc(operation: &str, message: impl ToString) -> Self {
        SenderError::Rpc {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Short category name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            SenderError::InvalidKey(_) => "invalid_key",
            SenderError::Connection { .. } => "connection",
            SenderError::Rpc { .. } => "rpc",
            SenderError::Signing(_) => "signing",
            SenderError::Rejected(_) => "rejected",
            SenderError::ConfirmationTimeout { .. } => "timeout",
        }
    }
}

/// Result type for sender operations
pub type SenderResult<T> = Result<T, SenderError>;
