//! Error types for syscoflow-ledger

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerErrorCode {
    /// Company has no book in the ledger
    UnknownCompany,
    /// Snapshot content could not be decoded
    InvalidSnapshot,
    /// Backing store failed
    Backend,
    /// IO error
    IoError,
}

impl std::fmt::Display for LedgerErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerErrorCode::UnknownCompany => write!(f, "UNKNOWN_COMPANY"),
            LedgerErrorCode::InvalidSnapshot => write!(f, "INVALID_SNAPSHOT"),
            LedgerErrorCode::Backend => write!(f, "BACKEND"),
            LedgerErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Main error type for ledger access
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unknown company: {company_id}")]
    UnknownCompany { company_id: String },

    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("Ledger backend error: {message}")]
    Backend { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Get the error code
    pub fn code(&self) -> LedgerErrorCode {
        match self {
            LedgerError::UnknownCompany { .. } => LedgerErrorCode::UnknownCompany,
            LedgerError::InvalidSnapshot { .. } => LedgerErrorCode::InvalidSnapshot,
            LedgerError::Backend { .. } => LedgerErrorCode::Backend,
            LedgerError::Io(_) => LedgerErrorCode::IoError,
        }
    }
}

/// Result type with LedgerError
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(LedgerErrorCode::UnknownCompany.to_string(), "UNKNOWN_COMPANY");
        assert_eq!(LedgerErrorCode::Backend.to_string(), "BACKEND");
    }

    #[test]
    fn test_error_code_mapping() {
        let error = LedgerError::UnknownCompany {
            company_id: "acme".to_string(),
        };
        assert_eq!(error.code(), LedgerErrorCode::UnknownCompany);
        assert!(error.to_string().contains("acme"));
    }
}
