//! Error types for syscoflow-core
//!
//! These errors never cross the engine's reporting surface: every public
//! report operation converts them into a single error-severity finding so
//! callers always receive a structured result.

use thiserror::Error;

use syscoflow_ledger::LedgerError;

use crate::report::{codes, Finding};

/// Internal engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Ledger access failed during {operation}: {source}")]
    LedgerAccess {
        operation: String,
        #[source]
        source: LedgerError,
    },

    #[error("Ledger access timed out during {operation} after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error("Fiscal calendar produced no valid bounds for year {fiscal_year}")]
    InvalidCalendar { fiscal_year: i32 },

    #[error("Internal task failure: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Degrade the error into the single finding that marks the report.
    pub fn to_finding(&self) -> Finding {
        let code = match self {
            EngineError::LedgerAccess { .. } | EngineError::Timeout { .. } => codes::LEDGER_ACCESS,
            EngineError::InvalidCalendar { .. } => codes::FISCAL_CALENDAR,
            EngineError::Internal { .. } => codes::INTERNAL,
        };
        Finding::error(code, self.to_string())
    }
}

/// Result type with EngineError
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_degrades_to_finding() {
        let error = EngineError::LedgerAccess {
            operation: "fetch_lines".to_string(),
            source: LedgerError::UnknownCompany {
                company_id: "acme".to_string(),
            },
        };
        let finding = error.to_finding();
        assert_eq!(finding.code, codes::LEDGER_ACCESS);
        assert!(finding.is_error());
        assert!(finding.message.contains("fetch_lines"));
        assert!(finding.message.contains("acme"));
    }

    #[test]
    fn test_timeout_and_calendar_codes() {
        let timeout = EngineError::Timeout {
            operation: "fetch_lines".to_string(),
            seconds: 30,
        };
        assert_eq!(timeout.to_finding().code, codes::LEDGER_ACCESS);

        let calendar = EngineError::InvalidCalendar { fiscal_year: 2023 };
        assert_eq!(calendar.to_finding().code, codes::FISCAL_CALENDAR);
    }
}
