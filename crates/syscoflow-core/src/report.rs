//! Report value objects
//!
//! Findings, the compliance report, and presentation summaries. All of these
//! are computed values: no identity, no mutation after construction, and the
//! core never persists them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use syscoflow_config::ScoreWeights;

use crate::score::compliance_score;
use crate::taxonomy::AccountClass;

/// Finding codes
pub mod codes {
    /// Account number outside the 1-8 chart classes, or suspicious length
    pub const TAXONOMY: &str = "TAXONOMY";
    /// A mandatory chart class has no active account
    pub const CLASS_COVERAGE: &str = "CLASS_COVERAGE";
    /// A canonical account is missing from the chart
    pub const MANDATORY_ACCOUNT: &str = "MANDATORY_ACCOUNT";
    /// Entry described as exceptional but posted outside class 8
    pub const HAO_CLASSIFICATION: &str = "HAO_CLASSIFICATION";
    /// Debit and credit totals diverge over the fiscal year
    pub const EQUILIBRIUM: &str = "EQUILIBRIUM";
    /// Net exceptional-activity result, surfaced for review
    pub const HAO_RESULT: &str = "HAO_RESULT";
    /// Cash-flow statement does not reconcile with treasury
    pub const CASH_FLOW: &str = "CASH_FLOW";
    /// Closing and opening aggregates diverge across a period boundary
    pub const ROLLFORWARD: &str = "ROLLFORWARD";
    /// A ledger read failed or timed out
    pub const LEDGER_ACCESS: &str = "LEDGER_ACCESS";
    /// Fiscal calendar produced no valid period bounds
    pub const FISCAL_CALENDAR: &str = "FISCAL_CALENDAR";
    /// A rule task failed to complete
    pub const INTERNAL: &str = "INTERNAL";
}

/// Finding severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hard rule violation
    Error,
    /// Soft or heuristic signal
    Warning,
    /// Diagnostic figure surfaced for human review
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// One result of a validator rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable rule code
    pub code: String,
    /// Severity of the finding
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Account number the finding points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_account: Option<String>,
    /// Journal entry the finding points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_entry: Option<String>,
    /// Suggested resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Reference to the underlying accounting rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_reference: Option<String>,
}

impl Finding {
    fn new(code: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity,
            message: message.into(),
            affected_account: None,
            affected_entry: None,
            suggestion: None,
            rule_reference: None,
        }
    }

    /// Create an error finding
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    /// Create a warning finding
    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }

    /// Create an info finding
    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Info, message)
    }

    /// Attach an account number
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.affected_account = Some(account.into());
        self
    }

    /// Attach a journal entry identifier
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.affected_entry = Some(entry.into());
        self
    }

    /// Attach a suggested resolution
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a rule reference
    pub fn with_rule_reference(mut self, reference: impl Into<String>) -> Self {
        self.rule_reference = Some(reference.into());
        self
    }

    /// Whether this finding is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this finding is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Compliance report for one company and fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Whether the ledger passed every error-level rule
    pub is_valid: bool,
    /// Number of error findings
    pub errors: usize,
    /// Number of warning findings
    pub warnings: usize,
    /// All findings, in rule order
    pub findings: Vec<Finding>,
    /// Weighted score in [0, 100]
    pub score: u8,
    /// When the report was computed
    pub checked_at: DateTime<Utc>,
}

impl ComplianceReport {
    /// Build a report from findings, scoring with the given weights.
    pub fn from_findings(
        findings: Vec<Finding>,
        weights: &ScoreWeights,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let errors = findings.iter().filter(|f| f.is_error()).count();
        let warnings = findings.iter().filter(|f| f.is_warning()).count();
        Self {
            is_valid: errors == 0,
            errors,
            warnings,
            score: compliance_score(errors, warnings, weights),
            findings,
            checked_at,
        }
    }
}

/// Per-class balance for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBalance {
    /// Chart class
    pub class: AccountClass,
    /// French chart label
    pub label: String,
    /// Signed balance (debit minus credit)
    pub balance: Decimal,
    /// Balance flipped to the class's normal side
    pub presented: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_builders() {
        let finding = Finding::warning(codes::MANDATORY_ACCOUNT, "Missing account")
            .with_account("101000")
            .with_suggestion("Open a capital account")
            .with_rule_reference("SYSCOHADA plan comptable");
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.affected_account.as_deref(), Some("101000"));
        assert!(finding.is_warning());
        assert!(!finding.is_error());
    }

    #[test]
    fn test_report_counts_and_validity() {
        let weights = ScoreWeights::default();
        let findings = vec![
            Finding::error(codes::EQUILIBRIUM, "Imbalance of 12.50"),
            Finding::warning(codes::MANDATORY_ACCOUNT, "Missing 411"),
            Finding::info(codes::HAO_RESULT, "Net exceptional result: 0"),
        ];
        let report = ComplianceReport::from_findings(findings, &weights, Utc::now());
        assert!(!report.is_valid);
        assert_eq!(report.errors, 1);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.score, 75);
        assert_eq!(report.findings.len(), 3);
    }

    #[test]
    fn test_clean_report_is_valid() {
        let report =
            ComplianceReport::from_findings(Vec::new(), &ScoreWeights::default(), Utc::now());
        assert!(report.is_valid);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_finding_serialization_skips_empty_fields() {
        let finding = Finding::error(codes::TAXONOMY, "Bad number");
        let json = serde_json::to_value(&finding).unwrap();
        assert!(json.get("affected_account").is_none());
        assert_eq!(json["severity"], "error");
    }
}
