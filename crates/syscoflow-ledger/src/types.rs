//! Journal data model
//!
//! Value objects mirroring the rows the accounting platform stores: accounts
//! identified by their SYSCOHADA number and flat double-entry journal lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Journal entry status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and not yet part of the books
    Draft,
    /// Entry has been validated by an accountant
    Validated,
    /// Entry is posted to the general ledger
    Posted,
    /// Entry was imported from an external system
    Imported,
}

impl Default for EntryStatus {
    fn default() -> Self {
        EntryStatus::Draft
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(EntryStatus::Draft),
            "validated" => Ok(EntryStatus::Validated),
            "posted" => Ok(EntryStatus::Posted),
            "imported" => Ok(EntryStatus::Imported),
            _ => Err(format!("Invalid entry status: {}", s)),
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Draft => write!(f, "draft"),
            EntryStatus::Validated => write!(f, "validated"),
            EntryStatus::Posted => write!(f, "posted"),
            EntryStatus::Imported => write!(f, "imported"),
        }
    }
}

/// An account of the company's chart of accounts
///
/// The SYSCOHADA class and role are derived from `number`, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account number (e.g., "512000"); leading digit is the class
    pub number: String,
    /// Account name (e.g., "Banques")
    pub name: String,
}

impl Account {
    /// Create a new account
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

/// A double-entry journal line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Account number the line posts to
    pub account_number: String,
    /// Debit amount (>= 0)
    pub debit: Decimal,
    /// Credit amount (>= 0)
    pub credit: Decimal,
    /// Entry date
    pub entry_date: NaiveDate,
    /// Status of the owning journal entry
    pub entry_status: EntryStatus,
    /// Identifier of the owning journal entry
    pub entry_id: String,
    /// Free-text description of the owning journal entry
    pub entry_label: String,
}

impl LedgerLine {
    /// Signed amount of the line (debit minus credit)
    pub fn signed(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// All journal data held for one company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyBook {
    /// Active chart of accounts
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Journal lines
    #[serde(default)]
    pub lines: Vec<LedgerLine>,
}

/// Point-in-time snapshot of the ledger, keyed by company identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub companies: HashMap<String, CompanyBook>,
}
