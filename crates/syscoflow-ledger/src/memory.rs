//! In-memory ledger accessor
//!
//! Serves a [`LedgerSnapshot`] behind the [`LedgerAccessor`] trait. The store
//! is a frozen point-in-time copy, so repeated reads always return the same
//! lines for the same filters.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Account, CompanyBook, EntryStatus, LedgerLine, LedgerSnapshot};
use crate::LedgerAccessor;

/// Snapshot-backed ledger store
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    books: RwLock<HashMap<String, CompanyBook>>,
}

impl InMemoryLedger {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        log::debug!(
            target: "syscoflow::ledger",
            "loading snapshot with {} companies",
            snapshot.companies.len()
        );
        Self {
            books: RwLock::new(snapshot.companies),
        }
    }

    /// Build a store from a JSON snapshot document
    pub fn from_json(content: &str) -> LedgerResult<Self> {
        let snapshot: LedgerSnapshot =
            serde_json::from_str(content).map_err(|e| LedgerError::InvalidSnapshot {
                message: e.to_string(),
            })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Insert or replace a company's book
    pub fn insert_company(&self, company_id: impl Into<String>, book: CompanyBook) {
        self.books.write().unwrap().insert(company_id.into(), book);
    }

    /// Append a journal line to a company's book, creating the book if needed
    pub fn push_line(&self, company_id: &str, line: LedgerLine) {
        let mut books = self.books.write().unwrap();
        books.entry(company_id.to_string()).or_default().lines.push(line);
    }

    /// Append an account to a company's chart, creating the book if needed
    pub fn push_account(&self, company_id: &str, account: Account) {
        let mut books = self.books.write().unwrap();
        books
            .entry(company_id.to_string())
            .or_default()
            .accounts
            .push(account);
    }
}

#[async_trait]
impl LedgerAccessor for InMemoryLedger {
    async fn fetch_lines(
        &self,
        company_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        statuses: &[EntryStatus],
    ) -> LedgerResult<Vec<LedgerLine>> {
        let books = self.books.read().unwrap();
        let book = books
            .get(company_id)
            .ok_or_else(|| LedgerError::UnknownCompany {
                company_id: company_id.to_string(),
            })?;

        let lines: Vec<LedgerLine> = book
            .lines
            .iter()
            .filter(|line| {
                if let Some(from) = date_from {
                    if line.entry_date < from {
                        return false;
                    }
                }
                if let Some(to) = date_to {
                    if line.entry_date > to {
                        return false;
                    }
                }
                statuses.is_empty() || statuses.contains(&line.entry_status)
            })
            .cloned()
            .collect();

        log::debug!(
            target: "syscoflow::ledger",
            "fetch_lines company={} from={:?} to={:?} -> {} lines",
            company_id,
            date_from,
            date_to,
            lines.len()
        );
        Ok(lines)
    }

    async fn fetch_active_accounts(&self, company_id: &str) -> LedgerResult<Vec<Account>> {
        let books = self.books.read().unwrap();
        let book = books
            .get(company_id)
            .ok_or_else(|| LedgerError::UnknownCompany {
                company_id: company_id.to_string(),
            })?;
        Ok(book.accounts.clone())
    }
}
