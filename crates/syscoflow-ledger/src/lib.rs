//! Journal data model and ledger access
//!
//! The engine never owns the journal: every computation starts from lines
//! supplied by a [`LedgerAccessor`]. Production deployments back the trait
//! with the platform's data store; tests and the CLI use [`InMemoryLedger`]
//! over a point-in-time snapshot.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub mod error;
pub mod memory;
pub mod types;

pub use error::{LedgerError, LedgerResult};
pub use memory::InMemoryLedger;
pub use types::{Account, CompanyBook, EntryStatus, LedgerLine, LedgerSnapshot};

/// Accessor reference type
pub type LedgerRef = Arc<dyn LedgerAccessor>;

/// Read-only access to a company's journal.
///
/// Both operations are snapshot reads; implementations must never mutate the
/// underlying ledger on behalf of callers.
#[async_trait]
pub trait LedgerAccessor: Send + Sync {
    /// Fetch journal lines for a company, optionally bounded by an inclusive
    /// date range. An empty `statuses` slice accepts every entry status.
    async fn fetch_lines(
        &self,
        company_id: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        statuses: &[EntryStatus],
    ) -> LedgerResult<Vec<LedgerLine>>;

    /// Fetch the active chart of accounts for a company.
    async fn fetch_active_accounts(&self, company_id: &str) -> LedgerResult<Vec<Account>>;
}
