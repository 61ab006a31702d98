//! Working-capital (BFR) calculator
//!
//! BFR = stocks + receivables - payables, where the payable term takes the
//! credit-side magnitude. A payable group that nets to a debit balance counts
//! as zero, never as a negative liability.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use syscoflow_ledger::{EntryStatus, LedgerLine};

use crate::balance::{signed_balance, AccountFilter};
use crate::taxonomy::AccountClass;

/// Working capital as of a date
pub fn working_capital(
    lines: &[LedgerLine],
    as_of: NaiveDate,
    statuses: &[EntryStatus],
) -> Decimal {
    let stocks = signed_balance(lines, &AccountFilter::Class(AccountClass::Stocks), as_of, statuses);
    let receivables = signed_balance(lines, &AccountFilter::prefix("41"), as_of, statuses);
    let payables = signed_balance(lines, &AccountFilter::prefix("40"), as_of, statuses);

    stocks + receivables - payables.min(Decimal::ZERO).abs()
}

/// Working-capital variation between two closing dates
pub fn working_capital_delta(
    lines: &[LedgerLine],
    end: NaiveDate,
    prior_end: NaiveDate,
    statuses: &[EntryStatus],
) -> Decimal {
    working_capital(lines, end, statuses) - working_capital(lines, prior_end, statuses)
}
