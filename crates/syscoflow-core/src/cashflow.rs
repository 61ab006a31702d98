//! TAFIRE-style cash-flow derivation
//!
//! Derives the three-section statement (operating, investing, financing)
//! from fiscal-year movements and reconciles it against the treasury
//! variation. The derivation is pure: it consumes a line snapshot and
//! parameters, touches no IO, and cannot fail. Callers that cannot
//! materialize the snapshot use [`CashFlowStatement::zeroed`] instead.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use syscoflow_ledger::{EntryStatus, LedgerLine};

use crate::balance::{signed_balance, window_movement, AccountFilter};
use crate::bfr::working_capital_delta;
use crate::taxonomy::AccountClass;

/// Capital accounts (share capital and related)
const CAPITAL_PREFIX: &str = "10";
/// Borrowing accounts
const BORROWING_PREFIXES: [&str; 2] = ["16", "17"];
/// Non-cash charge accounts (amortization, provisions)
const NON_CASH_PREFIXES: [&str; 2] = ["68", "69"];
/// Accumulated amortization, excluded from fixed-asset movements
const AMORTIZATION_SUBCLASS: &str = "28";

/// Three-section cash-flow statement with treasury reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub operating: Decimal,
    pub investing: Decimal,
    pub financing: Decimal,
    pub treasury_begin: Decimal,
    pub treasury_end: Decimal,
    /// Calculated variation (operating + investing + financing)
    pub variation: Decimal,
    /// Whether the calculated variation matches the actual treasury change
    pub is_balanced: bool,
}

impl CashFlowStatement {
    /// The not-computable statement: all sections zero, marked unbalanced.
    pub fn zeroed() -> Self {
        Self {
            operating: Decimal::ZERO,
            investing: Decimal::ZERO,
            financing: Decimal::ZERO,
            treasury_begin: Decimal::ZERO,
            treasury_end: Decimal::ZERO,
            variation: Decimal::ZERO,
            is_balanced: false,
        }
    }
}

/// Parameters of the derivation
#[derive(Debug, Clone)]
pub struct CashFlowParams<'a> {
    /// Account prefix carrying dividend payouts
    pub dividend_prefix: &'a str,
    /// Maximum accepted reconciliation gap (ε₁)
    pub flow_tolerance: Decimal,
    /// Entry statuses included in every aggregate
    pub statuses: &'a [EntryStatus],
}

/// Derive the cash-flow statement for one fiscal year.
///
/// `lines` must cover the whole history up to `year_end`: the treasury
/// opening balance and the working-capital delta both reach back before
/// `year_start`.
pub fn derive_cash_flow(
    lines: &[LedgerLine],
    year_start: NaiveDate,
    year_end: NaiveDate,
    params: &CashFlowParams<'_>,
) -> CashFlowStatement {
    let Some(prior_end) = year_start.pred_opt() else {
        return CashFlowStatement::zeroed();
    };
    let statuses = params.statuses;

    // 1. Net result of the year
    let revenues = window_movement(
        lines,
        &AccountFilter::Class(AccountClass::OrdinaryRevenues),
        year_start,
        year_end,
        statuses,
    );
    let expenses = window_movement(
        lines,
        &AccountFilter::Class(AccountClass::OrdinaryExpenses),
        year_start,
        year_end,
        statuses,
    );
    let net_result = revenues.credit - expenses.debit;

    // 2. Non-cash charges (amortization, provisions)
    let non_cash = window_movement(
        lines,
        &AccountFilter::AnyPrefix(NON_CASH_PREFIXES.iter().map(|p| p.to_string()).collect()),
        year_start,
        year_end,
        statuses,
    )
    .debit;

    // 3. Operating flow
    let bfr_delta = working_capital_delta(lines, year_end, prior_end, statuses);
    let operating = net_result + non_cash - bfr_delta;

    // 4. Investing flow: disposals minus acquisitions on fixed assets
    let fixed_assets = window_movement(
        lines,
        &AccountFilter::ClassExcept {
            class: AccountClass::FixedAssets,
            excluded: vec![AMORTIZATION_SUBCLASS.to_string()],
        },
        year_start,
        year_end,
        statuses,
    );
    let investing = fixed_assets.credit - fixed_assets.debit;

    // 5. Financing flow
    let capital = window_movement(
        lines,
        &AccountFilter::prefix(CAPITAL_PREFIX),
        year_start,
        year_end,
        statuses,
    );
    let borrowings = window_movement(
        lines,
        &AccountFilter::AnyPrefix(BORROWING_PREFIXES.iter().map(|p| p.to_string()).collect()),
        year_start,
        year_end,
        statuses,
    );
    let dividends = window_movement(
        lines,
        &AccountFilter::prefix(params.dividend_prefix),
        year_start,
        year_end,
        statuses,
    );
    let financing = capital.credit + borrowings.credit - borrowings.debit - dividends.debit;

    // 6. Treasury reconciliation
    let treasury = AccountFilter::Class(AccountClass::Treasury);
    let treasury_begin = signed_balance(lines, &treasury, prior_end, statuses);
    let treasury_end = signed_balance(lines, &treasury, year_end, statuses);

    // 7-8. Balancing invariant
    let variation = operating + investing + financing;
    let actual_variation = treasury_end - treasury_begin;
    let is_balanced = (variation - actual_variation).abs() < params.flow_tolerance;

    log::debug!(
        target: "syscoflow::cashflow",
        "derived flows {}..{}: operating={} investing={} financing={} variation={} actual={}",
        year_start,
        year_end,
        operating,
        investing,
        financing,
        variation,
        actual_variation
    );

    CashFlowStatement {
        operating,
        investing,
        financing,
        treasury_begin,
        treasury_end,
        variation,
        is_balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(account: &str, debit: Decimal, credit: Decimal, date: (i32, u32, u32)) -> LedgerLine {
        LedgerLine {
            account_number: account.to_string(),
            debit,
            credit,
            entry_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            entry_status: EntryStatus::Posted,
            entry_id: format!("E-{}-{}-{}", account, date.1, date.2),
            entry_label: String::new(),
        }
    }

    const STATUSES: [EntryStatus; 1] = [EntryStatus::Posted];

    fn params() -> CashFlowParams<'static> {
        CashFlowParams {
            dividend_prefix: "465",
            flow_tolerance: Decimal::ONE,
            statuses: &STATUSES,
        }
    }

    /// A full synthetic year touching all three sections.
    fn synthetic_ledger() -> Vec<LedgerLine> {
        vec![
            // 2022: initial capital paid into the bank
            line("512000", dec!(10000), Decimal::ZERO, (2022, 6, 1)),
            line("101000", Decimal::ZERO, dec!(10000), (2022, 6, 1)),
            // 2023: cash sale
            line("512000", dec!(5000), Decimal::ZERO, (2023, 3, 1)),
            line("701000", Decimal::ZERO, dec!(5000), (2023, 3, 1)),
            // 2023: cash expense
            line("601000", dec!(2000), Decimal::ZERO, (2023, 4, 5)),
            line("512000", Decimal::ZERO, dec!(2000), (2023, 4, 5)),
            // 2023: amortization of the year (non-cash)
            line("681000", dec!(1000), Decimal::ZERO, (2023, 12, 31)),
            line("281000", Decimal::ZERO, dec!(1000), (2023, 12, 31)),
            // 2023: machine acquisition
            line("241000", dec!(4000), Decimal::ZERO, (2023, 5, 10)),
            line("512000", Decimal::ZERO, dec!(4000), (2023, 5, 10)),
            // 2023: new borrowing
            line("512000", dec!(6000), Decimal::ZERO, (2023, 7, 1)),
            line("162000", Decimal::ZERO, dec!(6000), (2023, 7, 1)),
            // 2023: dividend declared then paid
            line("131000", dec!(1500), Decimal::ZERO, (2023, 1, 10)),
            line("465000", Decimal::ZERO, dec!(1500), (2023, 1, 10)),
            line("465000", dec!(1500), Decimal::ZERO, (2023, 2, 15)),
            line("512000", Decimal::ZERO, dec!(1500), (2023, 2, 15)),
        ]
    }

    #[test]
    fn test_three_sections() {
        let lines = synthetic_ledger();
        let statement = derive_cash_flow(
            &lines,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &params(),
        );

        // net result 5000 - 3000, plus 1000 non-cash, no BFR move
        assert_eq!(statement.operating, dec!(3000));
        assert_eq!(statement.investing, dec!(-4000));
        // 6000 borrowed minus 1500 dividends paid
        assert_eq!(statement.financing, dec!(4500));
        assert_eq!(statement.treasury_begin, dec!(10000));
        assert_eq!(statement.treasury_end, dec!(13500));
    }

    #[test]
    fn test_balancing_invariant_holds() {
        let lines = synthetic_ledger();
        let statement = derive_cash_flow(
            &lines,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &params(),
        );
        assert_eq!(statement.variation, dec!(3500));
        assert_eq!(
            statement.variation,
            statement.treasury_end - statement.treasury_begin
        );
        assert!(statement.is_balanced);
    }

    #[test]
    fn test_working_capital_move_flows_through_operating() {
        let mut lines = synthetic_ledger();
        // Credit sale: revenue without cash, receivable grows by 800
        lines.push(line("411000", dec!(800), Decimal::ZERO, (2023, 9, 1)));
        lines.push(line("701000", Decimal::ZERO, dec!(800), (2023, 9, 1)));

        let statement = derive_cash_flow(
            &lines,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &params(),
        );
        // +800 result, +800 BFR: operating unchanged, still balanced
        assert_eq!(statement.operating, dec!(3000));
        assert!(statement.is_balanced);
    }

    #[test]
    fn test_unbalanced_when_treasury_moves_without_flows() {
        let mut lines = synthetic_ledger();
        // One-legged treasury movement, outside every flow category
        lines.push(line("571000", dec!(500), Decimal::ZERO, (2023, 10, 1)));

        let statement = derive_cash_flow(
            &lines,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &params(),
        );
        assert!(!statement.is_balanced);
    }

    #[test]
    fn test_zeroed_statement() {
        let statement = CashFlowStatement::zeroed();
        assert_eq!(statement.operating, Decimal::ZERO);
        assert_eq!(statement.variation, Decimal::ZERO);
        assert!(!statement.is_balanced);
    }
}
