//! Cross-period rollforward validation
//!
//! The closing aggregate of year N and the opening aggregate of year N+1 are
//! the same cumulative sum over the same date-ordered lines, so they must be
//! equal by construction. A divergence means the two materializations were
//! filtered or windowed differently, which is an internal consistency error,
//! not a business finding about the data.

use chrono::NaiveDate;

use syscoflow_ledger::{EntryStatus, LedgerLine};

use crate::balance::{signed_balance, AccountFilter};
use crate::report::{codes, Finding};

/// Compare the closing aggregate of a period against the opening aggregate of
/// the next one, both evaluated at `boundary` with identical filters.
///
/// `closing_lines` and `opening_lines` are the two separately-materialized
/// line sets (e.g. the year-N window and the year-N+1 window).
pub fn check_rollforward(
    closing_lines: &[LedgerLine],
    opening_lines: &[LedgerLine],
    filter: &AccountFilter,
    boundary: NaiveDate,
    statuses: &[EntryStatus],
) -> Option<Finding> {
    let closing = signed_balance(closing_lines, filter, boundary, statuses);
    let opening = signed_balance(opening_lines, filter, boundary, statuses);

    if closing == opening {
        return None;
    }

    log::error!(
        target: "syscoflow::rollforward",
        "rollforward break on {} at {}: closing={} opening={}",
        filter,
        boundary,
        closing,
        opening
    );

    Some(
        Finding::error(
            codes::ROLLFORWARD,
            format!(
                "Closing balance {} of {} at {} does not carry over (opening balance {})",
                closing, filter, boundary, opening
            ),
        )
        .with_suggestion(
            "Both aggregates must be read with identical date and status filters; \
             check the window construction",
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn line(account: &str, debit: Decimal, credit: Decimal, date: (i32, u32, u32)) -> LedgerLine {
        LedgerLine {
            account_number: account.to_string(),
            debit,
            credit,
            entry_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            entry_status: EntryStatus::Posted,
            entry_id: format!("E-{}-{}", account, date.2),
            entry_label: String::new(),
        }
    }

    const STATUSES: [EntryStatus; 1] = [EntryStatus::Posted];

    fn year_lines() -> Vec<LedgerLine> {
        vec![
            line("512000", dec!(10000), Decimal::ZERO, (2023, 1, 15)),
            line("101000", Decimal::ZERO, dec!(10000), (2023, 1, 15)),
            line("512000", dec!(5000), Decimal::ZERO, (2023, 6, 20)),
            line("411000", Decimal::ZERO, dec!(5000), (2023, 6, 20)),
            line("401000", dec!(3000), Decimal::ZERO, (2023, 12, 15)),
            line("512000", Decimal::ZERO, dec!(3000), (2023, 12, 15)),
        ]
    }

    #[test]
    fn test_carryover_holds_when_windows_agree() {
        let closing = year_lines();
        // Next-year materialization sees the same history plus new lines
        let mut opening = year_lines();
        opening.push(line("512000", dec!(2000), Decimal::ZERO, (2024, 3, 10)));
        opening.push(line("701000", Decimal::ZERO, dec!(2000), (2024, 3, 10)));

        let finding = check_rollforward(
            &closing,
            &opening,
            &AccountFilter::prefix("512000"),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &STATUSES,
        );
        assert!(finding.is_none());
    }

    #[test]
    fn test_divergent_windows_are_flagged() {
        let closing = year_lines();
        // A materialization that lost the June entry
        let opening: Vec<LedgerLine> = year_lines()
            .into_iter()
            .filter(|l| l.entry_date.format("%m").to_string() != "06")
            .collect();

        let finding = check_rollforward(
            &closing,
            &opening,
            &AccountFilter::prefix("512000"),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &STATUSES,
        )
        .unwrap();
        assert_eq!(finding.code, codes::ROLLFORWARD);
        assert!(finding.is_error());
        assert!(finding.message.contains("12000"));
    }
}
