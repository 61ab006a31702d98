//! Balance aggregation over journal lines
//!
//! Every downstream figure (BFR, cash flow, rollforward) is built on two
//! primitives: the cumulative signed balance of a set of accounts as of a
//! date, and the per-window debit/credit movement of that set. Callers
//! comparing two aggregates must pass identical status filters, otherwise
//! the rollforward invariant breaks spuriously.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use syscoflow_ledger::{EntryStatus, LedgerLine};

use crate::taxonomy::AccountClass;

/// Predicate over account numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountFilter {
    /// Account number starts with the given prefix
    Prefix(String),
    /// Account number starts with any of the given prefixes
    AnyPrefix(Vec<String>),
    /// Account belongs to the given class
    Class(AccountClass),
    /// Account belongs to the class but matches none of the excluded prefixes
    ClassExcept {
        class: AccountClass,
        excluded: Vec<String>,
    },
}

impl AccountFilter {
    /// Prefix filter constructor
    pub fn prefix(prefix: impl Into<String>) -> Self {
        AccountFilter::Prefix(prefix.into())
    }

    /// Check whether an account number satisfies the predicate
    pub fn matches(&self, account_number: &str) -> bool {
        match self {
            AccountFilter::Prefix(prefix) => account_number.starts_with(prefix.as_str()),
            AccountFilter::AnyPrefix(prefixes) => prefixes
                .iter()
                .any(|prefix| account_number.starts_with(prefix.as_str())),
            AccountFilter::Class(class) => {
                account_number.starts_with(char::from(b'0' + class.digit()))
            }
            AccountFilter::ClassExcept { class, excluded } => {
                account_number.starts_with(char::from(b'0' + class.digit()))
                    && !excluded
                        .iter()
                        .any(|prefix| account_number.starts_with(prefix.as_str()))
            }
        }
    }
}

impl std::fmt::Display for AccountFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountFilter::Prefix(prefix) => write!(f, "{}*", prefix),
            AccountFilter::AnyPrefix(prefixes) => write!(f, "{}*", prefixes.join("*|")),
            AccountFilter::Class(class) => write!(f, "{}", class),
            AccountFilter::ClassExcept { class, excluded } => {
                write!(f, "{} sauf {}*", class, excluded.join("*, "))
            }
        }
    }
}

/// Debit and credit totals over a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Movement {
    /// Net movement (debit minus credit)
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

fn status_accepted(line: &LedgerLine, statuses: &[EntryStatus]) -> bool {
    statuses.is_empty() || statuses.contains(&line.entry_status)
}

/// Cumulative signed balance (debit minus credit) of all qualifying lines
/// dated on or before `as_of`.
pub fn signed_balance(
    lines: &[LedgerLine],
    filter: &AccountFilter,
    as_of: NaiveDate,
    statuses: &[EntryStatus],
) -> Decimal {
    lines
        .iter()
        .filter(|line| {
            line.entry_date <= as_of
                && status_accepted(line, statuses)
                && filter.matches(&line.account_number)
        })
        .map(|line| line.signed())
        .sum()
}

/// Debit and credit totals of qualifying lines dated within `[from, to]`.
pub fn window_movement(
    lines: &[LedgerLine],
    filter: &AccountFilter,
    from: NaiveDate,
    to: NaiveDate,
    statuses: &[EntryStatus],
) -> Movement {
    lines
        .iter()
        .filter(|line| {
            line.entry_date >= from
                && line.entry_date <= to
                && status_accepted(line, statuses)
                && filter.matches(&line.account_number)
        })
        .fold(Movement::default(), |acc, line| Movement {
            debit: acc.debit + line.debit,
            credit: acc.credit + line.credit,
        })
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
            entry_id: format!("E-{}-{}", account, date.2),
            entry_label: String::new(),
        }
    }

    fn sample_bank_lines() -> Vec<LedgerLine> {
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
    fn test_cumulative_balance_as_of_year_end() {
        let lines = sample_bank_lines();
        let balance = signed_balance(
            &lines,
            &AccountFilter::prefix("512000"),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &[EntryStatus::Posted],
        );
        assert_eq!(balance, dec!(12000));
    }

    #[test]
    fn test_later_lines_do_not_move_a_closed_period() {
        let mut lines = sample_bank_lines();
        lines.push(line("512000", dec!(2000), Decimal::ZERO, (2024, 3, 10)));
        lines.push(line("701000", Decimal::ZERO, dec!(2000), (2024, 3, 10)));

        let end_2023 = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let end_2024 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let filter = AccountFilter::prefix("512000");
        let statuses = [EntryStatus::Posted];

        assert_eq!(signed_balance(&lines, &filter, end_2023, &statuses), dec!(12000));
        assert_eq!(signed_balance(&lines, &filter, end_2024, &statuses), dec!(14000));
    }

    #[test]
    fn test_status_filter_excludes_drafts() {
        let mut lines = sample_bank_lines();
        let mut draft = line("512000", dec!(999), Decimal::ZERO, (2023, 2, 1));
        draft.entry_status = EntryStatus::Draft;
        lines.push(draft);

        let balance = signed_balance(
            &lines,
            &AccountFilter::prefix("512000"),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &[EntryStatus::Posted, EntryStatus::Validated, EntryStatus::Imported],
        );
        assert_eq!(balance, dec!(12000));
    }

    #[test]
    fn test_class_except_filter() {
        let filter = AccountFilter::ClassExcept {
            class: AccountClass::FixedAssets,
            excluded: vec!["28".to_string()],
        };
        assert!(filter.matches("241000"));
        assert!(!filter.matches("281000"));
        assert!(!filter.matches("601000"));
    }

    #[test]
    fn test_window_movement() {
        let lines = sample_bank_lines();
        let movement = window_movement(
            &lines,
            &AccountFilter::prefix("512"),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            &[EntryStatus::Posted],
        );
        assert_eq!(movement.debit, dec!(15000));
        assert_eq!(movement.credit, dec!(3000));
        assert_eq!(movement.net(), dec!(12000));
    }

    #[test]
    fn test_any_prefix_filter() {
        let filter = AccountFilter::AnyPrefix(vec!["16".to_string(), "17".to_string()]);
        assert!(filter.matches("162000"));
        assert!(filter.matches("171000"));
        assert!(!filter.matches("181000"));
    }
}
