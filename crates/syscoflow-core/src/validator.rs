//! Compliance validator rules
//!
//! Independent, order-insensitive checks over the chart of accounts and the
//! fiscal-year journal. Each rule is a pure function returning findings; the
//! engine may run them concurrently and joins them before scoring.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use syscoflow_config::MandatoryAccount;
use syscoflow_ledger::{Account, EntryStatus, LedgerLine};

use crate::hao::HaoLexicon;
use crate::report::{codes, Finding};
use crate::taxonomy::{classify, AccountClass};

/// Chart classes every company is expected to use
const MANDATORY_CLASSES: [AccountClass; 6] = [
    AccountClass::LongTermResources,
    AccountClass::FixedAssets,
    AccountClass::ThirdParties,
    AccountClass::Treasury,
    AccountClass::OrdinaryExpenses,
    AccountClass::OrdinaryRevenues,
];

/// Recommended account number length range
const NUMBER_LENGTH: std::ops::RangeInclusive<usize> = 2..=6;

/// Taxonomy conformity: every account number must start with a class digit.
pub fn check_taxonomy(accounts: &[Account]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for account in accounts {
        if classify(&account.number).is_none() {
            findings.push(
                Finding::error(
                    codes::TAXONOMY,
                    format!(
                        "Account {} does not belong to any chart class: the number must start with a digit in 1-8",
                        account.number
                    ),
                )
                .with_account(&account.number)
                .with_suggestion("Renumber the account into one of the eight chart classes")
                .with_rule_reference("SYSCOHADA plan comptable, classes 1-8"),
            );
        } else if !NUMBER_LENGTH.contains(&account.number.len()) {
            findings.push(
                Finding::warning(
                    codes::TAXONOMY,
                    format!(
                        "Account {} has {} digits; between 2 and 6 are recommended",
                        account.number,
                        account.number.len()
                    ),
                )
                .with_account(&account.number),
            );
        }
    }
    findings
}

/// Mandatory class coverage: classes 1, 2, 4, 5, 6 and 7 must each be used.
pub fn check_class_coverage(accounts: &[Account]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for class in MANDATORY_CLASSES {
        let covered = accounts
            .iter()
            .any(|account| classify(&account.number).map(|c| c.class) == Some(class));
        if !covered {
            findings.push(
                Finding::warning(
                    codes::CLASS_COVERAGE,
                    format!("No active account in {} ({})", class, class.label()),
                )
                .with_suggestion(format!(
                    "Open at least one account starting with {}",
                    class.digit()
                )),
            );
        }
    }
    findings
}

/// Mandatory account coverage against the canonical table.
pub fn check_mandatory_accounts(
    accounts: &[Account],
    mandatory: &[MandatoryAccount],
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for entry in mandatory {
        let present = accounts
            .iter()
            .any(|account| account.number.starts_with(entry.prefix.as_str()));
        if !present {
            findings.push(
                Finding::warning(
                    codes::MANDATORY_ACCOUNT,
                    format!(
                        "No active account with prefix {} ({})",
                        entry.prefix, entry.label
                    ),
                )
                .with_account(&entry.prefix)
                .with_suggestion(format!("Open a {} account", entry.label)),
            );
        }
    }
    findings
}

/// Exceptional-item classification heuristic.
///
/// Entries whose description matches the lexicon are expected to post to
/// class 8; an entry that instead posts to class 6/7 only is flagged. The
/// signal is approximate, so it never exceeds warning severity.
pub fn check_hao_classification(lines: &[LedgerLine], lexicon: &HaoLexicon) -> Vec<Finding> {
    // BTreeMap keeps findings in a stable entry order
    let mut entries: BTreeMap<&str, Vec<&LedgerLine>> = BTreeMap::new();
    for line in lines {
        entries.entry(line.entry_id.as_str()).or_default().push(line);
    }

    let mut findings = Vec::new();
    for (entry_id, entry_lines) in entries {
        let label = &entry_lines[0].entry_label;
        let Some(rule) = lexicon.matches(label) else {
            continue;
        };

        let classes: Vec<AccountClass> = entry_lines
            .iter()
            .filter_map(|line| classify(&line.account_number).map(|c| c.class))
            .collect();
        let has_expected = classes.iter().any(|c| *c == rule.expected_class);
        let has_ordinary = classes.iter().any(|c| {
            matches!(
                c,
                AccountClass::OrdinaryExpenses | AccountClass::OrdinaryRevenues
            )
        });

        if !has_expected && has_ordinary {
            findings.push(
                Finding::warning(
                    codes::HAO_CLASSIFICATION,
                    format!(
                        "Entry \"{}\" looks exceptional (\"{}\") but posts to ordinary accounts only",
                        label, rule.pattern
                    ),
                )
                .with_entry(entry_id)
                .with_suggestion(format!(
                    "Reclassify the exceptional leg into {}",
                    rule.expected_class
                ))
                .with_rule_reference("SYSCOHADA, comptes HAO (classe 8)"),
            );
        }
    }
    findings
}

/// Debit/credit equilibrium over the fiscal-year window.
pub fn check_equilibrium(
    lines: &[LedgerLine],
    from: NaiveDate,
    to: NaiveDate,
    statuses: &[EntryStatus],
    tolerance: Decimal,
) -> Vec<Finding> {
    let imbalance: Decimal = lines
        .iter()
        .filter(|line| {
            line.entry_date >= from
                && line.entry_date <= to
                && (statuses.is_empty() || statuses.contains(&line.entry_status))
        })
        .map(|line| line.signed())
        .sum();

    if imbalance.abs() > tolerance {
        vec![Finding::error(
            codes::EQUILIBRIUM,
            format!(
                "Debits and credits diverge by {} over {}..{}",
                imbalance, from, to
            ),
        )
        .with_suggestion("Audit the journal entries of the period for one-legged postings")]
    } else {
        Vec::new()
    }
}

/// Diagnostic: net exceptional-activity result over the window.
///
/// Emitted only when class 8 moved during the period.
pub fn hao_result_info(
    lines: &[LedgerLine],
    from: NaiveDate,
    to: NaiveDate,
    statuses: &[EntryStatus],
) -> Option<Finding> {
    let mut revenue = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut moved = false;

    for line in lines.iter().filter(|line| {
        line.entry_date >= from
            && line.entry_date <= to
            && (statuses.is_empty() || statuses.contains(&line.entry_status))
    }) {
        if line.account_number.starts_with("82") {
            revenue += line.credit - line.debit;
            moved = true;
        } else if line.account_number.starts_with("81") {
            expense += line.debit - line.credit;
            moved = true;
        }
    }

    if !moved {
        return None;
    }

    Some(Finding::info(
        codes::HAO_RESULT,
        format!(
            "Net exceptional-activity result over {}..{}: {}",
            from,
            to,
            revenue - expense
        ),
    ))
}
