//! SYSCOHADA chart-of-accounts taxonomy
//!
//! Classification is derived from the account number alone: the leading digit
//! gives the class, further prefixes refine the role (40x payables, 41x
//! receivables, 81x/82x exceptional charges/income). Nothing here touches the
//! ledger; `classify` is a pure function over strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The eight SYSCOHADA account classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Class 1: long-term resources (capital, reserves, borrowings)
    LongTermResources,
    /// Class 2: fixed assets
    FixedAssets,
    /// Class 3: stocks
    Stocks,
    /// Class 4: third parties (receivables and payables)
    ThirdParties,
    /// Class 5: treasury
    Treasury,
    /// Class 6: ordinary-activity expenses
    OrdinaryExpenses,
    /// Class 7: ordinary-activity revenues
    OrdinaryRevenues,
    /// Class 8: outside ordinary activities (HAO)
    Exceptional,
}

impl AccountClass {
    /// All classes in chart order
    pub const ALL: [AccountClass; 8] = [
        AccountClass::LongTermResources,
        AccountClass::FixedAssets,
        AccountClass::Stocks,
        AccountClass::ThirdParties,
        AccountClass::Treasury,
        AccountClass::OrdinaryExpenses,
        AccountClass::OrdinaryRevenues,
        AccountClass::Exceptional,
    ];

    /// Leading digit of accounts in this class
    pub fn digit(&self) -> u8 {
        match self {
            AccountClass::LongTermResources => 1,
            AccountClass::FixedAssets => 2,
            AccountClass::Stocks => 3,
            AccountClass::ThirdParties => 4,
            AccountClass::Treasury => 5,
            AccountClass::OrdinaryExpenses => 6,
            AccountClass::OrdinaryRevenues => 7,
            AccountClass::Exceptional => 8,
        }
    }

    /// Class for a leading digit
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(AccountClass::LongTermResources),
            2 => Some(AccountClass::FixedAssets),
            3 => Some(AccountClass::Stocks),
            4 => Some(AccountClass::ThirdParties),
            5 => Some(AccountClass::Treasury),
            6 => Some(AccountClass::OrdinaryExpenses),
            7 => Some(AccountClass::OrdinaryRevenues),
            8 => Some(AccountClass::Exceptional),
            _ => None,
        }
    }

    /// Sign flipping a signed balance onto the class's presentation side.
    ///
    /// Credit-normal classes (long-term resources, ordinary revenues) present
    /// the credit side positive; mixed classes keep the signed view.
    pub fn presentation_sign(&self) -> Decimal {
        match self {
            AccountClass::LongTermResources | AccountClass::OrdinaryRevenues => {
                Decimal::NEGATIVE_ONE
            }
            _ => Decimal::ONE,
        }
    }

    /// French chart label, used in findings
    pub fn label(&self) -> &'static str {
        match self {
            AccountClass::LongTermResources => "Ressources durables",
            AccountClass::FixedAssets => "Actif immobilisé",
            AccountClass::Stocks => "Stocks",
            AccountClass::ThirdParties => "Tiers",
            AccountClass::Treasury => "Trésorerie",
            AccountClass::OrdinaryExpenses => "Charges des activités ordinaires",
            AccountClass::OrdinaryRevenues => "Produits des activités ordinaires",
            AccountClass::Exceptional => "Hors activités ordinaires",
        }
    }
}

impl std::fmt::Display for AccountClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "classe {}", self.digit())
    }
}

/// Semantic role of an account, refined below the class level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Equity,
    Asset,
    Stock,
    Payable,
    Receivable,
    ThirdParty,
    Treasury,
    Expense,
    Revenue,
    ExceptionalExpense,
    ExceptionalRevenue,
    Exceptional,
}

/// Normal balance side of an account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    Debit,
    Credit,
}

impl AccountRole {
    /// The side a healthy balance normally sits on, used for presentation
    /// sign flips.
    pub fn normal_side(&self) -> NormalSide {
        match self {
            AccountRole::Equity
            | AccountRole::Payable
            | AccountRole::Revenue
            | AccountRole::ExceptionalRevenue => NormalSide::Credit,
            AccountRole::Asset
            | AccountRole::Stock
            | AccountRole::Receivable
            | AccountRole::ThirdParty
            | AccountRole::Treasury
            | AccountRole::Expense
            | AccountRole::ExceptionalExpense
            | AccountRole::Exceptional => NormalSide::Debit,
        }
    }
}

/// Derived classification of an account number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub class: AccountClass,
    pub role: AccountRole,
}

/// Classify an account number by its prefix.
///
/// Returns `None` for numbers whose first character is not a digit in 1-8;
/// the compliance validator reports those, they are never rejected silently.
pub fn classify(account_number: &str) -> Option<Classification> {
    let first = account_number.chars().next()?;
    let class = AccountClass::from_digit(first.to_digit(10)? as u8)?;

    let role = match class {
        AccountClass::LongTermResources => AccountRole::Equity,
        AccountClass::FixedAssets => AccountRole::Asset,
        AccountClass::Stocks => AccountRole::Stock,
        AccountClass::ThirdParties => {
            if account_number.starts_with("40") {
                AccountRole::Payable
            } else if account_number.starts_with("41") {
                AccountRole::Receivable
            } else {
                AccountRole::ThirdParty
            }
        }
        AccountClass::Treasury => AccountRole::Treasury,
        AccountClass::OrdinaryExpenses => AccountRole::Expense,
        AccountClass::OrdinaryRevenues => AccountRole::Revenue,
        AccountClass::Exceptional => {
            if account_number.starts_with("81") {
                AccountRole::ExceptionalExpense
            } else if account_number.starts_with("82") {
                AccountRole::ExceptionalRevenue
            } else {
                AccountRole::Exceptional
            }
        }
    };

    Some(Classification { class, role })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_leading_digit() {
        assert_eq!(
            classify("101000").map(|c| c.class),
            Some(AccountClass::LongTermResources)
        );
        assert_eq!(
            classify("512000").map(|c| c.class),
            Some(AccountClass::Treasury)
        );
        assert_eq!(
            classify("601000").map(|c| c.role),
            Some(AccountRole::Expense)
        );
        assert_eq!(
            classify("701000").map(|c| c.role),
            Some(AccountRole::Revenue)
        );
    }

    #[test]
    fn test_third_party_roles() {
        assert_eq!(
            classify("401000").map(|c| c.role),
            Some(AccountRole::Payable)
        );
        assert_eq!(
            classify("411000").map(|c| c.role),
            Some(AccountRole::Receivable)
        );
        assert_eq!(
            classify("421000").map(|c| c.role),
            Some(AccountRole::ThirdParty)
        );
    }

    #[test]
    fn test_exceptional_roles() {
        assert_eq!(
            classify("811000").map(|c| c.role),
            Some(AccountRole::ExceptionalExpense)
        );
        assert_eq!(
            classify("821000").map(|c| c.role),
            Some(AccountRole::ExceptionalRevenue)
        );
        assert_eq!(
            classify("831000").map(|c| c.role),
            Some(AccountRole::Exceptional)
        );
    }

    #[test]
    fn test_non_conformant_numbers() {
        assert!(classify("901000").is_none());
        assert!(classify("050000").is_none());
        assert!(classify("X12").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_normal_sides() {
        assert_eq!(
            classify("101000").unwrap().role.normal_side(),
            NormalSide::Credit
        );
        assert_eq!(
            classify("401000").unwrap().role.normal_side(),
            NormalSide::Credit
        );
        assert_eq!(
            classify("512000").unwrap().role.normal_side(),
            NormalSide::Debit
        );
        assert_eq!(
            classify("601000").unwrap().role.normal_side(),
            NormalSide::Debit
        );
    }

    #[test]
    fn test_digit_roundtrip() {
        for digit in 1..=8u8 {
            let class = AccountClass::from_digit(digit).unwrap();
            assert_eq!(class.digit(), digit);
        }
        assert!(AccountClass::from_digit(0).is_none());
        assert!(AccountClass::from_digit(9).is_none());
    }
}
