//! Ledger compliance and cash-flow derivation engine
//!
//! Reads a company's double-entry journal through a [`syscoflow_ledger::LedgerAccessor`]
//! and produces, for one fiscal year:
//!
//! - a compliance report against the eight-class SYSCOHADA chart taxonomy,
//! - a TAFIRE-style three-section cash-flow statement with its balancing
//!   invariant,
//! - cross-period rollforward checks.
//!
//! Everything is computed fresh per call from (company, fiscal year, ledger
//! snapshot); the engine holds no cross-call state.

pub mod balance;
pub mod bfr;
pub mod cashflow;
pub mod engine;
pub mod error;
pub mod hao;
pub mod report;
pub mod rollforward;
pub mod score;
pub mod taxonomy;
pub mod validator;

pub use balance::{signed_balance, window_movement, AccountFilter, Movement};
pub use bfr::{working_capital, working_capital_delta};
pub use cashflow::{derive_cash_flow, CashFlowParams, CashFlowStatement};
pub use engine::{AuditResult, ComplianceEngine};
pub use error::{EngineError, EngineResult};
pub use hao::{default_lexicon, HaoLexicon};
pub use report::{codes, ClassBalance, ComplianceReport, Finding, Severity};
pub use rollforward::check_rollforward;
pub use score::compliance_score;
pub use taxonomy::{classify, AccountClass, AccountRole, Classification, NormalSide};
