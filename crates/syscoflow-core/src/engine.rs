//! Compliance engine orchestration
//!
//! [`ComplianceEngine`] is a dependency-injected service value: construct it
//! once with an accessor and a configuration, share it by reference. It holds
//! no per-call state, so one instance can serve any number of concurrent
//! audits.
//!
//! Each audit performs a single batched read of the company's history (one
//! line query spanning the full range, one chart query), then runs every
//! rule concurrently over that snapshot. The join before scoring is the only
//! synchronization point. Read failures and timeouts degrade into a single
//! error finding; nothing on this surface panics or propagates.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use syscoflow_config::{EngineConfig, FiscalCalendar, ScoreWeights};
use syscoflow_ledger::{Account, EntryStatus, LedgerAccessor, LedgerLine, LedgerRef};

use crate::balance::{signed_balance, AccountFilter};
use crate::cashflow::{derive_cash_flow, CashFlowParams, CashFlowStatement};
use crate::error::{EngineError, EngineResult};
use crate::hao::HaoLexicon;
use crate::report::{codes, ClassBalance, ComplianceReport, Finding};
use crate::rollforward::check_rollforward;
use crate::taxonomy::AccountClass;
use crate::validator;

/// Everything one audit produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub report: ComplianceReport,
    pub cash_flow: CashFlowStatement,
}

impl AuditResult {
    /// Result for an audit that could not read its inputs.
    fn degraded(
        finding: Finding,
        weights: &ScoreWeights,
        checked_at: chrono::DateTime<Utc>,
    ) -> Self {
        Self {
            report: ComplianceReport::from_findings(vec![finding], weights, checked_at),
            cash_flow: CashFlowStatement::zeroed(),
        }
    }
}

/// The ledger compliance and cash-flow derivation engine
pub struct ComplianceEngine {
    ledger: LedgerRef,
    config: EngineConfig,
    statuses: Vec<EntryStatus>,
    lexicon: HaoLexicon,
}

impl ComplianceEngine {
    /// Construct an engine over an accessor with the given configuration.
    pub fn new(ledger: LedgerRef, config: EngineConfig) -> Self {
        let statuses: Vec<EntryStatus> = config
            .accepted_statuses
            .iter()
            .filter_map(|raw| match EntryStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(_) => {
                    log::warn!(
                        target: "syscoflow::engine",
                        "ignoring unknown accepted status '{}'",
                        raw
                    );
                    None
                }
            })
            .collect();
        let lexicon = HaoLexicon::from_rules(&config.hao_lexicon);

        Self {
            ledger,
            config,
            statuses,
            lexicon,
        }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full audit: compliance report plus cash-flow statement, from
    /// one batched snapshot read.
    pub async fn audit(
        &self,
        company_id: &str,
        fiscal_year: i32,
        calendar: &FiscalCalendar,
    ) -> AuditResult {
        let checked_at = Utc::now();
        let weights = &self.config.score;

        let (Some(year_start), Some(year_end)) = (
            calendar.year_start(fiscal_year),
            calendar.year_end(fiscal_year),
        ) else {
            let error = EngineError::InvalidCalendar { fiscal_year };
            return AuditResult::degraded(error.to_finding(), weights, checked_at);
        };

        let (lines, accounts) = match self.fetch_company(company_id, year_end).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                log::warn!(
                    target: "syscoflow::engine",
                    "audit of {} fiscal {} degraded: {}",
                    company_id,
                    fiscal_year,
                    error
                );
                return AuditResult::degraded(error.to_finding(), weights, checked_at);
            }
        };

        log::debug!(
            target: "syscoflow::engine",
            "auditing {} fiscal {}: {} lines, {} accounts",
            company_id,
            fiscal_year,
            lines.len(),
            accounts.len()
        );

        let lines = Arc::new(lines);
        let accounts = Arc::new(accounts);

        // Independent rules; the joins below are the only barrier before
        // scoring.
        let taxonomy = tokio::spawn({
            let accounts = Arc::clone(&accounts);
            async move { validator::check_taxonomy(&accounts) }
        });
        let coverage = tokio::spawn({
            let accounts = Arc::clone(&accounts);
            async move { validator::check_class_coverage(&accounts) }
        });
        let mandatory = tokio::spawn({
            let accounts = Arc::clone(&accounts);
            let table = self.config.mandatory_accounts.clone();
            async move { validator::check_mandatory_accounts(&accounts, &table) }
        });
        let hao = tokio::spawn({
            let lines = Arc::clone(&lines);
            let lexicon = self.lexicon.clone();
            async move { validator::check_hao_classification(&lines, &lexicon) }
        });
        let equilibrium = tokio::spawn({
            let lines = Arc::clone(&lines);
            let statuses = self.statuses.clone();
            let tolerance = self.config.tolerances.equilibrium;
            async move {
                validator::check_equilibrium(&lines, year_start, year_end, &statuses, tolerance)
            }
        });
        let flows = tokio::spawn({
            let lines = Arc::clone(&lines);
            let statuses = self.statuses.clone();
            let dividend_prefix = self.config.dividend_prefix.clone();
            let flow_tolerance = self.config.tolerances.flow_balance;
            async move {
                let params = CashFlowParams {
                    dividend_prefix: &dividend_prefix,
                    flow_tolerance,
                    statuses: &statuses,
                };
                derive_cash_flow(&lines, year_start, year_end, &params)
            }
        });

        let mut findings = Vec::new();
        for handle in [taxonomy, coverage, mandatory, hao, equilibrium] {
            match handle.await {
                Ok(mut rule_findings) => findings.append(&mut rule_findings),
                Err(e) => findings.push(
                    EngineError::Internal {
                        message: e.to_string(),
                    }
                    .to_finding(),
                ),
            }
        }

        let cash_flow = match flows.await {
            Ok(statement) => statement,
            Err(e) => {
                findings.push(
                    EngineError::Internal {
                        message: e.to_string(),
                    }
                    .to_finding(),
                );
                CashFlowStatement::zeroed()
            }
        };

        if !cash_flow.is_balanced {
            findings.push(Finding::warning(
                codes::CASH_FLOW,
                format!(
                    "Cash-flow statement does not reconcile: calculated variation {} vs treasury change {}",
                    cash_flow.variation,
                    cash_flow.treasury_end - cash_flow.treasury_begin
                ),
            ));
        }

        if let Some(info) =
            validator::hao_result_info(&lines, year_start, year_end, &self.statuses)
        {
            findings.push(info);
        }

        AuditResult {
            report: ComplianceReport::from_findings(findings, weights, checked_at),
            cash_flow,
        }
    }

    /// Compliance report only.
    pub async fn check_compliance(
        &self,
        company_id: &str,
        fiscal_year: i32,
        calendar: &FiscalCalendar,
    ) -> ComplianceReport {
        self.audit(company_id, fiscal_year, calendar).await.report
    }

    /// Cash-flow statement for one fiscal year.
    ///
    /// When the ledger cannot be read the statement is zero-valued and
    /// unbalanced, with the failure described in the accompanying findings.
    pub async fn cash_flow_statement(
        &self,
        company_id: &str,
        fiscal_year: i32,
        calendar: &FiscalCalendar,
    ) -> (CashFlowStatement, Vec<Finding>) {
        let (Some(year_start), Some(year_end)) = (
            calendar.year_start(fiscal_year),
            calendar.year_end(fiscal_year),
        ) else {
            let error = EngineError::InvalidCalendar { fiscal_year };
            return (CashFlowStatement::zeroed(), vec![error.to_finding()]);
        };

        let lines = match self
            .fetch_lines_through(company_id, year_end, "cash-flow read")
            .await
        {
            Ok(lines) => lines,
            Err(error) => return (CashFlowStatement::zeroed(), vec![error.to_finding()]),
        };

        let params = CashFlowParams {
            dividend_prefix: &self.config.dividend_prefix,
            flow_tolerance: self.config.tolerances.flow_balance,
            statuses: &self.statuses,
        };
        (
            derive_cash_flow(&lines, year_start, year_end, &params),
            Vec::new(),
        )
    }

    /// Verify that the closing aggregate of `fiscal_year` carries over into
    /// the next fiscal year's opening aggregate for the given account set.
    pub async fn rollforward_check(
        &self,
        company_id: &str,
        filter: &AccountFilter,
        fiscal_year: i32,
        calendar: &FiscalCalendar,
    ) -> Vec<Finding> {
        let (Some(boundary), Some(next_end)) = (
            calendar.year_end(fiscal_year),
            calendar.year_end(fiscal_year + 1),
        ) else {
            let error = EngineError::InvalidCalendar { fiscal_year };
            return vec![error.to_finding()];
        };

        let closing = match self
            .fetch_lines_through(company_id, boundary, "closing window read")
            .await
        {
            Ok(lines) => lines,
            Err(error) => return vec![error.to_finding()],
        };
        let opening = match self
            .fetch_lines_through(company_id, next_end, "opening window read")
            .await
        {
            Ok(lines) => lines,
            Err(error) => return vec![error.to_finding()],
        };

        check_rollforward(&closing, &opening, filter, boundary, &self.statuses)
            .into_iter()
            .collect()
    }

    /// Signed balance per chart class as of a date, with the balance flipped
    /// onto each class's presentation side.
    pub async fn class_balance_summary(
        &self,
        company_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<ClassBalance>> {
        let lines = self
            .fetch_lines_through(company_id, as_of, "class summary read")
            .await?;

        Ok(AccountClass::ALL
            .iter()
            .map(|class| {
                let balance =
                    signed_balance(&lines, &AccountFilter::Class(*class), as_of, &self.statuses);
                ClassBalance {
                    class: *class,
                    label: class.label().to_string(),
                    balance,
                    presented: class.presentation_sign() * balance,
                }
            })
            .collect())
    }

    /// One batched snapshot read: full line history through `as_of` plus the
    /// active chart, fetched concurrently under a single timeout.
    async fn fetch_company(
        &self,
        company_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<(Vec<LedgerLine>, Vec<Account>)> {
        let operation = "company snapshot read";
        let fetch = async {
            tokio::try_join!(
                self.ledger
                    .fetch_lines(company_id, None, Some(as_of), &self.statuses),
                self.ledger.fetch_active_accounts(company_id),
            )
        };
        match tokio::time::timeout(self.fetch_timeout(), fetch).await {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(source)) => Err(EngineError::LedgerAccess {
                operation: operation.to_string(),
                source,
            }),
            Err(_) => Err(EngineError::Timeout {
                operation: operation.to_string(),
                seconds: self.config.fetch_timeout_secs,
            }),
        }
    }

    async fn fetch_lines_through(
        &self,
        company_id: &str,
        as_of: NaiveDate,
        operation: &str,
    ) -> EngineResult<Vec<LedgerLine>> {
        let fetch = self
            .ledger
            .fetch_lines(company_id, None, Some(as_of), &self.statuses);
        match tokio::time::timeout(self.fetch_timeout(), fetch).await {
            Ok(Ok(lines)) => Ok(lines),
            Ok(Err(source)) => Err(EngineError::LedgerAccess {
                operation: operation.to_string(),
                source,
            }),
            Err(_) => Err(EngineError::Timeout {
                operation: operation.to_string(),
                seconds: self.config.fetch_timeout_secs,
            }),
        }
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.config.fetch_timeout_secs)
    }
}
