//! Configuration management for syscoflow
//!
//! Every tunable of the engine lives here: tolerances, score weights, the
//! mandatory-account table, the HAO lexicon, fiscal calendars. Nothing in
//! the engine hard-codes these values; callers construct a [`Config`] (or
//! load one from YAML) and inject it.

pub mod error;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Engine Configuration ====================

/// Tolerance thresholds for balancing checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tolerances {
    /// Maximum accepted gap between calculated and actual treasury variation
    #[serde(default = "default_flow_balance")]
    pub flow_balance: Decimal,
    /// Maximum accepted debit/credit imbalance over a fiscal year
    #[serde(default = "default_equilibrium")]
    pub equilibrium: Decimal,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            flow_balance: default_flow_balance(),
            equilibrium: default_equilibrium(),
        }
    }
}

fn default_flow_balance() -> Decimal {
    Decimal::ONE
}

fn default_equilibrium() -> Decimal {
    // 0.01 currency unit
    Decimal::new(1, 2)
}

/// Penalty weights for the compliance score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Penalty per error finding
    #[serde(default = "default_error_weight")]
    pub error_weight: u32,
    /// Penalty per warning finding
    #[serde(default = "default_warning_weight")]
    pub warning_weight: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            error_weight: default_error_weight(),
            warning_weight: default_warning_weight(),
        }
    }
}

fn default_error_weight() -> u32 {
    20
}

fn default_warning_weight() -> u32 {
    5
}

/// A canonical account every conformant chart must carry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandatoryAccount {
    /// Account number prefix (e.g., "411")
    pub prefix: String,
    /// Human-readable label used in findings
    pub label: String,
}

/// One lexicon rule of the exceptional-item classifier
///
/// Rules are an ordered list; the first matching pattern wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconRule {
    /// Case-insensitive regex matched against the entry description
    pub pattern: String,
    /// Chart class the matching entry is expected to post to
    pub expected_class: u8,
}

/// Fiscal calendar of a company
///
/// Fiscal year N starts on N-`start_month`-`start_day` and ends the day
/// before fiscal year N+1 starts, which supports shifted fiscal years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FiscalCalendar {
    /// First month of the fiscal year (1-12)
    #[serde(default = "default_start_month")]
    pub start_month: u32,
    /// First day of the fiscal year (1-31)
    #[serde(default = "default_start_day")]
    pub start_day: u32,
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self {
            start_month: default_start_month(),
            start_day: default_start_day(),
        }
    }
}

fn default_start_month() -> u32 {
    1
}

fn default_start_day() -> u32 {
    1
}

impl FiscalCalendar {
    /// First day of a fiscal year
    pub fn year_start(&self, fiscal_year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(fiscal_year, self.start_month, self.start_day)
    }

    /// Last day of a fiscal year
    pub fn year_end(&self, fiscal_year: i32) -> Option<NaiveDate> {
        self.year_start(fiscal_year + 1)?.pred_opt()
    }

    /// Last day of the prior fiscal year
    pub fn prior_year_end(&self, fiscal_year: i32) -> Option<NaiveDate> {
        self.year_start(fiscal_year)?.pred_opt()
    }
}

/// Engine tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Balancing tolerances
    #[serde(default)]
    pub tolerances: Tolerances,
    /// Score penalty weights
    #[serde(default)]
    pub score: ScoreWeights,
    /// Canonical accounts checked by the mandatory-account rule
    #[serde(default = "default_mandatory_accounts")]
    pub mandatory_accounts: Vec<MandatoryAccount>,
    /// Ordered lexicon of the exceptional-item classifier
    #[serde(default = "default_hao_lexicon")]
    pub hao_lexicon: Vec<LexiconRule>,
    /// Entry statuses included in every aggregate
    #[serde(default = "default_accepted_statuses")]
    pub accepted_statuses: Vec<String>,
    /// Account prefix carrying dividend payouts
    #[serde(default = "default_dividend_prefix")]
    pub dividend_prefix: String,
    /// Upper bound in seconds for one batch of ledger reads
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Default fiscal calendar, used when a company has no specific one
    #[serde(default)]
    pub fiscal: FiscalCalendar,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            score: ScoreWeights::default(),
            mandatory_accounts: default_mandatory_accounts(),
            hao_lexicon: default_hao_lexicon(),
            accepted_statuses: default_accepted_statuses(),
            dividend_prefix: default_dividend_prefix(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fiscal: FiscalCalendar::default(),
        }
    }
}

fn default_mandatory_accounts() -> Vec<MandatoryAccount> {
    [
        ("101", "Capital social"),
        ("13", "Résultat net de l'exercice"),
        ("401", "Fournisseurs"),
        ("411", "Clients"),
        ("521", "Banques"),
        ("571", "Caisse"),
        ("601", "Achats de marchandises"),
        ("701", "Ventes de marchandises"),
    ]
    .into_iter()
    .map(|(prefix, label)| MandatoryAccount {
        prefix: prefix.to_string(),
        label: label.to_string(),
    })
    .collect()
}

fn default_hao_lexicon() -> Vec<LexiconRule> {
    [
        "cession",
        "plus-value",
        "moins-value",
        r"p[ée]nalit[ée]",
        "amende",
        "subvention exceptionnelle",
    ]
    .into_iter()
    .map(|pattern| LexiconRule {
        pattern: pattern.to_string(),
        expected_class: 8,
    })
    .collect()
}

fn default_accepted_statuses() -> Vec<String> {
    vec![
        "posted".to_string(),
        "validated".to_string(),
        "imported".to_string(),
    ]
}

fn default_dividend_prefix() -> String {
    "465".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

// ==================== Logging Configuration ====================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// ==================== Main Configuration ====================

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Engine tunables
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_string_lossy().to_string(),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fiscal = &self.engine.fiscal;
        if fiscal.start_month < 1 || fiscal.start_month > 12 {
            return Err(ConfigError::InvalidValue {
                field: "engine.fiscal.start_month".to_string(),
                reason: "Month must be between 1 and 12".to_string(),
            });
        }
        if fiscal.start_day < 1 || fiscal.start_day > 31 {
            return Err(ConfigError::InvalidValue {
                field: "engine.fiscal.start_day".to_string(),
                reason: "Day must be between 1 and 31".to_string(),
            });
        }

        if self.engine.tolerances.flow_balance < Decimal::ZERO
            || self.engine.tolerances.equilibrium < Decimal::ZERO
        {
            return Err(ConfigError::InvalidValue {
                field: "engine.tolerances".to_string(),
                reason: "Tolerances must not be negative".to_string(),
            });
        }

        for rule in &self.engine.hao_lexicon {
            if rule.expected_class < 1 || rule.expected_class > 8 {
                return Err(ConfigError::InvalidValue {
                    field: "engine.hao_lexicon".to_string(),
                    reason: format!(
                        "Expected class {} is outside 1-8",
                        rule.expected_class
                    ),
                });
            }
        }

        if self.engine.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.fetch_timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.tolerances.flow_balance, Decimal::ONE);
        assert_eq!(config.engine.tolerances.equilibrium, dec!(0.01));
        assert_eq!(config.engine.score.error_weight, 20);
        assert_eq!(config.engine.score.warning_weight, 5);
        assert_eq!(config.engine.mandatory_accounts.len(), 8);
        assert_eq!(config.engine.dividend_prefix, "465");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_valid() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.accepted_statuses.len(), 3);
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
engine:
  score:
    error_weight: 25
  fiscal:
    start_month: 4
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.engine.score.error_weight, 25);
        assert_eq!(config.engine.score.warning_weight, 5);
        assert_eq!(config.engine.fiscal.start_month, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_month() {
        let mut config = Config::default();
        config.engine.fiscal.start_month = 13;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_lexicon_class() {
        let mut config = Config::default();
        config.engine.hao_lexicon.push(LexiconRule {
            pattern: "litige".to_string(),
            expected_class: 9,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_calendar_year_bounds() {
        let calendar = FiscalCalendar::default();
        assert_eq!(
            calendar.year_start(2023),
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
        assert_eq!(calendar.year_end(2023), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(
            calendar.prior_year_end(2023),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
    }

    #[test]
    fn test_shifted_fiscal_year() {
        let calendar = FiscalCalendar {
            start_month: 4,
            start_day: 1,
        };
        assert_eq!(
            calendar.year_start(2023),
            NaiveDate::from_ymd_opt(2023, 4, 1)
        );
        assert_eq!(calendar.year_end(2023), NaiveDate::from_ymd_opt(2024, 3, 31));
    }
}
