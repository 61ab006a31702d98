//! Exceptional-item lexicon classifier
//!
//! Flags journal entries whose description reads like an exceptional event
//! (disposal, capital gain/loss, penalty, exceptional subsidy). The rules are
//! an ordered, configuration-driven list of case-insensitive patterns; the
//! first match wins. This is a heuristic signal only and never escalates
//! beyond warning severity.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use syscoflow_config::{EngineConfig, LexiconRule};

use crate::taxonomy::AccountClass;

/// One compiled lexicon rule
#[derive(Debug, Clone)]
pub struct CompiledLexiconRule {
    /// Original pattern, kept for messages
    pub pattern: String,
    /// Chart class the matching entry is expected to post to
    pub expected_class: AccountClass,
    regex: Regex,
}

/// Ordered set of compiled lexicon rules
#[derive(Debug, Clone, Default)]
pub struct HaoLexicon {
    rules: Vec<CompiledLexiconRule>,
}

impl HaoLexicon {
    /// Compile an ordered rule list.
    ///
    /// Invalid patterns and classes are logged and skipped so a bad
    /// configuration entry degrades the heuristic instead of the engine.
    pub fn from_rules(rules: &[LexiconRule]) -> Self {
        let compiled = rules
            .iter()
            .filter_map(|rule| {
                let expected_class = match AccountClass::from_digit(rule.expected_class) {
                    Some(class) => class,
                    None => {
                        log::warn!(
                            target: "syscoflow::hao",
                            "lexicon rule '{}' expects unknown class {}, skipping",
                            rule.pattern,
                            rule.expected_class
                        );
                        return None;
                    }
                };
                match RegexBuilder::new(&rule.pattern).case_insensitive(true).build() {
                    Ok(regex) => Some(CompiledLexiconRule {
                        pattern: rule.pattern.clone(),
                        expected_class,
                        regex,
                    }),
                    Err(e) => {
                        log::warn!(
                            target: "syscoflow::hao",
                            "invalid lexicon pattern '{}': {}, skipping",
                            rule.pattern,
                            e
                        );
                        None
                    }
                }
            })
            .collect();
        Self { rules: compiled }
    }

    /// First rule matching the entry description, if any.
    pub fn matches(&self, entry_label: &str) -> Option<&CompiledLexiconRule> {
        self.rules.iter().find(|rule| rule.regex.is_match(entry_label))
    }

    /// Number of compiled rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the lexicon has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static DEFAULT_LEXICON: Lazy<HaoLexicon> =
    Lazy::new(|| HaoLexicon::from_rules(&EngineConfig::default().hao_lexicon));

/// The built-in lexicon, compiled once.
pub fn default_lexicon() -> &'static HaoLexicon {
    &DEFAULT_LEXICON
}
