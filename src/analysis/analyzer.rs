//! The analyzer contract and the errors shared by the analysis pipeline.

use thiserror::Error;

use crate::config::ScanConfig;
use crate::pattern::ParsedScript;
use crate::report::{Bundler, PartialReport};
use crate::source::ScriptSource;

use super::{CustomElementAnalyzer, RolldownAnalyzer, WebpackAnalyzer};

/// Errors that can occur while loading, parsing or analyzing scripts.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse script: {identifier}")]
    Parse { identifier: String },

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,

    #[error("Invalid pattern '{name}': {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: tree_sitter::QueryError,
    },

    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{analyzer}: match in {identifier} has no '{capture}' capture")]
    MissingCapture {
        analyzer: &'static str,
        capture: &'static str,
        identifier: String,
    },

    #[error("{analyzer}: node in {identifier} has no '{field}' field")]
    MissingField {
        analyzer: &'static str,
        field: &'static str,
        identifier: String,
    },

    #[error("Findings for {0} were contributed by more than one analyzer")]
    FindingsCollision(Bundler),

    #[error("Custom element count was contributed by more than one analyzer")]
    CustomElementCountCollision,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A unit of per-script inspection with its own running state.
///
/// One instance lives for exactly one scan. [`observe`](Analyzer::observe) is
/// called once per successfully parsed script, in input order; it may never be
/// called at all. Not finding anything is not an error: errors from `observe`
/// mean the analyzer hit a tree shape its own patterns promised could not occur.
pub trait Analyzer: Send {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Inspect one parsed script and update internal state.
    fn observe(&mut self, parsed: &ParsedScript<'_>, script: &ScriptSource) -> AnalysisResult<()>;

    /// Report what has been observed so far. Does not change state.
    fn summarize(&self) -> PartialReport;
}

/// Build a fresh set of the built-in analyzers, in registration order.
pub fn default_analyzers(config: &ScanConfig) -> AnalysisResult<Vec<Box<dyn Analyzer>>> {
    config.validate()?;

    Ok(vec![
        Box::new(WebpackAnalyzer::new(config)?),
        Box::new(RolldownAnalyzer::new(config)?),
        Box::new(CustomElementAnalyzer::new()?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyzers_order() {
        let analyzers = default_analyzers(&ScanConfig::default()).unwrap();
        let names: Vec<_> = analyzers.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["webpack", "rolldown", "custom-element"]);
    }

    #[test]
    fn test_fresh_analyzers_summarize_to_defaults() {
        let analyzers = default_analyzers(&ScanConfig::default()).unwrap();
        let partials: Vec<_> = analyzers.iter().map(|a| a.summarize()).collect();

        assert!(partials[0].is_empty());
        assert!(partials[1].is_empty());
        assert_eq!(partials[2], PartialReport::custom_elements(0));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = ScanConfig {
            rolldown_runtime_pattern: "rolldown-runtime(".to_string(),
            ..ScanConfig::default()
        };
        assert!(matches!(
            default_analyzers(&config),
            Err(AnalysisError::InvalidRegex(_))
        ));
    }
}
