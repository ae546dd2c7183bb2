//! Rolldown detection by runtime file name.
//!
//! Rolldown emits its runtime helpers as a separate module named like
//! `rolldown-runtime.B3x9kQ.mjs`. Seeing that file among a page's scripts is
//! enough; the script body is never inspected.

use regex::Regex;

use crate::config::ScanConfig;
use crate::pattern::ParsedScript;
use crate::report::{BundlerFindings, PartialReport, RolldownFindings};
use crate::source::ScriptSource;

use super::{AnalysisResult, Analyzer};

pub struct RolldownAnalyzer {
    runtime_pattern: Regex,
    detected: bool,
}

impl RolldownAnalyzer {
    /// Create an analyzer. Fails if the configured runtime pattern is not a valid regex.
    pub fn new(config: &ScanConfig) -> AnalysisResult<Self> {
        Ok(Self {
            runtime_pattern: Regex::new(&config.rolldown_runtime_pattern)?,
            detected: false,
        })
    }

    /// Whether `identifier` names a rolldown runtime module.
    pub fn is_runtime(&self, identifier: &str) -> bool {
        self.runtime_pattern.is_match(identifier)
    }
}

impl Analyzer for RolldownAnalyzer {
    fn name(&self) -> &'static str {
        "rolldown"
    }

    fn observe(&mut self, _parsed: &ParsedScript<'_>, script: &ScriptSource) -> AnalysisResult<()> {
        if self.is_runtime(&script.identifier) {
            tracing::debug!("rolldown runtime found: {}", script.identifier);
            self.detected = true;
        }
        Ok(())
    }

    fn summarize(&self) -> PartialReport {
        if !self.detected {
            return PartialReport::empty();
        }
        PartialReport::detected(BundlerFindings::Rolldown(RolldownFindings {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse_script;
    use crate::report::Bundler;
    use tree_sitter::Parser;

    fn analyzer() -> RolldownAnalyzer {
        RolldownAnalyzer::new(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_runtime_file_names() {
        let analyzer = analyzer();
        assert!(analyzer.is_runtime("https://example.com/assets/rolldown-runtime.B3x9kQ.mjs"));
        assert!(analyzer.is_runtime("dist/rolldown-runtime.abc123.mjs"));
        assert!(!analyzer.is_runtime("dist/rolldown-runtime.mjs"));
        assert!(!analyzer.is_runtime("dist/rolldown-runtime.abc-123.mjs"));
        assert!(!analyzer.is_runtime("dist/rolldown-runtime.abc123.js"));
        assert!(!analyzer.is_runtime("dist/rolldown-runtime.abc123.mjs.map"));
    }

    #[test]
    fn test_detection_from_identifier_only() {
        let mut analyzer = analyzer();
        let mut parser = Parser::new();
        let scripts = [
            ScriptSource::new("app.js", "console.log('hi');"),
            ScriptSource::new("assets/rolldown-runtime.Cq2x.mjs", ""),
        ];

        for script in &scripts {
            let parsed = parse_script(&mut parser, script).unwrap();
            analyzer.observe(&parsed, script).unwrap();
        }

        let summary = analyzer.summarize();
        assert!(summary.bundlers.contains(&Bundler::Rolldown));
        assert_eq!(
            summary.findings,
            vec![BundlerFindings::Rolldown(RolldownFindings {})]
        );
    }

    #[test]
    fn test_no_runtime_contributes_nothing() {
        assert!(analyzer().summarize().is_empty());
    }
}
