//! Scan orchestration.
//!
//! Each script is parsed once and the tree is handed to every analyzer in
//! registration order. A script that fails to parse is skipped and the scan
//! moves on; that is the only recovery. After the last script, each
//! analyzer's summary is merged into the report.

use serde::Serialize;
use tree_sitter::Parser;

use crate::config::ScanConfig;
use crate::pattern::parse_script;
use crate::report::AnalysisReport;
use crate::source::ScriptSource;

use super::{default_analyzers, AnalysisError, AnalysisResult, Analyzer};

/// Script counts for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub scripts_total: usize,
    pub scripts_parsed: usize,
    pub scripts_skipped: usize,
}

/// Report plus bookkeeping from one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub report: AnalysisReport,
    pub stats: ScanStats,
}

/// Drives scans over ordered script lists.
///
/// The scanner only keeps configuration and a reusable parser between scans;
/// every scan gets freshly constructed analyzers.
pub struct Scanner {
    config: ScanConfig,
    parser: Parser,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            parser: Parser::new(),
        }
    }

    /// Scan `scripts` with the built-in analyzers.
    pub fn run_scan(&mut self, scripts: &[ScriptSource]) -> AnalysisResult<ScanOutcome> {
        let analyzers = default_analyzers(&self.config)?;
        self.run_with(scripts, analyzers)
    }

    /// Scan `scripts` with a caller-supplied analyzer set.
    ///
    /// Analyzers observe each parsed script in the order given here. An error
    /// from an analyzer aborts the scan; a parse failure only skips the script.
    pub fn run_with(
        &mut self,
        scripts: &[ScriptSource],
        mut analyzers: Vec<Box<dyn Analyzer>>,
    ) -> AnalysisResult<ScanOutcome> {
        let mut stats = ScanStats {
            scripts_total: scripts.len(),
            ..ScanStats::default()
        };

        for script in scripts {
            let parsed = match parse_script(&mut self.parser, script) {
                Ok(parsed) => parsed,
                Err(AnalysisError::Parse { identifier }) => {
                    tracing::warn!("Skipping unparsable script: {}", identifier);
                    stats.scripts_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            for analyzer in analyzers.iter_mut() {
                tracing::trace!("{} observing {}", analyzer.name(), script.identifier);
                analyzer.observe(&parsed, script)?;
            }
            stats.scripts_parsed += 1;
        }

        let report = AnalysisReport::from_partials(analyzers.iter().map(|a| a.summarize()))?;

        tracing::info!(
            "Scanned {} script(s), {} skipped, bundlers: {:?}",
            stats.scripts_parsed,
            stats.scripts_skipped,
            report.bundlers_detected
        );

        Ok(ScanOutcome { report, stats })
    }
}

/// Scan `scripts` with a new [`Scanner`].
pub fn scan(scripts: &[ScriptSource], config: ScanConfig) -> AnalysisResult<ScanOutcome> {
    Scanner::new(config).run_scan(scripts)
}
