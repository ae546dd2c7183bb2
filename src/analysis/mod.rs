//! Script analysis for ScriptScope.
//!
//! This module runs a set of independent analyzers over every parsed script
//! and merges what they find into a single [`AnalysisReport`](crate::report::AnalysisReport).
//!
//! # Features
//!
//! - Detect webpack chunk registrations and count duplicated module factories
//! - Detect the rolldown runtime helper by file name
//! - Count `customElements.define` registrations
//! - Skip unparsable scripts without aborting the scan
//!
//! # Example
//!
//! ```ignore
//! use scriptscope::analysis::Scanner;
//! use scriptscope::config::ScanConfig;
//! use scriptscope::source::ScriptSource;
//!
//! let scripts = vec![ScriptSource::new("app.js", "customElements.define('x-a', A);")];
//! let mut scanner = Scanner::new(ScanConfig::default());
//! let outcome = scanner.run_scan(&scripts)?;
//!
//! println!("{} custom elements", outcome.report.custom_element_count);
//! ```

mod analyzer;
pub mod custom_element;
pub mod rolldown;
pub mod scanner;
pub mod webpack;

// Re-export main types for convenience
pub use analyzer::{default_analyzers, AnalysisError, AnalysisResult, Analyzer};
pub use custom_element::CustomElementAnalyzer;
pub use rolldown::RolldownAnalyzer;
pub use scanner::{scan, ScanOutcome, ScanStats, Scanner};
pub use webpack::{FingerprintStore, WebpackAnalyzer};
