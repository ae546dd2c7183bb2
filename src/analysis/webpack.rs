//! Webpack chunk registration analysis.
//!
//! Webpack's split chunks register themselves by pushing onto a shared global
//! array:
//!
//! ```text
//! (self.webpackChunk_app = self.webpackChunk_app || []).push([[179], {
//!     1234: function (e, t, n) { ... },
//!     5678: (e) => { ... },
//! }]);
//! ```
//!
//! The second element of the pushed tuple maps module ids to module factories.
//! When the same factory text shows up more than once across the page's
//! chunks, the bundle is shipping duplicated code. Factories are fingerprinted
//! by the SHA-256 of their exact source text, so the comparison is textual.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::config::ScanConfig;
use crate::pattern::{ParsedScript, Pattern};
use crate::report::{BundlerFindings, PartialReport, WebpackFindings};
use crate::source::ScriptSource;

use super::{AnalysisError, AnalysisResult, Analyzer};

const ANALYZER_NAME: &str = "webpack";

/// Globals webpack assigns its chunk array on in browser builds.
const CHUNK_GLOBAL_ALIASES: [&str; 2] = ["globalThis", "self"];

/// Build the chunk registration query for globals starting with `prefix`.
fn chunk_registration_query(prefix: &str) -> String {
    let escaped = regex::escape(prefix)
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    let aliases = CHUNK_GLOBAL_ALIASES
        .iter()
        .map(|alias| format!("\"{}\"", alias))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"
(call_expression
  function: (member_expression
    object: (parenthesized_expression
      (assignment_expression
        left: (member_expression
          object: (identifier) @global
          property: (property_identifier) @name)
        right: (binary_expression
          left: (member_expression
            object: (identifier) @fallback_global
            property: (property_identifier) @fallback_name)
          operator: "||"
          right: (array))))
    property: (property_identifier) @method)
  arguments: (arguments
    .
    (array
      .
      (_) @keys
      .
      (_) @modules
      .)
    .)
  (#eq? @method "push")
  (#any-of? @global {aliases})
  (#eq? @fallback_global @global)
  (#eq? @fallback_name @name)
  (#match? @name "^{escaped}"))
"#
    )
}

/// Scan-wide record of module factory fingerprints.
#[derive(Debug, Clone, Default)]
pub struct FingerprintStore {
    /// Fingerprint to byte length of the first copy seen.
    seen: HashMap<String, u64>,
    duplicate_count: u64,
    duplicated_bytes: u64,
    track_bytes: bool,
}

impl FingerprintStore {
    pub fn new(track_bytes: bool) -> Self {
        Self {
            track_bytes,
            ..Self::default()
        }
    }

    /// SHA-256 of `text`, hex encoded.
    pub fn fingerprint(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Record one factory body. Returns `true` if it had been seen before.
    ///
    /// Repeats are charged the byte length of the first copy.
    pub fn record(&mut self, text: &str) -> bool {
        let hash = Self::fingerprint(text);

        if let Some(&first_len) = self.seen.get(&hash) {
            self.duplicate_count += 1;
            if self.track_bytes {
                self.duplicated_bytes += first_len;
            }
            true
        } else {
            self.seen.insert(hash, text.len() as u64);
            false
        }
    }

    /// Number of distinct fingerprints recorded.
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    pub fn duplicate_count(&self) -> u64 {
        self.duplicate_count
    }

    pub fn duplicated_bytes(&self) -> u64 {
        self.duplicated_bytes
    }
}

/// Detects webpack chunk registrations and accounts for duplicated factories.
pub struct WebpackAnalyzer {
    pattern: Pattern,
    fingerprints: FingerprintStore,
    registrations: u64,
}

impl WebpackAnalyzer {
    /// Create an analyzer. Fails if the chunk registration pattern does not compile.
    pub fn new(config: &ScanConfig) -> AnalysisResult<Self> {
        let query = chunk_registration_query(&config.webpack_chunk_prefix);
        Ok(Self {
            pattern: Pattern::new("webpack-chunk-registration", &query)?,
            fingerprints: FingerprintStore::new(config.track_duplicate_bytes),
            registrations: 0,
        })
    }

    /// Number of chunk registrations matched so far.
    pub fn registrations(&self) -> u64 {
        self.registrations
    }

    pub fn fingerprints(&self) -> &FingerprintStore {
        &self.fingerprints
    }
}

impl Analyzer for WebpackAnalyzer {
    fn name(&self) -> &'static str {
        ANALYZER_NAME
    }

    fn observe(&mut self, parsed: &ParsedScript<'_>, script: &ScriptSource) -> AnalysisResult<()> {
        for registration in self.pattern.find_all(parsed) {
            self.registrations += 1;

            let modules = registration
                .capture("modules")
                .ok_or_else(|| AnalysisError::MissingCapture {
                    analyzer: ANALYZER_NAME,
                    capture: "modules",
                    identifier: script.identifier.clone(),
                })?;

            let mut cursor = modules.walk();
            for entry in modules.named_children(&mut cursor) {
                if entry.kind() != "pair" {
                    continue;
                }

                let factory = entry
                    .child_by_field_name("value")
                    .ok_or_else(|| AnalysisError::MissingField {
                        analyzer: ANALYZER_NAME,
                        field: "value",
                        identifier: script.identifier.clone(),
                    })?;

                self.fingerprints.record(parsed.text(factory));
            }
        }

        tracing::debug!(
            "{}: {} registration(s), {} duplicate(s) after {}",
            ANALYZER_NAME,
            self.registrations,
            self.fingerprints.duplicate_count(),
            script.identifier
        );
        Ok(())
    }

    fn summarize(&self) -> PartialReport {
        if self.registrations == 0 {
            return PartialReport::empty();
        }

        PartialReport::detected(BundlerFindings::Webpack(WebpackFindings {
            duplicate_function_count: self.fingerprints.duplicate_count(),
            duplicated_bytes: self.fingerprints.duplicated_bytes(),
        }))
    }
}
