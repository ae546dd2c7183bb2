//! Custom element registration counting.

use crate::pattern::{ParsedScript, Pattern};
use crate::report::PartialReport;
use crate::source::ScriptSource;

use super::{AnalysisResult, Analyzer};

/// `customElements.define(a, b)` and `window.customElements.define(a, b)`.
///
/// The two forms are separate patterns so a qualified call is never counted
/// twice.
const CUSTOM_ELEMENT_DEFINE_QUERY: &str = r#"
(call_expression
  function: (member_expression
    object: (identifier) @registry
    property: (property_identifier) @method)
  arguments: (arguments . (_) . (_) .)
  (#eq? @registry "customElements")
  (#eq? @method "define"))

(call_expression
  function: (member_expression
    object: (member_expression
      object: (identifier) @window
      property: (property_identifier) @registry)
    property: (property_identifier) @method)
  arguments: (arguments . (_) . (_) .)
  (#eq? @window "window")
  (#eq? @registry "customElements")
  (#eq? @method "define"))
"#;

/// Counts custom element registrations across all scripts.
///
/// Every call counts, including repeated names.
pub struct CustomElementAnalyzer {
    pattern: Pattern,
    count: u64,
}

impl CustomElementAnalyzer {
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            pattern: Pattern::new("custom-element-define", CUSTOM_ELEMENT_DEFINE_QUERY)?,
            count: 0,
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Analyzer for CustomElementAnalyzer {
    fn name(&self) -> &'static str {
        "custom-element"
    }

    fn observe(&mut self, parsed: &ParsedScript<'_>, script: &ScriptSource) -> AnalysisResult<()> {
        let found = self.pattern.find_all(parsed).len() as u64;
        if found > 0 {
            tracing::debug!("{}: {} in {}", self.pattern.name(), found, script.identifier);
        }
        self.count += found;
        Ok(())
    }

    fn summarize(&self) -> PartialReport {
        PartialReport::custom_elements(self.count)
    }
}
