//! Scan results.
//!
//! Every analyzer produces a [`PartialReport`] describing only what it owns.
//! [`AnalysisReport::merge`] folds those partials into the aggregate report,
//! refusing to let two analyzers claim the same bundler.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::analysis::{AnalysisError, AnalysisResult};

/// A bundler whose output can be recognised in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    Webpack,
    Rolldown,
}

impl std::str::FromStr for Bundler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webpack" => Ok(Bundler::Webpack),
            "rolldown" => Ok(Bundler::Rolldown),
            _ => Err(format!(
                "Unknown bundler: '{}'. Valid bundlers: webpack, rolldown",
                s
            )),
        }
    }
}

impl fmt::Display for Bundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bundler::Webpack => write!(f, "webpack"),
            Bundler::Rolldown => write!(f, "rolldown"),
        }
    }
}

/// Duplicate-code accounting for webpack chunk registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WebpackFindings {
    /// Module factories seen again after their first occurrence.
    pub duplicate_function_count: u64,
    /// Bytes spent on those repeats, charged at the size of the first copy.
    pub duplicated_bytes: u64,
}

/// Rolldown carries no extra metadata yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RolldownFindings {}

/// Bundler-specific findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BundlerFindings {
    Webpack(WebpackFindings),
    Rolldown(RolldownFindings),
}

impl BundlerFindings {
    /// The bundler these findings belong to.
    pub fn bundler(&self) -> Bundler {
        match self {
            BundlerFindings::Webpack(_) => Bundler::Webpack,
            BundlerFindings::Rolldown(_) => Bundler::Rolldown,
        }
    }
}

/// What a single analyzer contributes to the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialReport {
    pub bundlers: BTreeSet<Bundler>,
    pub findings: Vec<BundlerFindings>,
    pub custom_element_count: Option<u64>,
}

impl PartialReport {
    /// A contribution with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Flag `findings.bundler()` as detected and attach its findings.
    pub fn detected(findings: BundlerFindings) -> Self {
        Self {
            bundlers: BTreeSet::from([findings.bundler()]),
            findings: vec![findings],
            custom_element_count: None,
        }
    }

    /// A custom element count contribution.
    pub fn custom_elements(count: u64) -> Self {
        Self {
            custom_element_count: Some(count),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bundlers.is_empty() && self.findings.is_empty() && self.custom_element_count.is_none()
    }
}

/// The aggregate result of one scan.
///
/// Keys of `bundler_findings` are always a subset of `bundlers_detected`.
/// A bundler missing from `bundler_findings` was not detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub bundlers_detected: BTreeSet<Bundler>,
    pub bundler_findings: BTreeMap<Bundler, BundlerFindings>,
    pub custom_element_count: u64,
    #[serde(skip)]
    custom_element_count_set: bool,
}

impl AnalysisReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one analyzer's contribution into the report.
    ///
    /// Bundler tags are unioned. Findings are keyed by bundler and a second
    /// contribution for the same bundler is an error, as is a second custom
    /// element count. On error the report is left unchanged.
    pub fn merge(&mut self, partial: PartialReport) -> AnalysisResult<()> {
        let mut incoming = BTreeSet::new();
        for findings in &partial.findings {
            let bundler = findings.bundler();
            if self.bundler_findings.contains_key(&bundler) || !incoming.insert(bundler) {
                return Err(AnalysisError::FindingsCollision(bundler));
            }
        }
        if partial.custom_element_count.is_some() && self.custom_element_count_set {
            return Err(AnalysisError::CustomElementCountCollision);
        }

        self.bundlers_detected.extend(partial.bundlers);
        for findings in partial.findings {
            let bundler = findings.bundler();
            self.bundlers_detected.insert(bundler);
            self.bundler_findings.insert(bundler, findings);
        }
        if let Some(count) = partial.custom_element_count {
            self.custom_element_count = count;
            self.custom_element_count_set = true;
        }

        Ok(())
    }

    /// Merge a sequence of contributions in order.
    pub fn from_partials(partials: impl IntoIterator<Item = PartialReport>) -> AnalysisResult<Self> {
        let mut report = Self::new();
        for partial in partials {
            report.merge(partial)?;
        }
        Ok(report)
    }

    /// Webpack findings, if webpack was detected.
    pub fn webpack(&self) -> Option<&WebpackFindings> {
        match self.bundler_findings.get(&Bundler::Webpack) {
            Some(BundlerFindings::Webpack(findings)) => Some(findings),
            _ => None,
        }
    }

    pub fn is_detected(&self, bundler: Bundler) -> bool {
        self.bundlers_detected.contains(&bundler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webpack(count: u64, bytes: u64) -> BundlerFindings {
        BundlerFindings::Webpack(WebpackFindings {
            duplicate_function_count: count,
            duplicated_bytes: bytes,
        })
    }

    #[test]
    fn test_bundler_from_str_and_display() {
        assert_eq!("webpack".parse::<Bundler>().unwrap(), Bundler::Webpack);
        assert_eq!("Rolldown".parse::<Bundler>().unwrap(), Bundler::Rolldown);
        assert!("vite".parse::<Bundler>().is_err());
        assert_eq!(Bundler::Webpack.to_string(), "webpack");
    }

    #[test]
    fn test_merge_unions_bundlers() {
        let report = AnalysisReport::from_partials([
            PartialReport::detected(webpack(2, 40)),
            PartialReport::detected(BundlerFindings::Rolldown(RolldownFindings {})),
            PartialReport::custom_elements(3),
        ])
        .unwrap();

        assert_eq!(
            report.bundlers_detected,
            BTreeSet::from([Bundler::Webpack, Bundler::Rolldown])
        );
        assert_eq!(report.webpack().unwrap().duplicate_function_count, 2);
        assert_eq!(report.custom_element_count, 3);
    }

    #[test]
    fn test_findings_keys_imply_detection() {
        let partial = PartialReport {
            findings: vec![webpack(0, 0)],
            ..PartialReport::default()
        };
        let report = AnalysisReport::from_partials([partial]).unwrap();

        assert!(report.is_detected(Bundler::Webpack));
        assert!(report
            .bundler_findings
            .keys()
            .all(|b| report.bundlers_detected.contains(b)));
    }

    #[test]
    fn test_merge_rejects_findings_collision() {
        let mut report = AnalysisReport::new();
        report.merge(PartialReport::detected(webpack(1, 10))).unwrap();

        let result = report.merge(PartialReport::detected(webpack(5, 50)));

        assert!(matches!(
            result,
            Err(AnalysisError::FindingsCollision(Bundler::Webpack))
        ));
        assert_eq!(report.webpack().unwrap().duplicate_function_count, 1);
    }

    #[test]
    fn test_merge_rejects_collision_within_one_partial() {
        let partial = PartialReport {
            bundlers: BTreeSet::from([Bundler::Webpack]),
            findings: vec![webpack(1, 1), webpack(2, 2)],
            custom_element_count: None,
        };
        let mut report = AnalysisReport::new();

        assert!(report.merge(partial).is_err());
        assert_eq!(report, AnalysisReport::new());
    }

    #[test]
    fn test_merge_rejects_second_custom_element_count() {
        let mut report = AnalysisReport::new();
        report.merge(PartialReport::custom_elements(0)).unwrap();

        let result = report.merge(PartialReport::custom_elements(2));

        assert!(matches!(
            result,
            Err(AnalysisError::CustomElementCountCollision)
        ));
        assert_eq!(report.custom_element_count, 0);
    }

    #[test]
    fn test_empty_partials_leave_defaults() {
        let report =
            AnalysisReport::from_partials([PartialReport::empty(), PartialReport::empty()]).unwrap();

        assert!(report.bundlers_detected.is_empty());
        assert!(report.bundler_findings.is_empty());
        assert_eq!(report.custom_element_count, 0);
        assert!(PartialReport::empty().is_empty());
    }

    #[test]
    fn test_report_serializes_lowercase_bundlers() {
        let report = AnalysisReport::from_partials([PartialReport::detected(webpack(1, 22))]).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["bundlers_detected"][0], "webpack");
        assert_eq!(
            json["bundler_findings"]["webpack"]["duplicated_bytes"],
            22
        );
        assert!(json.get("custom_element_count_set").is_none());
    }
}
