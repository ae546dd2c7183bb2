//! JSON export implementation.
//!
//! Exports scan results in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::report::{Bundler, BundlerFindings};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    scripts_total: usize,
    scripts_parsed: usize,
    scripts_skipped: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    target: &'a str,
    summary: JsonSummary,
    bundlers: Vec<Bundler>,
    bundler_findings: &'a BTreeMap<Bundler, BundlerFindings>,
    custom_element_count: u64,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            target: &data.target,
            summary: JsonSummary {
                scripts_total: data.stats.scripts_total,
                scripts_parsed: data.stats.scripts_parsed,
                scripts_skipped: data.stats.scripts_skipped,
            },
            bundlers: data.report.bundlers_detected.iter().copied().collect(),
            bundler_findings: &data.report.bundler_findings,
            custom_element_count: data.report.custom_element_count,
        };

        serde_json::to_writer_pretty(&mut *writer, &export)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(writer)?;

        Ok(())
    }
}
