//! Text export implementation.
//!
//! Prints a short terminal report: detected bundlers, custom element count,
//! and webpack duplication numbers. Sections with nothing to say are omitted.

use super::{format_size, ExportData, Exporter};
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let report = &data.report;

        writeln!(writer, "Project")?;
        writeln!(writer, "  Target: {}", data.target)?;
        writeln!(
            writer,
            "  Scripts: {} scanned, {} skipped",
            data.stats.scripts_parsed, data.stats.scripts_skipped
        )?;

        let bundlers: Vec<String> = report
            .bundlers_detected
            .iter()
            .map(|b| b.to_string())
            .collect();
        match bundlers.len() {
            0 => {}
            1 => writeln!(writer, "  Bundler: {}", bundlers[0])?,
            _ => writeln!(writer, "  Bundlers: {}", bundlers.join(", "))?,
        }

        if report.custom_element_count > 0 {
            writeln!(writer)?;
            writeln!(writer, "Custom Elements")?;
            writeln!(
                writer,
                "  Found {} custom element definition(s)",
                report.custom_element_count
            )?;
        }

        if let Some(webpack) = report.webpack() {
            writeln!(writer)?;
            writeln!(writer, "Webpack Analysis")?;
            writeln!(
                writer,
                "  Duplicate functions: {}",
                webpack.duplicate_function_count
            )?;
            if data.bytes_tracked {
                writeln!(
                    writer,
                    "  Duplicated bytes: {}",
                    format_size(webpack.duplicated_bytes)
                )?;
            } else {
                writeln!(writer, "  Duplicated bytes: not tracked")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ScanStats;
    use crate::export::{export_to_string, ExportFormat};
    use crate::report::{
        AnalysisReport, BundlerFindings, PartialReport, RolldownFindings, WebpackFindings,
    };

    fn data(partials: Vec<PartialReport>) -> ExportData {
        ExportData {
            target: "https://example.com".to_string(),
            report: AnalysisReport::from_partials(partials).unwrap(),
            stats: ScanStats {
                scripts_total: 4,
                scripts_parsed: 3,
                scripts_skipped: 1,
            },
            bytes_tracked: true,
        }
    }

    #[test]
    fn test_text_export_full() {
        let data = data(vec![
            PartialReport::detected(BundlerFindings::Webpack(WebpackFindings {
                duplicate_function_count: 4,
                duplicated_bytes: 2048,
            })),
            PartialReport::detected(BundlerFindings::Rolldown(RolldownFindings {})),
            PartialReport::custom_elements(2),
        ]);

        let output = export_to_string(ExportFormat::Text, &data).unwrap();

        assert!(output.contains("Target: https://example.com"));
        assert!(output.contains("Scripts: 3 scanned, 1 skipped"));
        assert!(output.contains("Bundlers: webpack, rolldown"));
        assert!(output.contains("Found 2 custom element definition(s)"));
        assert!(output.contains("Duplicate functions: 4"));
        assert!(output.contains("Duplicated bytes: 2.00 KB"));
    }

    #[test]
    fn test_text_export_omits_empty_sections() {
        let data = data(vec![
            PartialReport::detected(BundlerFindings::Rolldown(RolldownFindings {})),
            PartialReport::custom_elements(0),
        ]);

        let output = export_to_string(ExportFormat::Text, &data).unwrap();

        assert!(output.contains("Bundler: rolldown"));
        assert!(!output.contains("Custom Elements"));
        assert!(!output.contains("Webpack Analysis"));
    }

    #[test]
    fn test_text_export_untracked_bytes() {
        let data = data(vec![PartialReport::detected(BundlerFindings::Webpack(
            WebpackFindings {
                duplicate_function_count: 2,
                duplicated_bytes: 0,
            },
        ))])
        .with_bytes_tracked(false);

        let output = export_to_string(ExportFormat::Text, &data).unwrap();

        assert!(output.contains("Duplicate functions: 2"));
        assert!(output.contains("Duplicated bytes: not tracked"));
        assert!(!output.contains("Duplicated bytes: 0 B"));
    }
}
