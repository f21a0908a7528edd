//! Plain-text report.

use rampway_common::{ExportFormat, Result};

use crate::{Report, ReportExporter};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl ReportExporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn render(&self, report: &Report<'_>) -> Result<Vec<u8>> {
        let mut out = report.header_lines().join("\n");
        out.push_str("\n\n");
        for line in report.row_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}
