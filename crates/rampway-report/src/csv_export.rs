//! CSV export: `pathway,source,score`, one row per scored pathway.

use rampway_common::{ExportFormat, RampwayError, Result};

use crate::{format_score, Report, ReportExporter};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl ReportExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, report: &Report<'_>) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["pathway", "source", "score"])?;
        for row in report.rows {
            wtr.write_record([
                row.pathway.name.as_str(),
                row.pathway.source_database.as_str(),
                format_score(row.score).as_str(),
            ])?;
        }
        wtr.into_inner().map_err(|e| RampwayError::Export(e.to_string()))
    }
}
