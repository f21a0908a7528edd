//! rampway-report: Export of scored pathway tables.
//!
//! One exporter per [`ExportFormat`]; [`export_all`] writes
//! `enrichment_results.<ext>` for each requested format.

pub mod csv_export;
pub mod pdf;
pub mod text;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rampway_common::{AnalyteIdentifier, EnrichedPathway, ExportFormat, Result};
use tracing::info;

pub use csv_export::CsvExporter;
pub use pdf::PdfExporter;
pub use text::TextExporter;

pub const REPORT_TITLE: &str = "Enrichment Analysis Results";
pub const REPORT_STEM: &str = "enrichment_results";

/// What gets exported for one query.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub identifier: &'a AnalyteIdentifier,
    pub rows: &'a [EnrichedPathway],
    pub generated_at: DateTime<Utc>,
}

impl<'a> Report<'a> {
    pub fn new(identifier: &'a AnalyteIdentifier, rows: &'a [EnrichedPathway]) -> Self {
        Self { identifier, rows, generated_at: Utc::now() }
    }

    /// Header lines shared by the document formats.
    pub fn header_lines(&self) -> Vec<String> {
        vec![
            REPORT_TITLE.to_string(),
            format!("Analyte: {} ({})", self.identifier.canonical_id(), self.identifier.kind()),
            format!("Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ]
    }

    /// `"<pathway> (Score: <score>)"` per row.
    pub fn row_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| format!("{} (Score: {})", r.pathway.name, format_score(r.score)))
            .collect()
    }
}

/// Render scores so whole numbers keep a decimal point (`1.0`, `0.5`, `0.3333`).
pub fn format_score(score: f64) -> String {
    let s = score.to_string();
    if s.contains('.') || !score.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

pub trait ReportExporter {
    fn format(&self) -> ExportFormat;

    fn render(&self, report: &Report<'_>) -> Result<Vec<u8>>;

    fn file_name(&self) -> String {
        format!("{REPORT_STEM}.{}", self.format().extension())
    }
}

pub fn exporter_for(format: ExportFormat) -> Box<dyn ReportExporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Text => Box::new(TextExporter),
        ExportFormat::Pdf => Box::new(PdfExporter::default()),
    }
}

/// Write one file per distinct format into `dir` and return the paths written.
pub fn export_all(report: &Report<'_>, dir: &Path, formats: &[ExportFormat]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(formats.len());
    let mut done: Vec<ExportFormat> = Vec::new();
    for &format in formats {
        if done.contains(&format) {
            continue;
        }
        done.push(format);

        let exporter = exporter_for(format);
        let bytes = exporter.render(report)?;
        let path = dir.join(exporter.file_name());
        std::fs::write(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), rows = report.rows.len(), "Report written");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rampway_common::{AnalyteIdentifier, AnalyteKind, EnrichedPathway, IdentifierSource, PathwayRecord};

    pub fn glucose() -> AnalyteIdentifier {
        AnalyteIdentifier::new("glucose", AnalyteKind::Metabolite, "HMDB0000122", IdentifierSource::NameMapped).unwrap()
    }

    pub fn rows() -> Vec<EnrichedPathway> {
        vec![
            EnrichedPathway {
                pathway: PathwayRecord::new("Glycolysis", "kegg", vec!["HMDB0000122".into()]),
                score: 0.5,
            },
            EnrichedPathway {
                pathway: PathwayRecord::new("Insulin signaling, \"canonical\"", "wikipathways", vec![]),
                score: 1.0,
            },
        ]
    }
}
