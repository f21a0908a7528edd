//! PDF report built directly with lopdf.
//!
//! A4 pages, Helvetica, one text line per row. Long tables continue on
//! further pages; the header only appears on the first.
//!
//! The standard 14 fonts only cover WinAnsi, so text is re-encoded to that
//! code page before it reaches a `Tj` operand. Greek letters, common in
//! pathway names, are spelled out; anything else unmappable becomes `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use rampway_common::{ExportFormat, Result};
use tracing::debug;

use crate::{Report, ReportExporter};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 11;
const TITLE_SIZE: i64 = 16;
const LEADING: i64 = 15;

#[derive(Debug, Clone, Copy)]
pub struct PdfExporter {
    pub lines_per_page: usize,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self { lines_per_page: 45 }
    }
}

impl PdfExporter {
    /// Split header + rows into pages. Always at least one page.
    fn paginate(&self, report: &Report<'_>) -> Vec<Vec<String>> {
        let per_page = self.lines_per_page.max(1);
        let mut lines = report.header_lines();
        lines.push(String::new());
        lines.extend(report.row_lines());

        lines.chunks(per_page).map(|c| c.to_vec()).collect()
    }

    fn page_content(lines: &[String], first_page: bool) -> Content {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("TL", vec![Object::Integer(LEADING)]),
            Operation::new("Td", vec![Object::Integer(MARGIN), Object::Integer(PAGE_HEIGHT - MARGIN)]),
        ];
        for (i, line) in lines.iter().enumerate() {
            let size = if first_page && i == 0 { TITLE_SIZE } else { FONT_SIZE };
            ops.push(Operation::new("Tf", vec!["F1".into(), Object::Integer(size)]));
            ops.push(Operation::new("Tj", vec![Object::string_literal(to_win_ansi(line))]));
            ops.push(Operation::new("T*", vec![]));
        }
        ops.push(Operation::new("ET", vec![]));
        Content { operations: ops }
    }
}

/// Encode `text` for a WinAnsiEncoding (CP1252) simple font.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => out.push(c as u8),
            _ => match cp1252_special(c) {
                Some(b) => out.push(b),
                None => match greek_name(c) {
                    Some(name) => out.extend_from_slice(name.as_bytes()),
                    None => out.push(b'?'),
                },
            },
        }
    }
    out
}

/// The 0x80..=0x9F block, where CP1252 departs from Latin-1.
fn cp1252_special(c: char) -> Option<u8> {
    let b = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(b)
}

fn greek_name(c: char) -> Option<&'static str> {
    let name = match c {
        'α' | 'Α' => "alpha",
        'β' | 'Β' => "beta",
        'γ' | 'Γ' => "gamma",
        'δ' | 'Δ' => "delta",
        'ε' | 'Ε' => "epsilon",
        'ζ' | 'Ζ' => "zeta",
        'η' | 'Η' => "eta",
        'θ' | 'Θ' => "theta",
        'ι' | 'Ι' => "iota",
        'κ' | 'Κ' => "kappa",
        'λ' | 'Λ' => "lambda",
        'μ' | 'Μ' => "mu",
        'ν' | 'Ν' => "nu",
        'ξ' | 'Ξ' => "xi",
        'ο' | 'Ο' => "omicron",
        'π' | 'Π' => "pi",
        'ρ' | 'Ρ' => "rho",
        'σ' | 'ς' | 'Σ' => "sigma",
        'τ' | 'Τ' => "tau",
        'υ' | 'Υ' => "upsilon",
        'φ' | 'Φ' => "phi",
        'χ' | 'Χ' => "chi",
        'ψ' | 'Ψ' => "psi",
        'ω' | 'Ω' => "omega",
        _ => return None,
    };
    Some(name)
}

impl ReportExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, report: &Report<'_>) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let pages = self.paginate(report);
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for (i, lines) in pages.iter().enumerate() {
            let content = Self::page_content(lines, i == 0);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        debug!(pages = page_count, bytes = buf.len(), "Rendered PDF report");
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use rampway_common::{EnrichedPathway, PathwayRecord};

    #[test]
    fn test_single_page_report() {
        let id = fixtures::glucose();
        let rows = fixtures::rows();
        let bytes = PdfExporter::default().render(&Report::new(&id, &rows)).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("Enrichment Analysis Results"));
        assert!(raw.contains("Glycolysis"));
    }

    #[test]
    fn test_long_table_paginates() {
        let id = fixtures::glucose();
        let rows: Vec<EnrichedPathway> = (0..100)
            .map(|i| EnrichedPathway {
                pathway: PathwayRecord::new(&format!("Pathway {i}"), "kegg", vec![]),
                score: 1.0,
            })
            .collect();
        let exporter = PdfExporter { lines_per_page: 45 };
        let bytes = exporter.render(&Report::new(&id, &rows)).unwrap();

        // 3 header lines + blank + 100 rows = 104 lines
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(to_win_ansi("Glycolysis"), b"Glycolysis".to_vec());
        assert_eq!(to_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("a\u{2013}b"), vec![b'a', 0x96, b'b']);
        assert_eq!(to_win_ansi("TGF-β"), b"TGF-beta".to_vec());
        assert_eq!(to_win_ansi("漢"), b"?".to_vec());
    }

    #[test]
    fn test_non_ascii_pathway_name_reads_back() {
        let id = fixtures::glucose();
        let rows = vec![EnrichedPathway {
            pathway: PathwayRecord::new("Formation of the β-catenin:TCF complex", "reactome", vec![]),
            score: 1.0,
        }];
        let bytes = PdfExporter::default().render(&Report::new(&id, &rows)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let font_declares_encoding = doc.objects.values().any(|obj| {
            obj.as_dict()
                .ok()
                .and_then(|d| d.get(b"Encoding").ok())
                .and_then(|e| e.as_name().ok())
                .is_some_and(|name| name == b"WinAnsiEncoding")
        });
        assert!(font_declares_encoding);

        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Formation of the beta-catenin:TCF complex"), "{text}");
    }

    #[test]
    fn test_empty_table_still_has_a_page() {
        let id = fixtures::glucose();
        let bytes = PdfExporter::default().render(&Report::new(&id, &[])).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
