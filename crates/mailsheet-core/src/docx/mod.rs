//! Word (`.docx`) export.
//!
//! The sections tree is first turned into a small [`model::Document`] and
//! then serialized and zipped. Keeping the model separate lets tests check
//! structure (merges, shading, order) without parsing XML.

pub mod model;
mod package;
mod xml;

use model::{Block, Cell, Document, Paragraph, ParagraphStyle, Row, Run, Table, VMerge};

use crate::document::{
    AccountSection, Footer, Header, IssuedDate, ManualLink, PortSection, SectionVisitor, Sections,
    ServerInfo, text,
};
use crate::error::ExportError;

/// Page margin on every side: half an inch.
pub const MARGIN_TWIPS: u32 = 720;

const LABEL_FILL: &str = "F9FAFB";
const HEAD_FILL: &str = "475569";
const HEAD_TEXT: &str = "FFFFFF";

/// Builds and packages Word documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDocExporter;

impl StructuredDocExporter {
    /// Builds the document model for `sections`.
    #[must_use]
    pub fn build(sections: &Sections, issued: IssuedDate) -> Document {
        let mut builder = DocBuilder {
            issued,
            blocks: Vec::new(),
        };
        sections.accept(&mut builder);
        Document {
            title: text::TITLE.to_string(),
            margin_twips: MARGIN_TWIPS,
            blocks: builder.blocks,
        }
    }

    /// Builds and packages the document, returning the `.docx` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::PackagingFailed`] if the package cannot be
    /// written.
    pub async fn export(sections: &Sections, issued: IssuedDate) -> Result<Vec<u8>, ExportError> {
        let document = Self::build(sections, issued);
        tokio::task::spawn_blocking(move || package::package(&document, issued))
            .await
            .map_err(|e| ExportError::PackagingFailed(e.to_string()))?
            .map_err(ExportError::PackagingFailed)
    }
}

struct DocBuilder {
    issued: IssuedDate,
    blocks: Vec<Block>,
}

impl DocBuilder {
    fn paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    fn table(&mut self, width_pct: u32, rows: Vec<Row>) {
        self.blocks.push(Block::Table(Table { width_pct, rows }));
    }
}

fn text_cell(run: Run) -> Cell {
    Cell::of(Paragraph::of(run))
}

impl SectionVisitor for DocBuilder {
    fn header(&mut self, header: &Header) {
        self.paragraph(
            Paragraph::of(Run::plain(header.title))
                .styled(ParagraphStyle::Heading1)
                .spaced(0, 200),
        );
        self.paragraph(
            Paragraph::of(Run::plain(format!(
                "{}: {}",
                text::ISSUED_LABEL,
                self.issued.display()
            )))
            .spaced(0, 200),
        );
        self.paragraph(Paragraph::of(Run::plain(header.greeting[0])).spaced(0, 100));
        self.paragraph(Paragraph::of(Run::plain(header.greeting[1])).spaced(0, 300));
    }

    fn server_info(&mut self, info: &ServerInfo) {
        self.paragraph(
            Paragraph::of(Run::plain(info.heading))
                .styled(ParagraphStyle::Heading2)
                .spaced(200, 200),
        );
        let rows = info
            .rows
            .iter()
            .map(|row| Row {
                cells: vec![
                    text_cell(Run::bold(row.label)).shaded(LABEL_FILL),
                    text_cell(Run::plain(row.value.clone())),
                ],
            })
            .collect();
        self.table(75, rows);
        self.paragraph(Paragraph::empty().spaced(0, 200));
    }

    fn ports(&mut self, ports: &PortSection) {
        let mut rows = vec![Row {
            cells: ports
                .columns
                .iter()
                .map(|column| text_cell(Run::bold(*column).colored(HEAD_TEXT)).shaded(HEAD_FILL))
                .collect(),
        }];

        for row in &ports.rows {
            let group = match row.group {
                Some(group) if group.rowspan > 1 => text_cell(Run::bold(group.label))
                    .shaded(LABEL_FILL)
                    .merge(VMerge::Restart),
                Some(group) => text_cell(Run::bold(group.label)).shaded(LABEL_FILL),
                None => Cell::merged_below().shaded(LABEL_FILL),
            };
            rows.push(Row {
                cells: vec![
                    group,
                    text_cell(Run {
                        text: format!("{} {}", row.marker(), row.protocol),
                        bold: row.selected,
                        color: None,
                    }),
                    text_cell(Run::plain(row.port)),
                    text_cell(Run::plain(row.encryption)),
                ],
            });
        }
        self.table(100, rows);
        self.paragraph(Paragraph::of(Run::plain(ports.legend)).spaced(100, 0));
    }

    fn accounts(&mut self, accounts: &AccountSection) {
        self.paragraph(
            Paragraph::of(Run::plain(accounts.heading))
                .styled(ParagraphStyle::Heading2)
                .spaced(400, 200),
        );
        let mut rows = vec![Row {
            cells: accounts
                .columns
                .iter()
                .map(|column| text_cell(Run::bold(*column)).shaded(LABEL_FILL))
                .collect(),
        }];
        rows.extend(accounts.rows.iter().map(|row| Row {
            cells: vec![
                text_cell(Run::plain(row.email.clone())),
                text_cell(Run::plain(row.password.clone())),
            ],
        }));
        self.table(100, rows);
    }

    fn manual_link(&mut self, link: &ManualLink) {
        self.paragraph(
            Paragraph::of(Run::plain(format!("{}: {}", link.label, link.url))).spaced(300, 200),
        );
    }

    fn footer(&mut self, footer: &Footer) {
        let last = footer.notes.len().saturating_sub(1);
        for (i, note) in footer.notes.iter().enumerate() {
            let before = if i == 0 { 300 } else { 0 };
            let after = if i == last { 0 } else { 100 };
            self.paragraph(Paragraph::of(Run::plain(*note)).spaced(before, after));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;
    use crate::catalog::PortCatalog;
    use crate::document::build;
    use crate::model::{Account, Config};
    use chrono::NaiveDate;

    fn issued() -> IssuedDate {
        IssuedDate::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn sections(config: &Config, accounts: &[Account]) -> Sections {
        build(config, accounts, &PortCatalog::standard())
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn port_table_merges_direction_runs() {
        let doc = StructuredDocExporter::build(&sections(&Config::default(), &[]), issued());
        let ports = doc.tables().nth(1).unwrap();
        assert_eq!(ports.width_pct, 100);
        assert_eq!(ports.rows.len(), 7);

        let merges: Vec<_> = ports.rows[1..].iter().map(|r| r.cells[0].v_merge).collect();
        assert_eq!(
            merges,
            vec![
                Some(VMerge::Restart),
                Some(VMerge::Continue),
                Some(VMerge::Continue),
                Some(VMerge::Continue),
                Some(VMerge::Restart),
                Some(VMerge::Continue),
            ]
        );
        assert!(ports.rows[0].cells.iter().all(|c| c.shading == Some(HEAD_FILL)));
    }

    #[test]
    fn protocol_cells_carry_selection_marker() {
        let doc = StructuredDocExporter::build(&sections(&Config::default(), &[]), issued());
        let ports = doc.tables().nth(1).unwrap();
        let protocols: Vec<_> = ports.rows[1..]
            .iter()
            .map(|r| r.cells[1].paragraphs[0].text())
            .collect();
        assert_eq!(protocols[0], "○ POP3");
        assert_eq!(protocols[1], "● POP over SSL");
        assert_eq!(protocols[5], "● SMTP over SSL");
    }

    #[test]
    fn server_table_is_three_quarters_wide() {
        let config = Config {
            receive_server: "mail.example.jp".to_string(),
            ..Config::default()
        };
        let doc = StructuredDocExporter::build(&sections(&config, &[]), issued());
        let server = doc.tables().next().unwrap();
        assert_eq!(server.width_pct, 75);
        assert_eq!(server.rows[0].cells[1].paragraphs[0].text(), "mail.example.jp");
        assert_eq!(server.rows[0].cells[0].shading, Some(LABEL_FILL));
    }

    #[test]
    fn manual_link_precedes_footer() {
        let doc = StructuredDocExporter::build(&sections(&Config::default(), &[]), issued());
        let texts: Vec<_> = doc.paragraphs().map(Paragraph::text).collect();
        let manual = texts
            .iter()
            .position(|t| t == "設定マニュアル: https://example.jp")
            .unwrap();
        let first_note = texts.iter().position(|t| t == text::FOOTER[0]).unwrap();
        assert_eq!(manual + 1, first_note);
        assert_eq!(texts[1], "発行日: 2026/10/16");
    }

    #[test]
    fn empty_account_fields_become_placeholders() {
        let doc = StructuredDocExporter::build(
            &sections(&Config::default(), &[Account::new("", "pw")]),
            issued(),
        );
        let accounts = doc.tables().nth(2).unwrap();
        assert_eq!(accounts.rows[1].cells[0].paragraphs[0].text(), "-");
        assert_eq!(accounts.rows[1].cells[1].paragraphs[0].text(), "pw");
    }

    #[tokio::test]
    async fn package_is_a_readable_docx() {
        let bytes = StructuredDocExporter::export(
            &sections(&Config::default(), &[Account::new("info@example.jp", "")]),
            issued(),
        )
        .await
        .unwrap();

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("info@example.jp"));
        assert!(document.contains("<w:vMerge w:val=\"restart\"/>"));
        assert!(document.contains("w:left=\"720\""));
        assert!(read_part(&bytes, "[Content_Types].xml").contains("/word/document.xml"));
        assert!(read_part(&bytes, "_rels/.rels").contains("word/document.xml"));
        assert!(read_part(&bytes, "word/styles.xml").contains("Heading1"));
        assert!(read_part(&bytes, "docProps/core.xml").contains("2026-10-16"));
    }

    #[tokio::test]
    async fn identical_inputs_package_identically() {
        let input = sections(&Config::default(), &[Account::default()]);
        let first = StructuredDocExporter::export(&input, issued()).await.unwrap();
        let second = StructuredDocExporter::export(&input, issued()).await.unwrap();
        assert_eq!(first, second);
    }
}
