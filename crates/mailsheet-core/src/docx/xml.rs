//! Serialization of the object model into package parts.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::model::{Block, Cell, Document, Paragraph, Run, Table, VMerge};
use crate::document::IssuedDate;

/// A4 page size in twips.
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;
const BORDER_COLOR: &str = "D1D5DB";
const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"</Types>"#,
);

pub const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#,
);

pub const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#,
);

pub const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
    r#"<w:rFonts w:ascii="Arial" w:eastAsia="Meiryo" w:hAnsi="Arial" w:cs="Arial"/>"#,
    r#"<w:sz w:val="21"/><w:szCs w:val="21"/><w:lang w:val="en-US" w:eastAsia="ja-JP"/>"#,
    r#"</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
    r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="1E3A8A"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
    r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="1E3A8A"/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style>"#,
    r#"</w:styles>"#,
);

type PartWriter = Writer<Cursor<Vec<u8>>>;

fn emit(writer: &mut PartWriter, event: Event<'_>) -> Result<(), String> {
    writer.write_event(event).map_err(|e| e.to_string())
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &attribute in attributes {
        start.push_attribute(attribute);
    }
    start
}

fn open(writer: &mut PartWriter, name: &str, attributes: &[(&str, &str)]) -> Result<(), String> {
    emit(writer, Event::Start(element(name, attributes)))
}

fn close(writer: &mut PartWriter, name: &str) -> Result<(), String> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn empty(writer: &mut PartWriter, name: &str, attributes: &[(&str, &str)]) -> Result<(), String> {
    emit(writer, Event::Empty(element(name, attributes)))
}

fn text_element(
    writer: &mut PartWriter,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<(), String> {
    open(writer, name, attributes)?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    close(writer, name)
}

fn start_part(capacity: usize) -> Result<PartWriter, String> {
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(capacity)));
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;
    Ok(writer)
}

fn finish_part(writer: PartWriter) -> Result<String, String> {
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| e.to_string())
}

/// `docProps/core.xml` stamped with the issued date.
pub fn core_properties(title: &str, issued: IssuedDate) -> Result<String, String> {
    let stamp = format!("{}T00:00:00Z", issued.iso());
    let mut w = start_part(1024)?;
    open(
        &mut w,
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    text_element(&mut w, "dc:title", &[], title)?;
    text_element(&mut w, "dc:creator", &[], "MailSheet")?;
    for name in ["dcterms:created", "dcterms:modified"] {
        text_element(&mut w, name, &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    }
    close(&mut w, "cp:coreProperties")?;
    finish_part(w)
}

/// `word/document.xml`.
pub fn document(doc: &Document) -> Result<String, String> {
    let mut w = start_part(16 * 1024)?;
    open(&mut w, "w:document", &[("xmlns:w", NS_MAIN)])?;
    open(&mut w, "w:body", &[])?;
    let text_width = PAGE_WIDTH - 2 * doc.margin_twips;
    for block in &doc.blocks {
        match block {
            Block::Paragraph(paragraph) => write_paragraph(&mut w, paragraph)?,
            Block::Table(table) => write_table(&mut w, table, text_width)?,
        }
    }

    let (page_w, page_h) = (PAGE_WIDTH.to_string(), PAGE_HEIGHT.to_string());
    let margin = doc.margin_twips.to_string();
    let m = margin.as_str();
    open(&mut w, "w:sectPr", &[])?;
    empty(&mut w, "w:pgSz", &[("w:w", page_w.as_str()), ("w:h", page_h.as_str())])?;
    empty(
        &mut w,
        "w:pgMar",
        &[
            ("w:top", m),
            ("w:right", m),
            ("w:bottom", m),
            ("w:left", m),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    close(&mut w, "w:sectPr")?;
    close(&mut w, "w:body")?;
    close(&mut w, "w:document")?;
    finish_part(w)
}

fn write_paragraph(w: &mut PartWriter, paragraph: &Paragraph) -> Result<(), String> {
    open(w, "w:p", &[])?;
    open(w, "w:pPr", &[])?;
    empty(w, "w:pStyle", &[("w:val", paragraph.style.id())])?;
    let before = paragraph.spacing_before.to_string();
    let after = paragraph.spacing_after.to_string();
    empty(
        w,
        "w:spacing",
        &[("w:before", before.as_str()), ("w:after", after.as_str())],
    )?;
    close(w, "w:pPr")?;
    for run in &paragraph.runs {
        write_run(w, run)?;
    }
    close(w, "w:p")
}

fn write_run(w: &mut PartWriter, run: &Run) -> Result<(), String> {
    open(w, "w:r", &[])?;
    if run.bold || run.color.is_some() {
        open(w, "w:rPr", &[])?;
        if run.bold {
            empty(w, "w:b", &[])?;
            empty(w, "w:bCs", &[])?;
        }
        if let Some(color) = run.color {
            empty(w, "w:color", &[("w:val", color)])?;
        }
        close(w, "w:rPr")?;
    }
    text_element(w, "w:t", &[("xml:space", "preserve")], &run.text)?;
    close(w, "w:r")
}

fn write_table(w: &mut PartWriter, table: &Table, text_width: u32) -> Result<(), String> {
    open(w, "w:tbl", &[])?;
    open(w, "w:tblPr", &[])?;
    // Word measures percentage widths in fiftieths of a percent.
    let table_width = (table.width_pct * 50).to_string();
    empty(w, "w:tblW", &[("w:w", table_width.as_str()), ("w:type", "pct")])?;
    open(w, "w:tblBorders", &[])?;
    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        empty(
            w,
            edge,
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", BORDER_COLOR),
            ],
        )?;
    }
    close(w, "w:tblBorders")?;
    empty(w, "w:tblLayout", &[("w:type", "autofit")])?;
    close(w, "w:tblPr")?;

    let columns = u32::try_from(table.columns()).unwrap_or(1).max(1);
    let column_width = text_width * table.width_pct / 100 / columns;
    let width = column_width.to_string();
    open(w, "w:tblGrid", &[])?;
    for _ in 0..columns {
        empty(w, "w:gridCol", &[("w:w", width.as_str())])?;
    }
    close(w, "w:tblGrid")?;

    for row in &table.rows {
        open(w, "w:tr", &[])?;
        for cell in &row.cells {
            write_cell(w, cell, &width)?;
        }
        close(w, "w:tr")?;
    }
    close(w, "w:tbl")
}

fn write_cell(w: &mut PartWriter, cell: &Cell, width: &str) -> Result<(), String> {
    open(w, "w:tc", &[])?;
    open(w, "w:tcPr", &[])?;
    empty(w, "w:tcW", &[("w:w", width), ("w:type", "dxa")])?;
    match cell.v_merge {
        Some(VMerge::Restart) => empty(w, "w:vMerge", &[("w:val", "restart")])?,
        Some(VMerge::Continue) => empty(w, "w:vMerge", &[])?,
        None => {}
    }
    if let Some(fill) = cell.shading {
        empty(
            w,
            "w:shd",
            &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)],
        )?;
    }
    close(w, "w:tcPr")?;
    if cell.paragraphs.is_empty() {
        write_paragraph(w, &Paragraph::empty())?;
    }
    for paragraph in &cell.paragraphs {
        write_paragraph(w, paragraph)?;
    }
    close(w, "w:tc")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::docx::model::{ParagraphStyle, Row};
    use chrono::NaiveDate;
    use quick_xml::Reader;

    fn doc(blocks: Vec<Block>) -> Document {
        Document {
            title: "t".to_string(),
            margin_twips: 720,
            blocks,
        }
    }

    #[test]
    fn paragraph_text_is_escaped_and_preserved() {
        let xml = document(&doc(vec![Block::Paragraph(
            Paragraph::of(Run::plain(" a < b & c ")).styled(ParagraphStyle::Heading2),
        )]))
        .unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
        assert!(xml.contains("<w:t xml:space=\"preserve\"> a &lt; b &amp; c </w:t>"));
    }

    #[test]
    fn markup_in_text_reads_back_unchanged() {
        let text = r#"<script>"x" & 'y'</script>"#;
        let xml = document(&doc(vec![Block::Paragraph(Paragraph::of(Run::plain(text)))])).unwrap();

        let mut reader = Reader::from_str(&xml);
        let mut texts = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Eof => break,
                Event::Text(t) => texts.push(t.unescape().unwrap().into_owned()),
                _ => {}
            }
        }
        assert_eq!(texts, vec![text.to_string()]);
    }

    #[test]
    fn margins_and_page_size() {
        let xml = document(&doc(Vec::new())).unwrap();
        assert!(xml.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>"));
        assert!(xml.contains("w:top=\"720\" w:right=\"720\" w:bottom=\"720\" w:left=\"720\""));
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
    }

    #[test]
    fn merged_cells_and_shading() {
        let table = Table {
            width_pct: 75,
            rows: vec![
                Row {
                    cells: vec![
                        Cell::of(Paragraph::of(Run::bold("g")))
                            .shaded("F9FAFB")
                            .merge(VMerge::Restart),
                        Cell::of(Paragraph::of(Run::plain("a"))),
                    ],
                },
                Row {
                    cells: vec![Cell::merged_below(), Cell::of(Paragraph::of(Run::plain("b")))],
                },
            ],
        };
        let xml = document(&doc(vec![Block::Table(table)])).unwrap();
        assert!(xml.contains("<w:tblW w:w=\"3750\" w:type=\"pct\"/>"));
        assert!(xml.contains("<w:vMerge w:val=\"restart\"/><w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"F9FAFB\"/>"));
        assert_eq!(xml.matches("<w:vMerge/>").count(), 1);
        assert_eq!(xml.matches("<w:gridCol ").count(), 2);
        assert!(xml.contains("<w:b/><w:bCs/>"));
    }

    #[test]
    fn core_properties_carry_issued_date() {
        let issued = IssuedDate::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let xml = core_properties("A & B", issued).unwrap();
        assert!(xml.contains("<dc:title>A &amp; B</dc:title>"));
        assert!(xml.contains(
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">2026-01-05T00:00:00Z</dcterms:created>"
        ));
        assert_eq!(xml.matches("2026-01-05T00:00:00Z").count(), 2);
    }
}
