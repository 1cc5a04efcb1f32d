//! ZIP packaging of a document into a `.docx` file.

use std::io::{Cursor, Write};

use chrono::Datelike;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::model::Document;
use super::xml;
use crate::document::IssuedDate;

/// Packages `doc` into `.docx` bytes.
///
/// Every entry carries the issued date as its modification time, so the
/// bytes depend only on the document and the date.
pub fn package(doc: &Document, issued: IssuedDate) -> Result<Vec<u8>, String> {
    let date = issued.date();
    let year = u16::try_from(date.year()).map_err(|e| e.to_string())?;
    #[allow(clippy::cast_possible_truncation)]
    let stamp = zip::DateTime::from_date_and_time(year, date.month() as u8, date.day() as u8, 0, 0, 0)
        .map_err(|_| format!("{} is outside the ZIP date range", issued.iso()))?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(stamp);

    let parts = [
        ("[Content_Types].xml", xml::CONTENT_TYPES.to_string()),
        ("_rels/.rels", xml::PACKAGE_RELS.to_string()),
        ("word/document.xml", xml::document(doc)?),
        ("word/_rels/document.xml.rels", xml::DOCUMENT_RELS.to_string()),
        ("word/styles.xml", xml::STYLES.to_string()),
        ("docProps/core.xml", xml::core_properties(&doc.title, issued)?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name, options)
            .map_err(|e| format!("{name}: {e}"))?;
        zip.write_all(body.as_bytes())
            .map_err(|e| format!("{name}: {e}"))?;
    }
    let cursor = zip.finish().map_err(|e| e.to_string())?;
    Ok(cursor.into_inner())
}
