//! Single-page PDF composition around a captured bitmap.

use chrono::Datelike;
use image::RgbaImage;
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::document::{IssuedDate, text};

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;

const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Where the bitmap lands on the page, in points from the bottom-left.
///
/// The bitmap spans the full page width with its aspect ratio kept and its
/// top edge on the top of the page. A bitmap taller than A4 proportions
/// runs off the bottom and is clipped; there is never a second page.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn placement(width_px: u32, height_px: u32) -> Rect {
    let height = A4_WIDTH * height_px as f32 / width_px as f32;
    Rect::new(0.0, A4_HEIGHT - height, A4_WIDTH, A4_HEIGHT)
}

/// Wraps `image` in a one-page A4 PDF.
///
/// # Errors
///
/// Returns a description of the problem if the bitmap is empty or too large
/// to describe.
pub fn compose(image: &RgbaImage, issued: IssuedDate) -> Result<Vec<u8>, String> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err("captured bitmap is empty".to_string());
    }
    let width_i = i32::try_from(width).map_err(|e| e.to_string())?;
    let height_i = i32::try_from(height).map_err(|e| e.to_string())?;

    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&rgb, 6);

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let image_id = Ref::new(5);
    let info_id = Ref::new(6);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);
    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, A4_WIDTH, A4_HEIGHT))
            .parent(pages_id)
            .contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
    }
    {
        let mut xobject = pdf.image_xobject(image_id, &compressed);
        xobject.filter(Filter::FlateDecode);
        xobject.width(width_i);
        xobject.height(height_i);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
    }

    let at = placement(width, height);
    let mut content = Content::new();
    content.save_state();
    content.transform([at.x2 - at.x1, 0.0, 0.0, at.y2 - at.y1, at.x1, at.y1]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    let date = issued.date();
    let year = u16::try_from(date.year()).map_err(|e| e.to_string())?;
    #[allow(clippy::cast_possible_truncation)]
    let created = Date::new(year).month(date.month() as u8).day(date.day() as u8);
    pdf.document_info(info_id)
        .title(TextStr(text::TITLE))
        .producer(TextStr("MailSheet"))
        .creation_date(created);

    Ok(pdf.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use image::Rgba;

    fn issued() -> IssuedDate {
        IssuedDate::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn one_page_with_image_dimensions() {
        let image = RgbaImage::from_pixel(100, 140, Rgba([255, 255, 255, 255]));
        let pdf = compose(&image, issued()).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(contains(&pdf, b"/Width 100"));
        assert!(contains(&pdf, b"/Height 140"));
        assert!(contains(&pdf, b"/Count 1"));
        assert!(contains(&pdf, b"/FlateDecode"));
        assert!(contains(&pdf, b"D:20261016"));
    }

    #[test]
    fn same_input_same_bytes() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([30, 58, 138, 255]));
        assert_eq!(compose(&image, issued()).unwrap(), compose(&image, issued()).unwrap());
    }

    #[test]
    fn empty_bitmap_is_rejected() {
        assert!(compose(&RgbaImage::new(0, 0), issued()).is_err());
    }

    #[test]
    fn image_spans_width_from_top() {
        let at = placement(1588, 2245);
        assert!((at.x2 - A4_WIDTH).abs() < 1e-3);
        assert!((at.y2 - A4_HEIGHT).abs() < 1e-3);
        assert!(at.y1.abs() < 1.0);

        // Taller than A4 runs off the bottom.
        assert!(placement(1588, 4000).y1 < 0.0);
    }
}
