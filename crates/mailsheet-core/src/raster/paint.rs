//! Software painter for display lists.
//!
//! Shapes go through tiny-skia; glyph coverage from the [`Typeface`] is
//! blended straight into the resulting RGBA buffer. Painting is
//! deterministic: the same list, face and parameters give the same pixels.

use image::RgbaImage;
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::font::Typeface;
use super::layout::{DisplayList, DrawOp, Rgb};

/// A horizontal band of the page to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Top of the band in page coordinates.
    pub from_y: f32,
    /// Band height in page coordinates.
    pub height: f32,
}

impl Band {
    /// From `from_y` to the end of the page.
    #[must_use]
    pub fn to_end(list: &DisplayList, from_y: f32) -> Self {
        let from_y = from_y.clamp(0.0, list.height);
        Self {
            from_y,
            height: list.height - from_y,
        }
    }
}

fn solid(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, 255);
    paint.anti_alias = false;
    paint
}

/// Paints `band` of `list` at `scale` device pixels per page unit.
///
/// # Errors
///
/// Returns a description of the problem if the scale is not a positive
/// number or the bitmap cannot be allocated.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn paint(
    list: &DisplayList,
    face: &dyn Typeface,
    scale: f32,
    band: Band,
    background: Rgb,
) -> Result<RgbaImage, String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("invalid capture scale {scale}"));
    }
    let width = (list.width * scale).ceil() as u32;
    let height = (band.height * scale).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| format!("cannot allocate a {width}x{height} bitmap"))?;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        background.0,
        background.1,
        background.2,
        255,
    ));

    let visible = |op: &DrawOp| {
        let (top, bottom) = op.span();
        bottom >= band.from_y && top <= band.from_y + band.height
    };
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, 0.0, -band.from_y * scale);
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    for op in list.ops.iter().filter(|op| visible(*op)) {
        match op {
            DrawOp::Fill { frame, color } => {
                if let Some(rect) = Rect::from_xywh(frame.x, frame.y, frame.w, frame.h) {
                    pixmap.fill_rect(rect, &solid(*color), transform, None);
                }
            }
            DrawOp::Stroke { frame, color } => {
                if let Some(rect) = Rect::from_xywh(frame.x, frame.y, frame.w, frame.h) {
                    let path = PathBuilder::from_rect(rect);
                    pixmap.stroke_path(&path, &solid(*color), &stroke, transform, None);
                }
            }
            DrawOp::Text { .. } => {}
        }
    }

    // Every fill is opaque, so premultiplied and straight alpha agree.
    let mut image = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| "bitmap size mismatch".to_string())?;

    for op in list.ops.iter().filter(|op| visible(*op)) {
        if let DrawOp::Text {
            x,
            y,
            size,
            color,
            bold,
            text,
        } = op
        {
            let px = size * scale;
            let baseline = (y - band.from_y) * scale + face.ascent(px);
            let embolden = if *bold { (px / 24.0).max(0.6) } else { 0.0 };
            let mut pen = x * scale;
            for ch in text.chars() {
                let glyph = face.glyph(ch, px);
                let left = pen + glyph.xmin as f32;
                let top = baseline - (glyph.height as f32 + glyph.ymin as f32);
                blit(&mut image, &glyph.coverage, glyph.width, left, top, *color);
                if embolden > 0.0 {
                    blit(&mut image, &glyph.coverage, glyph.width, left + embolden, top, *color);
                }
                pen += glyph.advance;
            }
        }
    }

    Ok(image)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn blit(image: &mut RgbaImage, coverage: &[u8], width: usize, left: f32, top: f32, color: Rgb) {
    if width == 0 {
        return;
    }
    let left = left.round() as i64;
    let top = top.round() as i64;
    let (w, h) = (i64::from(image.width()), i64::from(image.height()));

    for (i, &alpha) in coverage.iter().enumerate() {
        if alpha == 0 {
            continue;
        }
        let x = left + (i % width) as i64;
        let y = top + (i / width) as i64;
        if x < 0 || y < 0 || x >= w || y >= h {
            continue;
        }
        let pixel = image.get_pixel_mut(x as u32, y as u32);
        let a = u16::from(alpha);
        for (dst, src) in pixel.0.iter_mut().zip([color.0, color.1, color.2]) {
            *dst = ((u16::from(*dst) * (255 - a) + u16::from(src) * a) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::raster::font::Glyph;
    use crate::raster::layout::{Frame, PAGE_MIN_HEIGHT, PAGE_WIDTH, TextMeasure};

    /// Draws every character as a solid block.
    pub(crate) struct BlockFace;

    impl TextMeasure for BlockFace {
        fn advance(&self, _ch: char, size: f32) -> f32 {
            size * 0.6
        }
    }

    impl Typeface for BlockFace {
        fn ascent(&self, px: f32) -> f32 {
            px * 0.8
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn glyph(&self, ch: char, px: f32) -> Glyph {
            let (width, height) = if ch == ' ' {
                (0, 0)
            } else {
                ((px * 0.5) as usize, (px * 0.7) as usize)
            };
            Glyph {
                xmin: 0,
                ymin: 0,
                width,
                height,
                advance: px * 0.6,
                coverage: vec![255; width * height],
            }
        }
    }

    fn list(ops: Vec<DrawOp>) -> DisplayList {
        DisplayList {
            width: PAGE_WIDTH,
            height: PAGE_MIN_HEIGHT,
            ops,
        }
    }

    #[test]
    fn blank_page_is_background() {
        let page = list(Vec::new());
        let image = paint(&page, &BlockFace, 1.0, Band::to_end(&page, 0.0), Rgb::WHITE).unwrap();
        assert_eq!(image.width(), 794);
        assert_eq!(image.height(), 1123);
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn scale_multiplies_dimensions() {
        let page = list(Vec::new());
        let image = paint(&page, &BlockFace, 2.0, Band::to_end(&page, 0.0), Rgb::WHITE).unwrap();
        assert_eq!(image.width(), 1588);
        assert_eq!(image.height(), 2245);
    }

    #[test]
    fn rejects_bad_scale() {
        let page = list(Vec::new());
        let band = Band::to_end(&page, 0.0);
        assert!(paint(&page, &BlockFace, 0.0, band, Rgb::WHITE).is_err());
        assert!(paint(&page, &BlockFace, f32::NAN, band, Rgb::WHITE).is_err());
    }

    #[test]
    fn fills_and_text_land_where_laid_out() {
        let page = list(vec![
            DrawOp::Fill {
                frame: Frame {
                    x: 10.0,
                    y: 10.0,
                    w: 20.0,
                    h: 20.0,
                },
                color: Rgb::BLUE_900,
            },
            DrawOp::Text {
                x: 100.0,
                y: 100.0,
                size: 20.0,
                color: Rgb::BLACK,
                bold: false,
                text: "A".to_string(),
            },
        ]);
        let image = paint(&page, &BlockFace, 1.0, Band::to_end(&page, 0.0), Rgb::WHITE).unwrap();
        assert_eq!(image.get_pixel(20, 20).0, [30, 58, 138, 255]);
        assert_eq!(image.get_pixel(105, 110).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(150, 150).0, [255, 255, 255, 255]);
    }

    #[test]
    fn band_offsets_content() {
        let page = list(vec![DrawOp::Fill {
            frame: Frame {
                x: 0.0,
                y: 500.0,
                w: 50.0,
                h: 50.0,
            },
            color: Rgb::BLACK,
        }]);
        let image = paint(&page, &BlockFace, 1.0, Band::to_end(&page, 480.0), Rgb::WHITE).unwrap();
        assert_eq!(image.get_pixel(10, 30).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }
}
