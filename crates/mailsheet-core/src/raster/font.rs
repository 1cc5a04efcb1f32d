//! Font loading for the preview painter.

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};

use super::layout::TextMeasure;

/// System fonts tried in order when no font is configured. The handout is
/// Japanese, so CJK faces come first.
const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/ipafont-gothic/ipagp.ttf",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// A coverage bitmap for one character.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Offset of the bitmap's left edge from the pen position.
    pub xmin: i32,
    /// Offset of the bitmap's bottom edge from the baseline, upwards.
    pub ymin: i32,
    /// Bitmap width.
    pub width: usize,
    /// Bitmap height.
    pub height: usize,
    /// Pen advance after this glyph.
    pub advance: f32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// A face the painter can draw with.
pub trait Typeface: TextMeasure + Send + Sync {
    /// Distance from the top of the em box to the baseline at `px`.
    fn ascent(&self, px: f32) -> f32;

    /// Rasterizes `ch` at `px` pixels per em.
    fn glyph(&self, ch: char, px: f32) -> Glyph;
}

impl Typeface for Font {
    fn ascent(&self, px: f32) -> f32 {
        self.horizontal_line_metrics(px)
            .map_or(px * 0.8, |metrics| metrics.ascent.min(px))
    }

    fn glyph(&self, ch: char, px: f32) -> Glyph {
        let (metrics, coverage) = self.rasterize(ch, px);
        Glyph {
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            width: metrics.width,
            height: metrics.height,
            advance: metrics.advance_width,
            coverage,
        }
    }
}

/// Loads a font file. Collections (`.ttc`) use their first face.
///
/// # Errors
///
/// Returns a description of the problem if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Font, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let settings = FontSettings {
        collection_index: 0,
        ..FontSettings::default()
    };
    Font::from_bytes(bytes, settings).map_err(|e| format!("{}: {e}", path.display()))
}

/// Loads the configured font, or the first system candidate that parses.
///
/// Returns `None` when nothing usable is found; the preview then stays blank
/// and PDF export reports a capture failure.
#[must_use]
pub fn discover(configured: Option<&Path>) -> Option<Arc<dyn Typeface>> {
    if let Some(path) = configured {
        match load(path) {
            Ok(font) => {
                tracing::info!("Using preview font {}", path.display());
                return Some(Arc::new(font));
            }
            Err(e) => tracing::warn!("Configured preview font unusable: {}", e),
        }
    }

    for candidate in CANDIDATES {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match load(path) {
            Ok(font) => {
                tracing::info!("Using preview font {}", path.display());
                return Some(Arc::new(font));
            }
            Err(e) => tracing::debug!("Skipping font candidate: {}", e),
        }
    }

    tracing::warn!("No preview font found; PDF export is unavailable");
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let err = load(Path::new("/nonexistent/font.ttf")).err();
        assert!(err.is_some_and(|e| e.contains("/nonexistent/font.ttf")));
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(load(&path).is_err());
    }
}
