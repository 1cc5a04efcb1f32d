//! Rasterized PDF export of the live preview.
//!
//! The exporter captures whatever the preview surface shows, from the top of
//! the page, as a bitmap and wraps it in a single A4 page:
//!
//! 1. The surface is brought up to date with the export's content and date.
//! 2. A [`ScrollGuard`] scrolls it to the top and remembers the old offset.
//! 3. The surface is captured at the configured scale on white.
//! 4. The guard restores the offset, whether or not capture succeeded.
//! 5. The bitmap is composed into the PDF off the async runtime.

pub mod font;
pub mod layout;
pub mod paint;
pub mod pdf;
mod preview;

use std::future::Future;
use std::ops::{Deref, DerefMut};

use image::RgbaImage;

use crate::document::{IssuedDate, Sections};
use crate::error::ExportError;
use crate::settings::MIN_RASTER_SCALE;

pub use font::Typeface;
pub use layout::Rgb;
pub use preview::PreviewSurface;

/// A visible, scrollable rendering of the handout that can be captured.
pub trait LiveSurface: Send + Sync {
    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f32;

    /// Scrolls to `offset`, clamped to the valid range.
    fn scroll_to(&mut self, offset: f32);

    /// Shows `sections` stamped with `issued`.
    fn present(&mut self, sections: &Sections, issued: IssuedDate);

    /// Captures the surface from the current offset to the end of the page.
    fn capture(
        &self,
        scale: f32,
        background: Rgb,
    ) -> impl Future<Output = Result<RgbaImage, String>> + Send;
}

/// Scrolls a surface to the top for as long as it lives.
///
/// The previous offset is put back on drop, so an early return or a failed
/// capture leaves the user's view where it was.
#[derive(Debug)]
pub struct ScrollGuard<'a, S: LiveSurface> {
    surface: &'a mut S,
    saved: f32,
}

impl<'a, S: LiveSurface> ScrollGuard<'a, S> {
    /// Saves the current offset and scrolls to the top.
    pub fn new(surface: &'a mut S) -> Self {
        let saved = surface.scroll_offset();
        surface.scroll_to(0.0);
        Self { surface, saved }
    }

    /// The offset that will be restored.
    #[must_use]
    pub const fn saved(&self) -> f32 {
        self.saved
    }
}

impl<S: LiveSurface> Deref for ScrollGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: LiveSurface> DerefMut for ScrollGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: LiveSurface> Drop for ScrollGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.scroll_to(self.saved);
    }
}

/// Produces PDF bytes from a [`LiveSurface`].
#[derive(Debug, Clone, Copy)]
pub struct RasterExporter {
    scale: f32,
}

impl Default for RasterExporter {
    fn default() -> Self {
        Self::new(MIN_RASTER_SCALE)
    }
}

impl RasterExporter {
    /// Creates an exporter capturing at `scale`, raised to at least
    /// [`MIN_RASTER_SCALE`].
    #[must_use]
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() {
            scale.max(MIN_RASTER_SCALE)
        } else {
            MIN_RASTER_SCALE
        };
        Self { scale }
    }

    /// Capture scale in use.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Captures `surface` and returns the PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CaptureFailed`] if the surface cannot be
    /// captured and [`ExportError::EncodingFailed`] if the bitmap cannot be
    /// turned into a PDF. The surface's scroll offset is restored either way.
    pub async fn export<S: LiveSurface>(
        &self,
        surface: &mut S,
        sections: &Sections,
        issued: IssuedDate,
    ) -> Result<Vec<u8>, ExportError> {
        surface.present(sections, issued);

        let image = {
            let guard = ScrollGuard::new(surface);
            tracing::debug!(saved = guard.saved(), scale = self.scale, "Capturing preview");
            guard
                .capture(self.scale, Rgb::WHITE)
                .await
                .map_err(ExportError::CaptureFailed)?
        };
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Captured preview"
        );

        tokio::task::spawn_blocking(move || pdf::compose(&image, issued))
            .await
            .map_err(|e| ExportError::EncodingFailed(e.to_string()))?
            .map_err(ExportError::EncodingFailed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::catalog::PortCatalog;
    use crate::document::build;
    use crate::model::{Account, Config};
    use crate::raster::layout::tests::issued;
    use crate::raster::paint::tests::BlockFace;
    use image::Rgba;
    use std::sync::Arc;

    /// Records what the exporter does to it.
    struct FakeSurface {
        scroll: f32,
        presented: usize,
        fail: bool,
    }

    impl FakeSurface {
        fn at(scroll: f32) -> Self {
            Self {
                scroll,
                presented: 0,
                fail: false,
            }
        }
    }

    impl LiveSurface for FakeSurface {
        fn scroll_offset(&self) -> f32 {
            self.scroll
        }

        fn scroll_to(&mut self, offset: f32) {
            self.scroll = offset;
        }

        fn present(&mut self, _sections: &Sections, _issued: IssuedDate) {
            self.presented += 1;
        }

        fn capture(
            &self,
            _scale: f32,
            _background: Rgb,
        ) -> impl Future<Output = Result<RgbaImage, String>> + Send {
            let scroll = self.scroll;
            let fail = self.fail;
            async move {
                if fail {
                    Err(format!("refused at {scroll}"))
                } else {
                    // Encode the offset seen at capture time in the pixel.
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let marker = scroll as u8;
                    Ok(RgbaImage::from_pixel(4, 6, Rgba([marker, 0, 0, 255])))
                }
            }
        }
    }

    fn sections() -> Sections {
        build(&Config::default(), &[Account::default()], &PortCatalog::standard())
    }

    #[test]
    fn guard_scrolls_to_top_and_restores() {
        let mut surface = FakeSurface::at(250.0);
        {
            let guard = ScrollGuard::new(&mut surface);
            assert_eq!(guard.scroll_offset(), 0.0);
            assert_eq!(guard.saved(), 250.0);
        }
        assert_eq!(surface.scroll, 250.0);
    }

    #[tokio::test]
    async fn capture_happens_at_top_and_offset_is_restored() {
        let mut surface = FakeSurface::at(120.0);
        let pdf = RasterExporter::default()
            .export(&mut surface, &sections(), issued())
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(surface.scroll, 120.0);
        assert_eq!(surface.presented, 1);
    }

    #[tokio::test]
    async fn failed_capture_restores_offset() {
        let mut surface = FakeSurface::at(75.0);
        surface.fail = true;
        let err = RasterExporter::default()
            .export(&mut surface, &sections(), issued())
            .await
            .unwrap_err();
        assert_eq!(err, ExportError::CaptureFailed("refused at 0".to_string()));
        assert_eq!(surface.scroll, 75.0);
    }

    #[tokio::test]
    async fn repeated_exports_are_identical() {
        let mut surface = PreviewSurface::new(Some(Arc::new(BlockFace)), 500.0);
        let exporter = RasterExporter::default();
        let first = exporter.export(&mut surface, &sections(), issued()).await.unwrap();
        surface.scroll_to(300.0);
        let second = exporter.export(&mut surface, &sections(), issued()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(surface.scroll_offset(), 300.0);
    }

    #[tokio::test]
    async fn preview_without_face_is_a_capture_failure() {
        let mut surface = PreviewSurface::new(None, 500.0);
        let err = RasterExporter::default()
            .export(&mut surface, &sections(), issued())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ExportErrorKind::CaptureFailed);
    }

    #[test]
    fn scale_never_drops_below_minimum() {
        assert_eq!(RasterExporter::new(1.0).scale(), MIN_RASTER_SCALE);
        assert_eq!(RasterExporter::new(f32::NAN).scale(), MIN_RASTER_SCALE);
        assert_eq!(RasterExporter::new(3.0).scale(), 3.0);
    }
}
