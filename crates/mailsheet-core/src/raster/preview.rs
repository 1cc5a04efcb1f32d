//! The live preview surface.

use std::future::Future;
use std::sync::Arc;

use image::RgbaImage;

use super::LiveSurface;
use super::font::Typeface;
use super::layout::{self, DisplayList, Rgb};
use super::paint::{self, Band};
use crate::document::{IssuedDate, Sections};

/// The on-screen handout preview.
///
/// Holds the laid-out page, the viewport height and the current scroll
/// offset. The GUI shows [`Self::viewport_image`]; PDF export captures the
/// page from the current offset downward.
pub struct PreviewSurface {
    face: Option<Arc<dyn Typeface>>,
    page: DisplayList,
    content: Option<(Sections, IssuedDate)>,
    scroll: f32,
    viewport_height: f32,
}

impl std::fmt::Debug for PreviewSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSurface")
            .field("has_face", &self.face.is_some())
            .field("page_height", &self.page.height)
            .field("scroll", &self.scroll)
            .field("viewport_height", &self.viewport_height)
            .finish_non_exhaustive()
    }
}

impl PreviewSurface {
    /// Creates an empty surface. Without a face nothing can be drawn.
    #[must_use]
    pub fn new(face: Option<Arc<dyn Typeface>>, viewport_height: f32) -> Self {
        Self {
            face,
            page: DisplayList::blank(),
            content: None,
            scroll: 0.0,
            viewport_height: viewport_height.max(1.0),
        }
    }

    /// Whether a face is loaded.
    #[must_use]
    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }

    /// Replaces the face and lays the current content out again.
    pub fn set_face(&mut self, face: Option<Arc<dyn Typeface>>) {
        self.face = face;
        if let Some((sections, issued)) = self.content.take() {
            self.show(sections, issued);
        }
    }

    /// Changes the visible height, keeping the offset in range.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> f32 {
        (self.page.height - self.viewport_height).max(0.0)
    }

    fn show(&mut self, sections: Sections, issued: IssuedDate) {
        self.page = match &self.face {
            Some(face) => layout::layout(&sections, issued, face.as_ref()),
            None => DisplayList::blank(),
        };
        self.content = Some((sections, issued));
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    /// Paints the visible part of the page.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if no face is loaded or painting
    /// fails.
    pub fn viewport_image(&self, scale: f32) -> Result<RgbaImage, String> {
        let face = self.face.as_ref().ok_or_else(no_face)?;
        let band = Band {
            from_y: self.scroll,
            height: self.viewport_height.min(self.page.height - self.scroll),
        };
        paint::paint(&self.page, face.as_ref(), scale, band, Rgb::WHITE)
    }
}

fn no_face() -> String {
    "no font available to draw the preview".to_string()
}

impl LiveSurface for PreviewSurface {
    fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    fn scroll_to(&mut self, offset: f32) {
        self.scroll = if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
    }

    fn present(&mut self, sections: &Sections, issued: IssuedDate) {
        let current = self
            .content
            .as_ref()
            .is_some_and(|(s, i)| s == sections && *i == issued);
        if !current {
            self.show(sections.clone(), issued);
        }
    }

    fn capture(
        &self,
        scale: f32,
        background: Rgb,
    ) -> impl Future<Output = Result<RgbaImage, String>> + Send {
        let face = self.face.clone();
        let page = self.page.clone();
        let band = Band::to_end(&page, self.scroll);
        async move {
            let face = face.ok_or_else(no_face)?;
            tokio::task::spawn_blocking(move || {
                paint::paint(&page, face.as_ref(), scale, band, background)
            })
            .await
            .map_err(|e| format!("capture task failed: {e}"))?
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::PortCatalog;
    use crate::document::build;
    use crate::model::{Account, Config};
    use crate::raster::layout::tests::issued;
    use crate::raster::paint::tests::BlockFace;

    fn surface() -> PreviewSurface {
        let mut surface = PreviewSurface::new(Some(Arc::new(BlockFace)), 400.0);
        let sections = build(&Config::default(), &[Account::default()], &PortCatalog::standard());
        surface.present(&sections, issued());
        surface
    }

    #[test]
    fn scroll_is_clamped() {
        let mut surface = surface();
        surface.scroll_to(-10.0);
        assert!(surface.scroll_offset().abs() < f32::EPSILON);
        surface.scroll_to(1.0e6);
        assert!((surface.scroll_offset() - surface.max_scroll()).abs() < f32::EPSILON);
        surface.scroll_to(f32::NAN);
        assert!(surface.scroll_offset().abs() < f32::EPSILON);
    }

    #[test]
    fn viewport_image_matches_viewport() {
        let surface = surface();
        let image = surface.viewport_image(1.0).unwrap();
        assert_eq!(image.height(), 400);
        assert_eq!(image.width(), 794);
    }

    #[test]
    fn without_face_nothing_is_drawn() {
        let surface = PreviewSurface::new(None, 400.0);
        assert!(!surface.has_face());
        assert!(surface.viewport_image(1.0).is_err());
    }

    #[tokio::test]
    async fn capture_starts_at_scroll_offset() {
        let mut surface = surface();
        let full = surface.capture(1.0, Rgb::WHITE).await.unwrap();
        surface.scroll_to(200.0);
        let partial = surface.capture(1.0, Rgb::WHITE).await.unwrap();
        assert_eq!(full.height(), 1123);
        assert_eq!(partial.height(), 923);
    }

    #[tokio::test]
    async fn capture_without_face_fails() {
        let surface = PreviewSurface::new(None, 400.0);
        assert!(surface.capture(2.0, Rgb::WHITE).await.is_err());
    }

    #[test]
    fn present_is_idempotent_for_same_content() {
        let mut surface = surface();
        surface.scroll_to(120.0);
        let sections = build(&Config::default(), &[Account::default()], &PortCatalog::standard());
        surface.present(&sections, issued());
        assert!((surface.scroll_offset() - 120.0).abs() < f32::EPSILON);
    }
}
