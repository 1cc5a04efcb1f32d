//! Color palette for the editor and preview chrome.
//!
//! The handout itself is drawn by the preview surface with its own print
//! colors; this palette only covers the surrounding window.

use iced::Color;

/// Colors used by the application chrome.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    // Brand
    pub primary: Color,
    pub primary_light: Color,
    pub primary_dark: Color,

    // Surfaces
    pub surface: Color,
    pub surface_sunken: Color,
    pub background: Color,
    pub backdrop: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_on_primary: Color,

    // Accents
    pub accent_green: Color,
    pub accent_red: Color,
    pub danger_tint: Color,
    pub info_tint: Color,

    // States
    pub selected: Color,
    pub hover: Color,

    // Borders
    pub border_subtle: Color,
    pub border_medium: Color,

    // Shadows
    pub shadow: Color,
    pub shadow_medium: Color,
}

impl Palette {
    /// The light palette, matching the slate tones of the printed handout.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::from_rgb(0.15, 0.39, 0.92), // #2563EB
            primary_light: Color::from_rgb(0.23, 0.51, 0.96),
            primary_dark: Color::from_rgb(0.11, 0.31, 0.85),

            surface: Color::WHITE,
            surface_sunken: Color::from_rgb(0.97, 0.98, 0.99),
            background: Color::from_rgb(0.95, 0.96, 0.97),
            backdrop: Color::from_rgb(0.80, 0.84, 0.88), // slate-300

            text_primary: Color::from_rgb(0.12, 0.16, 0.23), // slate-800
            text_secondary: Color::from_rgb(0.28, 0.33, 0.41),
            text_muted: Color::from_rgb(0.58, 0.64, 0.72),
            text_on_primary: Color::WHITE,

            accent_green: Color::from_rgb(0.09, 0.64, 0.29),
            accent_red: Color::from_rgb(0.86, 0.15, 0.15),
            danger_tint: Color::from_rgb(1.0, 0.95, 0.95),
            info_tint: Color::from_rgb(0.94, 0.99, 0.96),

            selected: Color::from_rgb(0.94, 0.96, 1.0),
            hover: Color::from_rgb(0.96, 0.97, 0.98),

            border_subtle: Color::from_rgb(0.89, 0.91, 0.94),
            border_medium: Color::from_rgb(0.82, 0.84, 0.87), // #D1D5DB

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.06),
            shadow_medium: Color::from_rgba(0.0, 0.0, 0.0, 0.18),
        }
    }
}

/// The palette in use.
#[must_use]
pub const fn current() -> Palette {
    Palette::light()
}
