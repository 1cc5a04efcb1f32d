//! Container style functions.

use iced::widget::container;
use iced::{Background, Border};

use super::palette;
use super::shadows;
use super::shadows::radius;

/// Top toolbar with the preset controls and export buttons.
pub fn toolbar_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        shadow: shadows::subtle(),
        ..Default::default()
    }
}

/// Left editor column.
pub fn editor_panel_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.background)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        ..Default::default()
    }
}

/// Card grouping related editor fields.
pub fn card_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::LARGE.into(),
        },
        shadow: shadows::subtle(),
        ..Default::default()
    }
}

/// Area behind the preview page.
pub fn preview_backdrop_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.backdrop)),
        ..Default::default()
    }
}

/// The preview page itself.
pub fn page_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        shadow: shadows::page(),
        ..Default::default()
    }
}

/// Banner for a successful export.
pub fn info_banner_style(_theme: &iced::Theme) -> container::Style {
    banner(palette::current().info_tint, palette::current().accent_green)
}

/// Banner for a failed export.
pub fn error_banner_style(_theme: &iced::Theme) -> container::Style {
    banner(palette::current().danger_tint, palette::current().accent_red)
}

fn banner(fill: iced::Color, accent: iced::Color) -> container::Style {
    container::Style {
        background: Some(Background::Color(fill)),
        text_color: Some(accent),
        border: Border {
            color: accent,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        shadow: shadows::subtle(),
        ..Default::default()
    }
}
