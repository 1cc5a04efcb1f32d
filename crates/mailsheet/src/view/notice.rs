//! Transient export notice.

use iced::widget::{container, text};
use iced::Element;
use mailsheet_core::Notice;

use crate::message::Message;
use crate::style::widgets;

pub fn view_notice(notice: &Notice) -> Element<'_, Message> {
    let style = if notice.is_error() {
        widgets::error_banner_style
    } else {
        widgets::info_banner_style
    };

    container(text(&notice.message).size(14))
        .padding([12, 20])
        .max_width(640.0)
        .style(style)
        .into()
}
