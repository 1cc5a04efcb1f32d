//! Top toolbar with the export actions.

use iced::widget::{Space, button, column, container, row, text};
use iced::{Alignment, Element, Length};
use mailsheet_core::ExportAction;

use crate::message::Message;
use crate::style::widgets::{self, palette};

/// Title and one button per export action.
///
/// All buttons are disabled while an export is running; the running one
/// says so.
pub fn view_toolbar<'a>(running: Option<ExportAction>) -> Element<'a, Message> {
    let p = palette::current();

    let title = column![
        text("メール設定案内").size(20).color(p.text_primary),
        text("A4出力用").size(12).color(p.text_secondary),
    ]
    .spacing(2);

    let mut actions = row![].spacing(8).align_y(Alignment::Center);
    for action in ExportAction::ALL {
        let label = if running == Some(action) {
            "処理中…"
        } else {
            action.label()
        };
        let style = if action == ExportAction::Print {
            widgets::secondary_button_style
        } else {
            widgets::primary_button_style
        };
        actions = actions.push(
            button(text(label).size(14))
                .on_press_maybe(running.is_none().then_some(Message::Export(action)))
                .padding([10, 20])
                .style(style),
        );
    }

    container(
        row![title, Space::new().width(Length::Fill), actions]
            .align_y(Alignment::Center)
            .padding([12, 24]),
    )
    .width(Length::Fill)
    .style(widgets::toolbar_style)
    .into()
}
