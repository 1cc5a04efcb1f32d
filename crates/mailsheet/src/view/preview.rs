//! Live A4 preview of the handout.

use iced::mouse::ScrollDelta;
use iced::widget::{Space, column, container, image, mouse_area, row, text, vertical_slider};
use iced::{Alignment, Element, Length};

use crate::message::{Message, PreviewFrame};
use crate::style::widgets::{self, palette};

/// Page units scrolled per mouse wheel line.
const WHEEL_LINE: f32 = 48.0;

/// The visible part of the page with a scroll bar beside it.
///
/// The slider runs bottom to top, so its value is the distance from the end
/// of the page.
pub fn view_preview<'a>(
    frame: Option<&'a PreviewFrame>,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    let p = palette::current();

    let body: Element<'a, Message> = match frame {
        Some(frame) => {
            let page = container(
                image(frame.handle.clone())
                    .width(Length::Fixed(frame.width))
                    .height(Length::Fixed(frame.height)),
            )
            .style(widgets::page_style);

            let page = mouse_area(page).on_scroll(|delta| {
                let distance = match delta {
                    ScrollDelta::Lines { y, .. } => y * WHEEL_LINE,
                    ScrollDelta::Pixels { y, .. } => y,
                };
                Message::PreviewWheel(distance)
            });

            let max = frame.max_scroll;
            let mut content = row![page].spacing(12);
            if max > 0.0 {
                content = content.push(
                    vertical_slider(0.0..=max, max - frame.scroll, move |value| {
                        Message::PreviewScrolled(max - value)
                    })
                    .step(4.0)
                    .height(Length::Fixed(frame.height)),
                );
            }
            content.into()
        }
        None => column![
            text("A4サイズ プレビュー").size(16).color(p.text_secondary),
            Space::new().height(Length::Fixed(8.0)),
            text(error.unwrap_or("プレビューを準備しています…"))
                .size(13)
                .color(p.text_secondary),
        ]
        .align_x(Alignment::Center)
        .into(),
    };

    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(24)
        .align_x(Alignment::Center)
        .style(widgets::preview_backdrop_style)
        .into()
}
