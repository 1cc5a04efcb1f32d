//! Left-hand editor: presets, server settings, port selection and accounts.

use iced::widget::{Space, button, column, container, pick_list, row, scrollable, text, text_input, toggler};
use iced::{Alignment, Element, Length};
use mailsheet_core::{AccountField, AccountList, Config, PortCatalog, PortId};

use crate::message::Message;
use crate::style::widgets::{self, palette};

/// Width of the editor column.
const EDITOR_WIDTH: f32 = 400.0;

/// State shown in the preset card.
pub struct PresetPanel<'a> {
    /// Saved preset names in store order.
    pub names: Vec<String>,
    /// Preset the configuration came from.
    pub current: Option<&'a str>,
    /// Name typed for the next save.
    pub new_name: &'a str,
}

pub fn view_editor<'a>(
    presets: PresetPanel<'a>,
    config: &'a Config,
    accounts: &'a AccountList,
    catalog: &'a PortCatalog,
) -> Element<'a, Message> {
    let content = column![
        preset_card(presets),
        server_card(config, catalog),
        account_card(accounts),
    ]
    .spacing(16)
    .padding(20);

    container(scrollable(content).height(Length::Fill))
        .width(Length::Fixed(EDITOR_WIDTH))
        .height(Length::Fill)
        .style(widgets::editor_panel_style)
        .into()
}

fn preset_card(presets: PresetPanel<'_>) -> Element<'_, Message> {
    let p = palette::current();
    let PresetPanel {
        names,
        current,
        new_name,
    } = presets;

    let picker = row![
        pick_list(names, current.map(str::to_string), Message::PresetSelected)
            .placeholder("未選択")
            .padding(10)
            .width(Length::Fill),
        button(text("削除").size(13))
            .on_press_maybe(current.map(|_| Message::DeletePreset))
            .padding([8, 12])
            .style(widgets::danger_button_style),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let can_save = current.is_some() || !new_name.trim().is_empty();
    let saver = row![
        text_input("名前入力", new_name)
            .on_input(Message::PresetNameChanged)
            .on_submit(Message::SavePreset)
            .padding(10)
            .style(widgets::field_input_style),
        button(text("保存").size(13))
            .on_press_maybe(can_save.then_some(Message::SavePreset))
            .padding([10, 16])
            .style(widgets::secondary_button_style),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    create_section(
        "プリセット管理",
        column![
            text("メールアカウント情報は保存されません。")
                .size(12)
                .color(p.text_secondary),
            field_label("保存済みプリセット"),
            picker,
            field_label("新規保存名"),
            saver,
        ]
        .spacing(6),
    )
}

fn server_card<'a>(config: &'a Config, catalog: &'a PortCatalog) -> Element<'a, Message> {
    let p = palette::current();

    let mut ports = column![].spacing(6);
    for option in catalog {
        let id = PortId::from(option.id);
        let selected = config.is_selected(option.id);
        let label = format!(
            "{}  {} ({})  暗号化 {}",
            option.direction.label(),
            option.protocol,
            option.port,
            option.encryption_mark()
        );
        ports = ports.push(
            toggler(selected)
                .label(label)
                .on_toggle(move |_| Message::PortToggled(id.clone()))
                .text_size(13)
                .width(Length::Shrink),
        );
    }

    create_section(
        "サーバー基本設定",
        column![
            labeled_input(
                "受信メールサーバー",
                "mail.example.jp",
                &config.receive_server,
                Message::ReceiveServerChanged,
            ),
            labeled_input(
                "送信サーバー (SMTP)",
                "mail.example.jp",
                &config.send_server,
                Message::SendServerChanged,
            ),
            labeled_input(
                "マニュアルURL",
                "https://example.jp/manual",
                &config.manual_url,
                Message::ManualUrlChanged,
            ),
            Space::new().height(Length::Fixed(8.0)),
            row![
                text("ポート設定").size(14).color(p.text_primary),
                text("※案内に含める項目をチェック")
                    .size(11)
                    .color(p.text_muted),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            ports,
        ]
        .spacing(10),
    )
}

fn account_card(accounts: &AccountList) -> Element<'_, Message> {
    let removable = accounts.len() > 1;

    let mut rows = column![].spacing(10);
    for (index, account) in accounts.iter().enumerate() {
        rows = rows.push(
            row![
                labeled_input(
                    "メールアドレス / ユーザー名",
                    "info@example.jp",
                    &account.email,
                    move |value| Message::AccountEdited(index, AccountField::Email, value),
                ),
                labeled_input(
                    "パスワード",
                    "password",
                    &account.password,
                    move |value| Message::AccountEdited(index, AccountField::Password, value),
                ),
                button(text("削除").size(12))
                    .on_press_maybe(removable.then_some(Message::RemoveAccount(index)))
                    .padding([8, 10])
                    .style(widgets::danger_button_style),
            ]
            .spacing(8)
            .align_y(Alignment::End),
        );
    }

    create_section(
        "メールアカウント情報",
        column![
            rows,
            button(text("＋ 追加").size(13))
                .on_press(Message::AddAccount)
                .padding([8, 14])
                .style(widgets::secondary_button_style),
        ]
        .spacing(12),
    )
}

/// A titled card.
fn create_section<'a>(
    title: &'a str,
    content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    let p = palette::current();
    container(
        column![
            text(title).size(16).color(p.text_primary),
            Space::new().height(Length::Fixed(8.0)),
            content.into(),
        ]
        .spacing(4),
    )
    .padding(20)
    .width(Length::Fill)
    .style(widgets::card_style)
    .into()
}

fn field_label(label: &str) -> Element<'_, Message> {
    text(label)
        .size(11)
        .color(palette::current().text_secondary)
        .into()
}

fn labeled_input<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    column![
        field_label(label),
        text_input(placeholder, value)
            .on_input(on_input)
            .padding(10)
            .style(widgets::field_input_style),
    ]
    .spacing(4)
    .width(Length::Fill)
    .into()
}
