//! Fixed wording of the handout.
//!
//! Every renderer takes its labels from here so the printed, PDF and Word
//! outputs read the same.

/// Document title.
pub const TITLE: &str = "メール設定情報のご案内";
/// English subtitle under the title.
pub const SUBTITLE: &str = "Email Account Configuration Information";
/// Label before the issued date.
pub const ISSUED_LABEL: &str = "発行日";
/// Opening lines.
pub const GREETING: [&str; 2] = [
    "いつも大変お世話になっております。メールソフトの設定情報を下記の通りご案内申し上げます。",
    "お手数ですが、お手持ちの端末（PC・スマートフォン等）にて設定をお願いいたします。",
];

/// Heading of the server block.
pub const SERVER_HEADING: &str = "サーバー基本情報";
/// Row label for the incoming server.
pub const RECEIVE_SERVER: &str = "受信サーバー";
/// Row label for the outgoing server.
pub const SEND_SERVER: &str = "送信サーバー (SMTP)";

/// Column headers of the port table.
pub const PORT_COLUMNS: [&str; 4] = ["区分", "プロトコル", "ポート番号", "暗号化"];
/// Group label for receive rows.
pub const RECEIVE_GROUP: &str = "受信用";
/// Group label for send rows.
pub const SEND_GROUP: &str = "送信用";
/// Encryption column mark for encrypted rows.
pub const ENCRYPTED_MARK: &str = "○";
/// Encryption column mark for plain rows.
pub const PLAIN_MARK: &str = "×";
/// Marker glyph for selected rows.
pub const SELECTED_MARKER: &str = "●";
/// Marker glyph for rows that are not selected.
pub const UNSELECTED_MARKER: &str = "○";
/// Note under the port table.
pub const PORT_LEGEND: &str = "※ ●印がついている設定が推奨または利用可能なポートです。";

/// Heading of the account block.
pub const ACCOUNT_HEADING: &str = "アカウント別ログイン情報";
/// Column headers of the account table.
pub const ACCOUNT_COLUMNS: [&str; 2] = ["メールアドレス / ユーザー名", "パスワード"];
/// Printed in place of an empty account field.
pub const PLACEHOLDER: &str = "-";

/// Label of the manual link block.
pub const MANUAL_LABEL: &str = "設定マニュアル";

/// Closing notices.
pub const FOOTER: [&str; 3] = [
    "※ パスワードは機密情報です。管理には十分ご注意ください。",
    "※ セキュリティ保護のため、他者と共有したり公共の場に放置したりしないでください。",
    "※ 設定に際して不明な点がございましたら、サポート担当までご連絡ください。",
];

/// Title of the print view.
pub const PRINT_TITLE: &str = "印刷 - メール設定情報";
