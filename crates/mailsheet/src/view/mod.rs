//! View components for the application.

mod editor;
mod notice;
mod preview;
mod toolbar;

pub use editor::{PresetPanel, view_editor};
pub use notice::view_notice;
pub use preview::view_preview;
pub use toolbar::view_toolbar;
