//! Application messages.

use iced::Size;
use iced::widget::image;
use mailsheet_core::{AccountField, AppSettings, ExportAction, ExportError, ExportOutcome, PortId};

/// All messages that can be sent in the application.
#[derive(Debug, Clone)]
pub enum Message {
    // Startup
    /// Settings file read (or defaults substituted).
    SettingsLoaded(Result<AppSettings, String>),
    /// Font discovery finished; `true` when the preview can be drawn.
    FaceLoaded(bool),

    // Presets
    /// Preset picked from the list.
    PresetSelected(String),
    /// New preset name typed.
    PresetNameChanged(String),
    /// Save the current configuration as a preset.
    SavePreset,
    /// Delete the currently selected preset.
    DeletePreset,

    // Configuration
    /// Incoming server host edited.
    ReceiveServerChanged(String),
    /// Outgoing server host edited.
    SendServerChanged(String),
    /// Manual URL edited.
    ManualUrlChanged(String),
    /// Port row highlight toggled.
    PortToggled(PortId),

    // Accounts
    /// Append an empty account row.
    AddAccount,
    /// Remove the account at the given index.
    RemoveAccount(usize),
    /// An account field was edited.
    AccountEdited(usize, AccountField, String),

    // Preview
    /// A viewport image of the preview surface is ready.
    PreviewRendered(Result<PreviewFrame, String>),
    /// Preview scrolled to an absolute page offset.
    PreviewScrolled(f32),
    /// Preview scrolled by a relative amount (mouse wheel).
    PreviewWheel(f32),
    /// Window resized.
    WindowResized(Size),

    // Export
    /// Export button pressed.
    Export(ExportAction),
    /// An export finished.
    ExportFinished(ExportAction, Result<ExportOutcome, ExportError>),
    /// The notice with this id timed out.
    DismissNotice(u64),

    /// Event with no effect.
    Ignored,
}

/// A rendered slice of the preview page.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    /// Pixels of the visible viewport.
    pub handle: image::Handle,
    /// Scroll offset the slice was taken at, after clamping.
    pub scroll: f32,
    /// Largest valid scroll offset.
    pub max_scroll: f32,
    /// Displayed width in page units.
    pub width: f32,
    /// Displayed height in page units.
    pub height: f32,
}
