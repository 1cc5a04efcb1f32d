//! `MailSheet` - Mail settings handout generator
//!
//! Edit server settings and recipient accounts, watch the handout update
//! live, then print it or save it as PDF or Word.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod style;
mod view;

use std::sync::Arc;

use anyhow::Context;
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{column, container, image, row, stack};
use iced::{Alignment, Element, Length, Size, Subscription, Task, window};
use mailsheet_core::document::{self, Sections};
use mailsheet_core::raster::font;
use mailsheet_core::{
    AccountList, AppSettings, Config, ExportAction, ExportGate, ExportOrchestrator, ExportRequest,
    IssuedDate, JsonFileBackend, LiveSurface, Notice, PortCatalog, PresetStore, PreviewSurface,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use message::{Message, PreviewFrame};

/// Initial window size.
const WINDOW_SIZE: Size = Size::new(1360.0, 900.0);

/// Vertical space taken by the toolbar and the padding around the preview page.
const CHROME_HEIGHT: f32 = 120.0;

/// Oversampling of the on-screen preview.
const PREVIEW_SCALE: f32 = 1.5;

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsheet=debug,mailsheet_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MailSheet");

    iced::application(MailSheet::new, MailSheet::update, MailSheet::view)
        .title("MailSheet")
        .window_size(WINDOW_SIZE)
        .subscription(MailSheet::subscription)
        .run()
}

/// Main application state.
struct MailSheet {
    /// Connection parameters being edited.
    config: Config,
    /// Recipient accounts.
    accounts: AccountList,
    /// Fixed protocol/port rows.
    catalog: PortCatalog,
    /// Saved configurations.
    presets: PresetStore<JsonFileBackend>,
    /// Preset the configuration was last loaded from or saved to.
    current_preset: Option<String>,
    /// Name typed for the next save.
    new_preset_name: String,
    /// User settings.
    settings: AppSettings,
    /// Runs export actions.
    orchestrator: ExportOrchestrator,
    /// Export currently running, if any.
    gate: ExportGate,
    /// Software surface drawing the handout; shared with PDF export.
    surface: Arc<Mutex<PreviewSurface>>,
    /// Last rendered viewport of the surface.
    preview: Option<PreviewFrame>,
    /// Why the preview could not be drawn.
    preview_error: Option<String>,
    /// Notice on screen, keyed by a sequence number for dismissal.
    notice: Option<(u64, Notice)>,
    /// Last notice sequence number handed out.
    notice_seq: u64,
}

/// A change applied to the preview surface before redrawing it.
enum SurfaceChange {
    Content(Sections, IssuedDate),
    Scroll(f32),
    Viewport(f32),
    Redraw,
}

impl MailSheet {
    /// Creates the application, loading presets and applying the first one.
    fn new() -> (Self, Task<Message>) {
        let catalog = PortCatalog::standard();
        let mut presets = PresetStore::new(JsonFileBackend::default_location());
        let mapping = presets.load();

        let startup = PresetStore::<JsonFileBackend>::select_default(&mapping)
            .and_then(|name| mapping.get(name).map(|config| (name.to_string(), config.clone())));
        let (config, current_preset) = match startup {
            Some((name, mut config)) => {
                info!("Applying preset {}", name);
                config.restrict_to(&catalog);
                (config, Some(name))
            }
            None => (Config::default(), None),
        };

        let settings = AppSettings::default();
        let surface = PreviewSurface::new(None, WINDOW_SIZE.height - CHROME_HEIGHT);

        let app = Self {
            config,
            accounts: AccountList::new(),
            catalog,
            presets,
            current_preset,
            new_preset_name: String::new(),
            orchestrator: ExportOrchestrator::new(settings.clone()),
            settings,
            gate: ExportGate::new(),
            surface: Arc::new(Mutex::new(surface)),
            preview: None,
            preview_error: None,
            notice: None,
            notice_seq: 0,
        };

        (app, Task::perform(load_settings(), Message::SettingsLoaded))
    }

    #[allow(clippy::needless_pass_by_value)] // iced requires owned Message
    #[allow(clippy::too_many_lines)] // Main message dispatcher
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SettingsLoaded(result) => {
                match result {
                    Ok(settings) => {
                        info!("Settings loaded");
                        self.orchestrator = ExportOrchestrator::new(settings.clone());
                        self.settings = settings;
                    }
                    Err(e) => warn!("Failed to load settings, using defaults: {}", e),
                }
                let preview_font = self.settings.preview_font.clone();
                return Task::perform(
                    load_face(Arc::clone(&self.surface), preview_font),
                    Message::FaceLoaded,
                );
            }
            Message::FaceLoaded(found) => {
                if !found {
                    self.preview_error = Some("プレビュー用のフォントが見つかりません。".to_string());
                }
                return self.refresh_preview();
            }

            Message::PresetSelected(name) => {
                if let Some(config) = self.presets.get(&name) {
                    let mut config = config.clone();
                    config.restrict_to(&self.catalog);
                    self.config = config;
                    self.current_preset = Some(name);
                    return self.refresh_preview();
                }
            }
            Message::PresetNameChanged(name) => {
                self.new_preset_name = name;
            }
            Message::SavePreset => {
                let name = if self.new_preset_name.trim().is_empty() {
                    self.current_preset.clone().unwrap_or_default()
                } else {
                    self.new_preset_name.clone()
                };
                match self.presets.save(&name, &self.config) {
                    Ok(Some(saved)) => {
                        info!("Saved preset {}", saved);
                        self.current_preset = Some(saved);
                        self.new_preset_name.clear();
                    }
                    Ok(None) => debug!("Preset save skipped: no name"),
                    Err(e) => {
                        warn!("Failed to save preset: {}", e);
                        return self.show_notice(Notice::error(
                            "プリセットを保存できませんでした。",
                            self.settings.notice_duration(),
                        ));
                    }
                }
            }
            Message::DeletePreset => {
                if let Some(name) = self.current_preset.take() {
                    if let Err(e) = self.presets.delete(&name) {
                        warn!("Failed to delete preset {}: {}", name, e);
                        self.current_preset = Some(name);
                        return self.show_notice(Notice::error(
                            "プリセットを削除できませんでした。",
                            self.settings.notice_duration(),
                        ));
                    }
                    info!("Deleted preset {}", name);
                }
            }

            Message::ReceiveServerChanged(value) => {
                self.config.receive_server = value;
                return self.refresh_preview();
            }
            Message::SendServerChanged(value) => {
                self.config.send_server = value;
                return self.refresh_preview();
            }
            Message::ManualUrlChanged(value) => {
                self.config.manual_url = value;
                return self.refresh_preview();
            }
            Message::PortToggled(id) => {
                self.config.toggle_port(id.as_str());
                return self.refresh_preview();
            }

            Message::AddAccount => {
                self.accounts.push();
                return self.refresh_preview();
            }
            Message::RemoveAccount(index) => {
                if self.accounts.remove(index) {
                    return self.refresh_preview();
                }
            }
            Message::AccountEdited(index, field, value) => {
                self.accounts.update(index, field, value);
                return self.refresh_preview();
            }

            Message::PreviewRendered(result) => match result {
                Ok(frame) => {
                    self.preview = Some(frame);
                    self.preview_error = None;
                }
                Err(e) => {
                    debug!("Preview not drawn: {}", e);
                    self.preview = None;
                    self.preview_error = Some(e);
                }
            },
            Message::PreviewScrolled(offset) => {
                return self.render(SurfaceChange::Scroll(offset));
            }
            Message::PreviewWheel(delta) => {
                let current = self.preview.as_ref().map_or(0.0, |frame| frame.scroll);
                return self.render(SurfaceChange::Scroll(current - delta));
            }
            Message::WindowResized(size) => {
                return self.render(SurfaceChange::Viewport(size.height - CHROME_HEIGHT));
            }

            Message::Export(action) => {
                return self.start_export(action);
            }
            Message::ExportFinished(action, result) => {
                self.gate.finish(action);
                if let Ok(outcome) = &result {
                    info!("{} finished: {}", action, outcome.path().display());
                }
                let notice = self.orchestrator.notice_for(action, &result);
                return Task::batch([self.show_notice(notice), self.render(SurfaceChange::Redraw)]);
            }
            Message::DismissNotice(id) => {
                if self.notice.as_ref().is_some_and(|(shown, _)| *shown == id) {
                    self.notice = None;
                }
            }

            Message::Ignored => {}
        }
        Task::none()
    }

    /// Rebuilds the handout from the current inputs and redraws the preview.
    fn refresh_preview(&self) -> Task<Message> {
        let sections = document::build(&self.config, self.accounts.as_slice(), &self.catalog);
        self.render(SurfaceChange::Content(sections, IssuedDate::today()))
    }

    fn render(&self, change: SurfaceChange) -> Task<Message> {
        Task::perform(
            render_preview(Arc::clone(&self.surface), change),
            Message::PreviewRendered,
        )
    }

    fn start_export(&mut self, action: ExportAction) -> Task<Message> {
        if !self.gate.try_begin(action) {
            debug!("Ignoring {} while {:?} is running", action, self.gate.in_flight());
            return Task::none();
        }
        info!("Starting {}", action);

        let request = ExportRequest::new(&self.config, &self.accounts, &self.catalog);
        let orchestrator = self.orchestrator.clone();
        let finished = move |result| Message::ExportFinished(action, result);

        match action {
            ExportAction::Print => {
                Task::perform(async move { orchestrator.print(&request).await }, finished)
            }
            ExportAction::Pdf => {
                let surface = Arc::clone(&self.surface);
                Task::perform(
                    async move {
                        let mut surface = surface.lock_owned().await;
                        orchestrator.pdf(&request, &mut *surface).await
                    },
                    finished,
                )
            }
            ExportAction::Word => {
                Task::perform(async move { orchestrator.word(&request).await }, finished)
            }
        }
    }

    /// Shows `notice` and schedules its dismissal.
    fn show_notice(&mut self, notice: Notice) -> Task<Message> {
        self.notice_seq += 1;
        let id = self.notice_seq;
        let duration = notice.duration;
        self.notice = Some((id, notice));
        Task::perform(tokio::time::sleep(duration), move |()| {
            Message::DismissNotice(id)
        })
    }

    fn view(&self) -> Element<'_, Message> {
        let presets = view::PresetPanel {
            names: self.presets.names().map(str::to_string).collect(),
            current: self.current_preset.as_deref(),
            new_name: &self.new_preset_name,
        };
        let toolbar = view::view_toolbar(self.gate.in_flight());
        let editor = view::view_editor(presets, &self.config, &self.accounts, &self.catalog);
        let preview = view::view_preview(self.preview.as_ref(), self.preview_error.as_deref());

        let main = column![toolbar, row![editor, preview].height(Length::Fill)]
            .width(Length::Fill)
            .height(Length::Fill);

        match &self.notice {
            Some((_, notice)) => stack![
                main,
                container(view::view_notice(notice))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .padding(24)
                    .align_x(Alignment::Center)
                    .align_y(Alignment::End),
            ]
            .into(),
            None => main.into(),
        }
    }

    /// Keyboard shortcuts and window size tracking.
    #[allow(clippy::unused_self)] // Required signature for iced subscription
    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            keyboard::listen().map(|event| {
                if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
                    shortcut(&key, modifiers).map_or(Message::Ignored, Message::Export)
                } else {
                    Message::Ignored
                }
            }),
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }
}

/// Maps a key press to the export it triggers.
fn shortcut(key: &Key, modifiers: Modifiers) -> Option<ExportAction> {
    if !modifiers.command() || modifiers.shift() {
        return None;
    }
    match key {
        Key::Character(c) if c.as_str() == "p" => Some(ExportAction::Print),
        Key::Character(c) if c.as_str() == "e" => Some(ExportAction::Pdf),
        Key::Character(c) if c.as_str() == "d" => Some(ExportAction::Word),
        _ => None,
    }
}

/// Reads the settings file, creating it with defaults on first run.
async fn load_settings() -> Result<AppSettings, String> {
    let path = AppSettings::default_path();
    AppSettings::load_or_create(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))
        .map_err(|e| format!("{e:#}"))
}

/// Finds a preview font and hands it to the surface.
async fn load_face(
    surface: Arc<Mutex<PreviewSurface>>,
    configured: Option<std::path::PathBuf>,
) -> bool {
    let face = tokio::task::spawn_blocking(move || font::discover(configured.as_deref()))
        .await
        .unwrap_or_else(|e| {
            warn!("Font discovery task failed: {}", e);
            None
        });
    let mut surface = surface.lock().await;
    surface.set_face(face);
    surface.has_face()
}

/// Applies `change` to the surface and paints the visible viewport.
async fn render_preview(
    surface: Arc<Mutex<PreviewSurface>>,
    change: SurfaceChange,
) -> Result<PreviewFrame, String> {
    let mut surface = surface.lock_owned().await;
    match change {
        SurfaceChange::Content(sections, issued) => surface.present(&sections, issued),
        SurfaceChange::Scroll(offset) => surface.scroll_to(offset),
        SurfaceChange::Viewport(height) => surface.set_viewport_height(height),
        SurfaceChange::Redraw => {}
    }

    tokio::task::spawn_blocking(move || {
        let pixels = surface.viewport_image(PREVIEW_SCALE)?;
        let (width, height) = pixels.dimensions();
        #[allow(clippy::cast_precision_loss)] // Viewport images are far below 2^24 pixels
        let (shown_width, shown_height) = (
            width as f32 / PREVIEW_SCALE,
            height as f32 / PREVIEW_SCALE,
        );
        Ok(PreviewFrame {
            handle: image::Handle::from_rgba(width, height, pixels.into_raw()),
            scroll: surface.scroll_offset(),
            max_scroll: surface.max_scroll(),
            width: shown_width,
            height: shown_height,
        })
    })
    .await
    .map_err(|e| format!("preview task failed: {e}"))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn command_shortcuts_map_to_exports() {
        let key = |c: &str| Key::Character(c.into());
        assert_eq!(shortcut(&key("p"), Modifiers::COMMAND), Some(ExportAction::Print));
        assert_eq!(shortcut(&key("e"), Modifiers::COMMAND), Some(ExportAction::Pdf));
        assert_eq!(shortcut(&key("d"), Modifiers::COMMAND), Some(ExportAction::Word));
    }

    #[test]
    fn plain_or_shifted_keys_are_not_shortcuts() {
        let p = Key::Character("p".into());
        assert_eq!(shortcut(&p, Modifiers::empty()), None);
        assert_eq!(shortcut(&p, Modifiers::COMMAND | Modifiers::SHIFT), None);
        assert_eq!(shortcut(&Key::Character("x".into()), Modifiers::COMMAND), None);
    }
}
