//! Dispatch of export actions and conversion of their results to notices.

mod gate;
mod notice;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use gate::ExportGate;
pub use notice::{Notice, NoticeLevel};

use crate::catalog::PortCatalog;
use crate::document::{self, IssuedDate, Sections};
use crate::docx::StructuredDocExporter;
use crate::error::ExportError;
use crate::model::{AccountList, Config};
use crate::print::{OpenerLauncher, PrintLauncher, PrintRenderer, with_auto_print};
use crate::raster::{LiveSurface, RasterExporter};
use crate::settings::AppSettings;

/// A user-triggered export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportAction {
    /// Open the print view.
    Print,
    /// Save a rasterized PDF.
    Pdf,
    /// Save a Word document.
    Word,
}

impl ExportAction {
    /// All actions in toolbar order.
    pub const ALL: [Self; 3] = [Self::Print, Self::Pdf, Self::Word];

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Print => "印刷",
            Self::Pdf => "PDF出力",
            Self::Word => "Word出力",
        }
    }

    /// Name of the file written for this action, if it writes one.
    #[must_use]
    pub fn file_name(self, issued: IssuedDate) -> Option<String> {
        let extension = match self {
            Self::Print => return None,
            Self::Pdf => "pdf",
            Self::Word => "docx",
        };
        Some(format!("mail_settings_{}.{extension}", issued.iso()))
    }
}

impl std::fmt::Display for ExportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Content and date of one export action.
///
/// The date is read once when the request is made, so every renderer used by
/// the action prints the same day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// What to render.
    pub sections: Sections,
    /// Date stamped on the output.
    pub issued: IssuedDate,
}

impl ExportRequest {
    /// Builds a request dated today.
    #[must_use]
    pub fn new(config: &Config, accounts: &AccountList, catalog: &PortCatalog) -> Self {
        Self::dated(config, accounts, catalog, IssuedDate::today())
    }

    /// Builds a request with an explicit date.
    #[must_use]
    pub fn dated(
        config: &Config,
        accounts: &AccountList,
        catalog: &PortCatalog,
        issued: IssuedDate,
    ) -> Self {
        Self {
            sections: document::build(config, accounts.as_slice(), catalog),
            issued,
        }
    }
}

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The print document was handed to a viewer.
    PrintOpened(PathBuf),
    /// A file was written.
    Saved(PathBuf),
}

impl ExportOutcome {
    /// Path of the written document.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PrintOpened(path) | Self::Saved(path) => path,
        }
    }
}

/// Runs export actions against the configured output locations.
#[derive(Clone)]
pub struct ExportOrchestrator {
    settings: AppSettings,
    launcher: Arc<dyn PrintLauncher>,
    print_dir: PathBuf,
}

impl std::fmt::Debug for ExportOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportOrchestrator")
            .field("settings", &self.settings)
            .field("print_dir", &self.print_dir)
            .finish_non_exhaustive()
    }
}

impl ExportOrchestrator {
    /// Creates an orchestrator that prints through the system viewer.
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        Self::with_launcher(settings, Arc::new(OpenerLauncher))
    }

    /// Creates an orchestrator with a custom print launcher.
    #[must_use]
    pub fn with_launcher(settings: AppSettings, launcher: Arc<dyn PrintLauncher>) -> Self {
        Self {
            settings,
            launcher,
            print_dir: std::env::temp_dir(),
        }
    }

    /// Writes print documents to `dir` instead of the temporary directory.
    #[must_use]
    pub fn with_print_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.print_dir = dir.into();
        self
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Opens the print view.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SecondaryContextBlocked`] if the document cannot
    /// be written or no viewer accepts it.
    pub async fn print(&self, request: &ExportRequest) -> Result<ExportOutcome, ExportError> {
        let markup = with_auto_print(
            &PrintRenderer::render(&request.sections, request.issued),
            self.settings.print_settle_delay(),
        );
        let dir = self.print_dir.clone();
        let prefix = format!("mailsheet_print_{}_", request.issued.iso());
        let path = tokio::task::spawn_blocking(move || write_print_file(&dir, &prefix, &markup))
            .await
            .map_err(|e| ExportError::SecondaryContextBlocked(e.to_string()))??;

        let launcher = Arc::clone(&self.launcher);
        let target = path.clone();
        tokio::task::spawn_blocking(move || launcher.open(&target))
            .await
            .map_err(|e| ExportError::SecondaryContextBlocked(e.to_string()))?
            .map_err(|e| ExportError::SecondaryContextBlocked(e.to_string()))?;

        tracing::info!("Opened print view {}", path.display());
        Ok(ExportOutcome::PrintOpened(path))
    }

    /// Captures `surface` and saves it as a PDF.
    ///
    /// # Errors
    ///
    /// Returns the capture or encoding error, or
    /// [`ExportError::SaveFailed`] if the file cannot be written.
    pub async fn pdf<S: LiveSurface>(
        &self,
        request: &ExportRequest,
        surface: &mut S,
    ) -> Result<ExportOutcome, ExportError> {
        let bytes = RasterExporter::new(self.settings.raster_scale())
            .export(surface, &request.sections, request.issued)
            .await?;
        self.save(ExportAction::Pdf, request.issued, &bytes).await
    }

    /// Builds and saves a Word document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::PackagingFailed`] or
    /// [`ExportError::SaveFailed`].
    pub async fn word(&self, request: &ExportRequest) -> Result<ExportOutcome, ExportError> {
        let bytes = StructuredDocExporter::export(&request.sections, request.issued).await?;
        self.save(ExportAction::Word, request.issued, &bytes).await
    }

    async fn save(
        &self,
        action: ExportAction,
        issued: IssuedDate,
        bytes: &[u8],
    ) -> Result<ExportOutcome, ExportError> {
        let Some(name) = action.file_name(issued) else {
            return Err(ExportError::SaveFailed(format!("{action} does not write a file")));
        };
        let dir = self.settings.output_dir();
        let path = dir.join(name);

        let failed = |e: std::io::Error| ExportError::SaveFailed(format!("{}: {e}", path.display()));
        tokio::fs::create_dir_all(&dir).await.map_err(failed)?;
        tokio::fs::write(&path, bytes).await.map_err(failed)?;

        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(ExportOutcome::Saved(path))
    }

    /// Turns the result of `action` into the notice shown to the user.
    ///
    /// Failures are logged here; nothing else about them reaches the user.
    #[must_use]
    pub fn notice_for(
        &self,
        action: ExportAction,
        result: &Result<ExportOutcome, ExportError>,
    ) -> Notice {
        let duration = self.settings.notice_duration();
        match result {
            Ok(ExportOutcome::PrintOpened(_)) => Notice::info("印刷画面を開きました。", duration),
            Ok(ExportOutcome::Saved(path)) => {
                let name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
                Notice::info(format!("{name} を保存しました。"), duration)
            }
            Err(error) => {
                tracing::warn!(?action, kind = ?error.kind(), "Export failed: {}", error);
                let summary = match action {
                    ExportAction::Print => "ポップアップがブロックされました。",
                    ExportAction::Pdf => "PDF生成に失敗しました。",
                    ExportAction::Word => "Word出力に失敗しました。",
                };
                let message = format!("{summary}詳細： {}", error.diagnostic());
                Notice::error(message, duration)
            }
        }
    }
}

/// Writes `markup` to a freshly named file in `dir` and keeps it for the
/// viewer.
fn write_print_file(dir: &Path, prefix: &str, markup: &str) -> Result<PathBuf, ExportError> {
    let blocked =
        |e: std::io::Error| ExportError::SecondaryContextBlocked(format!("{}: {e}", dir.display()));
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".html")
        .tempfile_in(dir)
        .map_err(blocked)?;
    file.write_all(markup.as_bytes()).map_err(blocked)?;
    let (_, path) = file.keep().map_err(|e| blocked(e.error))?;
    Ok(path)
}
