//! # mailsheet-core
//!
//! Core logic for the `MailSheet` settings handout tool.
//!
//! This crate provides:
//! - The fixed protocol/port catalog
//! - The editable [`Config`] and the recipient [`AccountList`]
//! - A durable, name-keyed [`PresetStore`]
//! - The renderer-agnostic [`Sections`] tree built from those inputs
//! - Three renderers that walk the same tree: printable HTML, a rasterized
//!   single-page PDF captured from the live preview, and a Word document
//! - The [`ExportOrchestrator`] that dispatches export actions and turns
//!   failures into transient notices

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod document;
pub mod docx;
mod error;
pub mod export;
pub mod model;
pub mod preset;
pub mod print;
pub mod raster;
pub mod settings;

pub use catalog::{Direction, PortCatalog, PortOption};
pub use document::{IssuedDate, SectionVisitor, Sections};
pub use docx::StructuredDocExporter;
pub use error::{Error, ExportError, ExportErrorKind, PresetError, Result};
pub use export::{
    ExportAction, ExportGate, ExportOrchestrator, ExportOutcome, ExportRequest, Notice,
    NoticeLevel,
};
pub use model::{Account, AccountField, AccountList, Config, PortId};
pub use preset::{JsonFileBackend, MemoryBackend, PresetBackend, PresetStore};
pub use print::{OpenerLauncher, PrintLauncher, PrintRenderer};
pub use raster::{LiveSurface, PreviewSurface, RasterExporter, ScrollGuard};
pub use settings::AppSettings;
