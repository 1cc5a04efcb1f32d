//! Named configuration presets.
//!
//! Provides the persistence backends and the store that keeps them in sync.

mod backend;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, PresetBackend};
pub use store::{PresetMap, PresetStore};
