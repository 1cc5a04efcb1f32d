//! Preset store keyed by name.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::backend::PresetBackend;
use crate::PresetError;
use crate::model::Config;

/// Mapping from preset name to its configuration snapshot.
pub type PresetMap = BTreeMap<String, Config>;

/// Named [`Config`] snapshots persisted through a [`PresetBackend`].
///
/// Every mutation writes the full mapping back to the backend before
/// returning. Accounts are never part of a preset.
#[derive(Debug)]
pub struct PresetStore<B> {
    backend: B,
    presets: PresetMap,
}

impl<B: PresetBackend> PresetStore<B> {
    /// Creates a store over `backend`. Call [`load`](Self::load) to read it.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            presets: BTreeMap::new(),
        }
    }

    /// Reads the mapping from the backend.
    ///
    /// A missing or malformed record yields an empty mapping; the failure is
    /// logged and otherwise ignored.
    pub fn load(&mut self) -> PresetMap {
        self.presets = match self.read_record() {
            Ok(presets) => presets,
            Err(e) => {
                warn!("Presets unavailable, starting empty: {}", e);
                BTreeMap::new()
            }
        };
        info!("Loaded {} presets", self.presets.len());
        self.presets.clone()
    }

    fn read_record(&self) -> Result<PresetMap, PresetError> {
        let Some(contents) = self.backend.read()? else {
            return Err(PresetError::Unavailable("no preset record".to_string()));
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Stores `config` under `name`, replacing any preset with that name.
    ///
    /// A blank name is ignored and yields `Ok(None)`; otherwise returns the
    /// accepted name.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping cannot be persisted. The in-memory
    /// mapping is then left as it was.
    pub fn save(&mut self, name: &str, config: &Config) -> Result<Option<String>, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let mut candidate = self.presets.clone();
        candidate.insert(name.to_string(), config.clone());
        self.commit(candidate)?;
        debug!("Preset saved: {}", name);
        Ok(Some(name.to_string()))
    }

    /// Removes the preset named `name`, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping cannot be persisted. The entry then
    /// stays in the in-memory mapping.
    pub fn delete(&mut self, name: &str) -> Result<bool, PresetError> {
        let mut candidate = self.presets.clone();
        let removed = candidate.remove(name).is_some();
        self.commit(candidate)?;
        debug!("Preset deleted: {} (present: {})", name, removed);
        Ok(removed)
    }

    /// Writes `candidate` to the backend and adopts it only once written.
    fn commit(&mut self, candidate: PresetMap) -> Result<(), PresetError> {
        let contents = serde_json::to_string_pretty(&candidate)?;
        self.backend.write(&contents)?;
        self.presets = candidate;
        Ok(())
    }

    /// Returns the preset named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Config> {
        self.presets.get(name)
    }

    /// Preset names in mapping order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// The current mapping.
    #[must_use]
    pub const fn presets(&self) -> &PresetMap {
        &self.presets
    }

    /// Picks the preset used to populate the configuration at startup.
    ///
    /// This is the first entry in mapping order; callers should only rely on
    /// some single entry being chosen.
    #[must_use]
    pub fn select_default(mapping: &PresetMap) -> Option<&str> {
        mapping.keys().next().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PortId;
    use crate::preset::{JsonFileBackend, MemoryBackend};

    /// Serves a fixed record and refuses every write.
    struct ReadOnlyBackend {
        record: Option<String>,
    }

    impl PresetBackend for ReadOnlyBackend {
        fn read(&self) -> Result<Option<String>, PresetError> {
            Ok(self.record.clone())
        }

        fn write(&self, _contents: &str) -> Result<(), PresetError> {
            Err(PresetError::Unavailable("disk full".to_string()))
        }
    }

    fn office_config() -> Config {
        Config {
            receive_server: "pop.office.example.jp".to_string(),
            send_server: "smtp.office.example.jp".to_string(),
            manual_url: String::new(),
            selected_ports: [PortId::from("imap_ssl")].into_iter().collect(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let backend = MemoryBackend::new();
        let mut store = PresetStore::new(backend.clone());
        store.save("office", &office_config()).unwrap();

        let mut reloaded = PresetStore::new(backend);
        let mapping = reloaded.load();
        assert_eq!(mapping.get("office"), Some(&office_config()));
    }

    #[test]
    fn blank_name_is_ignored() {
        let backend = MemoryBackend::new();
        let mut store = PresetStore::new(backend.clone());
        assert_eq!(store.save("", &Config::default()).unwrap(), None);
        assert_eq!(store.save("   ", &Config::default()).unwrap(), None);
        assert!(backend.contents().is_none());
        assert!(store.presets().is_empty());
    }

    #[test]
    fn save_overwrites_existing_name() {
        let mut store = PresetStore::new(MemoryBackend::new());
        store.save("office", &Config::default()).unwrap();
        store.save("office", &office_config()).unwrap();
        assert_eq!(store.presets().len(), 1);
        assert_eq!(store.get("office"), Some(&office_config()));
    }

    #[test]
    fn delete_removes_only_that_entry() {
        let backend = MemoryBackend::new();
        let mut store = PresetStore::new(backend.clone());
        store.save("office", &office_config()).unwrap();
        store.save("branch", &Config::default()).unwrap();

        assert!(store.delete("office").unwrap());
        assert!(!store.delete("office").unwrap());

        let mut reloaded = PresetStore::new(backend);
        let mapping = reloaded.load();
        assert!(!mapping.contains_key("office"));
        assert!(mapping.contains_key("branch"));
    }

    #[test]
    fn malformed_record_loads_empty() {
        let mut store = PresetStore::new(MemoryBackend::with_contents("{not json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn missing_record_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::new(JsonFileBackend::new(dir.path().join("presets.json")));
        assert!(store.load().is_empty());
    }

    #[test]
    fn select_default_picks_single_entry() {
        let mut store = PresetStore::new(MemoryBackend::new());
        assert_eq!(PresetStore::<MemoryBackend>::select_default(store.presets()), None);

        store.save("office", &office_config()).unwrap();
        store.save("branch", &Config::default()).unwrap();
        let chosen = PresetStore::<MemoryBackend>::select_default(store.presets()).unwrap();
        assert!(store.get(chosen).is_some());
    }

    #[test]
    fn record_is_readable_json_mapping() {
        let backend = MemoryBackend::new();
        let mut store = PresetStore::new(backend.clone());
        store.save("office", &office_config()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&backend.contents().unwrap()).unwrap();
        assert_eq!(json["office"]["receiveServer"], "pop.office.example.jp");
        assert_eq!(json["office"]["selectedPorts"], serde_json::json!(["imap_ssl"]));
    }

    #[test]
    fn failed_save_leaves_mapping_unchanged() {
        let mut store = PresetStore::new(ReadOnlyBackend { record: None });
        let result = store.save("office", &office_config());
        assert!(matches!(result, Err(PresetError::Unavailable(_))));
        assert_eq!(store.names().count(), 0);
        assert!(store.get("office").is_none());
    }

    #[test]
    fn failed_delete_keeps_entry() {
        let mapping: PresetMap = [("office".to_string(), office_config())].into_iter().collect();
        let record = serde_json::to_string(&mapping).unwrap();
        let mut store = PresetStore::new(ReadOnlyBackend { record: Some(record) });
        store.load();

        assert!(store.delete("office").is_err());
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["office"]);
        assert_eq!(store.get("office"), Some(&office_config()));
    }
}
