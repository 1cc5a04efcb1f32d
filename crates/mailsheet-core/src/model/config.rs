//! Server configuration model.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::PortCatalog;

/// Identifier of a [`crate::PortOption`] held in a selection set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(String);

impl PortId {
    /// Creates a port id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Connection parameters printed on the handout.
///
/// This is also the payload of a preset. Field names follow the persisted
/// record (`receiveServer`, `sendServer`, `manualUrl`, `selectedPorts`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Incoming mail server host.
    #[serde(default)]
    pub receive_server: String,
    /// Outgoing (SMTP) server host.
    #[serde(default)]
    pub send_server: String,
    /// Link to the setup manual; omitted from the handout when empty.
    #[serde(default)]
    pub manual_url: String,
    /// Catalog rows highlighted as recommended.
    #[serde(default)]
    pub selected_ports: BTreeSet<PortId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            receive_server: "example.jp".to_string(),
            send_server: "example.jp".to_string(),
            manual_url: "https://example.jp".to_string(),
            selected_ports: ["pop_ssl", "imap_ssl", "smtp_ssl"]
                .into_iter()
                .map(PortId::from)
                .collect(),
        }
    }
}

impl Config {
    /// Returns `true` if the catalog row with this id is selected.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ports.contains(&PortId::from(id))
    }

    /// Flips the selection of a port. Toggling twice restores the original set.
    pub fn toggle_port(&mut self, id: &str) {
        let id = PortId::from(id);
        if !self.selected_ports.remove(&id) {
            self.selected_ports.insert(id);
        }
    }

    /// Drops selected ids that the catalog does not know.
    ///
    /// Presets written by other versions may carry ids that are no longer in
    /// the catalog.
    pub fn restrict_to(&mut self, catalog: &PortCatalog) {
        self.selected_ports.retain(|id| catalog.contains(id.as_str()));
    }
}
