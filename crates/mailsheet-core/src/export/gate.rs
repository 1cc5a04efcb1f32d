//! Admission control for export actions.

use super::ExportAction;

/// Allows one export at a time.
///
/// A second action started while one is in flight is rejected rather than
/// queued; the caller tells the user and they try again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportGate {
    in_flight: Option<ExportAction>,
}

impl ExportGate {
    /// Creates an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self { in_flight: None }
    }

    /// Marks `action` as running. Returns `false` if another export is
    /// already running.
    pub fn try_begin(&mut self, action: ExportAction) -> bool {
        if self.in_flight.is_some() {
            tracing::debug!(?action, running = ?self.in_flight, "Export rejected, another is running");
            return false;
        }
        self.in_flight = Some(action);
        true
    }

    /// Marks `action` as finished. A mismatched action is ignored.
    pub fn finish(&mut self, action: ExportAction) {
        if self.in_flight == Some(action) {
            self.in_flight = None;
        }
    }

    /// The running action, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<ExportAction> {
        self.in_flight
    }

    /// Returns `true` while an export is running.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}
