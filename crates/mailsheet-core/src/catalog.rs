//! Fixed catalog of protocol/port rows shown in every handout.

use std::collections::HashSet;

use crate::document::text;
use crate::{Error, Result};

/// Whether a port is used for receiving or sending mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Incoming mail (POP3/IMAP).
    Receive,
    /// Outgoing mail (SMTP).
    Send,
}

impl Direction {
    /// Group label shown in the first column of the port table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Receive => text::RECEIVE_GROUP,
            Self::Send => text::SEND_GROUP,
        }
    }
}

/// One row of the port catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortOption {
    /// Stable identifier, used as a member of [`crate::Config::selected_ports`].
    pub id: &'static str,
    /// Receive or send.
    pub direction: Direction,
    /// Protocol label, e.g. `IMAP over SSL`.
    pub protocol: &'static str,
    /// Port number as displayed.
    pub port: &'static str,
    /// Whether the connection is encrypted.
    pub encrypted: bool,
}

impl PortOption {
    /// Mark shown in the encryption column.
    #[must_use]
    pub const fn encryption_mark(&self) -> &'static str {
        if self.encrypted {
            text::ENCRYPTED_MARK
        } else {
            text::PLAIN_MARK
        }
    }
}

const STANDARD_ROWS: [PortOption; 6] = [
    PortOption {
        id: "pop3",
        direction: Direction::Receive,
        protocol: "POP3",
        port: "110",
        encrypted: false,
    },
    PortOption {
        id: "pop_ssl",
        direction: Direction::Receive,
        protocol: "POP over SSL",
        port: "995",
        encrypted: true,
    },
    PortOption {
        id: "imap",
        direction: Direction::Receive,
        protocol: "IMAP",
        port: "143",
        encrypted: false,
    },
    PortOption {
        id: "imap_ssl",
        direction: Direction::Receive,
        protocol: "IMAP over SSL",
        port: "993",
        encrypted: true,
    },
    PortOption {
        id: "smtp",
        direction: Direction::Send,
        protocol: "SMTP",
        port: "587",
        encrypted: false,
    },
    PortOption {
        id: "smtp_ssl",
        direction: Direction::Send,
        protocol: "SMTP over SSL",
        port: "465",
        encrypted: true,
    },
];

/// Ordered, immutable list of port rows.
///
/// Row order defines grouping: consecutive rows with the same direction form
/// one group in every rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCatalog {
    rows: Vec<PortOption>,
}

impl PortCatalog {
    /// The six standard rows: four receive, then two send.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rows: STANDARD_ROWS.to_vec(),
        }
    }

    /// Creates a catalog from custom rows.
    ///
    /// # Errors
    ///
    /// Returns an error if two rows share an id.
    pub fn new(rows: Vec<PortOption>) -> Result<Self> {
        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.id) {
                return Err(Error::Settings(format!("duplicate port id: {}", row.id)));
            }
        }
        Ok(Self { rows })
    }

    /// Iterates rows in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PortOption> {
        self.rows.iter()
    }

    /// Returns the row with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PortOption> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Returns `true` if the catalog has a row with the given id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the catalog has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for PortCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a PortCatalog {
    type Item = &'a PortOption;
    type IntoIter = std::slice::Iter<'a, PortOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_groups_receive_then_send() {
        let catalog = PortCatalog::standard();
        let directions: Vec<_> = catalog.iter().map(|row| row.direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::Receive,
                Direction::Receive,
                Direction::Receive,
                Direction::Receive,
                Direction::Send,
                Direction::Send,
            ]
        );
    }

    #[test]
    fn standard_catalog_ids_are_unique() {
        let catalog = PortCatalog::standard();
        assert!(PortCatalog::new(catalog.iter().copied().collect()).is_ok());
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let row = *PortCatalog::standard().get("imap").unwrap();
        let err = PortCatalog::new(vec![row, row]).unwrap_err();
        assert!(err.to_string().contains("imap"));
    }

    #[test]
    fn encryption_marks() {
        let catalog = PortCatalog::standard();
        assert_eq!(catalog.get("smtp_ssl").unwrap().encryption_mark(), "○");
        assert_eq!(catalog.get("smtp").unwrap().encryption_mark(), "×");
        assert_eq!(catalog.get("pop3").unwrap().port, "110");
    }
}
