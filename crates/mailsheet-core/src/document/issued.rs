//! The issued-date stamp shared by one export action.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

/// Date printed on a handout.
///
/// Read from the clock once per export action and handed to every renderer,
/// so outputs of the same action carry the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssuedDate(NaiveDate);

impl IssuedDate {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date on the local clock.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The wrapped date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Short Japanese form, e.g. `2026/10/6`.
    #[must_use]
    pub fn display(self) -> String {
        format!("{}/{}/{}", self.0.year(), self.0.month(), self.0.day())
    }

    /// ISO 8601 form used in file names, e.g. `2026-10-06`.
    #[must_use]
    pub fn iso(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for IssuedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<NaiveDate> for IssuedDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
