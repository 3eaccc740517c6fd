//! Dated changelog entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `%changelog` entry.
///
/// Entries are written in the order they were added; sorting them is up to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Date of the change. Weekday and month names are derived from it.
    pub date: NaiveDate,
    /// Author's display name.
    pub author: String,
    /// Author's email address, without angle brackets.
    pub email: String,
    /// One-line description of the change.
    pub message: String,
}

impl ChangelogEntry {
    /// Create an entry.
    pub fn new(
        date: NaiveDate,
        author: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            date,
            author: author.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// The `* Wkd Mon Year Author <email>` header line.
    pub fn header(&self) -> String {
        format!(
            "* {} {} <{}>",
            self.date.format("%a %b %Y"),
            self.author,
            self.email
        )
    }
}

impl fmt::Display for ChangelogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n- {}", self.header(), self.message)
    }
}
