//! Priority mapping between the spreadsheet and the task service.
//!
//! Spreadsheets use the app's labels (`P1` is most urgent), while the REST
//! API counts the other way round (`4` is most urgent).

use std::fmt;

use serde::{Deserialize, Serialize};

/// API-side priority, 1 (lowest) through 4 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Most urgent (external `P1`)
    pub const HIGHEST: Priority = Priority(4);

    /// Least urgent (external `P4`), also the fallback
    pub const LOWEST: Priority = Priority(1);

    /// Map an external value (`P1`..`P4`, `1`..`4`, any case) to the API value.
    ///
    /// Never fails: anything unrecognized becomes [`Priority::LOWEST`].
    pub fn from_external(value: &str) -> Self {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix('P')
            .or_else(|| trimmed.strip_prefix('p'))
            .unwrap_or(trimmed);

        match digits {
            "1" => Priority(4),
            "2" => Priority(3),
            "3" => Priority(2),
            "4" => Priority(1),
            _ => Self::LOWEST,
        }
    }

    /// The numeric value sent over the wire
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=4 => Ok(Priority(value)),
            _ => Err(format!("priority must be 1..=4, got {}", value)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show it the way the user typed it
        write!(f, "P{}", 5 - self.0)
    }
}
