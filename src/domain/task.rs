//! CSV rows, the drafts derived from them, and the outbound task payload.

use std::collections::HashMap;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::content::{parse_content, ParsedContent};
use super::due::{build_due, Due, DueError};
use super::priority::Priority;

/// One CSV record, keyed by upper-cased header names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub content: String,
    pub due_date: String,
    pub due_time: String,
    pub priority: String,
    pub description: String,
}

impl Row {
    /// Build a row from normalized header → value pairs.
    ///
    /// Missing columns read as empty strings.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            content: get("CONTENT"),
            due_date: get("DUE_DATE"),
            due_time: get("DUE_TIME"),
            priority: get("PRIORITY"),
            description: get("DESCRIPTION"),
        }
    }
}

/// A row that has been tokenized and validated, but not yet bound to
/// remote project and section IDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub labels: Vec<String>,
    pub section: Option<String>,
    pub due: Option<Due>,
    pub priority: Priority,
    pub description: Option<String>,
}

impl TaskDraft {
    /// Turn a row into a draft.
    ///
    /// Returns `Ok(None)` when CONTENT yields no title; such rows are
    /// skipped before their due columns are looked at.
    pub fn from_row(row: &Row, zone: Tz) -> Result<Option<Self>, DueError> {
        let ParsedContent {
            title,
            labels,
            section,
        } = parse_content(&row.content);

        if title.is_empty() {
            return Ok(None);
        }

        let due = build_due(Some(&row.due_date), Some(&row.due_time), zone)?;
        let description = Some(row.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Some(Self {
            title,
            labels,
            section,
            due,
            priority: Priority::from_external(&row.priority),
            description,
        }))
    }

    /// Bind the draft to its remote project (and section, if any)
    pub fn into_payload(self, project_id: &str, section_id: Option<String>) -> TaskPayload {
        let (due_date, due_datetime, due_lang) = match &self.due {
            Some(due @ Due::Date(_)) => (due.due_date(), None, None),
            Some(due @ Due::DateTime(_)) => (None, due.due_datetime(), Some(DUE_LANG.to_string())),
            None => (None, None, None),
        };

        TaskPayload {
            content: self.title,
            project_id: project_id.to_string(),
            labels: self.labels,
            priority: self.priority,
            due_date,
            due_datetime,
            due_lang,
            section_id,
            description: self.description,
        }
    }
}

/// Language hint sent alongside timed due values
pub const DUE_LANG: &str = "en";

/// Request body for task creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub content: String,
    pub project_id: String,
    pub labels: Vec<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
