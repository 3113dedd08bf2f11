//! Task import pipeline.
//!
//! Rows are processed strictly in order. Project and sections are looked up
//! once per run; each row is tokenized, its due value and priority are
//! computed, its section is resolved, and the task is created.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::adapters::{CreatedTask, TodoistClient, TodoistError};
use crate::domain::{DueError, Row, TaskDraft, TaskPayload};
use crate::ingest::{read_rows, RowReadError};

/// Errors that abort an import run
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Rows {
        path: PathBuf,
        #[source]
        source: RowReadError,
    },

    #[error(transparent)]
    Todoist(#[from] TodoistError),

    #[error("Row {row}: {source}")]
    Due {
        row: usize,
        #[source]
        source: DueError,
    },

    #[error("Section \"{section}\" not found in project \"{project}\".")]
    SectionNotFound { section: String, project: String },
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Tasks the service accepted
    pub created: Vec<CreatedTask>,
    /// Payloads built but not sent (dry run)
    pub planned: Vec<TaskPayload>,
    /// Rows without a title
    pub skipped: usize,
}

impl ImportReport {
    /// Rows that made it to (or, in a dry run, would have reached) the service
    pub fn processed(&self) -> usize {
        self.created.len() + self.planned.len()
    }
}

/// Look up the section ID for a draft's section name.
///
/// No name means no section; an unknown name is fatal.
pub fn resolve_section(
    sections: &HashMap<String, String>,
    section: Option<&str>,
    project: &str,
) -> Result<Option<String>, ImportError> {
    match section {
        None => Ok(None),
        Some(name) => sections
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| ImportError::SectionNotFound {
                section: name.to_string(),
                project: project.to_string(),
            }),
    }
}

/// Imports CSV rows as Todoist tasks
pub struct TaskImporter {
    client: TodoistClient,
    project: String,
    timezone: Tz,
    dry_run: bool,
}

impl TaskImporter {
    /// Create an importer targeting `project`
    pub fn new(client: TodoistClient, project: impl Into<String>, timezone: Tz) -> Self {
        Self {
            client,
            project: project.into(),
            timezone,
            dry_run: false,
        }
    }

    /// Build payloads without creating anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Read a CSV file and import its rows
    pub async fn import_file(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let rows = read_rows(path).map_err(|source| ImportError::Rows {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(rows = rows.len(), "Read CSV");
        self.import_rows(&rows).await
    }

    /// Import already-parsed rows.
    ///
    /// The first failing row stops the run; tasks created before it stay.
    #[instrument(skip(self, rows), fields(project = %self.project, rows = rows.len()))]
    pub async fn import_rows(&self, rows: &[Row]) -> Result<ImportReport, ImportError> {
        let project = self.client.find_project(&self.project).await?;
        let sections = self.client.section_map(&project.id).await?;
        info!(project_id = %project.id, sections = sections.len(), "Resolved project");

        let mut report = ImportReport::default();

        for (idx, row) in rows.iter().enumerate() {
            let draft = TaskDraft::from_row(row, self.timezone)
                .map_err(|source| ImportError::Due { row: idx + 1, source })?;

            let Some(draft) = draft else {
                println!("Skipping row with empty title/CONTENT.");
                report.skipped += 1;
                continue;
            };

            let section_name = draft.section.clone();
            let section_id = resolve_section(&sections, section_name.as_deref(), &self.project)?;
            let payload = draft.into_payload(&project.id, section_id);

            if self.dry_run {
                match serde_json::to_string(&payload) {
                    Ok(json) => println!("[dry-run] {}", json),
                    Err(_) => println!("[dry-run] {:?}", payload),
                }
                report.planned.push(payload);
                continue;
            }

            let task = self.client.create_task(&payload).await?;
            println!(
                "✓ {} → {}  (id={})",
                task.content,
                section_name.as_deref().unwrap_or("(no section)"),
                task.id
            );
            report.created.push(task);
        }

        Ok(report)
    }
}
