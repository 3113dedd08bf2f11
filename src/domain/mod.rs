//! Domain types for the task importer.
//!
//! This module contains the pure, I/O-free pieces:
//! - Content: CONTENT tokenizer (title, labels, section)
//! - Priority: external `P1..P4` to API priority
//! - Due: all-day and timed due values
//! - Task: rows, drafts and the outbound payload

pub mod content;
pub mod due;
pub mod priority;
pub mod task;

// Re-export commonly used types
pub use content::{parse_content, ParsedContent};
pub use due::{build_due, Due, DueError};
pub use priority::Priority;
pub use task::{Row, TaskDraft, TaskPayload};
