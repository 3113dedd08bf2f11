//! ytdoit - personal automation pipelines
//!
//! Two independent one-shot pipelines:
//! - Transcript grabbing: a video or playlist URL becomes plain text,
//!   written to two files and copied to the clipboard
//! - Task import: the newest CSV export becomes Todoist tasks, with
//!   labels, sections, priorities and due values parsed per row
//!
//! # Modules
//!
//! - `adapters`: External systems (Todoist REST API, yt-dlp, clipboard)
//! - `config`: Config file discovery and layering
//! - `core`: The two pipelines (TaskImporter, TranscriptGrabber)
//! - `domain`: Row parsing (content tokens, priority, due values)
//! - `ingest`: CSV discovery and reading
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Import the newest CSV from the Downloads folders
//! TODOIST_TOKEN=... ytdoit import
//!
//! # Grab one transcript, or prompt for URLs
//! ytdoit grab https://youtu.be/dQw4w9WgXcQ
//! ytdoit grab
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ingest;

// Re-export main types at crate root for convenience
pub use adapters::{SystemClipboard, TodoistClient, YtDlp};
pub use core::{TaskImporter, TranscriptGrabber};
pub use domain::{parse_content, Priority, TaskDraft, TaskPayload};
