//! Adapter interfaces for external systems.
//!
//! Adapters wrap everything that leaves the process: the Todoist REST API,
//! the video platform (through yt-dlp) and the system clipboard.

pub mod clipboard;
pub mod todoist;
pub mod youtube;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

pub use clipboard::SystemClipboard;
pub use todoist::{CreatedTask, Project, Section, TodoistClient, TodoistError};
pub use youtube::YtDlp;

/// Errors from a transcript source
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Captions are disabled or missing for this video
    #[error("No transcript for {0}")]
    Unavailable(String),

    /// The backend tool failed or could not be started
    #[error("{0}")]
    Tool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected response: {0}")]
    Json(#[from] serde_json::Error),
}

/// One caption line
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptChunk {
    pub text: String,
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// One video in a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: String,
    pub title: String,
}

impl PlaylistEntry {
    /// Short link to the video
    pub fn url(&self) -> String {
        format!("https://youtu.be/{}", self.id)
    }
}

/// Trait for transcript backends
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Caption chunks for one video, in order
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptChunk>, TranscriptError>;

    /// Flattened playlist listing (no per-video requests)
    async fn playlist_entries(&self, playlist_url: &str) -> Result<Vec<PlaylistEntry>, TranscriptError>;
}

/// Anything that can receive copied text
pub trait ClipboardSink: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}
