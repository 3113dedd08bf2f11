//! Pipeline orchestration.
//!
//! This module contains:
//! - Importer: CSV rows → Todoist tasks
//! - Grabber: YouTube URL → transcript files + clipboard

pub mod grabber;
pub mod importer;

// Re-export commonly used types
pub use grabber::{
    clean_playlist_url, playlist_id, video_id_from_url, GrabError, Grabbed, TranscriptGrabber,
};
pub use importer::{resolve_section, ImportError, ImportReport, TaskImporter};
