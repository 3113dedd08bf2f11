//! YouTube adapter backed by the `yt-dlp` executable.
//!
//! Transcripts are fetched as `json3` subtitle files (manual captions or
//! auto-generated ones) into a temp dir and parsed; playlists are listed
//! flat, without touching the individual videos.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::{PlaylistEntry, TranscriptChunk, TranscriptError, TranscriptSource};

/// yt-dlp based transcript source
pub struct YtDlp {
    /// Path to the yt-dlp binary (default: "yt-dlp", or $YTDLP_PATH)
    binary_path: String,
    /// Subtitle language code
    language: String,
}

impl YtDlp {
    /// Create an adapter using `$YTDLP_PATH` or `yt-dlp` from PATH
    pub fn new(language: impl Into<String>) -> Self {
        let binary_path = std::env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string());
        Self::with_binary_path(binary_path, language)
    }

    /// Create an adapter with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            language: language.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, TranscriptError> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TranscriptError::Tool(format!("Failed to run {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptError::Tool(format!("yt-dlp failed: {}", stderr.trim())));
        }

        Ok(output.stdout)
    }
}

/// Locate the subtitle file yt-dlp wrote for `video_id`
async fn find_subtitle_file(dir: &Path, video_id: &str, language: &str) -> Option<PathBuf> {
    let expected = dir.join(format!("{}.{}.json3", video_id, language));
    if expected.exists() {
        return Some(expected);
    }

    // Regional variants such as en-US
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json3") {
            return Some(path);
        }
    }
    None
}

#[async_trait]
impl TranscriptSource for YtDlp {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptChunk>, TranscriptError> {
        let temp_dir = tempfile::tempdir()?;
        let template = temp_dir.path().join("%(id)s.%(ext)s");
        let template = template.to_string_lossy();
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        self.run(&[
            "--skip-download",
            "--write-subs",
            "--write-auto-subs",
            "--sub-langs",
            self.language.as_str(),
            "--sub-format",
            "json3",
            "--no-warnings",
            "--no-playlist",
            "-o",
            template.as_ref(),
            url.as_str(),
        ])
        .await?;

        let path = find_subtitle_file(temp_dir.path(), video_id, &self.language)
            .await
            .ok_or_else(|| TranscriptError::Unavailable(video_id.to_string()))?;
        debug!("Reading subtitles from {}", path.display());

        let content = tokio::fs::read_to_string(&path).await?;
        parse_json3(&content)
    }

    async fn playlist_entries(&self, playlist_url: &str) -> Result<Vec<PlaylistEntry>, TranscriptError> {
        let stdout = self
            .run(&["--flat-playlist", "--dump-single-json", "--no-warnings", playlist_url])
            .await?;
        parse_playlist(&String::from_utf8_lossy(&stdout))
    }
}

/// json3 subtitle structure
#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 subtitle document into caption chunks, dropping blank ones
pub fn parse_json3(content: &str) -> Result<Vec<TranscriptChunk>, TranscriptError> {
    let doc: Json3 = serde_json::from_str(content)?;

    Ok(doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptChunk {
                text: text.to_string(),
                start_secs: event.t_start_ms as f64 / 1000.0,
                duration_secs: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}

/// Flat playlist dump
#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    entries: Vec<Option<FlatEntry>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: Option<String>,
    title: Option<String>,
}

/// Parse `--flat-playlist --dump-single-json` output, skipping placeholders
pub fn parse_playlist(content: &str) -> Result<Vec<PlaylistEntry>, TranscriptError> {
    let playlist: FlatPlaylist = serde_json::from_str(content)?;

    Ok(playlist
        .entries
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let id = entry.id?;
            let title = entry.title.unwrap_or_else(|| id.clone());
            Some(PlaylistEntry { id, title })
        })
        .collect())
}
