//! Transcript capture pipeline.
//!
//! URL → video ID (or playlist listing) → transcript fetch → text
//! concatenation → both output files + clipboard.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::adapters::{ClipboardSink, TranscriptChunk, TranscriptError, TranscriptSource};
use crate::config::TranscriptSettings;

/// Width of the rule printed around playlist titles
const RULE_WIDTH: usize = 40;

/// Errors that can occur while grabbing transcripts
#[derive(Debug, Error)]
pub enum GrabError {
    #[error("Could not parse a YouTube video ID from that URL.")]
    InvalidUrl(String),

    #[error("Could not fetch playlist metadata.")]
    EmptyPlaylist(String),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:www\.)?(?:youtu\.be/|youtube\.com/(?:watch\?v=|embed/|v/))(?P<id>[A-Za-z0-9_-]{11})",
        )
        .expect("video id pattern is valid")
    })
}

/// Extract the 11-character video ID from a watch, embed or short link
pub fn video_id_from_url(url: &str) -> Option<String> {
    video_id_pattern()
        .captures(url.trim())
        .map(|c| c["id"].to_string())
}

/// The `list` query parameter, if present and non-empty
pub fn playlist_id(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = Url::parse(url)
        .or_else(|_| Url::parse(&format!("https://{}", url)))
        .ok()?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Canonical playlist page for any URL carrying a `list` parameter
pub fn clean_playlist_url(url: &str) -> Option<String> {
    playlist_id(url).map(|id| format!("https://www.youtube.com/playlist?list={}", id))
}

/// Join caption chunks into one line of text
pub fn join_chunks(chunks: &[TranscriptChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One playlist item as it appears in the formatted transcript
pub fn format_playlist_block(title: &str, text: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!("\n{rule}\n{title}\n{rule}\n{text}\n")
}

/// What a grab produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grabbed {
    /// Text written to the formatted file and the clipboard
    pub text: String,
    /// Number of videos fetched (1 for a single video)
    pub videos: usize,
    /// Whether the input was a playlist
    pub playlist: bool,
    /// Whether the clipboard copy succeeded
    pub copied: bool,
}

/// Fetches transcripts and writes them out
pub struct TranscriptGrabber {
    source: Box<dyn TranscriptSource>,
    clipboard: Box<dyn ClipboardSink>,
    settings: TranscriptSettings,
}

impl TranscriptGrabber {
    /// Create a grabber
    pub fn new(
        source: Box<dyn TranscriptSource>,
        clipboard: Box<dyn ClipboardSink>,
        settings: TranscriptSettings,
    ) -> Self {
        Self {
            source,
            clipboard,
            settings,
        }
    }

    /// Grab a playlist or a single video, depending on the URL
    pub async fn grab(&self, url: &str) -> Result<Grabbed, GrabError> {
        if playlist_id(url).is_some() {
            self.grab_playlist(url).await
        } else {
            self.grab_single(url).await
        }
    }

    /// Transcript text for one video; a missing transcript yields ""
    async fn transcript_text(&self, video_id: &str) -> Result<String, TranscriptError> {
        match self.source.fetch_transcript(video_id).await {
            Ok(chunks) => Ok(join_chunks(&chunks)),
            Err(TranscriptError::Unavailable(_)) => {
                warn!("No transcript for {}", video_id);
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Grab one video's transcript
    #[instrument(skip(self))]
    pub async fn grab_single(&self, url: &str) -> Result<Grabbed, GrabError> {
        let video_id =
            video_id_from_url(url).ok_or_else(|| GrabError::InvalidUrl(url.to_string()))?;

        let text = self.transcript_text(&video_id).await?;

        write_file(&self.settings.raw_path, &text)?;
        write_file(&self.settings.text_path, &text)?;
        let copied = self.copy(&text);

        Ok(Grabbed {
            text,
            videos: 1,
            playlist: false,
            copied,
        })
    }

    /// Grab every video in a playlist, one at a time
    #[instrument(skip(self))]
    pub async fn grab_playlist(&self, url: &str) -> Result<Grabbed, GrabError> {
        let playlist_url =
            clean_playlist_url(url).ok_or_else(|| GrabError::InvalidUrl(url.to_string()))?;

        let videos = self.source.playlist_entries(&playlist_url).await?;
        if videos.is_empty() {
            return Err(GrabError::EmptyPlaylist(playlist_url));
        }

        eprintln!("[i] Found {} videos — fetching transcripts…", videos.len());

        let mut blocks = Vec::with_capacity(videos.len());
        let mut plain = Vec::with_capacity(videos.len());

        for (idx, video) in videos.iter().enumerate() {
            eprintln!("  • ({}/{}) {}", idx + 1, videos.len(), video.title);

            let text = match self.transcript_text(&video.id).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping {} ({}): {}", video.title, video.url(), e);
                    String::new()
                }
            };

            blocks.push(format_playlist_block(&video.title, &text));
            plain.push(text);

            // Rate limit between videos
            if idx + 1 < videos.len() && !self.settings.playlist_delay.is_zero() {
                tokio::time::sleep(self.settings.playlist_delay).await;
            }
        }

        let text = blocks.join("\n");
        write_file(&self.settings.raw_path, &plain.join("\n\n"))?;
        write_file(&self.settings.text_path, &text)?;
        let copied = self.copy(&text);

        info!(videos = videos.len(), "Playlist transcript written");

        Ok(Grabbed {
            text,
            videos: videos.len(),
            playlist: true,
            copied,
        })
    }

    /// Copy to the clipboard; the files are already written, so failure only warns
    fn copy(&self, text: &str) -> bool {
        match self.clipboard.copy(text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Clipboard copy failed: {:#}", e);
                false
            }
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), GrabError> {
    let wrap = |source| GrabError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, text).map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_shapes() {
        let expected = Some("dQw4w9WgXcQ".to_string());

        assert_eq!(video_id_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(video_id_from_url("http://youtube.com/watch?v=dQw4w9WgXcQ&t=42s"), expected);
        assert_eq!(video_id_from_url("youtu.be/dQw4w9WgXcQ"), expected);
        assert_eq!(video_id_from_url("https://youtu.be/dQw4w9WgXcQ?si=abc"), expected);
        assert_eq!(video_id_from_url("www.youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(video_id_from_url("https://www.youtube.com/v/dQw4w9WgXcQ"), expected);
        assert_eq!(video_id_from_url("  https://youtu.be/dQw4w9WgXcQ  "), expected);
    }

    #[test]
    fn test_video_id_rejects_other_urls() {
        assert_eq!(video_id_from_url("https://vimeo.com/123456789"), None);
        assert_eq!(video_id_from_url("https://youtu.be/short"), None);
        assert_eq!(video_id_from_url("see https://youtu.be/dQw4w9WgXcQ"), None);
        assert_eq!(video_id_from_url(""), None);
    }

    #[test]
    fn test_playlist_detection_and_cleaning() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123abc&index=2";

        assert_eq!(playlist_id(url), Some("PL123abc".to_string()));
        assert_eq!(
            clean_playlist_url(url),
            Some("https://www.youtube.com/playlist?list=PL123abc".to_string())
        );
        assert_eq!(playlist_id("youtube.com/playlist?list=PLxyz"), Some("PLxyz".to_string()));
        assert_eq!(playlist_id("https://youtu.be/dQw4w9WgXcQ"), None);
        assert_eq!(playlist_id("https://www.youtube.com/watch?list="), None);
    }

    #[test]
    fn test_join_chunks() {
        let chunk = |text: &str| TranscriptChunk {
            text: text.to_string(),
            start_secs: 0.0,
            duration_secs: 1.0,
        };

        let joined = join_chunks(&[chunk(" hello "), chunk(""), chunk("world\n")]);
        assert_eq!(joined, "hello world");
        assert_eq!(join_chunks(&[]), "");
    }

    #[test]
    fn test_format_playlist_block() {
        let block = format_playlist_block("Lecture 1", "some text");
        let rule = "-".repeat(40);
        assert_eq!(block, format!("\n{rule}\nLecture 1\n{rule}\nsome text\n"));
    }
}
