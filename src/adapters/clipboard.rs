//! System clipboard sink.

use anyhow::{Context, Result};
use arboard::Clipboard;

use super::ClipboardSink;

/// Clipboard backed by `arboard`, opened fresh for every copy
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to open the system clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("Failed to write to the clipboard")?;
        tracing::debug!(chars = text.chars().count(), "Copied to clipboard");
        Ok(())
    }
}
