//! Transcript grabbing commands.
//!
//! - `ytdoit grab <url>` - grab once and exit
//! - `ytdoit grab` - prompt for URLs until `q` or end of input

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::adapters::{SystemClipboard, YtDlp};
use crate::config::ResolvedConfig;
use crate::core::{Grabbed, TranscriptGrabber};

const PROMPT: &str = "YouTube URL (or q to quit) >> ";

/// Execute the grab command
pub async fn execute(url: Option<String>, config: &ResolvedConfig) -> Result<()> {
    let grabber = TranscriptGrabber::new(
        Box::new(YtDlp::new(&config.transcripts.language)),
        Box::new(SystemClipboard::new()),
        config.transcripts.clone(),
    );

    let mut out = std::io::stdout();
    match url {
        Some(url) => {
            let grabbed = grabber.grab(&url).await?;
            print_outcome(&mut out, &grabbed)?;
            Ok(())
        }
        None => {
            let mut input = BufReader::new(tokio::io::stdin());
            prompt_loop(&grabber, &mut input, &mut out).await
        }
    }
}

/// Read URLs line by line until `q` (any case) or end of input.
///
/// Failed grabs are reported as `[error] <message>` and the loop goes on.
/// Nothing past the quitting line is consumed from `input`.
pub async fn prompt_loop<R, W>(
    grabber: &TranscriptGrabber,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut line = String::new();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush().context("Failed to flush output")?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .await
            .context("Failed to read input")?;
        if read == 0 {
            writeln!(out)?;
            break;
        }

        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        if url.eq_ignore_ascii_case("q") {
            break;
        }

        match grabber.grab(url).await {
            Ok(grabbed) => print_outcome(out, &grabbed)?,
            Err(e) => writeln!(out, "[error] {}", e)?,
        }
    }

    Ok(())
}

fn print_outcome<W: Write>(out: &mut W, grabbed: &Grabbed) -> std::io::Result<()> {
    let what = if grabbed.playlist {
        "Full playlist transcript"
    } else {
        "Transcript"
    };

    if grabbed.copied {
        writeln!(out, "[✓] {} copied to clipboard and written to disk.", what)
    } else {
        writeln!(out, "[✓] {} written to disk (clipboard unavailable).", what)
    }
}
