//! Tokenizer for the free-text CONTENT column.
//!
//! A CONTENT cell such as `"OOP ED Task submitted? @course @oop /Week2"`
//! carries three things at once:
//! - `@tag` tokens become task labels
//! - a `/week<N>` token names the section the task belongs to
//! - everything else, in order, is the task title

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches `week7`, `week_07`, `WEEK 3` once the leading slash is removed.
fn section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^week[_ ]?(\d+)$").expect("section pattern is valid"))
}

/// Result of tokenizing a CONTENT cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    /// Remaining words joined by single spaces
    pub title: String,

    /// Label names without the `@` prefix, first-seen order, no duplicates
    pub labels: Vec<String>,

    /// Normalized section name (`Week<N>`)
    pub section: Option<String>,
}

impl ParsedContent {
    /// True when there is nothing to create a task from
    pub fn is_untitled(&self) -> bool {
        self.title.is_empty()
    }
}

/// Normalize a `/week...` token into `Week<N>`, keeping the digits as written.
///
/// Returns `None` for anything that is not a section marker.
pub fn normalize_section(token: &str) -> Option<String> {
    let body = token.strip_prefix('/')?;
    let captures = section_pattern().captures(body)?;
    Some(format!("Week{}", &captures[1]))
}

/// Split a CONTENT cell into title, labels and section.
///
/// Only the first section marker counts; later ones are dropped without
/// reaching the title.
pub fn parse_content(content: &str) -> ParsedContent {
    let mut parsed = ParsedContent::default();
    let mut title_parts: Vec<&str> = Vec::new();

    for token in content.split_whitespace() {
        if let Some(label) = token.strip_prefix('@') {
            if !label.is_empty() {
                if !parsed.labels.iter().any(|l| l == label) {
                    parsed.labels.push(label.to_string());
                }
                continue;
            }
        }

        if token.starts_with('/') {
            if let Some(section) = normalize_section(token) {
                if parsed.section.is_none() {
                    parsed.section = Some(section);
                }
                continue;
            }
        }

        title_parts.push(token);
    }

    parsed.title = title_parts.join(" ");
    parsed
}
