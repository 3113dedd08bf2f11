//! Configuration for ytdoit.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (YTDOIT_PROJECT, YTDOIT_TIMEZONE, TODOIST_API_URL)
//! 3. Config file (.ytdoit/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .ytdoit/config.yaml
//! - Relative paths in the config file are relative to the directory
//!   containing `.ytdoit/`

pub mod paths;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::ingest::CreatedTimeStrategy;

/// Todoist REST API root
pub const DEFAULT_API_URL: &str = "https://api.todoist.com/rest/v2";

/// Project that imported tasks go into
pub const DEFAULT_PROJECT: &str = "Course";

/// Zone used to interpret DUE_TIME
pub const DEFAULT_TIMEZONE: &str = "Australia/Sydney";

/// Seconds to wait between playlist items
pub const DEFAULT_PLAYLIST_DELAY_SECS: u64 = 15;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub todoist: TodoistConfig,
    #[serde(default)]
    pub csv: CsvConfig,
    #[serde(default)]
    pub transcripts: TranscriptConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoistConfig {
    pub api_url: Option<String>,
    pub project: Option<String>,
    /// IANA zone name, e.g. "Australia/Sydney"
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvConfig {
    /// Directories searched for the newest export
    pub search_dirs: Option<Vec<String>>,
    /// "birth" or "modified"
    pub created_time: Option<CreatedTimeStrategy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptConfig {
    pub raw_path: Option<String>,
    pub text_path: Option<String>,
    pub playlist_delay_seconds: Option<u64>,
    pub language: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Task service REST root
    pub api_url: String,
    /// Target project name (exact match)
    pub project: String,
    /// Zone for timed due values
    pub timezone: Tz,
    /// Directories searched for CSV exports
    pub csv_search_dirs: Vec<PathBuf>,
    /// How "newest CSV" is decided
    pub created_time: CreatedTimeStrategy,
    /// Transcript grabber settings
    pub transcripts: TranscriptSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct TranscriptSettings {
    pub raw_path: PathBuf,
    pub text_path: PathBuf,
    pub playlist_delay: Duration,
    pub language: String,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            raw_path: paths::default_raw_transcript(),
            text_path: paths::default_text_transcript(),
            playlist_delay: Duration::from_secs(DEFAULT_PLAYLIST_DELAY_SECS),
            language: "en".to_string(),
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            timezone: chrono_tz::Australia::Sydney,
            csv_search_dirs: paths::default_download_dirs(),
            created_time: CreatedTimeStrategy::default(),
            transcripts: TranscriptSettings::default(),
            config_file: None,
        }
    }
}

/// Find config file by searching a directory and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".ytdoit").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", name, e))
}

/// Merge a parsed config file and environment lookups over the defaults
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    if let Some((config_path, config)) = file {
        // Base directory is the parent of .ytdoit/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        if let Some(api_url) = config.todoist.api_url {
            resolved.api_url = api_url;
        }
        if let Some(project) = config.todoist.project {
            resolved.project = project;
        }
        if let Some(ref zone) = config.todoist.timezone {
            resolved.timezone = parse_timezone(zone)?;
        }

        if let Some(dirs) = config.csv.search_dirs {
            resolved.csv_search_dirs = dirs
                .iter()
                .map(|d| paths::resolve_path(&base_dir, d))
                .collect();
        }
        if let Some(strategy) = config.csv.created_time {
            resolved.created_time = strategy;
        }

        let t = config.transcripts;
        if let Some(ref raw) = t.raw_path {
            resolved.transcripts.raw_path = paths::resolve_path(&base_dir, raw);
        }
        if let Some(ref text) = t.text_path {
            resolved.transcripts.text_path = paths::resolve_path(&base_dir, text);
        }
        if let Some(secs) = t.playlist_delay_seconds {
            resolved.transcripts.playlist_delay = Duration::from_secs(secs);
        }
        if let Some(language) = t.language {
            resolved.transcripts.language = language;
        }

        resolved.config_file = Some(config_path);
    }

    if let Some(api_url) = env("TODOIST_API_URL") {
        resolved.api_url = api_url;
    }
    if let Some(project) = env("YTDOIT_PROJECT") {
        resolved.project = project;
    }
    if let Some(zone) = env("YTDOIT_TIMEZONE") {
        resolved.timezone = parse_timezone(&zone)?;
    }

    Ok(resolved)
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let file = match find_config_file(&cwd) {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    resolve(file, |key| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(temp: &TempDir, body: &str) -> PathBuf {
        let dir = temp.path().join(".ytdoit");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, no_env).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.project, "Course");
        assert_eq!(config.timezone, chrono_tz::Australia::Sydney);
        assert_eq!(config.created_time, CreatedTimeStrategy::Birth);
        assert_eq!(config.transcripts.playlist_delay, Duration::from_secs(15));
        assert_eq!(config.transcripts.language, "en");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
version: "1.0"
todoist:
  project: Uni
  timezone: Europe/Berlin
csv:
  search_dirs:
    - exports
    - /var/exports
  created_time: modified
transcripts:
  text_path: out/transcript.txt
  playlist_delay_seconds: 2
"#,
        );

        let parsed = load_config_file(&path).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.todoist.project, Some("Uni".to_string()));

        let config = resolve(Some((path.clone(), parsed)), no_env).unwrap();

        assert_eq!(config.project, "Uni");
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.created_time, CreatedTimeStrategy::Modified);
        assert_eq!(
            config.csv_search_dirs,
            vec![temp.path().join("exports"), PathBuf::from("/var/exports")]
        );
        assert_eq!(
            config.transcripts.text_path,
            temp.path().join("out/transcript.txt")
        );
        // Untouched settings keep their defaults
        assert_eq!(config.transcripts.raw_path, paths::default_raw_transcript());
        assert_eq!(config.transcripts.playlist_delay, Duration::from_secs(2));
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "version: \"1.0\"\ntodoist:\n  project: Uni\n");
        let parsed = load_config_file(&path).unwrap();

        let env: HashMap<&str, &str> = [
            ("YTDOIT_PROJECT", "Work"),
            ("TODOIST_API_URL", "http://localhost:9999"),
            ("YTDOIT_TIMEZONE", "UTC"),
        ]
        .into_iter()
        .collect();

        let config = resolve(Some((path, parsed)), |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.project, "Work");
        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.timezone, chrono_tz::UTC);
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let result = resolve(None, |k| (k == "YTDOIT_TIMEZONE").then(|| "Mars/Olympus".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_find_config_file_walks_parents() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "version: \"1.0\"");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(path));
    }
}
