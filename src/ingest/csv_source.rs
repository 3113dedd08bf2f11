//! Picks the CSV export to import.
//!
//! An explicit file wins outright. An explicit directory, or failing that
//! the configured download folders, is searched for `*.csv` (any case) and
//! the most recently created match is used.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while locating the CSV
#[derive(Debug, Error)]
pub enum CsvSourceError {
    #[error("--csv path not found: {0}")]
    ExplicitNotFound(PathBuf),

    #[error("No CSV files found in {0}")]
    EmptyDirectory(PathBuf),

    #[error("No CSV files found in any Downloads folder.")]
    NoneFound,

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Which file timestamp counts as "created"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedTimeStrategy {
    /// Birth time where the platform records it, else modification time
    #[default]
    Birth,

    /// Always the modification time
    Modified,
}

impl CreatedTimeStrategy {
    /// Read the timestamp for `path`
    pub fn timestamp(self, path: &Path) -> std::io::Result<SystemTime> {
        let metadata = std::fs::metadata(path)?;
        match self {
            Self::Birth => metadata.created().or_else(|_| metadata.modified()),
            Self::Modified => metadata.modified(),
        }
    }
}

impl std::fmt::Display for CreatedTimeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Birth => write!(f, "birth"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// Locates the newest CSV export
#[derive(Debug, Clone, Default)]
pub struct CsvSelector {
    strategy: CreatedTimeStrategy,
}

impl CsvSelector {
    /// Create a selector with the given timestamp strategy
    pub fn new(strategy: CreatedTimeStrategy) -> Self {
        Self { strategy }
    }

    /// Resolve the CSV to import.
    ///
    /// `explicit` may be a file or a directory; when absent every directory in
    /// `search_dirs` is pooled. Missing search directories are ignored.
    pub fn select(
        &self,
        explicit: Option<&Path>,
        search_dirs: &[PathBuf],
    ) -> Result<PathBuf, CsvSourceError> {
        if let Some(path) = explicit {
            if path.is_file() {
                debug!("Using explicit CSV: {}", path.display());
                return Ok(path.to_path_buf());
            }
            if path.is_dir() {
                let candidates = self.candidates(std::slice::from_ref(&path.to_path_buf()))?;
                let newest = self
                    .newest(&candidates)
                    .ok_or_else(|| CsvSourceError::EmptyDirectory(path.to_path_buf()))?;
                debug!("Using newest in dir {}: {}", path.display(), newest.display());
                return Ok(newest);
            }
            return Err(CsvSourceError::ExplicitNotFound(path.to_path_buf()));
        }

        let candidates = self.candidates(search_dirs)?;
        debug!(?candidates, "CSVs found");

        let newest = self.newest(&candidates).ok_or(CsvSourceError::NoneFound)?;
        debug!("Selected (latest by {} time): {}", self.strategy, newest.display());
        Ok(newest)
    }

    /// All `*.csv` files directly inside `dirs`, deduplicated, in discovery order
    pub fn candidates(&self, dirs: &[PathBuf]) -> Result<Vec<PathBuf>, CsvSourceError> {
        let options = MatchOptions {
            case_sensitive: false,
            // Skip hidden files such as macOS `._name.csv` resource forks
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for dir in dirs {
            let pattern = format!("{}/*.csv", Pattern::escape(&dir.to_string_lossy()));
            let mut matches: Vec<PathBuf> = glob::glob_with(&pattern, options)?
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|path| path.is_file())
                .collect();
            matches.sort();

            for path in matches {
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        Ok(files)
    }

    /// The most recently created file; ties go to the greatest path
    pub fn newest(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates
            .iter()
            .filter_map(|path| match self.strategy.timestamp(path) {
                Ok(ts) => Some((ts, path)),
                Err(e) => {
                    warn!("Cannot read timestamp of {}: {}", path.display(), e);
                    None
                }
            })
            .max()
            .map(|(_, path)| path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strategy_deserializes() {
        let strategy: CreatedTimeStrategy = serde_yaml::from_str("modified").unwrap();
        assert_eq!(strategy, CreatedTimeStrategy::Modified);
        assert_eq!(CreatedTimeStrategy::default(), CreatedTimeStrategy::Birth);
    }

    #[test]
    fn test_candidates_match_extension_case_insensitively() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.csv"), "CONTENT\n").unwrap();
        std::fs::write(temp.path().join("b.CSV"), "CONTENT\n").unwrap();
        std::fs::write(temp.path().join("c.Csv"), "CONTENT\n").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(temp.path().join("folder.csv")).unwrap();

        let selector = CsvSelector::default();
        let found = selector.candidates(&[temp.path().to_path_buf()]).unwrap();

        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.CSV", "c.Csv"]);
    }

    #[test]
    fn test_candidates_deduplicate_repeated_dirs() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.csv"), "").unwrap();
        let dir = temp.path().to_path_buf();

        let found = CsvSelector::default()
            .candidates(&[dir.clone(), dir.join("missing"), dir])
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_explicit_file_is_used_as_is() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("export.txt");
        std::fs::write(&file, "").unwrap();

        let chosen = CsvSelector::default().select(Some(&file), &[]).unwrap();
        assert_eq!(chosen, file);
    }

    #[test]
    fn test_explicit_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.csv");

        let err = CsvSelector::default().select(Some(&missing), &[]).unwrap_err();
        assert!(matches!(err, CsvSourceError::ExplicitNotFound(_)));
        assert!(err.to_string().starts_with("--csv path not found"));
    }

    #[test]
    fn test_explicit_empty_directory() {
        let temp = TempDir::new().unwrap();

        let err = CsvSelector::default()
            .select(Some(temp.path()), &[])
            .unwrap_err();
        assert!(matches!(err, CsvSourceError::EmptyDirectory(_)));
    }

    #[test]
    fn test_nothing_in_search_dirs() {
        let temp = TempDir::new().unwrap();

        let err = CsvSelector::default()
            .select(None, &[temp.path().to_path_buf()])
            .unwrap_err();
        assert!(matches!(err, CsvSourceError::NoneFound));
    }
}
