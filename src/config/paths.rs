//! Default filesystem locations.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! | Location | Purpose |
//! |----------|---------|
//! | `~/Downloads` | Where CSV exports usually land |
//! | `~/Library/Mobile Documents/com~apple~CloudDocs/Downloads` | iCloud Downloads |
//! | `~/Documents/VS rough/rawTranscript.txt` | Plain transcript text |
//! | `~/Documents/VS rough/transcript.txt` | Formatted transcript |

use std::path::{Path, PathBuf};

/// iCloud Drive's Downloads folder, relative to home
pub const ICLOUD_DOWNLOADS: &str = "Library/Mobile Documents/com~apple~CloudDocs/Downloads";

/// Folder holding both transcript outputs, relative to home
pub const TRANSCRIPT_DIR: &str = "Documents/VS rough";

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home().join(rest),
        None => PathBuf::from(path),
    }
}

/// Resolve a configured path: `~` expands, relative paths hang off `base`
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Directories searched for CSV exports when none is given explicitly
pub fn default_download_dirs() -> Vec<PathBuf> {
    let home = home();
    vec![home.join("Downloads"), home.join(ICLOUD_DOWNLOADS)]
}

/// Plain transcript output (~/Documents/VS rough/rawTranscript.txt)
pub fn default_raw_transcript() -> PathBuf {
    home().join(TRANSCRIPT_DIR).join("rawTranscript.txt")
}

/// Formatted transcript output (~/Documents/VS rough/transcript.txt)
pub fn default_text_transcript() -> PathBuf {
    home().join(TRANSCRIPT_DIR).join("transcript.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();

        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/Downloads"), home.join("Downloads"));
        assert_eq!(expand_home("/tmp/exports"), PathBuf::from("/tmp/exports"));
        assert_eq!(expand_home("exports"), PathBuf::from("exports"));
        // Only a leading tilde expands
        assert_eq!(expand_home("a/~/b"), PathBuf::from("a/~/b"));
    }

    #[test]
    fn test_resolve_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./exports"),
            PathBuf::from("/home/user/project/./exports")
        );
        assert_eq!(resolve_path(&base, "/abs/dir"), PathBuf::from("/abs/dir"));
    }

    #[test]
    fn test_default_download_dirs() {
        let dirs = default_download_dirs();
        assert_eq!(dirs.len(), 2);
        assert!(dirs[0].ends_with("Downloads"));
        assert!(dirs[1].to_string_lossy().contains("CloudDocs"));
    }

    #[test]
    fn test_transcript_paths_share_folder() {
        let raw = default_raw_transcript();
        let text = default_text_transcript();

        assert_eq!(raw.parent(), text.parent());
        assert!(raw.ends_with("rawTranscript.txt"));
        assert!(text.ends_with("transcript.txt"));
    }
}
