//! Command-line interface for ytdoit.
//!
//! Provides commands for importing a CSV export into Todoist, grabbing
//! YouTube transcripts, and showing the resolved configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::TodoistClient;
use crate::config::{self, paths, ResolvedConfig};
use crate::core::TaskImporter;
use crate::ingest::CsvSelector;

pub mod grab;

/// ytdoit - YouTube transcripts and Todoist CSV imports
#[derive(Parser, Debug)]
#[command(name = "ytdoit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create Todoist tasks from the newest CSV export
    Import {
        /// Path to a CSV file or a folder to search (defaults to Downloads folders)
        #[arg(long)]
        csv: Option<String>,

        /// Todoist API token (or use TODOIST_TOKEN env)
        #[arg(long, env = "TODOIST_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Target project (overrides config)
        #[arg(short, long)]
        project: Option<String>,

        /// Build and print payloads without creating tasks
        #[arg(long)]
        dry_run: bool,
    },

    /// Grab a transcript (prompts for URLs when none is given)
    Grab {
        /// Video or playlist URL
        url: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Import {
                csv,
                token,
                project,
                dry_run,
            } => import_tasks(csv, token, project, dry_run).await,
            Commands::Grab { url } => {
                let config = config::load_config()?;
                grab::execute(url, &config).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Trimmed token, or `None` when absent or blank
fn usable_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Import the newest CSV into Todoist
async fn import_tasks(
    csv: Option<String>,
    token: Option<String>,
    project: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let Some(token) = usable_token(token) else {
        eprintln!("ERROR: Set your token first: export TODOIST_TOKEN=YOUR_TODOIST_TOKEN");
        std::process::exit(1);
    };

    let mut config = config::load_config()?;
    if let Some(project) = project {
        config.project = project;
    }

    let explicit: Option<PathBuf> = csv.as_deref().map(paths::expand_home);
    let csv_path = CsvSelector::new(config.created_time)
        .select(explicit.as_deref(), &config.csv_search_dirs)?;
    println!("Using CSV: {}", csv_path.display());

    let client = TodoistClient::new(&config.api_url, token);
    let importer =
        TaskImporter::new(client, &config.project, config.timezone).with_dry_run(dry_run);

    let report = importer.import_file(&csv_path).await?;

    if dry_run {
        println!("Dry run. Would create {} task(s).", report.planned.len());
    } else {
        println!("Done. Created {} task(s).", report.created.len());
    }
    if report.skipped > 0 {
        println!("Skipped {} row(s) without a title.", report.skipped);
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg: ResolvedConfig = config::load_config()?;

    println!("ytdoit configuration");
    println!("══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Todoist:");
    println!("  API:       {}", cfg.api_url);
    println!("  Project:   {}", cfg.project);
    println!("  Timezone:  {}", cfg.timezone);
    println!();
    println!("CSV search (newest by {} time):", cfg.created_time);
    for dir in &cfg.csv_search_dirs {
        let marker = if dir.is_dir() { "" } else { "  (missing)" };
        println!("  {}{}", dir.display(), marker);
    }
    println!();
    println!("Transcripts:");
    println!("  Raw:       {}", cfg.transcripts.raw_path.display());
    println!("  Formatted: {}", cfg.transcripts.text_path.display());
    println!("  Language:  {}", cfg.transcripts.language);
    println!("  Delay:     {}s", cfg.transcripts.playlist_delay.as_secs());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_trimmed() {
        assert_eq!(
            usable_token(Some("  abc123\n".to_string())),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_blank_token_is_missing() {
        assert_eq!(usable_token(None), None);
        assert_eq!(usable_token(Some(" \n\t".to_string())), None);
    }

    #[test]
    fn test_import_flags_parse() {
        let cli = Cli::parse_from([
            "ytdoit", "import", "--token", "t", "--project", "Uni", "--dry-run",
        ]);
        match cli.command {
            Commands::Import {
                token,
                project,
                dry_run,
                csv,
            } => {
                assert_eq!(token, Some("t".to_string()));
                assert_eq!(project, Some("Uni".to_string()));
                assert!(dry_run);
                assert_eq!(csv, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
