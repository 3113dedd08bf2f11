//! CSV ingestion for the task importer.
//!
//! 1. **Source**: pick the newest CSV export from an explicit path or the
//!    download folders
//! 2. **Rows**: read it into [`Row`](crate::domain::Row)s with normalized headers

pub mod csv_source;
pub mod rows;

// Re-export key types
pub use csv_source::{CreatedTimeStrategy, CsvSelector, CsvSourceError};
pub use rows::{read_rows, read_rows_from, RowReadError};
