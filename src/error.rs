use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read dataset header: {0}")]
    Header(#[source] csv::Error),

    #[error("failed to read dataset: {0}")]
    Read(#[source] csv::Error),

    #[error("invalid goal number {0} (expected 1-17)")]
    InvalidGoal(u32),

    #[error("year range starts at {start} but ends at {end}")]
    InvertedYearRange { start: i64, end: i64 },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
