//! Descriptive statistics over research-article records: totals, department
//! and faculty breakdowns, sustainability-goal frequencies and yearly trends.

pub mod error;
pub mod filter;
pub mod models;
pub mod parser;
pub mod report;
pub mod stats;

pub use error::DashboardError;
pub use filter::{ArticleFilter, YearRange};
pub use models::{DashboardStats, Record};
pub use stats::{compute_stats, unique_articles};
