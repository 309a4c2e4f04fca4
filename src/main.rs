use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sdg_article_stats::parser::{self, ValueField};
use sdg_article_stats::{compute_stats, report, ArticleFilter, DashboardStats, YearRange};

const CSV_ENV: &str = "SDG_STATS_CSV";

#[derive(Parser)]
#[command(name = "sdg-stats")]
#[command(about = "Sustainability statistics for faculty research articles", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dashboard statistics as JSON
    Stats {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long)]
        pretty: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List distinct values of a column, for building filter options
    Values {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, value_enum)]
        field: FieldArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Department,
    PublicationYear,
}

impl From<FieldArg> for ValueField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Department => ValueField::Department,
            FieldArg::PublicationYear => ValueField::PublicationYear,
        }
    }
}

#[derive(Args, Clone)]
struct DatasetArgs {
    /// Source CSV (defaults to $SDG_STATS_CSV)
    #[arg(long)]
    csv: Option<PathBuf>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long, requires = "to_year")]
    from_year: Option<i64>,
    #[arg(long, requires = "from_year")]
    to_year: Option<i64>,
    /// Sustainability goal (1-17); repeat to match any of several
    #[arg(long = "goal")]
    goals: Vec<u32>,
    #[arg(long, action = ArgAction::Set)]
    sustainable: Option<bool>,
    /// Only articles in General Business journals
    #[arg(long)]
    general_business: bool,
    /// Only articles in UT Dallas or Financial Times journals
    #[arg(long)]
    top_journals: bool,
}

impl DatasetArgs {
    fn filter(&self) -> anyhow::Result<ArticleFilter> {
        let mut filter = ArticleFilter::new()
            .goals(self.goals.iter().copied())?
            .general_business_only(self.general_business)
            .top_journals_only(self.top_journals);

        if let Some(department) = &self.department {
            filter = filter.department(department.clone());
        }
        if let (Some(start), Some(end)) = (self.from_year, self.to_year) {
            filter = filter.years(YearRange::new(start, end)?);
        }
        if let Some(sustainable) = self.sustainable {
            filter = filter.sustainable(sustainable);
        }
        Ok(filter)
    }
}

fn resolve_csv(csv: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match csv {
        Some(path) => Ok(path),
        None => std::env::var(CSV_ENV)
            .map(PathBuf::from)
            .with_context(|| format!("pass --csv or set {CSV_ENV} to the article dataset")),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_and_compute(dataset: DatasetArgs) -> anyhow::Result<DashboardStats> {
    let path = resolve_csv(dataset.csv.clone())?;
    let filter = dataset.filter()?;

    tokio::task::spawn_blocking(move || -> anyhow::Result<DashboardStats> {
        let records = parser::load_csv(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        let selected = if filter.is_empty() {
            records
        } else {
            filter.apply(&records)
        };
        debug!(selected = selected.len(), "applied filter");
        Ok(compute_stats(&selected))
    })
    .await
    .context("stats worker panicked")?
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Stats { dataset, pretty } => {
            let stats = load_and_compute(dataset).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&stats)?
            } else {
                serde_json::to_string(&stats)?
            };
            println!("{json}");
        }
        Commands::Report { dataset, out } => {
            let scope = dataset.department.clone();
            let stats = load_and_compute(dataset).await?;
            let report = report::build_report(scope.as_deref(), chrono::Utc::now(), &stats);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(articles = stats.total_articles, "report generated");
            println!("Report written to {}.", out.display());
        }
        Commands::Values { csv, field } => {
            let path = resolve_csv(csv)?;
            let records = tokio::task::spawn_blocking(move || parser::load_csv(&path))
                .await
                .context("loader panicked")??;
            for value in parser::distinct_values(&records, field.into()) {
                println!("{value}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_field_maps_kebab_case_names() {
        let cli = Cli::try_parse_from(["sdg-stats", "values", "--field", "publication-year"])
            .expect("valid arguments");
        match cli.command {
            Commands::Values { field, .. } => {
                assert_eq!(ValueField::from(field), ValueField::PublicationYear);
            }
            _ => panic!("expected the values subcommand"),
        }
        assert!(Cli::try_parse_from(["sdg-stats", "values", "--field", "journal"]).is_err());
    }
}
