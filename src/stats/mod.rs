//! Aggregation engine: turns a flat record set into a [`DashboardStats`]
//! snapshot.
//!
//! Every aggregator is a pure function over a record slice. All of them
//! except the faculty aggregator read the de-duplicated article view; the
//! faculty aggregator reads every authorship row.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::{DashboardStats, Record};
use crate::parser::parse_leading_int;

pub mod contributors;
pub mod department;
pub mod faculty;
pub mod goals;
pub mod journal;
pub mod participation;
pub mod time;

/// Publication year excluded from every growth and rolling computation.
pub const OUTLIER_YEAR: &str = "1971";

/// One record per distinct article identifier, first-seen order.
pub fn unique_articles(records: &[Record]) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.article_uuid.as_str()))
        .cloned()
        .collect()
}

pub fn compute_stats(records: &[Record]) -> DashboardStats {
    let unique = unique_articles(records);
    let total_articles = unique.len();
    let sustainable_articles = unique.iter().filter(|a| a.is_sustainable()).count();

    let participation = participation::participation(&unique);
    let departments = department::department_stats(&unique);
    let goals = goals::goal_stats(&unique);
    let time = time::time_stats(&unique);
    let journals = journal::journal_stats(&unique);
    let faculty = faculty::faculty_stats(records);
    let goal_contributors = contributors::goal_contributors(&unique);

    let faculty_count = participation.faculty.len();
    let engaging_count = participation.sustainable_faculty.len();

    // Averages over engaged faculty count every authorship row they hold.
    let engaged_rows = records
        .iter()
        .filter(|r| participation.sustainable_faculty.contains(&r.person_uuid));
    let (engaged_total, engaged_sustainable, engaged_top_journal) =
        engaged_rows.fold((0usize, 0usize, 0usize), |(all, sus, top), r| {
            (
                all + 1,
                sus + usize::from(r.is_sustainable()),
                top + usize::from(r.is_top_journal()),
            )
        });

    debug!(
        rows = records.len(),
        unique = total_articles,
        sustainable = sustainable_articles,
        faculty = faculty_count,
        "computed dashboard stats"
    );

    DashboardStats {
        total_articles,
        sustainable_articles,
        unique_articles: total_articles,

        total_faculty: faculty_count,
        engaging_faculty: engaging_count,
        total_departments: participation.departments.len(),
        avg_articles_per_faculty: per_member(total_articles, faculty_count),
        avg_sustainable_articles_per_faculty: per_member(sustainable_articles, faculty_count),
        sustainability_ratio: ratio(sustainable_articles, total_articles) * 100.0,
        faculty_engagement_ratio: ratio(engaging_count, faculty_count) * 100.0,

        top_journal_articles: journals.top_journal_articles,
        sustainable_top_journal_articles: journals.sustainable_top_journal_articles,
        avg_top_journal_articles_per_faculty: per_member(
            journals.top_journal_articles,
            faculty_count,
        ),
        avg_sustainable_top_journal_articles_per_faculty: per_member(
            journals.sustainable_top_journal_articles,
            engaging_count,
        ),
        avg_articles_per_engaging_faculty: ratio(engaged_total, engaging_count),
        avg_sustainable_articles_per_engaging_faculty: ratio(engaged_sustainable, engaging_count),
        avg_top_journal_articles_per_engaging_faculty: ratio(engaged_top_journal, engaging_count),

        top_departments: departments.top_departments,
        department_stats: departments.department_stats,

        goal_distribution: goals.goal_distribution,
        detailed_goal_distribution: goals.detailed_goal_distribution,
        goal_metrics: goals.goal_metrics,

        year_distribution: time.year_distribution,
        annual_trends: time.annual_trends,

        journal_distribution: journals.distribution,
        journal_analysis: journals.analysis,

        top_faculty: faculty.top_faculty,
        top_sustainable_faculty: faculty.top_sustainable_faculty,
        top_journal_faculty: faculty.top_journal_faculty,
        faculty_metrics: faculty.all_faculty,

        goal_contributors,
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// `numerator / max(denominator, 1)`.
pub(crate) fn per_member(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

/// Percent change from `previous` to `current`; `None` unless `previous`
/// is positive.
pub(crate) fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 {
        let change = (current - previous) / previous * 100.0;
        change.is_finite().then_some(change)
    } else {
        None
    }
}

/// Sorts year labels numerically; labels without a leading number go last
/// in lexical order.
pub(crate) fn sort_years(years: &mut [String]) {
    years.sort_by_cached_key(|year| {
        let numeric = parse_leading_int(year);
        (numeric.is_none(), numeric.unwrap_or(0), year.clone())
    });
}

/// Accumulators keyed by string, iterated in first-insertion order.
pub(crate) struct OrderedGroups<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> OrderedGroups<V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn entry_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        let position = match self.index.get(key) {
            Some(position) => *position,
            None => {
                self.entries.push((key.to_string(), init()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    pub(crate) fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}
