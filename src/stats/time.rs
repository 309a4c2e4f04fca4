use std::collections::HashMap;

use crate::models::{AnnualTrend, Record, YearCount};
use crate::stats::{percent_change, sort_years, OUTLIER_YEAR};

/// Trailing window length of the rolling averages, in years.
pub const ROLLING_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeStats {
    pub annual_trends: Vec<AnnualTrend>,
    pub year_distribution: Vec<YearCount>,
}

#[derive(Debug, Clone, Copy, Default)]
struct YearAcc {
    total: usize,
    sustainable: usize,
    general_business: usize,
    ut_dallas: usize,
    financial_times: usize,
    top_journals: usize,
    other: usize,
}

/// Rolling average and its growth rate for one series, keyed by year.
#[derive(Debug, Default)]
struct RollingSeries {
    averages: HashMap<String, f64>,
    growth: HashMap<String, f64>,
}

impl RollingSeries {
    fn compute(
        years: &[&String],
        by_year: &HashMap<String, YearAcc>,
        metric: fn(&YearAcc) -> usize,
    ) -> Self {
        let mut series = Self::default();
        if years.len() < ROLLING_WINDOW {
            return series;
        }

        for window in years.windows(ROLLING_WINDOW) {
            let sum: usize = window.iter().map(|year| metric(&by_year[*year])).sum();
            let current = window[ROLLING_WINDOW - 1];
            series
                .averages
                .insert(current.clone(), sum as f64 / ROLLING_WINDOW as f64);
        }

        for pair in years[ROLLING_WINDOW - 1..].windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let (current_avg, previous_avg) = (series.averages[current], series.averages[previous]);
            if let Some(rate) = percent_change(current_avg, previous_avg) {
                series.growth.insert(current.clone(), rate);
            }
        }
        series
    }

    fn average(&self, year: &str) -> Option<f64> {
        self.averages.get(year).copied()
    }

    fn growth(&self, year: &str) -> Option<f64> {
        self.growth.get(year).copied()
    }
}

pub fn time_stats(unique_articles: &[Record]) -> TimeStats {
    let mut by_year: HashMap<String, YearAcc> = HashMap::new();

    for article in unique_articles {
        if article.publication_year.is_empty() {
            continue;
        }
        let acc = by_year.entry(article.publication_year.clone()).or_default();

        acc.total += 1;
        if article.is_sustainable() {
            acc.sustainable += 1;
        }
        if article.is_general_business() {
            acc.general_business += 1;
        }
        if article.is_top_journal() {
            acc.top_journals += 1;
        }
        match (article.is_ut_dallas(), article.is_financial_times()) {
            (true, true) => {}
            (true, false) => acc.ut_dallas += 1,
            (false, true) => acc.financial_times += 1,
            (false, false) => acc.other += 1,
        }
    }

    let mut years: Vec<String> = by_year.keys().cloned().collect();
    sort_years(&mut years);
    let growth_years: Vec<&String> = years.iter().filter(|y| *y != OUTLIER_YEAR).collect();

    let mut year_over_year: HashMap<&str, (Option<f64>, Option<f64>)> = HashMap::new();
    for pair in growth_years.windows(2) {
        let (previous, current) = (&by_year[pair[0]], &by_year[pair[1]]);
        year_over_year.insert(
            pair[1].as_str(),
            (
                percent_change(current.total as f64, previous.total as f64),
                percent_change(current.sustainable as f64, previous.sustainable as f64),
            ),
        );
    }

    let total = RollingSeries::compute(&growth_years, &by_year, |acc| acc.total);
    let sustainable = RollingSeries::compute(&growth_years, &by_year, |acc| acc.sustainable);
    let top_journal = RollingSeries::compute(&growth_years, &by_year, |acc| acc.top_journals);

    let annual_trends = years
        .iter()
        .map(|year| {
            let acc = by_year[year];
            let (growth_rate, sustainable_growth_rate) =
                year_over_year.get(year.as_str()).copied().unwrap_or((None, None));
            AnnualTrend {
                year: year.clone(),
                total_articles: acc.total,
                sustainable_articles: acc.sustainable,
                growth_rate,
                sustainable_growth_rate,
                general_business: acc.general_business,
                ut_dallas: acc.ut_dallas,
                financial_times: acc.financial_times,
                other: acc.other,
                top_journal_articles: acc.top_journals,
                total_rolling_average: total.average(year),
                sustainable_rolling_average: sustainable.average(year),
                top_journal_rolling_average: top_journal.average(year),
                total_rolling_growth_rate: total.growth(year),
                sustainable_rolling_growth_rate: sustainable.growth(year),
                top_journal_rolling_growth_rate: top_journal.growth(year),
            }
        })
        .collect();

    let year_distribution = years
        .iter()
        .map(|year| YearCount {
            year: year.clone(),
            count: by_year[year].total,
        })
        .collect();

    TimeStats {
        annual_trends,
        year_distribution,
    }
}
