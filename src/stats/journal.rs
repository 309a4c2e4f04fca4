use std::collections::HashMap;

use crate::models::{JournalAnalysis, JournalDistribution, JournalYearTrend, Record};
use crate::stats::{ratio, sort_years};

#[derive(Debug, Clone, PartialEq)]
pub struct JournalStats {
    pub distribution: JournalDistribution,
    pub top_journal_articles: usize,
    pub sustainable_top_journal_articles: usize,
    pub analysis: Vec<JournalAnalysis>,
}

/// Journal classification used by the analysis. UT Dallas wins over
/// Financial Times; General Business holds only non-top-journal articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalCategory {
    GeneralBusiness,
    UtDallas,
    FinancialTimes,
    Other,
}

impl JournalCategory {
    pub const ALL: [JournalCategory; 4] = [
        JournalCategory::GeneralBusiness,
        JournalCategory::UtDallas,
        JournalCategory::FinancialTimes,
        JournalCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JournalCategory::GeneralBusiness => "General Business",
            JournalCategory::UtDallas => "UT Dallas",
            JournalCategory::FinancialTimes => "Financial Times",
            JournalCategory::Other => "Other",
        }
    }
}

pub fn journal_stats(unique_articles: &[Record]) -> JournalStats {
    let mut distribution = JournalDistribution::default();
    let mut regular_business = 0usize;
    let mut top_journal_articles = 0usize;
    let mut sustainable_top_journal_articles = 0usize;

    for article in unique_articles {
        if article.is_ut_dallas() {
            distribution.ut_dallas += 1;
        } else if article.is_financial_times() {
            distribution.financial_times += 1;
        } else if article.is_general_business() {
            regular_business += 1;
        }
        if !article.is_general_business() {
            distribution.other += 1;
        }

        if article.is_top_journal() {
            top_journal_articles += 1;
            if article.is_sustainable() {
                sustainable_top_journal_articles += 1;
            }
        }
    }
    distribution.general_business =
        regular_business + distribution.ut_dallas + distribution.financial_times;

    JournalStats {
        distribution,
        top_journal_articles,
        sustainable_top_journal_articles,
        analysis: JournalCategory::ALL
            .iter()
            .map(|category| analyze(*category, unique_articles))
            .collect(),
    }
}

fn analyze(category: JournalCategory, unique_articles: &[Record]) -> JournalAnalysis {
    let mut total = 0usize;
    let mut sustainable = 0usize;
    let mut yearly: HashMap<&str, (usize, usize)> = HashMap::new();

    for article in unique_articles.iter().filter(|a| in_category(category, a)) {
        total += 1;
        let sustainable_article = usize::from(article.is_sustainable());
        sustainable += sustainable_article;

        if !article.publication_year.is_empty() {
            let entry = yearly.entry(article.publication_year.as_str()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += sustainable_article;
        }
    }

    let mut years: Vec<String> = yearly.keys().map(|year| year.to_string()).collect();
    sort_years(&mut years);

    JournalAnalysis {
        category: category.label().to_string(),
        total_articles: total,
        sustainable_articles: sustainable,
        sustainability_ratio: ratio(sustainable, total),
        yearly_trends: years
            .into_iter()
            .map(|year| {
                let (total_articles, sustainable_articles) = yearly[year.as_str()];
                JournalYearTrend {
                    year,
                    total_articles,
                    sustainable_articles,
                }
            })
            .collect(),
    }
}

fn in_category(category: JournalCategory, record: &Record) -> bool {
    match category {
        JournalCategory::UtDallas => record.is_ut_dallas(),
        JournalCategory::FinancialTimes => record.is_financial_times() && !record.is_ut_dallas(),
        JournalCategory::GeneralBusiness => {
            record.is_general_business() && !record.is_top_journal()
        }
        JournalCategory::Other => !record.is_general_business(),
    }
}
