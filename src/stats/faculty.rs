use std::collections::HashSet;

use crate::models::{FacultyMetrics, FacultyRanking, Record};
use crate::stats::{ratio, OrderedGroups};

const TOP_FACULTY: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FacultyStats {
    pub top_faculty: Vec<FacultyRanking>,
    pub top_sustainable_faculty: Vec<FacultyRanking>,
    pub top_journal_faculty: Vec<FacultyRanking>,
    /// Every faculty member, first-seen order.
    pub all_faculty: Vec<FacultyMetrics>,
}

struct FacultyAcc<'a> {
    name: &'a str,
    department: &'a str,
    articles: Vec<&'a Record>,
}

/// Per-faculty metrics over every authorship row. Rows repeating the same
/// article for one faculty member are counted once.
pub fn faculty_stats(records: &[Record]) -> FacultyStats {
    let mut groups: OrderedGroups<FacultyAcc<'_>> = OrderedGroups::new();
    for record in records {
        groups
            .entry_or_insert_with(&record.person_uuid, || FacultyAcc {
                name: &record.name,
                department: &record.department,
                articles: Vec::new(),
            })
            .articles
            .push(record);
    }

    let all_faculty: Vec<FacultyMetrics> = groups
        .into_entries()
        .into_iter()
        .map(|(person_uuid, acc)| measure(person_uuid, acc))
        .collect();

    FacultyStats {
        top_faculty: rank_by(&all_faculty, |f| f.total_articles),
        top_sustainable_faculty: rank_by(&all_faculty, |f| f.sustainable_articles),
        top_journal_faculty: rank_by(&all_faculty, |f| f.top_journal_articles),
        all_faculty,
    }
}

fn measure(person_uuid: String, acc: FacultyAcc<'_>) -> FacultyMetrics {
    let mut seen = HashSet::new();
    let mut sustainable = 0usize;
    let mut top_journal = 0usize;
    let mut top_journal_sustainable = 0usize;

    for article in acc.articles {
        if !seen.insert(article.article_uuid.as_str()) {
            continue;
        }
        let is_sustainable = article.is_sustainable();
        let is_top_journal = article.is_top_journal();
        sustainable += usize::from(is_sustainable);
        top_journal += usize::from(is_top_journal);
        top_journal_sustainable += usize::from(is_sustainable && is_top_journal);
    }

    FacultyMetrics {
        person_uuid,
        name: acc.name.to_string(),
        department: acc.department.to_string(),
        total_articles: seen.len(),
        sustainable_articles: sustainable,
        top_journal_articles: top_journal,
        top_journal_sustainable_articles: top_journal_sustainable,
        sustainability_ratio: ratio(sustainable, seen.len()),
    }
}

/// Top ten by `metric`, descending, zero entries removed. Ties keep
/// first-seen order.
fn rank_by(
    faculty: &[FacultyMetrics],
    metric: fn(&FacultyMetrics) -> usize,
) -> Vec<FacultyRanking> {
    let mut ranked: Vec<&FacultyMetrics> = faculty.iter().filter(|f| metric(f) > 0).collect();
    ranked.sort_by(|a, b| metric(b).cmp(&metric(a)));
    ranked
        .into_iter()
        .take(TOP_FACULTY)
        .map(|f| FacultyRanking {
            name: f.name.clone(),
            total: f.total_articles,
            sustainable: f.sustainable_articles,
            top_journals: f.top_journal_articles,
        })
        .collect()
}
