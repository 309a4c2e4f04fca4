use std::collections::BTreeSet;

use crate::models::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participation {
    pub faculty: BTreeSet<String>,
    pub departments: BTreeSet<String>,
    pub sustainable_faculty: BTreeSet<String>,
    pub top_journal_faculty: BTreeSet<String>,
}

pub fn participation(unique_articles: &[Record]) -> Participation {
    let mut result = Participation::default();

    for article in unique_articles {
        result.faculty.insert(article.person_uuid.clone());
        if !article.department.is_empty() {
            result.departments.insert(article.department.clone());
        }
        if article.is_sustainable() {
            result.sustainable_faculty.insert(article.person_uuid.clone());
        }
        if article.is_top_journal() {
            result.top_journal_faculty.insert(article.person_uuid.clone());
        }
    }

    result
}
