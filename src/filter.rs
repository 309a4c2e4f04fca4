use std::collections::BTreeSet;

use crate::error::{DashboardError, Result};
use crate::models::Record;
use crate::parser::parse_leading_int;

pub const MAX_GOAL: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i64,
    pub end: i64,
}

impl YearRange {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvertedYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i64) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Record selection shared by every consumer of the engine. Criteria left
/// unset match everything; set criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    department: Option<String>,
    years: Option<YearRange>,
    goals: BTreeSet<u32>,
    sustainable: Option<bool>,
    general_business_only: bool,
    top_journals_only: bool,
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn years(mut self, range: YearRange) -> Self {
        self.years = Some(range);
        self
    }

    pub fn goals<I>(mut self, goals: I) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        for goal in goals {
            if goal == 0 || goal > MAX_GOAL {
                return Err(DashboardError::InvalidGoal(goal));
            }
            self.goals.insert(goal);
        }
        Ok(self)
    }

    pub fn sustainable(mut self, sustainable: bool) -> Self {
        self.sustainable = Some(sustainable);
        self
    }

    pub fn general_business_only(mut self, enabled: bool) -> Self {
        self.general_business_only = enabled;
        self
    }

    pub fn top_journals_only(mut self, enabled: bool) -> Self {
        self.top_journals_only = enabled;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.general_business_only && !record.is_general_business() {
            return false;
        }
        if self.top_journals_only && !record.is_top_journal() {
            return false;
        }

        if let Some(department) = &self.department {
            if record.department != *department {
                return false;
            }
        }

        if let Some(range) = self.years {
            match parse_leading_int(&record.publication_year) {
                Some(year) if range.contains(year) => {}
                _ => return false,
            }
        }

        if let Some(sustainable) = self.sustainable {
            if record.is_sustainable() != sustainable {
                return false;
            }
        }

        // Goal selection only constrains sustainable articles.
        if !self.goals.is_empty() && record.is_sustainable() {
            let has_goal = record
                .assigned_goals()
                .any(|goal| self.goals.contains(&goal));
            if !has_goal {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
