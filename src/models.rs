use serde::{Deserialize, Serialize};

/// Number of ranked goal slots carried by each record.
pub const GOAL_SLOTS: usize = 3;

/// One row of the source dataset: a (faculty, article) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub person_uuid: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub article_uuid: String,
    pub title: String,
    pub publication_year: String,
    pub doi: String,
    pub abstract_text: String,
    pub journal_title: String,
    pub journal_issn: String,
    pub is_sustain: i64,
    /// Primary, secondary and tertiary goal numbers. Zero means unassigned.
    pub goals: [i64; GOAL_SLOTS],
    pub financial_times: String,
    pub ut_dallas: String,
    pub general_business: String,
    pub active: String,
}

impl Record {
    pub fn is_sustainable(&self) -> bool {
        self.is_sustain == 1
    }

    pub fn is_ut_dallas(&self) -> bool {
        self.ut_dallas == "1"
    }

    pub fn is_financial_times(&self) -> bool {
        self.financial_times == "1"
    }

    pub fn is_general_business(&self) -> bool {
        self.general_business == "1"
    }

    pub fn is_top_journal(&self) -> bool {
        self.is_ut_dallas() || self.is_financial_times()
    }

    /// Goal numbers in populated slots, rank order preserved.
    pub fn assigned_goals(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranked_goals().map(|(_, goal)| goal)
    }

    /// `(slot index, goal)` for every populated slot.
    pub fn ranked_goals(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.goals
            .iter()
            .enumerate()
            .filter_map(|(slot, goal)| match u32::try_from(*goal) {
                Ok(goal) if goal > 0 => Some((slot, goal)),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalCount {
    pub goal: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalGrowth {
    pub goal: u32,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentCount {
    pub department: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub department: String,
    pub total_articles: usize,
    pub sustainable_articles: usize,
    /// Fraction in `[0, 1]`.
    pub sustainability_ratio: f64,
    pub faculty_count: usize,
    pub avg_articles_per_faculty: f64,
    pub top_journal_articles: usize,
    pub top_journal_sustainable: usize,
    #[serde(rename = "departmentSDGGoals")]
    pub department_sdg_goals: Vec<GoalCount>,
    #[serde(rename = "growingSDGGoals")]
    pub growing_sdg_goals: Vec<GoalGrowth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedGoalCount {
    pub goal: u32,
    pub top1_count: usize,
    pub top2_count: usize,
    pub top3_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalCoOccurrence {
    pub goal1: u32,
    pub goal2: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalMetrics {
    /// Keys 1, 2 and 3 are always present.
    pub goals_per_article: std::collections::BTreeMap<u32, usize>,
    pub overall_frequency: Vec<GoalCount>,
    pub co_occurrence: Vec<GoalCoOccurrence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualTrend {
    pub year: String,
    pub total_articles: usize,
    pub sustainable_articles: usize,
    pub growth_rate: Option<f64>,
    pub sustainable_growth_rate: Option<f64>,
    pub general_business: usize,
    /// Articles flagged UT Dallas but not Financial Times.
    pub ut_dallas: usize,
    /// Articles flagged Financial Times but not UT Dallas.
    pub financial_times: usize,
    /// Articles carrying neither top-journal flag.
    pub other: usize,
    /// Articles with either top-journal flag. Overlaps `ut_dallas` and
    /// `financial_times`; articles with both flags are counted only here.
    pub top_journal_articles: usize,
    pub total_rolling_average: Option<f64>,
    pub sustainable_rolling_average: Option<f64>,
    pub top_journal_rolling_average: Option<f64>,
    pub total_rolling_growth_rate: Option<f64>,
    pub sustainable_rolling_growth_rate: Option<f64>,
    pub top_journal_rolling_growth_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDistribution {
    pub general_business: usize,
    pub ut_dallas: usize,
    pub financial_times: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalYearTrend {
    pub year: String,
    pub total_articles: usize,
    pub sustainable_articles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalAnalysis {
    #[serde(rename = "type")]
    pub category: String,
    pub total_articles: usize,
    pub sustainable_articles: usize,
    pub sustainability_ratio: f64,
    pub yearly_trends: Vec<JournalYearTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyRanking {
    pub name: String,
    pub total: usize,
    pub sustainable: usize,
    pub top_journals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMetrics {
    pub person_uuid: String,
    pub name: String,
    pub department: String,
    pub total_articles: usize,
    pub sustainable_articles: usize,
    pub top_journal_articles: usize,
    pub top_journal_sustainable_articles: usize,
    pub sustainability_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub count: usize,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalContributors {
    pub goal: u32,
    pub contributors: Vec<Contributor>,
}

/// Snapshot produced by [`crate::stats::compute_stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: usize,
    pub sustainable_articles: usize,
    pub unique_articles: usize,

    pub total_faculty: usize,
    pub engaging_faculty: usize,
    pub total_departments: usize,
    pub avg_articles_per_faculty: f64,
    pub avg_sustainable_articles_per_faculty: f64,
    /// Percent in `[0, 100]`.
    pub sustainability_ratio: f64,
    /// Percent in `[0, 100]`.
    pub faculty_engagement_ratio: f64,

    pub top_journal_articles: usize,
    pub sustainable_top_journal_articles: usize,
    pub avg_top_journal_articles_per_faculty: f64,
    pub avg_sustainable_top_journal_articles_per_faculty: f64,
    pub avg_articles_per_engaging_faculty: f64,
    pub avg_sustainable_articles_per_engaging_faculty: f64,
    pub avg_top_journal_articles_per_engaging_faculty: f64,

    pub top_departments: Vec<DepartmentCount>,
    pub department_stats: Vec<DepartmentSummary>,

    pub goal_distribution: Vec<GoalCount>,
    pub detailed_goal_distribution: Vec<DetailedGoalCount>,
    pub goal_metrics: GoalMetrics,

    pub year_distribution: Vec<YearCount>,
    pub annual_trends: Vec<AnnualTrend>,

    pub journal_distribution: JournalDistribution,
    pub journal_analysis: Vec<JournalAnalysis>,

    pub top_faculty: Vec<FacultyRanking>,
    pub top_sustainable_faculty: Vec<FacultyRanking>,
    pub top_journal_faculty: Vec<FacultyRanking>,
    pub faculty_metrics: Vec<FacultyMetrics>,

    pub goal_contributors: Vec<GoalContributors>,
}
