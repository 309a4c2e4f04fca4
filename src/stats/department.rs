use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{DepartmentCount, DepartmentSummary, GoalCount, GoalGrowth, Record};
use crate::stats::{per_member, ratio, sort_years, OrderedGroups, OUTLIER_YEAR};

/// Years in the growth window, and how many of them form the earlier half.
const GROWTH_WINDOW: usize = 5;
const EARLIER_YEARS: usize = 2;
/// Substituted for a zero earlier-window average.
const EARLIER_AVG_FLOOR: f64 = 0.1;

const TOP_GOALS: usize = 3;
const TOP_DEPARTMENTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentStats {
    /// Ordered by total article count, descending.
    pub department_stats: Vec<DepartmentSummary>,
    pub top_departments: Vec<DepartmentCount>,
}

#[derive(Default)]
struct DepartmentAcc {
    total: usize,
    sustainable: usize,
    faculty: HashSet<String>,
    top_journals: usize,
    top_journal_sustainable: usize,
    goals: BTreeMap<u32, usize>,
    yearly_goals: BTreeMap<String, BTreeMap<u32, usize>>,
}

pub fn department_stats(unique_articles: &[Record]) -> DepartmentStats {
    let mut groups: OrderedGroups<DepartmentAcc> = OrderedGroups::new();

    for article in unique_articles {
        if article.department.is_empty() {
            continue;
        }
        let acc = groups.entry_or_insert_with(&article.department, DepartmentAcc::default);

        acc.total += 1;
        acc.faculty.insert(article.person_uuid.clone());

        let top_journal = article.is_top_journal();
        if top_journal {
            acc.top_journals += 1;
        }
        if !article.is_sustainable() {
            continue;
        }

        acc.sustainable += 1;
        if top_journal {
            acc.top_journal_sustainable += 1;
        }
        for goal in article.assigned_goals() {
            *acc.goals.entry(goal).or_insert(0) += 1;
        }
        let dated = !article.publication_year.is_empty()
            && article.publication_year != OUTLIER_YEAR;
        if dated && article.assigned_goals().next().is_some() {
            let year = acc
                .yearly_goals
                .entry(article.publication_year.clone())
                .or_default();
            for goal in article.assigned_goals() {
                *year.entry(goal).or_insert(0) += 1;
            }
        }
    }

    let mut department_stats: Vec<DepartmentSummary> = groups
        .into_entries()
        .into_iter()
        .map(|(department, acc)| summarize(department, acc))
        .collect();
    department_stats.sort_by(|a, b| b.total_articles.cmp(&a.total_articles));

    let top_departments = department_stats
        .iter()
        .take(TOP_DEPARTMENTS)
        .map(|dept| DepartmentCount {
            department: dept.department.clone(),
            count: dept.total_articles,
        })
        .collect();

    DepartmentStats {
        department_stats,
        top_departments,
    }
}

fn summarize(department: String, acc: DepartmentAcc) -> DepartmentSummary {
    let mut top_goals: Vec<GoalCount> = acc
        .goals
        .iter()
        .map(|(goal, count)| GoalCount {
            goal: *goal,
            count: *count,
        })
        .collect();
    top_goals.sort_by(|a, b| b.count.cmp(&a.count));
    top_goals.truncate(TOP_GOALS);

    DepartmentSummary {
        department,
        total_articles: acc.total,
        sustainable_articles: acc.sustainable,
        sustainability_ratio: ratio(acc.sustainable, acc.total),
        faculty_count: acc.faculty.len(),
        avg_articles_per_faculty: per_member(acc.total, acc.faculty.len()),
        top_journal_articles: acc.top_journals,
        top_journal_sustainable: acc.top_journal_sustainable,
        department_sdg_goals: top_goals,
        growing_sdg_goals: growing_goals(&acc.yearly_goals),
    }
}

/// Goals whose average yearly count over the last three of the five most
/// recent years grew fastest against the two years before them.
pub fn growing_goals(yearly_goals: &BTreeMap<String, BTreeMap<u32, usize>>) -> Vec<GoalGrowth> {
    let mut years: Vec<String> = yearly_goals.keys().cloned().collect();
    if years.len() < GROWTH_WINDOW {
        return Vec::new();
    }
    sort_years(&mut years);

    let recent = &years[years.len() - GROWTH_WINDOW..];
    let (earlier, later) = recent.split_at(EARLIER_YEARS);
    let candidates: BTreeSet<u32> = yearly_goals
        .values()
        .flat_map(|counts| counts.keys().copied())
        .collect();

    let window_sum = |window: &[String], goal: u32| -> usize {
        window
            .iter()
            .filter_map(|year| yearly_goals.get(year))
            .map(|counts| counts.get(&goal).copied().unwrap_or(0))
            .sum()
    };

    let mut growth: Vec<GoalGrowth> = candidates
        .into_iter()
        .filter_map(|goal| {
            let earlier_sum = window_sum(earlier, goal);
            let later_sum = window_sum(later, goal);
            if later_sum == 0 {
                return None;
            }

            let earlier_avg = if earlier_sum == 0 {
                EARLIER_AVG_FLOOR
            } else {
                earlier_sum as f64 / earlier.len() as f64
            };
            let later_avg = later_sum as f64 / later.len() as f64;
            let growth_rate = (later_avg - earlier_avg) / earlier_avg * 100.0;

            growth_rate
                .is_finite()
                .then_some(GoalGrowth { goal, growth_rate })
        })
        .collect();

    growth.sort_by(|a, b| b.growth_rate.total_cmp(&a.growth_rate));
    growth.truncate(TOP_GOALS);
    growth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::article;

    fn yearly(entries: &[(&str, &[(u32, usize)])]) -> BTreeMap<String, BTreeMap<u32, usize>> {
        entries
            .iter()
            .map(|(year, counts)| (year.to_string(), counts.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn aggregates_totals_ratios_and_top_goals() {
        let articles = vec![
            article("p1", "a1").department("Finance").sustainable([7, 13, 0]).ut_dallas().build(),
            article("p2", "a2").department("Finance").sustainable([13, 0, 0]).build(),
            article("p1", "a3").department("Finance").financial_times().build(),
            article("p1", "a4").department("Finance").build(),
            article("p3", "a5").department("Marketing").sustainable([1, 2, 3]).build(),
            article("p4", "a6").department("").sustainable([4, 0, 0]).build(),
        ];

        let result = department_stats(&articles);
        assert_eq!(result.department_stats.len(), 2);

        let finance = &result.department_stats[0];
        assert_eq!(finance.department, "Finance");
        assert_eq!(finance.total_articles, 4);
        assert_eq!(finance.sustainable_articles, 2);
        assert_eq!(finance.sustainability_ratio, 0.5);
        assert_eq!(finance.faculty_count, 2);
        assert_eq!(finance.avg_articles_per_faculty, 2.0);
        assert_eq!(finance.top_journal_articles, 2);
        assert_eq!(finance.top_journal_sustainable, 1);
        assert_eq!(
            finance.department_sdg_goals,
            vec![GoalCount { goal: 13, count: 2 }, GoalCount { goal: 7, count: 1 }]
        );
        assert!(finance.growing_sdg_goals.is_empty());

        assert_eq!(
            result.top_departments,
            vec![
                DepartmentCount { department: "Finance".to_string(), count: 4 },
                DepartmentCount { department: "Marketing".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn top_goals_keep_three_with_ties_by_goal_number() {
        let articles = vec![
            article("p1", "a1").department("Ops").sustainable([9, 4, 2]).build(),
            article("p1", "a2").department("Ops").sustainable([11, 0, 0]).build(),
        ];
        let result = department_stats(&articles);
        let goals: Vec<u32> = result.department_stats[0]
            .department_sdg_goals
            .iter()
            .map(|g| g.goal)
            .collect();
        assert_eq!(goals, vec![2, 4, 9]);
    }

    #[test]
    fn top_departments_keeps_five() {
        let articles: Vec<Record> = (0..7)
            .map(|i| {
                article("p1", &format!("a{i}"))
                    .department(&format!("Dept {i}"))
                    .build()
            })
            .collect();
        let result = department_stats(&articles);
        assert_eq!(result.department_stats.len(), 7);
        assert_eq!(result.top_departments.len(), 5);
        assert_eq!(result.top_departments[0].department, "Dept 0");
    }

    #[test]
    fn growing_goals_need_five_years() {
        let data = yearly(&[
            ("2018", &[(1, 1)]),
            ("2019", &[(1, 1)]),
            ("2020", &[(1, 2)]),
            ("2021", &[(1, 2)]),
        ]);
        assert!(growing_goals(&data).is_empty());
    }

    #[test]
    fn growing_goals_compare_split_window_averages() {
        let data = yearly(&[
            ("2015", &[(8, 9)]),
            ("2017", &[(1, 1), (5, 2)]),
            ("2018", &[(1, 1), (5, 2)]),
            ("2019", &[(1, 2), (6, 1)]),
            ("2020", &[(1, 2), (5, 1)]),
            ("2021", &[(1, 2)]),
        ]);

        let growth = growing_goals(&data);
        // Goal 6 has no earlier-window articles, so its base is floored.
        assert_eq!(growth[0].goal, 6);
        assert!((growth[0].growth_rate - (1.0 / 3.0 - 0.1) / 0.1 * 100.0).abs() < 1e-9);
        assert_eq!(growth[1].goal, 1);
        assert!((growth[1].growth_rate - 100.0).abs() < 1e-9);
        assert_eq!(growth[2].goal, 5);
        assert!((growth[2].growth_rate - (1.0 / 3.0 - 2.0) / 2.0 * 100.0).abs() < 1e-9);
        // Goal 8 only appears outside the window, so it never qualifies.
        assert!(growth.iter().all(|g| g.goal != 8));
    }

    #[test]
    fn years_without_goal_assignments_do_not_count_toward_the_window() {
        let mut articles = Vec::new();
        for (i, year) in ["2016", "2017", "2018", "2019"].iter().enumerate() {
            articles.push(
                article("p1", &format!("g{i}"))
                    .department("Econ")
                    .year(year)
                    .sustainable([3, 0, 0])
                    .build(),
            );
        }
        articles.push(
            article("p1", "bare")
                .department("Econ")
                .year("2020")
                .sustainable([0, 0, 0])
                .build(),
        );

        let result = department_stats(&articles);
        assert!(result.department_stats[0].growing_sdg_goals.is_empty());
    }

    #[test]
    fn outlier_year_is_left_out_of_the_growth_window() {
        let articles: Vec<Record> = ["1971", "2019", "2020", "2021", "2022"]
            .iter()
            .enumerate()
            .map(|(i, year)| {
                article("p1", &format!("g{i}"))
                    .department("Econ")
                    .year(year)
                    .sustainable([3, 0, 0])
                    .build()
            })
            .collect();

        let result = department_stats(&articles);
        let econ = &result.department_stats[0];
        assert_eq!(econ.department_sdg_goals, vec![GoalCount { goal: 3, count: 5 }]);
        assert!(econ.growing_sdg_goals.is_empty());
    }
}
