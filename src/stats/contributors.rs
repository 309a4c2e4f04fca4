use std::collections::BTreeMap;

use crate::models::{Contributor, GoalContributors, Record};
use crate::stats::OrderedGroups;

const TOP_CONTRIBUTORS: usize = 10;

/// Faculty ranked by how often their sustainable articles carry each goal.
/// A goal in any slot counts once per slot.
pub fn goal_contributors(unique_articles: &[Record]) -> Vec<GoalContributors> {
    let mut by_goal: BTreeMap<u32, OrderedGroups<Contributor>> = BTreeMap::new();

    for article in unique_articles.iter().filter(|a| a.is_sustainable()) {
        for goal in article.assigned_goals() {
            by_goal
                .entry(goal)
                .or_insert_with(OrderedGroups::new)
                .entry_or_insert_with(&article.person_uuid, || Contributor {
                    name: article.name.clone(),
                    count: 0,
                    department: article.department.clone(),
                })
                .count += 1;
        }
    }

    by_goal
        .into_iter()
        .map(|(goal, groups)| {
            let mut contributors: Vec<Contributor> = groups
                .into_entries()
                .into_iter()
                .map(|(_, contributor)| contributor)
                .collect();
            contributors.sort_by(|a, b| b.count.cmp(&a.count));
            contributors.truncate(TOP_CONTRIBUTORS);
            GoalContributors { goal, contributors }
        })
        .collect()
}
