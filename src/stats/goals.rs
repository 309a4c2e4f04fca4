use std::collections::BTreeMap;

use tracing::trace;

use crate::models::{
    DetailedGoalCount, GoalCoOccurrence, GoalCount, GoalMetrics, Record, GOAL_SLOTS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GoalStats {
    pub goal_distribution: Vec<GoalCount>,
    pub detailed_goal_distribution: Vec<DetailedGoalCount>,
    pub goal_metrics: GoalMetrics,
}

/// Per-goal counts by slot. `total` grows once per slot occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SlotTally {
    by_slot: [usize; GOAL_SLOTS],
    total: usize,
}

pub fn goal_stats(unique_articles: &[Record]) -> GoalStats {
    let mut tallies: BTreeMap<u32, SlotTally> = BTreeMap::new();
    let mut goals_per_article: BTreeMap<u32, usize> =
        (1..=GOAL_SLOTS as u32).map(|k| (k, 0)).collect();
    let mut pairs: BTreeMap<(u32, u32), usize> = BTreeMap::new();

    for article in unique_articles.iter().filter(|a| a.is_sustainable()) {
        let goals: Vec<u32> = article.assigned_goals().collect();
        trace!(article = %article.article_uuid, goals = goals.len(), "goal slots");

        if !goals.is_empty() {
            *goals_per_article.entry(goals.len() as u32).or_insert(0) += 1;
        }

        for (i, first) in goals.iter().enumerate() {
            for second in &goals[i + 1..] {
                if first == second {
                    continue;
                }
                let key = (*first.min(second), *first.max(second));
                *pairs.entry(key).or_insert(0) += 1;
            }
        }

        for (slot, goal) in article.ranked_goals() {
            let tally = tallies.entry(goal).or_default();
            tally.by_slot[slot] += 1;
            tally.total += 1;
        }
    }

    let mut co_occurrence: Vec<GoalCoOccurrence> = pairs
        .into_iter()
        .map(|((goal1, goal2), count)| GoalCoOccurrence {
            goal1,
            goal2,
            count,
        })
        .collect();
    co_occurrence.sort_by(|a, b| b.count.cmp(&a.count));

    let goal_distribution: Vec<GoalCount> = tallies
        .iter()
        .map(|(goal, tally)| GoalCount {
            goal: *goal,
            count: tally.total,
        })
        .collect();

    let detailed_goal_distribution = tallies
        .iter()
        .map(|(goal, tally)| DetailedGoalCount {
            goal: *goal,
            top1_count: tally.by_slot[0],
            top2_count: tally.by_slot[1],
            top3_count: tally.by_slot[2],
            total_count: tally.total,
        })
        .collect();

    GoalStats {
        goal_metrics: GoalMetrics {
            goals_per_article,
            overall_frequency: goal_distribution.clone(),
            co_occurrence,
        },
        goal_distribution,
        detailed_goal_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::article;

    #[test]
    fn counts_goals_per_slot() {
        let articles = vec![
            article("p1", "a1").sustainable([3, 5, 0]).build(),
            article("p1", "a2").sustainable([5, 0, 3]).build(),
            article("p2", "a3").sustainable([0, 0, 0]).build(),
            article("p2", "a4").build(),
        ];

        let stats = goal_stats(&articles);
        assert_eq!(
            stats.detailed_goal_distribution,
            vec![
                DetailedGoalCount {
                    goal: 3,
                    top1_count: 1,
                    top2_count: 0,
                    top3_count: 1,
                    total_count: 2,
                },
                DetailedGoalCount {
                    goal: 5,
                    top1_count: 1,
                    top2_count: 1,
                    top3_count: 0,
                    total_count: 2,
                },
            ]
        );
        assert_eq!(stats.goal_distribution, stats.goal_metrics.overall_frequency);
    }

    #[test]
    fn ignores_goals_on_non_sustainable_articles() {
        let mut record = article("p1", "a1").build();
        record.goals = [4, 0, 0];
        let stats = goal_stats(&[record]);
        assert!(stats.goal_distribution.is_empty());
        assert_eq!(stats.goal_metrics.goals_per_article.values().sum::<usize>(), 0);
    }

    #[test]
    fn same_goal_in_two_slots_counts_twice() {
        let stats = goal_stats(&[article("p1", "a1").sustainable([6, 6, 0]).build()]);
        assert_eq!(stats.goal_distribution, vec![GoalCount { goal: 6, count: 2 }]);
        assert!(stats.goal_metrics.co_occurrence.is_empty());
    }

    #[test]
    fn each_article_lands_in_one_goals_per_article_bucket() {
        let articles = vec![
            article("p1", "a1").sustainable([1, 0, 0]).build(),
            article("p1", "a2").sustainable([0, 2, 0]).build(),
            article("p1", "a3").sustainable([1, 2, 0]).build(),
            article("p1", "a4").sustainable([1, 0, 3]).build(),
            article("p1", "a5").sustainable([1, 2, 3]).build(),
            article("p1", "a6").sustainable([0, 0, 0]).build(),
        ];
        let per_article = goal_stats(&articles).goal_metrics.goals_per_article;
        assert_eq!(per_article.get(&1), Some(&2));
        assert_eq!(per_article.get(&2), Some(&2));
        assert_eq!(per_article.get(&3), Some(&1));
        assert_eq!(per_article.values().sum::<usize>(), 5);
    }

    #[test]
    fn three_distinct_goals_yield_three_ordered_pairs() {
        let stats = goal_stats(&[article("p1", "a1").sustainable([12, 4, 7]).build()]);
        let mut pairs: Vec<(u32, u32, usize)> = stats
            .goal_metrics
            .co_occurrence
            .iter()
            .map(|p| (p.goal1, p.goal2, p.count))
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![(4, 7, 1), (4, 12, 1), (7, 12, 1)]);
    }

    #[test]
    fn co_occurrence_is_sorted_by_count() {
        let articles = vec![
            article("p1", "a1").sustainable([1, 2, 0]).build(),
            article("p1", "a2").sustainable([9, 8, 0]).build(),
            article("p1", "a3").sustainable([8, 9, 0]).build(),
        ];
        let co = goal_stats(&articles).goal_metrics.co_occurrence;
        assert_eq!(co[0], GoalCoOccurrence { goal1: 8, goal2: 9, count: 2 });
        assert_eq!(co[1], GoalCoOccurrence { goal1: 1, goal2: 2, count: 1 });
    }
}
