use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::DashboardStats;

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{value:+.1}%"),
        None => "-".to_string(),
    }
}

pub fn build_report(
    scope: Option<&str>,
    generated_at: DateTime<Utc>,
    stats: &DashboardStats,
) -> String {
    let mut output = String::new();
    let scope_label = scope.unwrap_or("all articles");

    let _ = writeln!(output, "# Sustainability Research Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        scope_label,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- {} unique articles, {} sustainable ({:.1}%)",
        stats.total_articles, stats.sustainable_articles, stats.sustainability_ratio
    );
    let _ = writeln!(
        output,
        "- {} faculty across {} departments, {} engaged in sustainability ({:.1}%)",
        stats.total_faculty,
        stats.total_departments,
        stats.engaging_faculty,
        stats.faculty_engagement_ratio
    );
    let _ = writeln!(
        output,
        "- {} top-journal articles, {} of them sustainable",
        stats.top_journal_articles, stats.sustainable_top_journal_articles
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Departments");
    if stats.department_stats.is_empty() {
        let _ = writeln!(output, "No departments recorded.");
    } else {
        for dept in stats.department_stats.iter().take(5) {
            let goals = dept
                .department_sdg_goals
                .iter()
                .map(|g| format!("SDG {}", g.goal))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                output,
                "- {}: {} articles, {:.0}% sustainable, {} faculty{}",
                dept.department,
                dept.total_articles,
                dept.sustainability_ratio * 100.0,
                dept.faculty_count,
                if goals.is_empty() {
                    String::new()
                } else {
                    format!(" (top goals: {goals})")
                }
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Published Faculty");
    if stats.top_faculty.is_empty() {
        let _ = writeln!(output, "No faculty with articles.");
    } else {
        for faculty in &stats.top_faculty {
            let _ = writeln!(
                output,
                "- {}: {} articles ({} sustainable, {} top journal)",
                faculty.name, faculty.total, faculty.sustainable, faculty.top_journals
            );
        }
    }

    let mut goals = stats.goal_distribution.clone();
    goals.sort_by(|a, b| b.count.cmp(&a.count));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Sustainability Goals");
    if goals.is_empty() {
        let _ = writeln!(output, "No goal assignments recorded.");
    } else {
        for goal in &goals {
            let _ = writeln!(output, "- SDG {}: {} assignments", goal.goal, goal.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Frequent Goal Pairs");
    if stats.goal_metrics.co_occurrence.is_empty() {
        let _ = writeln!(output, "No co-occurring goals recorded.");
    } else {
        for pair in stats.goal_metrics.co_occurrence.iter().take(5) {
            let _ = writeln!(
                output,
                "- SDG {} + SDG {}: {} articles",
                pair.goal1, pair.goal2, pair.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Annual Trends");
    if stats.annual_trends.is_empty() {
        let _ = writeln!(output, "No dated articles recorded.");
    } else {
        let _ = writeln!(
            output,
            "| Year | Articles | Sustainable | Top journal | YoY | 5y rolling growth |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|");
        for year in &stats.annual_trends {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} |",
                year.year,
                year.total_articles,
                year.sustainable_articles,
                year.top_journal_articles,
                format_rate(year.growth_rate),
                format_rate(year.total_rolling_growth_rate)
            );
        }
    }

    output
}
