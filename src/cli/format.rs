//! Output formatting for CLI display.

use std::fmt::Write;

use jiff::{Timestamp, tz::TimeZone};

use crate::model::{Goal, GoalId, TimelineItem};
use crate::roadmap::{DataQualityWarning, Projection};
use crate::storage::ImportReport;

/// First eight hex digits of a goal id.
pub(super) fn short_id(id: GoalId) -> String {
    id.to_string()[..8].to_string()
}

fn date(ts: Timestamp) -> String {
    ts.to_zoned(TimeZone::UTC).date().to_string()
}

/// One line per goal for `goal list`.
pub(super) fn format_goal_line(goal: &Goal, blockers: usize) -> String {
    let mut line = format!(
        "{}  [{}] {:>3}%  {}",
        short_id(goal.id),
        goal.effective_status(),
        goal.progress,
        goal.title
    );
    if let Some(deadline) = goal.deadline {
        let _ = write!(line, "  (due {})", date(deadline));
    }
    if blockers > 0 {
        let _ = write!(line, "  [waiting on {blockers}]");
    }
    line
}

/// Multi-line view for `goal show`.
pub(super) fn format_goal_detail(goal: &Goal, depends_on: &[&Goal], dependents: &[&Goal]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", goal.id, goal.title);
    let _ = writeln!(
        out,
        "status: {}  progress: {}%  completed: {}",
        goal.effective_status(),
        goal.progress,
        if goal.completed { "yes" } else { "no" }
    );
    let _ = writeln!(out, "priority: {}", goal.priority);
    if let Some(category) = &goal.category {
        let _ = writeln!(out, "category: {category}");
    }
    let created = goal.created_at.map_or_else(|| "unknown".to_string(), date);
    let deadline = goal.deadline.map_or_else(|| "none".to_string(), date);
    let _ = writeln!(out, "created: {created}  deadline: {deadline}");
    if let Some(days) = goal.time_estimate {
        let _ = writeln!(out, "estimate: {days} day(s)");
    }

    for (i, sub) in goal.sub_goals.iter().enumerate() {
        let _ = writeln!(out, "  {}. {sub}", i + 1);
    }

    let incomplete = depends_on.iter().filter(|g| !g.completed).count();
    if !depends_on.is_empty() {
        let _ = writeln!(out, "depends on ({incomplete} incomplete):");
        for dep in depends_on {
            let mark = if dep.completed { "x" } else { " " };
            let _ = writeln!(out, "  [{mark}] {}  {}", short_id(dep.id), dep.title);
        }
    }
    if !dependents.is_empty() {
        let _ = writeln!(out, "needed by:");
        for dep in dependents {
            let _ = writeln!(out, "  {}  {}", short_id(dep.id), dep.title);
        }
    }

    out.trim_end().to_string()
}

pub(super) fn format_warning(warning: &DataQualityWarning) -> String {
    format!(
        "warning: {} \"{}\" left off the timeline: {}",
        short_id(warning.goal_id),
        warning.title,
        warning.reason
    )
}

pub(super) fn format_import_report(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {} new goal(s), updated {}, added {} dependency link(s)",
        report.goals_created, report.goals_updated, report.edges_added
    );
    if report.edges_rejected > 0 {
        let _ = write!(out, "; {} refused (self or cyclic)", report.edges_rejected);
    }
    if report.edges_dangling > 0 {
        let _ = write!(out, "; {} naming unknown goals", report.edges_dangling);
    }
    out
}

/// Draw one bar per item on a `width`-column axis.
///
/// `#` marks the completed share of a bar, `=` the rest.
pub(super) fn render_timeline(items: &[TimelineItem], projection: &Projection, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:8}  {:<width$}  {}",
        "",
        date(projection.min),
        date(projection.max)
    );

    for item in items {
        let span = projection.span(item);
        let (start, end) = columns(span.left, span.width, width);
        let filled = (end - start) * usize::from(item.progress) / 100;

        let mut bar = String::with_capacity(width);
        for col in 0..width {
            bar.push(match col {
                c if c < start || c >= end => '.',
                c if c < start + filled => '#',
                _ => '=',
            });
        }

        let flag = if item.effectively_blocked() { " !" } else { "" };
        let _ = writeln!(
            out,
            "{}  {bar}  {} [{}] {}%{flag}",
            short_id(item.id),
            item.title,
            item.status,
            item.progress
        );
    }
    out
}

/// Maps a percent span onto `[start, end)` columns, at least one column wide.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn columns(left: f64, span: f64, width: usize) -> (usize, usize) {
    let scale = |pct: f64| ((pct / 100.0) * width as f64).round() as usize;
    let start = scale(left).min(width - 1);
    let end = scale(left + span).clamp(start + 1, width);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::Uuid;

    use crate::model::GoalStatus;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn item(title: &str, start: &str, end: &str, progress: u8) -> TimelineItem {
        TimelineItem {
            id: Uuid::new_v4(),
            title: title.into(),
            start: ts(start),
            end: ts(end),
            duration_days: 0,
            status: GoalStatus::InProgress,
            blocked: false,
            progress,
        }
    }

    #[test]
    fn columns_cover_full_and_partial_spans() {
        assert_eq!(columns(0.0, 100.0, 10), (0, 10));
        assert_eq!(columns(50.0, 50.0, 10), (5, 10));
        // Zero-width spans still get one column.
        assert_eq!(columns(100.0, 0.0, 10), (9, 10));
        assert_eq!(columns(0.0, 0.0, 10), (0, 1));
    }

    #[test]
    fn renders_bars_with_progress() {
        let items = [
            item("Whole", "2024-01-01T00:00:00Z", "2024-01-11T00:00:00Z", 50),
            item("Second half", "2024-01-06T00:00:00Z", "2024-01-11T00:00:00Z", 0),
        ];
        let projection = Projection::from_items(&items).unwrap();
        let out = render_timeline(&items, &projection, 10);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("2024-01-01"));
        assert!(lines[0].contains("2024-01-11"));
        assert!(lines[1].contains("#####=====  Whole [in_progress] 50%"));
        assert!(lines[2].contains(".....=====  Second half"));
    }

    #[test]
    fn blocked_items_are_flagged() {
        let mut blocked = item("Waiting", "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", 0);
        blocked.blocked = true;
        let items = [blocked];
        let projection = Projection::from_items(&items).unwrap();

        let out = render_timeline(&items, &projection, 4);
        assert!(out.lines().nth(1).unwrap().ends_with(" !"));
    }

    #[test]
    fn goal_line_mentions_deadline_and_blocking() {
        let mut goal = Goal::new("Submit paper");
        goal.deadline = Some(ts("2024-03-01T12:00:00Z"));

        let line = format_goal_line(&goal, 2);
        assert!(line.contains("(due 2024-03-01)"));
        assert!(line.contains("[not_started]"));
        assert!(line.ends_with("[waiting on 2]"));
        assert!(!format_goal_line(&goal, 0).contains("waiting"));
    }

    #[test]
    fn detail_lists_dependencies() {
        let goal = Goal::new("Chapter 1");
        let mut done = Goal::new("Outline");
        done.completed = true;
        let open = Goal::new("Sources");

        let out = format_goal_detail(&goal, &[&done, &open], &[]);
        assert!(out.contains("depends on (1 incomplete):"));
        assert!(out.contains("[x]"));
        assert!(!out.contains("needed by"));
    }

    #[test]
    fn import_report_mentions_refusals() {
        let report = ImportReport {
            goals_created: 2,
            edges_added: 1,
            edges_rejected: 1,
            ..ImportReport::default()
        };
        let text = format_import_report(&report);
        assert!(text.starts_with("Imported 2 new goal(s)"));
        assert!(text.contains("1 refused"));
        assert!(!text.contains("unknown goals"));
    }
}
