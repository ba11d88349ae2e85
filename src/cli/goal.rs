//! Goal commands: new, list, show, progress, complete, reopen, status, delete.

use clap::{Subcommand, ValueEnum};
use jiff::Timestamp;

use crate::model::{Goal, GoalId, GoalStatus, Priority, instant};
use crate::roadmap::DependencyGraph;
use crate::storage::Storage;

use super::format::{format_goal_detail, format_goal_line, short_id};
use super::resolve_goal;

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    /// Create a new goal. Prints the goal ID.
    New {
        /// What the goal is.
        title: String,

        /// Deadline: `YYYY-MM-DD` or an RFC 3339 timestamp.
        #[arg(long, value_parser = parse_instant)]
        deadline: Option<Timestamp>,

        /// Estimated effort in days.
        #[arg(long)]
        estimate: Option<u32>,

        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,

        #[arg(long)]
        category: Option<String>,

        /// A sub-goal. Can be specified multiple times; order is kept.
        #[arg(long = "sub-goal")]
        sub_goals: Vec<String>,
    },

    /// List goals in creation order.
    List,

    /// Show one goal with its dependencies.
    Show {
        /// Goal ID: full UUID or unambiguous prefix.
        goal: String,
    },

    /// Set a goal's progress.
    Progress {
        goal: String,

        /// Percentage, 0 to 100.
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Mark a goal completed. Progress is left as is.
    Complete { goal: String },

    /// Mark a completed goal as not completed.
    Reopen { goal: String },

    /// Set or clear a goal's explicit status.
    Status {
        goal: String,

        /// The new status. Omit to derive it from completion again.
        #[arg(value_enum)]
        status: Option<StatusArg>,
    },

    /// Delete a goal and every dependency that names it.
    Delete { goal: String },
}

/// CLI-facing priority, mapped to the domain `Priority`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl PriorityArg {
    fn to_domain(self) -> Priority {
        match self {
            Self::Low => Priority::Low,
            Self::Medium => Priority::Medium,
            Self::High => Priority::High,
        }
    }
}

/// CLI-facing status, mapped to the domain `GoalStatus`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    NotStarted,
    InProgress,
    Blocked,
    Completed,
}

impl StatusArg {
    fn to_domain(self) -> GoalStatus {
        match self {
            Self::NotStarted => GoalStatus::NotStarted,
            Self::InProgress => GoalStatus::InProgress,
            Self::Blocked => GoalStatus::Blocked,
            Self::Completed => GoalStatus::Completed,
        }
    }
}

fn parse_instant(s: &str) -> Result<Timestamp, String> {
    instant::parse_text(s).ok_or_else(|| format!("not a date: {s} (expected YYYY-MM-DD or RFC 3339)"))
}

pub(super) fn run(storage: &Storage, command: GoalCommand) -> Result<(), String> {
    match command {
        GoalCommand::New {
            title,
            deadline,
            estimate,
            priority,
            category,
            sub_goals,
        } => {
            let mut goal = Goal::new(title);
            goal.deadline = deadline;
            goal.time_estimate = estimate;
            goal.priority = priority.to_domain();
            goal.category = category;
            goal.sub_goals = sub_goals;
            cmd_new(storage, &goal)
        }
        GoalCommand::List => cmd_list(storage),
        GoalCommand::Show { goal } => cmd_show(storage, &goal),
        GoalCommand::Progress { goal, percent } => edit(storage, &goal, |g| g.progress = percent),
        GoalCommand::Complete { goal } => edit(storage, &goal, |g| g.completed = true),
        GoalCommand::Reopen { goal } => edit(storage, &goal, |g| g.completed = false),
        GoalCommand::Status { goal, status } => {
            edit(storage, &goal, |g| g.status = status.map(StatusArg::to_domain))
        }
        GoalCommand::Delete { goal } => cmd_delete(storage, &goal),
    }
}

fn cmd_new(storage: &Storage, goal: &Goal) -> Result<(), String> {
    if goal.title.trim().is_empty() {
        return Err("goal title cannot be empty".to_string());
    }
    storage
        .create_goal(goal)
        .map_err(|e| format!("failed to create goal: {e}"))?;

    println!("{}", goal.id);
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let goals = storage
        .list_goals()
        .map_err(|e| format!("failed to list goals: {e}"))?;

    if goals.is_empty() {
        println!("No goals");
        return Ok(());
    }

    let graph = DependencyGraph::from_edges(
        storage
            .list_edges()
            .map_err(|e| format!("failed to list dependencies: {e}"))?,
    );
    let completed = |id: GoalId| goals.iter().find(|g| g.id == id).map(|g| g.completed);

    for goal in &goals {
        let blockers = graph.blockers_of(goal.id, completed).len();
        println!("{}", format_goal_line(goal, blockers));
    }
    Ok(())
}

fn cmd_show(storage: &Storage, reference: &str) -> Result<(), String> {
    let goal = resolve_goal(storage, reference)?;
    let goals = storage
        .list_goals()
        .map_err(|e| format!("failed to list goals: {e}"))?;
    let graph = DependencyGraph::from_edges(
        storage
            .list_edges()
            .map_err(|e| format!("failed to list dependencies: {e}"))?,
    );

    let lookup = |id: GoalId| goals.iter().find(|g| g.id == id);
    let depends_on: Vec<&Goal> = graph.dependencies_of(goal.id).filter_map(lookup).collect();
    let dependents: Vec<&Goal> = graph.dependents_of(goal.id).filter_map(lookup).collect();

    println!("{}", format_goal_detail(&goal, &depends_on, &dependents));
    Ok(())
}

/// Load a goal, apply `change`, and write it back.
fn edit(storage: &Storage, reference: &str, change: impl FnOnce(&mut Goal)) -> Result<(), String> {
    let mut goal = resolve_goal(storage, reference)?;
    change(&mut goal);
    storage
        .update_goal(&goal)
        .map_err(|e| format!("failed to update goal: {e}"))?;

    eprintln!(
        "Goal {} [{}] {}%",
        short_id(goal.id),
        goal.effective_status(),
        goal.progress
    );
    Ok(())
}

fn cmd_delete(storage: &Storage, reference: &str) -> Result<(), String> {
    let goal = resolve_goal(storage, reference)?;
    let edges = storage
        .delete_goal(goal.id)
        .map_err(|e| format!("failed to delete goal: {e}"))?;

    eprintln!("Deleted \"{}\" and {edges} dependency link(s)", goal.title);
    Ok(())
}
