//! CLI interface for the roadmap.
//!
//! Each subcommand is non-interactive: arguments in, text or JSON out.
//!
//! - `roadmap goal ...` — create, edit, and inspect goals.
//! - `roadmap link|unlink` — manage dependencies between goals.
//! - `roadmap timeline` — render the roadmap.
//! - `roadmap export|import` — move whole snapshots in and out.
//!
//! Goals are referenced by full UUID or unambiguous prefix.

mod format;
mod goal;
mod timeline;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::model::{Goal, SnapshotRecord};
use crate::roadmap::LinkOutcome;
use crate::storage::Storage;

pub use goal::GoalCommand;
pub use timeline::OrderArg;

/// Roadmap — plan goals, see what blocks what.
#[derive(Debug, Parser)]
#[command(name = "roadmap", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: planning a term
  1. roadmap goal new "Literature review" --deadline 2025-02-01 --estimate 20
     → prints a goal ID (e.g. 5f1c09ab)
  2. roadmap goal new "Write chapter 1" --deadline 2025-03-15
  3. roadmap link 5f1 c07        (chapter 1 waits on the review)
  4. roadmap timeline --order start
  5. roadmap goal complete 5f1   (chapter 1 is unblocked)"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, edit, and inspect goals.
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Make one goal depend on another.
    ///
    /// Linking an existing pair does nothing. Self-dependencies and cycles are refused.
    Link {
        /// The goal that must complete first.
        depends_on: String,
        /// The goal that waits.
        dependent: String,
    },

    /// Remove a dependency. Removing one that doesn't exist does nothing.
    Unlink {
        depends_on: String,
        dependent: String,
    },

    /// Render the roadmap timeline.
    ///
    /// Goals without usable dates are left off and reported on stderr.
    Timeline {
        /// Ordering of rows. Defaults to the configured `order`.
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Bar width in columns. Defaults to the configured `width`.
        #[arg(long)]
        width: Option<usize>,

        /// Print items and their projected spans as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export every goal and edge as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Merge a JSON snapshot into the store.
    ///
    /// Dates may be RFC 3339 strings, `YYYY-MM-DD`, epoch milliseconds, or
    /// `{ "seconds": .., "nanoseconds": .. }` objects.
    Import {
        file: PathBuf,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Goal { command } => goal::run(storage, command),
        Command::Link {
            depends_on,
            dependent,
        } => cmd_link(storage, &depends_on, &dependent),
        Command::Unlink {
            depends_on,
            dependent,
        } => cmd_unlink(storage, &depends_on, &dependent),
        Command::Timeline { order, width, json } => {
            let order = order.map_or(config.order, OrderArg::to_domain);
            let width = width.unwrap_or(config.width).max(1);
            timeline::cmd_timeline(config, storage, order, width, json)
        }
        Command::Export { out } => cmd_export(storage, out.as_deref()),
        Command::Import { file } => cmd_import(storage, &file),
    }
}

fn cmd_link(storage: &Storage, depends_on: &str, dependent: &str) -> Result<(), String> {
    let from = resolve_goal(storage, depends_on)?;
    let to = resolve_goal(storage, dependent)?;

    let outcome = storage
        .link_goals(from.id, to.id)
        .map_err(|e| format!("failed to link goals: {e}"))?;

    match outcome {
        LinkOutcome::Added => eprintln!("\"{}\" now waits on \"{}\"", to.title, from.title),
        LinkOutcome::AlreadyLinked => {
            eprintln!("\"{}\" already waits on \"{}\"", to.title, from.title);
        }
    }
    Ok(())
}

fn cmd_unlink(storage: &Storage, depends_on: &str, dependent: &str) -> Result<(), String> {
    let from = resolve_goal(storage, depends_on)?;
    let to = resolve_goal(storage, dependent)?;

    let removed = storage
        .unlink_goals(from.id, to.id)
        .map_err(|e| format!("failed to unlink goals: {e}"))?;

    if removed {
        eprintln!("\"{}\" no longer waits on \"{}\"", to.title, from.title);
    } else {
        eprintln!("\"{}\" did not wait on \"{}\"", to.title, from.title);
    }
    Ok(())
}

fn cmd_export(storage: &Storage, out: Option<&Path>) -> Result<(), String> {
    let snapshot = storage
        .export_snapshot()
        .map_err(|e| format!("failed to read goals: {e}"))?;
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| format!("failed to serialize snapshot: {e}"))?;

    match out {
        Some(path) => {
            fs::write(path, &json)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!(
                "Exported {} goal(s), {} edge(s) → {}",
                snapshot.goals.len(),
                snapshot.edges.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_import(storage: &Storage, file: &Path) -> Result<(), String> {
    let contents = fs::read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let record: SnapshotRecord = serde_json::from_str(&contents)
        .map_err(|e| format!("invalid snapshot {}: {e}", file.display()))?;

    let report = storage
        .import_snapshot(record)
        .map_err(|e| format!("failed to import snapshot: {e}"))?;

    eprintln!("{}", format::format_import_report(&report));
    Ok(())
}

/// Resolve a goal reference (full UUID or unambiguous prefix) to a goal.
fn resolve_goal(storage: &Storage, reference: &str) -> Result<Goal, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<uuid::Uuid>() {
        return storage
            .load_goal(id)
            .map_err(|e| format!("failed to load goal: {e}"));
    }

    // Try as a prefix match against all goals.
    let goals = storage
        .list_goals()
        .map_err(|e| format!("failed to list goals: {e}"))?;

    let reference = reference.to_ascii_lowercase();
    let mut matches: Vec<Goal> = goals
        .into_iter()
        .filter(|g| g.id.to_string().starts_with(&reference))
        .collect();

    match matches.len() {
        0 => Err(format!("no goal matching '{reference}'")),
        1 => Ok(matches.remove(0)),
        n => {
            let ids: Vec<String> = matches.iter().map(|g| format::short_id(g.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous — matches {n} goals: {}",
                ids.join(", ")
            ))
        }
    }
}
