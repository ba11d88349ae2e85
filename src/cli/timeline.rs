//! `roadmap timeline`: project the roadmap and draw it.

use clap::ValueEnum;
use serde::Serialize;

use crate::config::Config;
use crate::model::{DependencyEdge, TimelineItem};
use crate::roadmap::{
    DataQualityWarning, Span, TimelineOptions, TimelineOrder, load_roadmap, sort_items,
};
use crate::storage::Storage;

use super::format::{format_warning, render_timeline};

/// CLI-facing ordering, mapped to the domain `TimelineOrder`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    /// Creation order.
    Insertion,
    /// Earliest start first.
    Start,
}

impl OrderArg {
    pub(super) fn to_domain(self) -> TimelineOrder {
        match self {
            Self::Insertion => TimelineOrder::Insertion,
            Self::Start => TimelineOrder::Start,
        }
    }
}

/// The `--json` document.
#[derive(Debug, Serialize)]
struct TimelineJson<'a> {
    items: Vec<ProjectedItem<'a>>,
    edges: Vec<&'a DependencyEdge>,
    warnings: &'a [DataQualityWarning],
}

/// One item of `--json` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectedItem<'a> {
    #[serde(flatten)]
    item: &'a TimelineItem,
    effectively_blocked: bool,
    span: Option<Span>,
}

pub(super) fn cmd_timeline(
    config: &Config,
    storage: &Storage,
    order: TimelineOrder,
    width: usize,
    json: bool,
) -> Result<(), String> {
    let options = TimelineOptions::new(config.default_horizon);
    let mut roadmap =
        load_roadmap(storage, &options).map_err(|e| format!("failed to load roadmap: {e}"))?;
    sort_items(&mut roadmap.timeline.items, order);

    if json {
        let doc = TimelineJson {
            items: roadmap
                .timeline
                .items
                .iter()
                .map(|item| ProjectedItem {
                    item,
                    effectively_blocked: item.effectively_blocked(),
                    span: roadmap.projection.map(|p| p.span(item)),
                })
                .collect(),
            edges: roadmap.graph.edges().collect(),
            warnings: &roadmap.timeline.warnings,
        };
        let out = serde_json::to_string_pretty(&doc)
            .map_err(|e| format!("failed to serialize timeline: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    for warning in &roadmap.timeline.warnings {
        eprintln!("{}", format_warning(warning));
    }

    match roadmap.projection {
        Some(projection) => print!(
            "{}",
            render_timeline(&roadmap.timeline.items, &projection, width)
        ),
        None => println!("Nothing to show"),
    }
    Ok(())
}
