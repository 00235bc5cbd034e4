//! Text rendering of a run: topology summary, per-iteration routing tables,
//! update log and outcome.
//!
//! Tables use a grid layout:
//!
//! ```text
//! +-------------+----------+----------+
//! | Destination | Distance | Next Hop |
//! +=============+==========+==========+
//! | X           | 0        | -        |
//! +-------------+----------+----------+
//! ```

use dvsim_convergence::{History, IterationSnapshot, Outcome, RelaxationEvent};
use dvsim_topology::{NextHop, NodeIndex};

use crate::error::Result;
use crate::scenario::Scenario;

const HEADERS: [&str; 3] = ["Destination", "Distance", "Next Hop"];

/// Full report for a finished run.
pub fn render_report(scenario: &Scenario, history: &History) -> String {
    let mut out = vec!["# Distance Vector Simulation".to_string(), String::new()];

    out.push(format!("Scenario: {}", scenario.title()));
    if let Some(description) = &scenario.meta.description {
        out.push(description.clone());
    }
    out.push(String::new());

    out.push(render_topology(scenario));
    out.push("## Routing Tables Over Time".to_string());

    for snapshot in history.snapshots() {
        out.push(String::new());
        out.push(render_snapshot(history, snapshot));
    }

    out.push(String::new());
    out.push(render_outcome(history.outcome()));
    out.join("\n")
}

/// Node list and link list, in declaration order.
pub fn render_topology(scenario: &Scenario) -> String {
    let links: Vec<String> = scenario
        .links
        .iter()
        .map(|link| {
            let arrow = if link.directed { "->" } else { "-" };
            format!("{}{}{} (cost: {})", link.from, arrow, link.to, link.cost)
        })
        .collect();

    [
        "## Network Topology".to_string(),
        String::new(),
        format!("- Nodes: {}", scenario.nodes.join(", ")),
        format!("- Links: {}", links.join(", ")),
        String::new(),
    ]
    .join("\n")
}

/// One iteration: a table per node, then the updates that produced it.
pub fn render_snapshot(history: &History, snapshot: &IterationSnapshot) -> String {
    let mut out = vec![format!("## Iteration {}", snapshot.iteration)];

    for node in history.nodes().indices() {
        out.push(String::new());
        out.push(format!("### Routing table of node {}", history.name(node)));
        out.push(render_routing_table(history, snapshot, node));
    }

    if snapshot.iteration > 0 && !snapshot.events.is_empty() {
        out.push(String::new());
        out.push("### Updates in this iteration".to_string());
        out.extend(snapshot.events.iter().map(|e| describe_event(history, e)));
    }

    out.join("\n")
}

/// Grid table of one node's row.
pub fn render_routing_table(history: &History, snapshot: &IterationSnapshot, node: NodeIndex) -> String {
    let rows: Vec<[String; 3]> = history
        .nodes()
        .indices()
        .map(|destination| {
            let route = snapshot.route(node, destination);
            let next_hop = match route.next_hop {
                NextHop::Via(m) => history.name(m).to_string(),
                NextHop::Local | NextHop::Unreachable => "-".to_string(),
            };
            [
                history.name(destination).to_string(),
                route.distance.to_string(),
                next_hop,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |fill: char| {
        let mut line = String::from("+");
        for width in &widths {
            line.extend(std::iter::repeat(fill).take(width + 2));
            line.push('+');
        }
        line
    };
    let line = |cells: &[&str]| {
        let mut line = String::from("|");
        for (cell, width) in cells.iter().zip(&widths) {
            line.push_str(&format!(" {:<width$} |", cell, width = *width));
        }
        line
    };

    let mut out = vec![rule('-'), line(&HEADERS[..]), rule('=')];
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(line(&cells));
        out.push(rule('-'));
    }
    out.join("\n")
}

/// `Node X updated distance to Z from 50 to 5 (via Y)`
pub fn describe_event(history: &History, event: &RelaxationEvent) -> String {
    format!(
        "Node {} updated distance to {} from {} to {} (via {})",
        history.name(event.node),
        history.name(event.destination),
        event.old_distance,
        event.new_distance,
        history.name(event.via)
    )
}

pub fn render_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Converged { rounds } => {
            format!("Converged after {} rounds.", rounds)
        }
        Outcome::Capped { rounds } => format!(
            "WARNING: no convergence within {} rounds; tables show the state after the last round.",
            rounds
        ),
    }
}

/// The whole history as pretty-printed JSON.
pub fn render_json(history: &History) -> Result<String> {
    Ok(serde_json::to_string_pretty(history)?)
}
