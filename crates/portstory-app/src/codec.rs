//! Conversion between a live [`Diagram`] and a persisted [`LayoutConfiguration`].

use portstory_core::{FilterSelection, LayoutConfiguration, LinkWaypoints, NodePosition};
use portstory_graph::{Diagram, DiagramBuilder, GraphIndex, Layouter};

/// What a replay restored and what it had to skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub nodes: usize,
    pub links: usize,
    pub skipped_nodes: usize,
    pub skipped_links: usize,
}

/// Snapshot node positions, link waypoints and the active filters.
pub fn capture(diagram: &Diagram, filter: &FilterSelection) -> LayoutConfiguration {
    LayoutConfiguration {
        name: String::new(),
        nodes: diagram
            .nodes()
            .iter()
            .map(|node| NodePosition {
                component_id: node.component_id,
                position: node.position,
            })
            .collect(),
        links: diagram
            .links()
            .iter()
            .map(|link| LinkWaypoints {
                interface_id: link.interface_id,
                waypoints: link.waypoints.clone(),
            })
            .collect(),
        filters: filter.to_records(),
    }
}

/// Rebuild a diagram from a configuration, without centering.
///
/// Only the components the configuration names are materialized, at their saved
/// positions. Entries whose rows no longer exist, or are not visible through the
/// builder's visible set, are skipped.
pub fn replay<L: Layouter>(
    builder: &DiagramBuilder<'_, L>,
    index: &GraphIndex,
    config: &LayoutConfiguration,
) -> (Diagram, ReplaySummary) {
    let mut diagram = Diagram::new();
    let mut summary = ReplaySummary::default();

    for saved in &config.nodes {
        let Some(row) = index.component_index(saved.component_id) else {
            tracing::debug!("Skipping saved node for unknown component {}", saved.component_id);
            summary.skipped_nodes += 1;
            continue;
        };
        if diagram.node_for_row(row).is_some() {
            tracing::debug!("Skipping repeated saved node for component {}", saved.component_id);
            summary.skipped_nodes += 1;
            continue;
        }
        match builder.materialize_node(&mut diagram, row, saved.position) {
            Some(_) => summary.nodes += 1,
            None => {
                tracing::debug!("Skipping saved node for hidden component {}", saved.component_id);
                summary.skipped_nodes += 1;
            }
        }
    }
    let first = diagram.node_indices().next();
    if let Some(first) = first {
        diagram.set_center(first);
    }

    summary.links = builder.materialize_links(&mut diagram);

    for saved in &config.links {
        let link = index
            .interface_index(saved.interface_id)
            .and_then(|row| diagram.link_for_row(row));
        match link {
            Some(link) => diagram[link].waypoints = saved.waypoints.clone(),
            None => {
                tracing::debug!("Skipping waypoints for unlinked interface {}", saved.interface_id);
                summary.skipped_links += 1;
            }
        }
    }

    (diagram, summary)
}
