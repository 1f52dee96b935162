use crate::alignment::PortAlignment;
use crate::diagram::{Diagram, DiagramLink, DiagramNode, DiagramPort, NodeIndex};
use crate::index::GraphIndex;
use crate::layout::{CircularLayouter, Layouter};
use crate::rows::RowIndex;
use crate::visibility::VisibleSet;
use portstory_core::{DiagramError, Point, Selection};
use std::collections::BTreeSet;

/// Materializes diagram primitives for the visible rows and lays them out.
///
/// A full rebuild walks Empty → Centered → Expanded → Linked: see
/// [`DiagramBuilder::build_centered`].
pub struct DiagramBuilder<'a, L: Layouter = CircularLayouter> {
    index: &'a GraphIndex,
    visible: &'a VisibleSet,
    layouter: &'a L,
}

impl<'a, L: Layouter> DiagramBuilder<'a, L> {
    pub fn new(index: &'a GraphIndex, visible: &'a VisibleSet, layouter: &'a L) -> Self {
        Self {
            index,
            visible,
            layouter,
        }
    }

    fn is_component_visible(&self, row: RowIndex) -> bool {
        self.visible.contains_component(self.index.component(row).id)
    }

    fn first_visible_component(&self) -> Option<RowIndex> {
        self.index
            .components_in_order()
            .find(|row| self.is_component_visible(*row))
    }

    /// Resolve the component a rebuild centers on.
    ///
    /// Falls back to the first visible component when nothing is selected or the
    /// selected component is currently filtered out.
    pub fn resolve_center(&self, selection: Selection) -> Result<Option<RowIndex>, DiagramError> {
        let component = match selection {
            Selection::Component(id) => self
                .index
                .component_index(id)
                .ok_or(DiagramError::UnknownSelection(id))?,
            Selection::Port(id) => {
                let port = self
                    .index
                    .port_by_id(id)
                    .ok_or(DiagramError::UnknownSelection(id))?;
                self.index
                    .component_index(port.container)
                    .ok_or(DiagramError::UnknownSelection(id))?
            }
            Selection::Interface(id) => {
                let interface = self
                    .index
                    .interface_by_id(id)
                    .ok_or(DiagramError::UnknownSelection(id))?;
                self.index
                    .port_by_id(interface.source_port)
                    .and_then(|port| self.index.component_index(port.container))
                    .ok_or(DiagramError::UnknownSelection(id))?
            }
            Selection::None => return Ok(self.first_visible_component()),
        };

        if self.is_component_visible(component) {
            Ok(Some(component))
        } else {
            Ok(self.first_visible_component())
        }
    }

    /// Create the node for `component` and its visible ports, or return the
    /// existing one. Returns `None` when the component is not visible.
    pub fn materialize_node(
        &self,
        diagram: &mut Diagram,
        component: RowIndex,
        position: Point,
    ) -> Option<NodeIndex> {
        if let Some(existing) = diagram.node_for_row(component) {
            return Some(existing);
        }
        if !self.is_component_visible(component) {
            return None;
        }

        let row = self.index.component(component);
        let node = diagram.add_node(
            component,
            DiagramNode {
                component_id: row.id,
                name: row.name.clone(),
                position,
                expanded: false,
                has_comments: row.has_comments,
                technology_valid: row.technology_valid,
                ports: Vec::new(),
            },
        )?;

        let visible_ports: Vec<RowIndex> = self
            .index
            .port_indices_of(row.id)
            .iter()
            .copied()
            .filter(|idx| self.visible.contains_port(self.index.port(*idx).id))
            .collect();
        let count = visible_ports.len();
        for (ordinal, port_idx) in visible_ports.into_iter().enumerate() {
            let port = self.index.port(port_idx);
            diagram.add_port(
                port_idx,
                DiagramPort {
                    port_id: port.id,
                    name: port.name.clone(),
                    node,
                    direction: port.direction,
                    alignment: PortAlignment::for_ordinal(ordinal, count),
                    connected: port.connected,
                },
            );
        }

        Some(node)
    }

    /// Visible components connected to `component` through one of its visible
    /// ports, ordered by (display name, identity).
    pub fn neighbors_of(&self, component: RowIndex) -> Result<Vec<RowIndex>, DiagramError> {
        let row = self.index.component(component);
        let mut neighbors = BTreeSet::new();

        for port_idx in self.index.port_indices_of(row.id) {
            let port = self.index.port(*port_idx);
            if !self.visible.contains_port(port.id) {
                continue;
            }
            let Some((interface_idx, opposite)) = self.index.opposite_port(port.id)? else {
                continue;
            };
            if !self
                .visible
                .contains_interface(self.index.interface(interface_idx).id)
            {
                continue;
            }
            let Some(neighbor) = self
                .index
                .port_by_id(opposite)
                .and_then(|p| self.index.component_index(p.container))
            else {
                continue;
            };
            if neighbor != component && self.is_component_visible(neighbor) {
                neighbors.insert(neighbor);
            }
        }

        let mut neighbors: Vec<RowIndex> = neighbors.into_iter().collect();
        neighbors.sort_by(|a, b| {
            let (a, b) = (self.index.component(*a), self.index.component(*b));
            a.name.cmp(&b.name).then(a.id.cmp(&b.id))
        });
        Ok(neighbors)
    }

    /// Place the neighbors of `node` around it and link any newly revealed ports.
    ///
    /// Neighbors that already have a node keep their position. Returns the nodes
    /// created by this expansion.
    pub fn expand(
        &self,
        diagram: &mut Diagram,
        node: NodeIndex,
    ) -> Result<Vec<NodeIndex>, DiagramError> {
        let component = diagram
            .node_map()
            .row_of(node)
            .ok_or_else(|| DiagramError::UnknownPrimitive(format!("node {node}")))?;
        let neighbors = self.neighbors_of(component)?;

        let mut created = Vec::new();
        if !neighbors.is_empty() {
            let slots = self.layouter.place(diagram[node].position, neighbors.len());
            for (neighbor, position) in neighbors.into_iter().zip(slots) {
                if diagram.node_for_row(neighbor).is_some() {
                    continue;
                }
                if let Some(idx) = self.materialize_node(diagram, neighbor, position) {
                    created.push(idx);
                }
            }
        }
        diagram[node].expanded = true;

        let linked = self.materialize_links(diagram);
        tracing::debug!(
            "Expanded node {} ({}): {} new nodes, {} new links",
            node,
            diagram[node].name,
            created.len(),
            linked
        );
        Ok(created)
    }

    /// Link every visible interface whose two ports are materialized. Returns the
    /// number of links created.
    pub fn materialize_links(&self, diagram: &mut Diagram) -> usize {
        let mut created = 0;
        for (i, interface) in self.index.rows().interfaces.iter().enumerate() {
            let row = RowIndex(i);
            if diagram.link_for_row(row).is_some() || !self.visible.contains_interface(interface.id)
            {
                continue;
            }
            let source = self
                .index
                .port_index(interface.source_port)
                .and_then(|idx| diagram.port_for_row(idx));
            let target = self
                .index
                .port_index(interface.target_port)
                .and_then(|idx| diagram.port_for_row(idx));
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            if diagram.has_link_between(source, target) {
                continue;
            }
            let link = DiagramLink {
                interface_id: interface.id,
                name: interface.name.clone(),
                source,
                target,
                waypoints: Vec::new(),
                has_comments: interface.has_comments,
            };
            if diagram.add_link(row, link).is_some() {
                created += 1;
            }
        }
        created
    }

    /// Full rebuild around the component resolved from `selection`.
    pub fn build_centered(
        &self,
        selection: Selection,
        center_position: Point,
    ) -> Result<Diagram, DiagramError> {
        let mut diagram = Diagram::new();
        let Some(center) = self.resolve_center(selection)? else {
            tracing::debug!("No visible component to center on");
            return Ok(diagram);
        };
        let Some(node) = self.materialize_node(&mut diagram, center, center_position) else {
            return Ok(diagram);
        };
        diagram.set_center(node);
        self.expand(&mut diagram, node)?;
        Ok(diagram)
    }
}
