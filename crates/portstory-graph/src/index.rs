use crate::rows::{ComponentRow, InterfaceRow, PortRow, ReviewItemLookup, RowIndex, RowSet};
use crate::visibility::VisibleSet;
use portstory_core::{DiagramError, ElementId};
use std::collections::HashMap;

/// Interfaces attached to a single port, split by the role the port plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortInterfaces {
    pub as_source: Option<RowIndex>,
    pub as_target: Option<RowIndex>,
}

/// O(1) lookups and derived relations over a projected [`RowSet`].
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    rows: RowSet,
    components: HashMap<ElementId, RowIndex>,
    ports: HashMap<ElementId, RowIndex>,
    interfaces: HashMap<ElementId, RowIndex>,
    /// Port rows of each component, ordered by display name.
    ports_by_component: HashMap<ElementId, Vec<RowIndex>>,
    port_interfaces: HashMap<ElementId, PortInterfaces>,
    /// All component rows ordered by (display name, identity).
    component_order: Vec<RowIndex>,
}

impl GraphIndex {
    pub fn new(rows: RowSet) -> Self {
        let components = rows
            .components
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id, RowIndex(i)))
            .collect();
        let ports = rows
            .ports
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id, RowIndex(i)))
            .collect();
        let interfaces = rows
            .interfaces
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id, RowIndex(i)))
            .collect();

        let mut ports_by_component: HashMap<ElementId, Vec<RowIndex>> = HashMap::new();
        for (i, port) in rows.ports.iter().enumerate() {
            let entry = ports_by_component.entry(port.container).or_default();
            if !entry.iter().any(|idx| rows.ports[idx.0].id == port.id) {
                entry.push(RowIndex(i));
            }
        }
        for port_rows in ports_by_component.values_mut() {
            port_rows.sort_by(|a, b| {
                let (a, b) = (&rows.ports[a.0], &rows.ports[b.0]);
                a.name.cmp(&b.name).then(a.id.cmp(&b.id))
            });
        }

        let mut port_interfaces: HashMap<ElementId, PortInterfaces> = HashMap::new();
        for (i, interface) in rows.interfaces.iter().enumerate() {
            let source = port_interfaces.entry(interface.source_port).or_default();
            match source.as_source {
                Some(existing) => tracing::warn!(
                    "Port {} is already the source of interface {}; ignoring interface {}",
                    interface.source_port,
                    rows.interfaces[existing.0].id,
                    interface.id
                ),
                None => source.as_source = Some(RowIndex(i)),
            }

            let target = port_interfaces.entry(interface.target_port).or_default();
            match target.as_target {
                Some(existing) => tracing::warn!(
                    "Port {} is already the target of interface {}; ignoring interface {}",
                    interface.target_port,
                    rows.interfaces[existing.0].id,
                    interface.id
                ),
                None => target.as_target = Some(RowIndex(i)),
            }
        }

        let mut component_order: Vec<RowIndex> =
            (0..rows.components.len()).map(RowIndex).collect();
        component_order.sort_by(|a, b| {
            let (a, b) = (&rows.components[a.0], &rows.components[b.0]);
            a.name.cmp(&b.name).then(a.id.cmp(&b.id))
        });

        Self {
            rows,
            components,
            ports,
            interfaces,
            ports_by_component,
            port_interfaces,
            component_order,
        }
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    /// Refresh comment flags in place. Annotations never change the index structure.
    pub fn refresh_annotations(&mut self, reviews: &dyn ReviewItemLookup) -> Vec<ElementId> {
        self.rows.refresh_annotations(reviews)
    }

    pub fn component_index(&self, id: ElementId) -> Option<RowIndex> {
        self.components.get(&id).copied()
    }

    pub fn port_index(&self, id: ElementId) -> Option<RowIndex> {
        self.ports.get(&id).copied()
    }

    pub fn interface_index(&self, id: ElementId) -> Option<RowIndex> {
        self.interfaces.get(&id).copied()
    }

    pub fn component(&self, index: RowIndex) -> &ComponentRow {
        &self.rows.components[index.0]
    }

    pub fn port(&self, index: RowIndex) -> &PortRow {
        &self.rows.ports[index.0]
    }

    pub fn interface(&self, index: RowIndex) -> &InterfaceRow {
        &self.rows.interfaces[index.0]
    }

    pub fn component_by_id(&self, id: ElementId) -> Option<&ComponentRow> {
        self.component_index(id).map(|idx| self.component(idx))
    }

    pub fn port_by_id(&self, id: ElementId) -> Option<&PortRow> {
        self.port_index(id).map(|idx| self.port(idx))
    }

    pub fn interface_by_id(&self, id: ElementId) -> Option<&InterfaceRow> {
        self.interface_index(id).map(|idx| self.interface(idx))
    }

    pub fn port_indices_of(&self, component: ElementId) -> &[RowIndex] {
        self.ports_by_component
            .get(&component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn ports_of(&self, component: ElementId) -> Vec<&PortRow> {
        self.port_indices_of(component)
            .iter()
            .map(|idx| self.port(*idx))
            .collect()
    }

    pub fn interfaces_touching(&self, port: ElementId) -> PortInterfaces {
        self.port_interfaces.get(&port).copied().unwrap_or_default()
    }

    /// The interface attached to `port` and the port at its other end.
    ///
    /// A port that is the source of one interface and the target of another has no
    /// single direction, and is reported as [`DiagramError::AmbiguousPortDirection`].
    pub fn opposite_port(&self, port: ElementId) -> Result<Option<(RowIndex, ElementId)>, DiagramError> {
        let touching = self.interfaces_touching(port);
        match (touching.as_source, touching.as_target) {
            (Some(source), Some(target)) => Err(DiagramError::AmbiguousPortDirection {
                port,
                as_source: self.interface(source).id,
                as_target: self.interface(target).id,
            }),
            (Some(source), None) => Ok(Some((source, self.interface(source).target_port))),
            (None, Some(target)) => Ok(Some((target, self.interface(target).source_port))),
            (None, None) => Ok(None),
        }
    }

    pub fn has_visible_ports(&self, component: ElementId, visible: &VisibleSet) -> bool {
        self.port_indices_of(component)
            .iter()
            .any(|idx| visible.contains_port(self.port(*idx).id))
    }

    pub fn components_in_order(&self) -> impl Iterator<Item = RowIndex> + '_ {
        self.component_order.iter().copied()
    }

    pub fn component_count(&self) -> usize {
        self.rows.components.len()
    }

    pub fn port_count(&self) -> usize {
        self.rows.ports.len()
    }

    pub fn interface_count(&self) -> usize {
        self.rows.interfaces.len()
    }
}
