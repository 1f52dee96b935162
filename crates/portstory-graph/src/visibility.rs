use crate::index::GraphIndex;
use crate::rows::RowSet;
use portstory_core::{ElementId, FilterSelection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// The rows that pass the current [`FilterSelection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    components: HashSet<ElementId>,
    ports: HashSet<ElementId>,
    interfaces: HashSet<ElementId>,
    /// Row-level (table) component listing, in index order.
    table_components: Vec<ElementId>,
}

impl VisibleSet {
    pub fn contains_component(&self, id: ElementId) -> bool {
        self.components.contains(&id)
    }

    pub fn contains_port(&self, id: ElementId) -> bool {
        self.ports.contains(&id)
    }

    pub fn contains_interface(&self, id: ElementId) -> bool {
        self.interfaces.contains(&id)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn table_components(&self) -> &[ElementId] {
        &self.table_components
    }
}

pub struct VisibilityFilter;

impl VisibilityFilter {
    /// Recompute the visible subset from the complete rows.
    pub fn apply(index: &GraphIndex, selection: &FilterSelection) -> VisibleSet {
        let mut visible = VisibleSet::default();

        for component_idx in index.components_in_order() {
            let component = index.component(component_idx);
            if !selection.admits_owner(component.owner) {
                continue;
            }

            let connected = index.port_indices_of(component.id).iter().any(|idx| {
                let port = index.port(*idx);
                port.connected && selection.port_connection.admits(port.connected)
            });
            if !selection.component_connection.admits(connected) {
                continue;
            }

            visible.components.insert(component.id);
            if selection.admits_any_category(&component.categories) {
                visible.table_components.push(component.id);
            }

            for port_idx in index.port_indices_of(component.id) {
                let port = index.port(*port_idx);
                if selection.port_connection.admits(port.connected) {
                    visible.ports.insert(port.id);
                }
            }
        }

        for interface in &index.rows().interfaces {
            if selection.admits_owner(interface.owner)
                && selection.admits_category(interface.nature)
                && visible.ports.contains(&interface.source_port)
                && visible.ports.contains(&interface.target_port)
            {
                visible.interfaces.insert(interface.id);
            }
        }

        tracing::debug!(
            "Visible: {} components, {} ports, {} interfaces",
            visible.components.len(),
            visible.ports.len(),
            visible.interfaces.len()
        );
        visible
    }
}

/// Distinct filter values present in the rows, offered to the filter UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFilterValues {
    pub owners: BTreeSet<ElementId>,
    pub categories: BTreeSet<ElementId>,
}

impl AvailableFilterValues {
    pub fn collect(rows: &RowSet) -> Self {
        let mut values = Self::default();
        for component in &rows.components {
            values.owners.insert(component.owner);
            values.categories.extend(component.categories.iter().copied());
        }
        for interface in &rows.interfaces {
            values.owners.insert(interface.owner);
            values.categories.insert(interface.nature);
        }
        values
    }
}
