use crate::{ConnectionFilter, ElementId, FilterKind, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    pub component_id: ElementId,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWaypoints {
    pub interface_id: ElementId,
    pub waypoints: Vec<Point>,
}

/// One persisted filter. Owner and category filters use `selected_value_ids`;
/// connection filters carry `connection_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecord {
    #[serde(rename = "filterKind")]
    pub kind: FilterKind,
    #[serde(default)]
    pub selected_value_ids: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<ConnectionFilter>,
}

impl FilterRecord {
    pub fn values(kind: FilterKind, selected_value_ids: Vec<ElementId>) -> Self {
        Self {
            kind,
            selected_value_ids,
            connection_state: None,
        }
    }

    pub fn connection(kind: FilterKind, state: ConnectionFilter) -> Self {
        Self {
            kind,
            selected_value_ids: Vec::new(),
            connection_state: Some(state),
        }
    }
}

/// A named snapshot of node positions, link waypoints and active filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfiguration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub nodes: Vec<NodePosition>,
    pub links: Vec<LinkWaypoints>,
    pub filters: Vec<FilterRecord>,
}
