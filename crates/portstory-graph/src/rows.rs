use portstory_core::{
    ComponentClassification, DiagramError, ElementId, ModelElements, PortDirection, ReviewItem,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Position of a row inside its arena in [`RowSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowIndex(pub usize);

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of review annotations, keyed by the annotated element.
pub trait ReviewItemLookup {
    fn review_item(&self, thing_id: ElementId) -> Option<ReviewItem>;
}

impl ReviewItemLookup for HashMap<ElementId, ReviewItem> {
    fn review_item(&self, thing_id: ElementId) -> Option<ReviewItem> {
        self.get(&thing_id).cloned()
    }
}

impl ReviewItemLookup for Vec<ReviewItem> {
    fn review_item(&self, thing_id: ElementId) -> Option<ReviewItem> {
        self.iter().find(|item| item.thing_id == thing_id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRow {
    pub id: ElementId,
    pub name: String,
    pub owner: ElementId,
    pub categories: Vec<ElementId>,
    /// At least one of the component's ports is connected.
    pub connected: bool,
    pub has_comments: bool,
    pub technology_valid: Option<bool>,
    pub review_item: Option<ReviewItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRow {
    pub id: ElementId,
    pub name: String,
    pub container: ElementId,
    pub direction: PortDirection,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRow {
    pub id: ElementId,
    pub name: String,
    pub source_port: ElementId,
    pub target_port: ElementId,
    pub owner: ElementId,
    pub nature: ElementId,
    pub has_comments: bool,
    pub review_item: Option<ReviewItem>,
}

/// Row arenas projected from the model, in projection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub components: Vec<ComponentRow>,
    pub ports: Vec<PortRow>,
    pub interfaces: Vec<InterfaceRow>,
}

impl RowSet {
    pub fn project(
        model: &ModelElements,
        reviews: &dyn ReviewItemLookup,
    ) -> Result<Self, DiagramError> {
        let mut rows = RowSet::default();
        let mut seen_interfaces = HashSet::new();

        for component in &model.components {
            let is_product = component.classification == ComponentClassification::Product;
            let mut connected = false;

            if is_product {
                for port in &component.ports {
                    let port_connected = !port.interfaces.is_empty();
                    connected |= port_connected;
                    rows.ports.push(PortRow {
                        id: port.id,
                        name: port.name.clone(),
                        container: component.id,
                        direction: port.direction,
                        connected: port_connected,
                    });

                    for interface in &port.interfaces {
                        if !seen_interfaces.insert(interface.id) {
                            continue;
                        }
                        if interface.source_port == interface.target_port {
                            return Err(DiagramError::SelfLoopInterface {
                                interface: interface.id,
                                port: interface.source_port,
                            });
                        }
                        let review_item = reviews.review_item(interface.id);
                        rows.interfaces.push(InterfaceRow {
                            id: interface.id,
                            name: interface.name.clone(),
                            source_port: interface.source_port,
                            target_port: interface.target_port,
                            owner: interface.owner,
                            nature: interface.nature,
                            has_comments: review_item.as_ref().is_some_and(ReviewItem::has_comments),
                            review_item,
                        });
                    }
                }
            }

            let review_item = reviews.review_item(component.id);
            rows.components.push(ComponentRow {
                id: component.id,
                name: component.name.clone(),
                owner: component.owner,
                categories: component.categories.clone(),
                connected,
                has_comments: review_item.as_ref().is_some_and(ReviewItem::has_comments),
                technology_valid: component.technology_valid,
                review_item,
            });
        }

        tracing::debug!(
            "Projected {} components, {} ports, {} interfaces",
            rows.components.len(),
            rows.ports.len(),
            rows.interfaces.len()
        );
        Ok(rows)
    }

    /// Re-read annotations and return the identities whose comment flag changed.
    pub fn refresh_annotations(&mut self, reviews: &dyn ReviewItemLookup) -> Vec<ElementId> {
        let mut changed = Vec::new();
        for row in &mut self.components {
            row.review_item = reviews.review_item(row.id);
            let has_comments = row.review_item.as_ref().is_some_and(ReviewItem::has_comments);
            if has_comments != row.has_comments {
                row.has_comments = has_comments;
                changed.push(row.id);
            }
        }
        for row in &mut self.interfaces {
            row.review_item = reviews.review_item(row.id);
            let has_comments = row.review_item.as_ref().is_some_and(ReviewItem::has_comments);
            if has_comments != row.has_comments {
                row.has_comments = has_comments;
                changed.push(row.id);
            }
        }
        changed
    }
}
