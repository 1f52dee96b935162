use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod configuration;
pub mod error;
pub mod filter;
pub mod model;
pub mod review;

pub use configuration::{FilterRecord, LayoutConfiguration, LinkWaypoints, NodePosition};
pub use error::DiagramError;
pub use filter::{ConnectionFilter, FilterKind, FilterSelection};
pub use model::{
    ComponentClassification, ModelElements, PhysicalComponent, PhysicalInterface, PhysicalPort,
    PortDirection,
};
pub use review::ReviewItem;

/// Opaque identity of a model element (component, port, interface, owner or category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self(Uuid::nil())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Diagram coordinate in screen space: x grows to the right, y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A row-level selection. Each variant carries the identity of the selected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Selection {
    Component(ElementId),
    Port(ElementId),
    Interface(ElementId),
    #[default]
    None,
}

impl Selection {
    pub fn id(&self) -> Option<ElementId> {
        match self {
            Selection::Component(id) | Selection::Port(id) | Selection::Interface(id) => Some(*id),
            Selection::None => None,
        }
    }
}

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone)]
pub enum EnumConversionError {
    #[error("Invalid FilterKind value: {0}")]
    InvalidFilterKind(i32),
    #[error("Invalid ConnectionFilter value: {0}")]
    InvalidConnectionFilter(i32),
}
