use crate::ElementId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComponentClassification {
    #[default]
    Product,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PortDirection {
    Input,
    Output,
    #[default]
    Bidirectional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PhysicalInterface {
    pub id: ElementId,
    pub name: String,
    pub source_port: ElementId,
    pub target_port: ElementId,
    pub owner: ElementId,
    pub nature: ElementId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PhysicalPort {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub direction: PortDirection,
    /// Every interface attached to this port, whichever end it is.
    #[serde(default)]
    pub interfaces: Vec<PhysicalInterface>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PhysicalComponent {
    pub id: ElementId,
    pub name: String,
    pub owner: ElementId,
    #[serde(default)]
    pub categories: Vec<ElementId>,
    #[serde(default)]
    pub classification: ComponentClassification,
    #[serde(default)]
    pub technology_valid: Option<bool>,
    #[serde(default)]
    pub ports: Vec<PhysicalPort>,
}

/// The flat element set a diagram session is opened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelElements {
    pub components: Vec<PhysicalComponent>,
}
