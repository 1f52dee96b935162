pub mod alignment;
pub mod builder;
pub mod diagram;
pub mod index;
pub mod layout;
pub mod rows;
pub mod visibility;

#[cfg(test)]
pub(crate) mod fixtures;

pub use alignment::PortAlignment;
pub use builder::DiagramBuilder;
pub use diagram::{
    ArenaIndex, Diagram, DiagramLink, DiagramNode, DiagramPort, IdentityMap, LinkIndex, NodeIndex,
    PortIndex, PrimitiveRef,
};
pub use index::{GraphIndex, PortInterfaces};
pub use layout::{CircularLayouter, Layouter};
pub use rows::{ComponentRow, InterfaceRow, PortRow, ReviewItemLookup, RowIndex, RowSet};
pub use visibility::{AvailableFilterValues, VisibilityFilter, VisibleSet};
