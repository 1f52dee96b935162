use crate::alignment::PortAlignment;
use crate::rows::RowIndex;
use portstory_core::{DiagramError, ElementId, Point, PortDirection};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Integer handle into one of the primitive arenas.
pub trait ArenaIndex: Copy + Eq + std::hash::Hash + fmt::Debug {
    fn from_usize(index: usize) -> Self;
    fn to_usize(self) -> usize;
}

macro_rules! arena_index {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ArenaIndex for $name {
            fn from_usize(index: usize) -> Self {
                Self(index)
            }

            fn to_usize(self) -> usize {
                self.0
            }
        }
    };
}

arena_index!(NodeIndex);
arena_index!(PortIndex);
arena_index!(LinkIndex);

/// A rendered primitive, as reported back by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveRef {
    Node(NodeIndex),
    Port(PortIndex),
    Link(LinkIndex),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub component_id: ElementId,
    pub name: String,
    pub position: Point,
    pub expanded: bool,
    pub has_comments: bool,
    pub technology_valid: Option<bool>,
    pub ports: Vec<PortIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPort {
    pub port_id: ElementId,
    pub name: String,
    pub node: NodeIndex,
    pub direction: PortDirection,
    pub alignment: PortAlignment,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramLink {
    pub interface_id: ElementId,
    pub name: String,
    pub source: PortIndex,
    pub target: PortIndex,
    pub waypoints: Vec<Point>,
    pub has_comments: bool,
}

/// Injective association between a primitive arena and a row arena.
///
/// `forward[p]` is the row behind primitive `p`; `back` maps each bound row to
/// its single live primitive.
#[derive(Debug, Clone)]
pub struct IdentityMap<P> {
    forward: Vec<RowIndex>,
    back: HashMap<RowIndex, P>,
}

impl<P> Default for IdentityMap<P> {
    fn default() -> Self {
        Self {
            forward: Vec::new(),
            back: HashMap::new(),
        }
    }
}

impl<P: ArenaIndex> IdentityMap<P> {
    /// Bind the next primitive slot to `row`. Returns `None` if the row is already bound.
    fn bind(&mut self, row: RowIndex) -> Option<P> {
        if self.back.contains_key(&row) {
            return None;
        }
        let primitive = P::from_usize(self.forward.len());
        self.forward.push(row);
        self.back.insert(row, primitive);
        Some(primitive)
    }

    pub fn row_of(&self, primitive: P) -> Option<RowIndex> {
        self.forward.get(primitive.to_usize()).copied()
    }

    pub fn primitive_of(&self, row: RowIndex) -> Option<P> {
        self.back.get(&row).copied()
    }

    /// Both directions agree and no row is bound twice.
    pub fn is_injective(&self) -> bool {
        let distinct: HashSet<_> = self.forward.iter().collect();
        distinct.len() == self.forward.len()
            && self.back.len() == self.forward.len()
            && self
                .back
                .iter()
                .all(|(row, p)| self.forward.get(p.to_usize()) == Some(row))
    }
}

/// Diagram primitives in three arenas plus their identity maps to the rows.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    nodes: Vec<DiagramNode>,
    ports: Vec<DiagramPort>,
    links: Vec<DiagramLink>,
    node_map: IdentityMap<NodeIndex>,
    port_map: IdentityMap<PortIndex>,
    link_map: IdentityMap<LinkIndex>,
    linked_pairs: HashSet<(PortIndex, PortIndex)>,
    center: Option<NodeIndex>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn add_node(&mut self, row: RowIndex, node: DiagramNode) -> Option<NodeIndex> {
        let idx = self.node_map.bind(row)?;
        self.nodes.push(node);
        Some(idx)
    }

    pub(crate) fn add_port(&mut self, row: RowIndex, port: DiagramPort) -> Option<PortIndex> {
        let owner = port.node;
        let idx = self.port_map.bind(row)?;
        self.ports.push(port);
        self.nodes[owner.0].ports.push(idx);
        Some(idx)
    }

    /// Adds a link unless the row or the ordered port pair is already linked.
    pub(crate) fn add_link(&mut self, row: RowIndex, link: DiagramLink) -> Option<LinkIndex> {
        let pair = (link.source, link.target);
        if self.linked_pairs.contains(&pair) || self.link_map.primitive_of(row).is_some() {
            return None;
        }
        let idx = self.link_map.bind(row)?;
        self.linked_pairs.insert(pair);
        self.links.push(link);
        Some(idx)
    }

    pub fn set_center(&mut self, node: NodeIndex) {
        self.center = Some(node);
    }

    pub fn center(&self) -> Option<NodeIndex> {
        self.center
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn ports(&self) -> &[DiagramPort] {
        &self.ports
    }

    pub fn links(&self) -> &[DiagramLink] {
        &self.links
    }

    pub fn node(&self, index: NodeIndex) -> Option<&DiagramNode> {
        self.nodes.get(index.0)
    }

    pub fn port(&self, index: PortIndex) -> Option<&DiagramPort> {
        self.ports.get(index.0)
    }

    pub fn link(&self, index: LinkIndex) -> Option<&DiagramLink> {
        self.links.get(index.0)
    }

    pub fn node_map(&self) -> &IdentityMap<NodeIndex> {
        &self.node_map
    }

    pub fn port_map(&self) -> &IdentityMap<PortIndex> {
        &self.port_map
    }

    pub fn link_map(&self) -> &IdentityMap<LinkIndex> {
        &self.link_map
    }

    pub fn node_for_row(&self, row: RowIndex) -> Option<NodeIndex> {
        self.node_map.primitive_of(row)
    }

    pub fn port_for_row(&self, row: RowIndex) -> Option<PortIndex> {
        self.port_map.primitive_of(row)
    }

    pub fn link_for_row(&self, row: RowIndex) -> Option<LinkIndex> {
        self.link_map.primitive_of(row)
    }

    pub fn has_link_between(&self, source: PortIndex, target: PortIndex) -> bool {
        self.linked_pairs.contains(&(source, target))
    }

    pub fn move_node(&mut self, node: NodeIndex, position: Point) -> Result<(), DiagramError> {
        let node = self
            .nodes
            .get_mut(node.0)
            .ok_or_else(|| DiagramError::UnknownPrimitive(format!("node {node}")))?;
        node.position = position;
        Ok(())
    }

    pub fn set_waypoints(
        &mut self,
        link: LinkIndex,
        waypoints: Vec<Point>,
    ) -> Result<(), DiagramError> {
        let link = self
            .links
            .get_mut(link.0)
            .ok_or_else(|| DiagramError::UnknownPrimitive(format!("link {link}")))?;
        link.waypoints = waypoints;
        Ok(())
    }

    /// All three identity maps are injective.
    pub fn maps_are_injective(&self) -> bool {
        self.node_map.is_injective() && self.port_map.is_injective() && self.link_map.is_injective()
    }
}

impl Index<NodeIndex> for Diagram {
    type Output = DiagramNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for Diagram {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl Index<PortIndex> for Diagram {
    type Output = DiagramPort;
    fn index(&self, index: PortIndex) -> &Self::Output {
        &self.ports[index.0]
    }
}

impl IndexMut<PortIndex> for Diagram {
    fn index_mut(&mut self, index: PortIndex) -> &mut Self::Output {
        &mut self.ports[index.0]
    }
}

impl Index<LinkIndex> for Diagram {
    type Output = DiagramLink;
    fn index(&self, index: LinkIndex) -> &Self::Output {
        &self.links[index.0]
    }
}

impl IndexMut<LinkIndex> for Diagram {
    fn index_mut(&mut self, index: LinkIndex) -> &mut Self::Output {
        &mut self.links[index.0]
    }
}
