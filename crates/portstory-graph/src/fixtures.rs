use crate::{GraphIndex, RowSet};
use portstory_core::{
    ElementId, ModelElements, PhysicalComponent, PhysicalInterface, PhysicalPort, ReviewItem,
};
use std::collections::HashMap;

pub fn no_reviews() -> HashMap<ElementId, ReviewItem> {
    HashMap::new()
}

/// Small builder for hand-written test models.
pub struct ModelBuilder {
    pub owner: ElementId,
    pub nature: ElementId,
    components: Vec<PhysicalComponent>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            owner: ElementId::new(),
            nature: ElementId::new(),
            components: Vec::new(),
        }
    }

    pub fn component(&mut self, name: &str) -> ElementId {
        let owner = self.owner;
        self.component_owned(name, owner)
    }

    pub fn component_owned(&mut self, name: &str, owner: ElementId) -> ElementId {
        let id = ElementId::new();
        self.components.push(PhysicalComponent {
            id,
            name: name.to_string(),
            owner,
            ..Default::default()
        });
        id
    }

    pub fn port(&mut self, component: ElementId, name: &str) -> ElementId {
        let id = ElementId::new();
        let owner = self
            .components
            .iter_mut()
            .find(|c| c.id == component)
            .expect("unknown component");
        owner.ports.push(PhysicalPort {
            id,
            name: name.to_string(),
            ..Default::default()
        });
        id
    }

    pub fn interface(&mut self, name: &str, source: ElementId, target: ElementId) -> ElementId {
        let (owner, nature) = (self.owner, self.nature);
        self.interface_with(name, source, target, owner, nature)
    }

    pub fn interface_with(
        &mut self,
        name: &str,
        source: ElementId,
        target: ElementId,
        owner: ElementId,
        nature: ElementId,
    ) -> ElementId {
        let interface = PhysicalInterface {
            id: ElementId::new(),
            name: name.to_string(),
            source_port: source,
            target_port: target,
            owner,
            nature,
        };
        for port in self
            .components
            .iter_mut()
            .flat_map(|c| c.ports.iter_mut())
            .filter(|p| p.id == source || p.id == target)
        {
            port.interfaces.push(interface.clone());
        }
        interface.id
    }

    pub fn build(&self) -> ModelElements {
        ModelElements {
            components: self.components.clone(),
        }
    }

    pub fn index(&self) -> GraphIndex {
        GraphIndex::new(RowSet::project(&self.build(), &no_reviews()).expect("valid model"))
    }
}
