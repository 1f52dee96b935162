#![allow(dead_code)]

use portstory_app::{DiagramEngine, EngineSettings};
use portstory_core::{
    ElementId, LayoutConfiguration, ModelElements, PhysicalComponent, PhysicalInterface,
    PhysicalPort, ReviewItem,
};
use portstory_storage::{
    ConfigurationStore, DeleteOutcome, SaveOutcome, StorageError, validate_configuration_name,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Hand-written engineering model for scenario tests.
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
}

/// A→B→C chain plus an isolated D owned elsewhere.
pub struct Chain {
    pub model: ModelElements,
    pub a: ElementId,
    pub b: ElementId,
    pub c: ElementId,
    pub d: ElementId,
    pub a_out: ElementId,
    pub ab: ElementId,
    pub bc: ElementId,
    pub other_owner: ElementId,
}

pub fn chain() -> Chain {
    let mut model = ModelBuilder::new();
    let other_owner = ElementId::new();
    let a = model.component("A");
    let b = model.component("B");
    let c = model.component("C");
    let d = model.component_owned("D", other_owner);
    let a_out = model.port(a, "out");
    let b_in = model.port(b, "in");
    let b_out = model.port(b, "out");
    let c_in = model.port(c, "in");
    model.port(d, "spare");
    let ab = model.interface("A-B", a_out, b_in);
    let bc = model.interface("B-C", b_out, c_in);
    Chain {
        model: model.build(),
        a,
        b,
        c,
        d,
        a_out,
        ab,
        bc,
        other_owner,
    }
}

pub fn no_reviews() -> HashMap<ElementId, ReviewItem> {
    HashMap::new()
}

/// In-memory store whose contents stay inspectable after the engine takes it.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub configs: Rc<RefCell<BTreeMap<(ElementId, String), LayoutConfiguration>>>,
    pub reject_with: Option<Vec<String>>,
}

impl MemoryStore {
    pub fn rejecting(errors: &[&str]) -> Self {
        Self {
            reject_with: Some(errors.iter().map(|e| e.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn get(&self, scope: ElementId, name: &str) -> Option<LayoutConfiguration> {
        self.configs
            .borrow()
            .get(&(scope, name.to_string()))
            .cloned()
    }
}

impl ConfigurationStore for MemoryStore {
    fn list_configuration_names(&self, scope: ElementId) -> Result<Vec<String>, StorageError> {
        Ok(self
            .configs
            .borrow()
            .keys()
            .filter(|(s, _)| *s == scope)
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn load_configuration(
        &self,
        scope: ElementId,
        name: &str,
    ) -> Result<Option<LayoutConfiguration>, StorageError> {
        Ok(self.get(scope, name.trim()))
    }

    fn save_configuration(
        &self,
        scope: ElementId,
        name: &str,
        config: &LayoutConfiguration,
    ) -> SaveOutcome {
        if let Some(errors) = &self.reject_with {
            return SaveOutcome::rejected(errors.clone());
        }
        match validate_configuration_name(name) {
            Ok(name) => {
                let mut config = config.clone();
                config.name = name.clone();
                self.configs.borrow_mut().insert((scope, name), config);
                SaveOutcome::accepted()
            }
            Err(errors) => SaveOutcome::rejected(errors),
        }
    }

    fn delete_configuration(&self, scope: ElementId, name: &str) -> DeleteOutcome {
        match self
            .configs
            .borrow_mut()
            .remove(&(scope, name.trim().to_string()))
        {
            Some(_) => DeleteOutcome::deleted(),
            None => DeleteOutcome::failed(format!("Configuration '{name}' not found")),
        }
    }
}

pub fn open_engine(model: &ModelElements, store: MemoryStore) -> DiagramEngine {
    DiagramEngine::open(
        ElementId::new(),
        model,
        &no_reviews(),
        Box::new(store),
        EngineSettings::default(),
    )
    .expect("engine opens")
}
