use crossbeam_channel::{Receiver, Sender, unbounded};
use portstory_core::{ElementId, FilterKind, FilterSelection, Selection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Diagram
    DiagramRebuilt {
        version: u64,
        center: Option<ElementId>,
        node_count: usize,
        link_count: usize,
    },
    DiagramRebuildFailed {
        error: String,
    },
    NodeExpanded {
        component_id: ElementId,
        new_nodes: usize,
    },
    SelectionChanged {
        selection: Selection,
    },
    /// Comment flags changed for these rows; badges were updated in place.
    CommentBadgesRefreshed {
        ids: Vec<ElementId>,
    },

    // Filters
    FilterRequested {
        kind: FilterKind,
    },
    FilterApplied {
        selection: FilterSelection,
    },

    // Configurations
    ConfigurationSaved {
        name: String,
    },
    ConfigurationSaveFailed {
        name: String,
        errors: Vec<String>,
    },
    ConfigurationActivated {
        name: String,
    },
    ConfigurationDeleted {
        name: String,
        was_active: bool,
    },
    ConfigurationDeleteFailed {
        name: String,
        error: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!("Publishing {:?}", event);
        let _ = self.tx.send(event);
    }

    /// Drain pending events without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// Dispatch all pending events to a listener.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Implement this to receive events from the [`EventBus`].
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
