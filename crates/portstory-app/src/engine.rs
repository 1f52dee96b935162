use crate::codec::{self, ReplaySummary};
use crate::error::EngineError;
use crate::filter_ui::FilterPresenter;
use crate::settings::EngineSettings;
use portstory_core::{
    DiagramError, ElementId, FilterKind, FilterRecord, FilterSelection, LayoutConfiguration,
    ModelElements, Point, Selection,
};
use portstory_events::{Event, EventBus};
use portstory_graph::{
    AvailableFilterValues, CircularLayouter, Diagram, DiagramBuilder, GraphIndex, LinkIndex,
    NodeIndex, PrimitiveRef, ReviewItemLookup, RowSet, VisibilityFilter, VisibleSet,
};
use portstory_storage::{ConfigurationStore, DeleteOutcome, SaveOutcome};

/// One review session's diagram: rows, filter, visible set, primitives and the
/// configuration store they are saved to.
///
/// Every command that rebuilds computes a fresh [`Diagram`] and commits it only
/// when the rebuild succeeds. A failed command leaves the previous diagram,
/// selection, filter and [`version`](Self::version) in place.
pub struct DiagramEngine {
    scope: ElementId,
    index: GraphIndex,
    filter: FilterSelection,
    visible: VisibleSet,
    diagram: Diagram,
    selection: Selection,
    active_configuration: Option<String>,
    store: Box<dyn ConfigurationStore>,
    events: EventBus,
    layouter: CircularLayouter,
    settings: EngineSettings,
    version: u64,
}

impl DiagramEngine {
    /// Project the model, apply the initial filter and build the first diagram.
    pub fn open(
        scope: ElementId,
        model: &ModelElements,
        reviews: &dyn ReviewItemLookup,
        store: Box<dyn ConfigurationStore>,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        let rows = RowSet::project(model, reviews)?;
        let index = GraphIndex::new(rows);
        let filter = settings.initial_filter.clone();
        let visible = VisibilityFilter::apply(&index, &filter);
        tracing::info!(
            "Opened session {}: {} components, {} ports, {} interfaces",
            scope,
            index.component_count(),
            index.port_count(),
            index.interface_count()
        );

        let mut engine = Self {
            scope,
            index,
            filter,
            visible,
            diagram: Diagram::new(),
            selection: Selection::None,
            active_configuration: None,
            store,
            events: EventBus::new(),
            layouter: settings.layouter(),
            settings,
            version: 0,
        };
        engine.rebuild()?;
        Ok(engine)
    }

    pub fn scope(&self) -> ElementId {
        self.scope
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    pub fn rows(&self) -> &RowSet {
        self.index.rows()
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn active_configuration(&self) -> Option<&str> {
        self.active_configuration.as_deref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Incremented after every committed change to the diagram.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn available_filter_values(&self) -> AvailableFilterValues {
        AvailableFilterValues::collect(self.index.rows())
    }

    fn builder<'a>(&'a self, visible: &'a VisibleSet) -> DiagramBuilder<'a, CircularLayouter> {
        DiagramBuilder::new(&self.index, visible, &self.layouter)
    }

    fn build(&self, selection: Selection, visible: &VisibleSet) -> Result<Diagram, EngineError> {
        self.builder(visible)
            .build_centered(selection, self.settings.center_position)
            .map_err(|e| {
                tracing::error!("Diagram rebuild failed: {}", e);
                self.events.publish(Event::DiagramRebuildFailed {
                    error: e.to_string(),
                });
                EngineError::from(e)
            })
    }

    fn commit(&mut self, diagram: Diagram) {
        self.diagram = diagram;
        self.version += 1;
        let center = self
            .diagram
            .center()
            .map(|node| self.diagram[node].component_id);
        tracing::info!(
            "Diagram v{}: {} nodes, {} links",
            self.version,
            self.diagram.node_count(),
            self.diagram.link_count()
        );
        self.events.publish(Event::DiagramRebuilt {
            version: self.version,
            center,
            node_count: self.diagram.node_count(),
            link_count: self.diagram.link_count(),
        });
    }

    /// Rebuild the diagram around the current selection.
    pub fn rebuild(&mut self) -> Result<(), EngineError> {
        let diagram = self.build(self.selection, &self.visible)?;
        self.commit(diagram);
        Ok(())
    }

    /// Select a row and rebuild the diagram centered on it.
    pub fn recenter(&mut self, selection: Selection) -> Result<(), EngineError> {
        self.check_selection(selection)?;
        let diagram = self.build(selection, &self.visible)?;
        self.set_selection(selection);
        self.commit(diagram);
        Ok(())
    }

    fn check_selection(&self, selection: Selection) -> Result<(), DiagramError> {
        let known = match selection {
            Selection::Component(id) => self.index.component_index(id).is_some(),
            Selection::Port(id) => self.index.port_index(id).is_some(),
            Selection::Interface(id) => self.index.interface_index(id).is_some(),
            Selection::None => true,
        };
        match (known, selection.id()) {
            (false, Some(id)) => Err(DiagramError::UnknownSelection(id)),
            _ => Ok(()),
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        if self.selection != selection {
            self.selection = selection;
            self.events.publish(Event::SelectionChanged { selection });
        }
    }

    /// Select a rendered primitive and publish the row it represents.
    pub fn select_primitive(&mut self, primitive: PrimitiveRef) -> Result<Selection, EngineError> {
        let selection = match primitive {
            PrimitiveRef::Node(node) => self
                .diagram
                .node_map()
                .row_of(node)
                .map(|row| Selection::Component(self.index.component(row).id)),
            PrimitiveRef::Port(port) => self
                .diagram
                .port_map()
                .row_of(port)
                .map(|row| Selection::Port(self.index.port(row).id)),
            PrimitiveRef::Link(link) => self
                .diagram
                .link_map()
                .row_of(link)
                .map(|row| Selection::Interface(self.index.interface(row).id)),
        }
        .ok_or_else(|| DiagramError::UnknownPrimitive(format!("{primitive:?}")))?;
        self.set_selection(selection);
        Ok(selection)
    }

    /// Select a row, e.g. from a table, and return its rendered primitive if it
    /// has one.
    pub fn select_row(&mut self, selection: Selection) -> Result<Option<PrimitiveRef>, EngineError> {
        self.check_selection(selection)?;
        self.set_selection(selection);
        Ok(self.primitive_for(selection))
    }

    pub fn primitive_for(&self, selection: Selection) -> Option<PrimitiveRef> {
        match selection {
            Selection::Component(id) => self
                .index
                .component_index(id)
                .and_then(|row| self.diagram.node_for_row(row))
                .map(PrimitiveRef::Node),
            Selection::Port(id) => self
                .index
                .port_index(id)
                .and_then(|row| self.diagram.port_for_row(row))
                .map(PrimitiveRef::Port),
            Selection::Interface(id) => self
                .index
                .interface_index(id)
                .and_then(|row| self.diagram.link_for_row(row))
                .map(PrimitiveRef::Link),
            Selection::None => None,
        }
    }

    /// Place the neighbors of `node` around it, keeping everything already placed.
    pub fn expand(&mut self, node: NodeIndex) -> Result<Vec<NodeIndex>, EngineError> {
        let mut diagram = self.diagram.clone();
        let created = self.builder(&self.visible).expand(&mut diagram, node)?;
        let component_id = diagram[node].component_id;
        self.diagram = diagram;
        self.version += 1;
        self.events.publish(Event::NodeExpanded {
            component_id,
            new_nodes: created.len(),
        });
        Ok(created)
    }

    /// Apply one filter record on top of the current selection and rebuild.
    pub fn apply_filter(&mut self, record: &FilterRecord) -> Result<(), EngineError> {
        let mut filter = self.filter.clone();
        filter.apply_record(record);
        self.set_filter_selection(filter)
    }

    /// Make `kind` unrestricted again and rebuild.
    pub fn reset_filter(&mut self, kind: FilterKind) -> Result<(), EngineError> {
        let mut filter = self.filter.clone();
        filter.reset(kind);
        self.set_filter_selection(filter)
    }

    /// Replace the whole filter selection and rebuild.
    pub fn set_filter_selection(&mut self, filter: FilterSelection) -> Result<(), EngineError> {
        let visible = VisibilityFilter::apply(&self.index, &filter);
        let diagram = self.build(self.selection, &visible)?;
        self.filter = filter;
        self.visible = visible;
        self.events.publish(Event::FilterApplied {
            selection: self.filter.clone(),
        });
        self.commit(diagram);
        Ok(())
    }

    /// Ask the filter UI for a new choice of `kind` and apply it.
    ///
    /// Returns `false` when the user dismissed the dialog.
    pub fn request_filter(
        &mut self,
        kind: FilterKind,
        presenter: &mut dyn FilterPresenter,
    ) -> Result<bool, EngineError> {
        self.events.publish(Event::FilterRequested { kind });
        let available = self.available_filter_values();
        let Some(record) = presenter.present(kind, &available, &self.filter) else {
            return Ok(false);
        };
        self.apply_filter(&record)?;
        Ok(true)
    }

    /// Re-read review annotations and refresh comment badges in place.
    ///
    /// Returns the identities whose comment flag changed.
    pub fn refresh_annotations(&mut self, reviews: &dyn ReviewItemLookup) -> Vec<ElementId> {
        let changed = self.index.refresh_annotations(reviews);
        if changed.is_empty() {
            return changed;
        }

        for id in &changed {
            if let Some(row) = self.index.component_index(*id) {
                if let Some(node) = self.diagram.node_for_row(row) {
                    self.diagram[node].has_comments = self.index.component(row).has_comments;
                }
            } else if let Some(row) = self.index.interface_index(*id)
                && let Some(link) = self.diagram.link_for_row(row)
            {
                self.diagram[link].has_comments = self.index.interface(row).has_comments;
            }
        }

        self.version += 1;
        tracing::debug!("Refreshed {} comment badges", changed.len());
        self.events.publish(Event::CommentBadgesRefreshed {
            ids: changed.clone(),
        });
        changed
    }

    pub fn move_node(&mut self, node: NodeIndex, position: Point) -> Result<(), EngineError> {
        self.diagram.move_node(node, position)?;
        self.version += 1;
        Ok(())
    }

    pub fn set_link_waypoints(
        &mut self,
        link: LinkIndex,
        waypoints: Vec<Point>,
    ) -> Result<(), EngineError> {
        self.diagram.set_waypoints(link, waypoints)?;
        self.version += 1;
        Ok(())
    }

    /// The configuration the current diagram would be saved as.
    pub fn capture_configuration(&self) -> LayoutConfiguration {
        codec::capture(&self.diagram, &self.filter)
    }

    /// Save the current layout under `name`. A rejected save leaves the diagram
    /// untouched and reports the store's errors.
    pub fn save_configuration(&mut self, name: &str) -> SaveOutcome {
        let config = self.capture_configuration();
        let outcome = self.store.save_configuration(self.scope, name, &config);
        let name = name.trim().to_string();
        if outcome.success {
            self.events.publish(Event::ConfigurationSaved { name: name.clone() });
            self.active_configuration = Some(name);
        } else {
            tracing::warn!("Configuration '{}' was not saved: {:?}", name, outcome.errors);
            self.events.publish(Event::ConfigurationSaveFailed {
                name,
                errors: outcome.errors.clone(),
            });
        }
        outcome
    }

    /// Replace the diagram with the configuration saved under `name`.
    ///
    /// Returns `Ok(false)` and changes nothing when no such configuration exists.
    pub fn load_configuration(&mut self, name: &str) -> Result<bool, EngineError> {
        let Some(config) = self.store.load_configuration(self.scope, name)? else {
            tracing::debug!("No configuration named '{}'", name);
            return Ok(false);
        };

        let filter = FilterSelection::from_records(&config.filters);
        let visible = VisibilityFilter::apply(&self.index, &filter);
        let (diagram, summary) = codec::replay(&self.builder(&visible), &self.index, &config);
        self.log_replay(name, &summary);

        self.filter = filter;
        self.visible = visible;
        self.events.publish(Event::FilterApplied {
            selection: self.filter.clone(),
        });
        self.commit(diagram);

        let name = name.trim().to_string();
        self.active_configuration = Some(name.clone());
        self.events.publish(Event::ConfigurationActivated { name });
        Ok(true)
    }

    fn log_replay(&self, name: &str, summary: &ReplaySummary) {
        tracing::info!(
            "Loaded configuration '{}': {} nodes, {} links ({} nodes and {} links skipped)",
            name,
            summary.nodes,
            summary.links,
            summary.skipped_nodes,
            summary.skipped_links
        );
    }

    pub fn list_configurations(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.store.list_configuration_names(self.scope)?)
    }

    /// Delete a saved configuration. Deleting the active one clears the active
    /// marker; the diagram itself is left as it is.
    pub fn delete_configuration(&mut self, name: &str) -> DeleteOutcome {
        let outcome = self.store.delete_configuration(self.scope, name);
        let name = name.trim().to_string();
        if outcome.success {
            let was_active = self.active_configuration.as_deref() == Some(name.as_str());
            if was_active {
                self.active_configuration = None;
            }
            self.events
                .publish(Event::ConfigurationDeleted { name, was_active });
        } else {
            self.events.publish(Event::ConfigurationDeleteFailed {
                name,
                error: outcome.error.clone().unwrap_or_default(),
            });
        }
        outcome
    }
}
