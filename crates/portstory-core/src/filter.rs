use crate::configuration::FilterRecord;
use crate::{ElementId, EnumConversionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum FilterKind {
    Owner,
    Category,
    PortConnection,
    ComponentConnection,
}

impl TryFrom<i32> for FilterKind {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FilterKind::Owner),
            1 => Ok(FilterKind::Category),
            2 => Ok(FilterKind::PortConnection),
            3 => Ok(FilterKind::ComponentConnection),
            _ => Err(EnumConversionError::InvalidFilterKind(value)),
        }
    }
}

/// Tri-state connection selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(i32)]
pub enum ConnectionFilter {
    #[default]
    All,
    Connected,
    Unconnected,
}

impl ConnectionFilter {
    pub fn admits(self, connected: bool) -> bool {
        match self {
            ConnectionFilter::All => true,
            ConnectionFilter::Connected => connected,
            ConnectionFilter::Unconnected => !connected,
        }
    }
}

impl TryFrom<i32> for ConnectionFilter {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ConnectionFilter::All),
            1 => Ok(ConnectionFilter::Connected),
            2 => Ok(ConnectionFilter::Unconnected),
            _ => Err(EnumConversionError::InvalidConnectionFilter(value)),
        }
    }
}

/// The user's current filter choice. `None` for a value set means unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub owners: Option<BTreeSet<ElementId>>,
    pub categories: Option<BTreeSet<ElementId>>,
    pub port_connection: ConnectionFilter,
    pub component_connection: ConnectionFilter,
}

impl FilterSelection {
    pub fn admits_owner(&self, owner: ElementId) -> bool {
        self.owners.as_ref().is_none_or(|set| set.contains(&owner))
    }

    pub fn admits_category(&self, category: ElementId) -> bool {
        self.categories
            .as_ref()
            .is_none_or(|set| set.contains(&category))
    }

    /// Row-level category match: at least one applied category must be selected.
    pub fn admits_any_category(&self, categories: &[ElementId]) -> bool {
        match &self.categories {
            None => true,
            Some(set) => categories.iter().any(|c| set.contains(c)),
        }
    }

    pub fn is_active(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Owner => self.owners.is_some(),
            FilterKind::Category => self.categories.is_some(),
            FilterKind::PortConnection => self.port_connection != ConnectionFilter::All,
            FilterKind::ComponentConnection => self.component_connection != ConnectionFilter::All,
        }
    }

    /// Overwrite the part of the selection the record describes.
    pub fn apply_record(&mut self, record: &FilterRecord) {
        match record.kind {
            FilterKind::Owner => {
                self.owners = Some(record.selected_value_ids.iter().copied().collect());
            }
            FilterKind::Category => {
                self.categories = Some(record.selected_value_ids.iter().copied().collect());
            }
            FilterKind::PortConnection => {
                self.port_connection = record.connection_state.unwrap_or_default();
            }
            FilterKind::ComponentConnection => {
                self.component_connection = record.connection_state.unwrap_or_default();
            }
        }
    }

    pub fn reset(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Owner => self.owners = None,
            FilterKind::Category => self.categories = None,
            FilterKind::PortConnection => self.port_connection = ConnectionFilter::All,
            FilterKind::ComponentConnection => self.component_connection = ConnectionFilter::All,
        }
    }

    /// One record per active filter, in `FilterKind` order.
    pub fn to_records(&self) -> Vec<FilterRecord> {
        let mut records = Vec::new();
        if let Some(owners) = &self.owners {
            records.push(FilterRecord::values(
                FilterKind::Owner,
                owners.iter().copied().collect(),
            ));
        }
        if let Some(categories) = &self.categories {
            records.push(FilterRecord::values(
                FilterKind::Category,
                categories.iter().copied().collect(),
            ));
        }
        if self.port_connection != ConnectionFilter::All {
            records.push(FilterRecord::connection(
                FilterKind::PortConnection,
                self.port_connection,
            ));
        }
        if self.component_connection != ConnectionFilter::All {
            records.push(FilterRecord::connection(
                FilterKind::ComponentConnection,
                self.component_connection,
            ));
        }
        records
    }

    pub fn from_records(records: &[FilterRecord]) -> Self {
        let mut selection = Self::default();
        for record in records {
            selection.apply_record(record);
        }
        selection
    }
}
