use anyhow::Result;
use portstory_core::{FilterSelection, Point};
use portstory_graph::CircularLayouter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Distance between a node and the neighbors placed around it.
    #[serde(default = "default_layout_radius")]
    pub layout_radius: f64,
    /// Position of the center node after a full rebuild.
    pub center_position: Point,
    /// Filter selection in effect when a session opens.
    pub initial_filter: FilterSelection,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            layout_radius: default_layout_radius(),
            center_position: Point::default(),
            initial_filter: FilterSelection::default(),
        }
    }
}

fn default_layout_radius() -> f64 {
    CircularLayouter::DEFAULT_RADIUS
}

impl EngineSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: EngineSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn layouter(&self) -> CircularLayouter {
        CircularLayouter::new(self.layout_radius)
    }
}
