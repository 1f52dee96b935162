use crate::ElementId;
use serde::{Deserialize, Serialize};

/// Review annotation attached to a model element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub thing_id: ElementId,
    #[serde(default)]
    pub comment_count: usize,
}

impl ReviewItem {
    pub fn has_comments(&self) -> bool {
        self.comment_count > 0
    }
}
