use portstory_core::DiagramError;
use portstory_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Diagram error: {0}")]
    Diagram(#[from] DiagramError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    /// The diagram error behind this failure, if any.
    pub fn as_diagram(&self) -> Option<&DiagramError> {
        match self {
            EngineError::Diagram(e) => Some(e),
            EngineError::Storage(_) => None,
        }
    }
}
