use crate::ElementId;
use thiserror::Error;

/// Graph-consistency violations. Any of these aborts the rebuild in progress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Interface {interface} uses port {port} as both source and target")]
    SelfLoopInterface { interface: ElementId, port: ElementId },
    #[error(
        "Port {port} is the source of interface {as_source} and the target of interface {as_target}"
    )]
    AmbiguousPortDirection {
        port: ElementId,
        as_source: ElementId,
        as_target: ElementId,
    },
    #[error("Selected element {0} is not a known component, port or interface")]
    UnknownSelection(ElementId),
    #[error("Diagram primitive {0} does not exist")]
    UnknownPrimitive(String),
}
