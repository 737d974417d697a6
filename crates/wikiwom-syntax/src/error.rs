//! Errors raised by the AST arena.

use thiserror::Error;

use crate::ast::NodeId;

/// Invariant violations of the arena and the round-trip contract.
///
/// These are programming errors: a caller passed an id from another arena,
/// treated a leaf as a container, or built round-trip data of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("node {0} does not exist in this arena")]
    UnknownNode(NodeId),

    #[error("node {0} is not a container")]
    NotAContainer(NodeId),

    #[error("container {0} cannot carry round-trip data")]
    RtdOnContainer(NodeId),

    #[error("round-trip data of node {node} has {found} slots, expected {expected}")]
    RtdSlotMismatch {
        node: NodeId,
        expected: usize,
        found: usize,
    },
}
