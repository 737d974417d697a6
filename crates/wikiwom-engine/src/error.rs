//! Error kinds of the synchronization layer.

use thiserror::Error;
use wikiwom_syntax::{AstError, NodeId};

/// Everything a WOM operation can fail with.
///
/// All variants except [`WomError::InvariantViolation`] and
/// [`WomError::Ast`] are reported before any state changes, so the document
/// is untouched when they are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WomError {
    /// A value was rejected by an attribute descriptor or validator.
    #[error("invalid value: {0}")]
    Validation(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("content model violation: {0}")]
    ContentModel(String),

    #[error("the page already has a category called `{0}`")]
    NameCollision(String),

    /// The factory met an XML element it has no constructor for.
    #[error("unsupported element <{name}> at AST node {node}")]
    UnsupportedElement { node: NodeId, name: String },

    /// The WOM and the AST disagree; the operation was abandoned midway.
    #[error("structural invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Ast(#[from] AstError),
}

impl WomError {
    /// Whether the error signals a programming error rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WomError::InvariantViolation(_) | WomError::Ast(_))
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        WomError::Validation(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        WomError::UnsupportedOperation(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        WomError::InvariantViolation(msg.into())
    }
}

pub type Result<T, E = WomError> = std::result::Result<T, E>;
