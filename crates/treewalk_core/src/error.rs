//! Walk error types.

use thiserror::Error;
use treewalk_node::{BoxError, RenderError};

/// Error returned by a visitor. Callers can downcast it back to their own type.
pub type VisitError = BoxError;

/// Errors that can occur during a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The visitor failed.
    #[error("Visitor error: {0}")]
    Visitor(#[source] VisitError),

    /// Instantiation, a lifecycle hook or a render call failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Walk options could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalkError {
    /// Creates a visitor error.
    pub fn visitor(error: impl Into<VisitError>) -> Self {
        Self::Visitor(error.into())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the visitor error as `E` if this walk failed in the visitor
    /// with an error of that type.
    pub fn visitor_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            WalkError::Visitor(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
