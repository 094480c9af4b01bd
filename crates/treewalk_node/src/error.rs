//! Render error types.

use thiserror::Error;

/// Boxed error raised by user code (components, hooks, visitors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while instantiating or rendering a component.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A component reported a failure from its render logic.
    #[error("Component `{component}` failed to render: {message}")]
    Component {
        /// Display name of the component.
        component: String,
        /// Error message.
        message: String,
    },

    /// A class type without render or component-marker capability was invoked.
    #[error("Component `{component}` is not class-like and cannot be called as a function")]
    NotCallable {
        /// Display name of the component.
        component: String,
    },

    /// A lifecycle hook failed.
    #[error("Lifecycle hook `{hook}` of `{component}` failed: {message}")]
    Hook {
        /// Display name of the component.
        component: String,
        /// Name of the failing hook.
        hook: &'static str,
        /// Error message.
        message: String,
    },

    /// Any other error raised by component code.
    #[error("{0}")]
    Other(#[from] BoxError),
}

impl RenderError {
    /// Creates a component render error.
    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Creates a not-callable error.
    pub fn not_callable(component: impl Into<String>) -> Self {
        Self::NotCallable {
            component: component.into(),
        }
    }

    /// Creates a lifecycle hook error.
    pub fn hook(
        component: impl Into<String>,
        hook: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Hook {
            component: component.into(),
            hook,
            message: message.into(),
        }
    }

    /// Wraps an arbitrary error raised by component code.
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }
}
