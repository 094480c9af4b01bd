//! Shared context identities.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::{Element, ElementType, Node, RenderError, RenderProp};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

struct ContextInner {
    id: ContextId,
    name: String,
    default_value: Value,
}

/// A context identity carrying a default value.
///
/// Provider elements supply a value for their subtree; consumer elements
/// read the value of the nearest enclosing provider, or the default value
/// when there is none. The context itself is immutable.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Creates a new context with a default value.
    pub fn new(name: impl Into<String>, default_value: impl Into<Value>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: ContextId::next(),
                name: name.into(),
                default_value: default_value.into(),
            }),
        }
    }

    /// Returns the identity of this context.
    #[inline]
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the value seen by consumers outside any provider.
    pub fn default_value(&self) -> &Value {
        &self.inner.default_value
    }

    /// Creates a provider element supplying `value`.
    pub fn provider(&self, value: impl Into<Value>) -> Element {
        Element::new(ElementType::Provider(self.clone())).with_prop("value", value)
    }

    /// Creates a consumer element whose child is computed from the current value.
    pub fn consumer<F>(&self, render: F) -> Element
    where
        F: Fn(&Value) -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Element::new(ElementType::Consumer(self.clone())).with_render_prop(RenderProp::new(render))
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}
