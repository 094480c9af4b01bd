//! Contextual environment threaded down the walk.
//!
//! A [`Scope`] pairs the legacy context map with the provider frames visible
//! at a point of the tree. Both are persistent: deriving a scope for a
//! subtree never changes the scope of the parent or of sibling branches, so
//! concurrently walked branches each see exactly the providers above them.

use std::sync::Arc;

use serde_json::Value;
use treewalk_node::{Context, ContextId, ContextMap};

#[derive(Debug)]
struct ProviderFrame {
    context: ContextId,
    value: Value,
    parent: Option<Arc<ProviderFrame>>,
}

/// The contextual environment of one node.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    context: Arc<ContextMap>,
    providers: Option<Arc<ProviderFrame>>,
}

impl Scope {
    /// Creates a root scope with the initial context map and no providers.
    pub fn new(context: ContextMap) -> Self {
        Self {
            context: Arc::new(context),
            providers: None,
        }
    }

    /// Returns the legacy context map.
    pub fn context(&self) -> &ContextMap {
        &self.context
    }

    /// Returns a scope whose context map is this one merged with `partial`.
    /// Keys in `partial` win.
    pub fn with_child_context(&self, partial: ContextMap) -> Self {
        let mut context = (*self.context).clone();
        context.extend(partial);
        Self {
            context: Arc::new(context),
            providers: self.providers.clone(),
        }
    }

    /// Returns a scope in which `context` resolves to `value`.
    pub fn provide(&self, context: &Context, value: Value) -> Self {
        Self {
            context: Arc::clone(&self.context),
            providers: Some(Arc::new(ProviderFrame {
                context: context.id(),
                value,
                parent: self.providers.clone(),
            })),
        }
    }

    /// Returns the value of the nearest provider of `context`, or its default value.
    pub fn read<'s>(&'s self, context: &'s Context) -> &'s Value {
        let mut frame = self.providers.as_deref();
        while let Some(current) = frame {
            if current.context == context.id() {
                return &current.value;
            }
            frame = current.parent.as_deref();
        }
        context.default_value()
    }

    /// Returns the number of provider frames in scope.
    pub fn provider_depth(&self) -> usize {
        std::iter::successors(self.providers.as_deref(), |frame| frame.parent.as_deref()).count()
    }
}
