//! The visitor seam.

use std::ops::ControlFlow;

use async_trait::async_trait;
use treewalk_node::{ContextMap, Node};

use crate::{Instance, VisitError};

/// Result of visiting a node.
///
/// `ControlFlow::Continue(())` descends into the node's children;
/// `ControlFlow::Break(())` prunes them. Siblings are unaffected.
pub type VisitResult = ControlFlow<()>;

/// Called once for every visited element and primitive leaf.
///
/// # Arguments
///
/// * `node` - the element or primitive being visited
/// * `instance` - the class instance, for class-like components only. It is
///   mounted but not rendered yet, so state set here is seen by its render
/// * `context` - the legacy context the node was reached with
/// * `child_context` - the context its children will see, `None` for primitives
///
/// # Example
///
/// ```rust,ignore
/// use std::ops::ControlFlow;
///
/// use async_trait::async_trait;
/// use treewalk_core::{Instance, VisitError, VisitResult, Visitor};
/// use treewalk_node::{ContextMap, Node};
///
/// struct SkipHidden;
///
/// #[async_trait]
/// impl Visitor for SkipHidden {
///     async fn visit(
///         &self,
///         node: &Node,
///         _instance: Option<&mut Instance>,
///         _context: &ContextMap,
///         _child_context: Option<&ContextMap>,
///     ) -> Result<VisitResult, VisitError> {
///         let hidden = node
///             .as_element()
///             .is_some_and(|element| element.props.contains("hidden"));
///         Ok(if hidden { ControlFlow::Break(()) } else { ControlFlow::Continue(()) })
///     }
/// }
/// ```
#[async_trait]
pub trait Visitor: Send + Sync {
    async fn visit(
        &self,
        node: &Node,
        instance: Option<&mut Instance>,
        context: &ContextMap,
        child_context: Option<&ContextMap>,
    ) -> Result<VisitResult, VisitError>;
}

#[async_trait]
impl<V: Visitor + ?Sized> Visitor for &V {
    async fn visit(
        &self,
        node: &Node,
        instance: Option<&mut Instance>,
        context: &ContextMap,
        child_context: Option<&ContextMap>,
    ) -> Result<VisitResult, VisitError> {
        (**self).visit(node, instance, context, child_context).await
    }
}

/// A [`Visitor`] backed by a synchronous closure.
#[derive(Debug, Clone, Copy)]
pub struct FnVisitor<F>(F);

impl<F> FnVisitor<F>
where
    F: Fn(&Node, Option<&mut Instance>, &ContextMap, Option<&ContextMap>) -> Result<VisitResult, VisitError>
        + Send
        + Sync,
{
    pub fn new(visit: F) -> Self {
        Self(visit)
    }
}

#[async_trait]
impl<F> Visitor for FnVisitor<F>
where
    F: Fn(&Node, Option<&mut Instance>, &ContextMap, Option<&ContextMap>) -> Result<VisitResult, VisitError>
        + Send
        + Sync,
{
    async fn visit(
        &self,
        node: &Node,
        instance: Option<&mut Instance>,
        context: &ContextMap,
        child_context: Option<&ContextMap>,
    ) -> Result<VisitResult, VisitError> {
        (self.0)(node, instance, context, child_context)
    }
}

/// Wraps a synchronous closure as a [`Visitor`].
pub fn visitor_fn<F>(visit: F) -> FnVisitor<F>
where
    F: Fn(&Node, Option<&mut Instance>, &ContextMap, Option<&ContextMap>) -> Result<VisitResult, VisitError>
        + Send
        + Sync,
{
    FnVisitor::new(visit)
}
