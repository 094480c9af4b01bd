//! Side-effect free introspection over nodes.
//!
//! These helpers never fail: a node that matches nothing yields `None` or
//! `false`. The only exception is [`unwrap`], which has to run the render
//! operation of lazily wrapped children.

use std::borrow::Cow;

use tracing::trace;

use crate::{Children, ClassRef, ElementType, Node, Props, RenderError, RenderProp};

/// Returns the element type of a node.
///
/// Host elements with an empty tag have no type.
pub fn type_of(node: &Node) -> Option<&ElementType> {
    match node {
        Node::Element(element) => match &element.element_type {
            ElementType::Host(tag) if tag.is_empty() => None,
            element_type => Some(element_type),
        },
        _ => None,
    }
}

/// Returns the props of an element node.
pub fn props_of(node: &Node) -> Option<&Props> {
    node.as_element().map(|element| &element.props)
}

/// Borrowed view of an element's children.
#[derive(Debug, Clone, Copy)]
pub enum ChildrenRef<'a> {
    /// Nested nodes.
    Nodes(&'a Node),
    /// An invocable child.
    Render(&'a RenderProp),
}

impl<'a> ChildrenRef<'a> {
    /// Returns the nested nodes, if any.
    pub fn as_node(&self) -> Option<&'a Node> {
        match *self {
            ChildrenRef::Nodes(node) => Some(node),
            ChildrenRef::Render(_) => None,
        }
    }
}

/// Returns the children of an element node.
///
/// The `children` prop is tried first, then children stored on the node.
pub fn children_of(node: &Node) -> Option<ChildrenRef<'_>> {
    let element = node.as_element()?;
    match element.props.children() {
        Some(Children::Render(render)) => Some(ChildrenRef::Render(render)),
        Some(Children::Nodes(nodes)) if nodes.is_truthy() => Some(ChildrenRef::Nodes(nodes)),
        _ => element
            .children
            .as_deref()
            .filter(|children| children.is_truthy())
            .map(ChildrenRef::Nodes),
    }
}

/// Returns true if the node has a non-empty type.
#[inline]
pub fn is_element(node: &Node) -> bool {
    type_of(node).is_some()
}

/// Returns true if instances of the class expose a render or component-marker capability.
#[inline]
pub fn is_class_like(class: &ClassRef) -> bool {
    class.capabilities().is_class_like()
}

/// Returns true if the node's type carries the forwarding marker.
#[inline]
pub fn is_forwarding_element(node: &Node) -> bool {
    matches!(type_of(node), Some(ElementType::Forward(_)))
}

/// Repeatedly renders lazily wrapped children until a plain node results.
pub fn unwrap(node: Cow<'_, Node>) -> Result<Cow<'_, Node>, RenderError> {
    let mut current = node;
    while let Node::Lazy(lazy) = current.as_ref() {
        trace!("unwrapping lazy child");
        let next = lazy.render()?;
        current = Cow::Owned(next);
    }
    Ok(current)
}
