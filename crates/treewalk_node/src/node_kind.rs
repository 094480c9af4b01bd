//! Node kind classification.

use serde::Serialize;

use crate::{ElementType, Node};

/// The variant of a node as the walker sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum NodeKind {
    /// Produces no visit and no children.
    Empty,
    /// String or number leaf.
    Primitive,
    /// Sibling list, not itself visited.
    Sequence,
    /// Host tag rendering its own children.
    HostElement,
    /// Function component.
    FunctionComponent,
    /// Class-like component.
    ClassComponent,
    /// Forwarding element.
    ForwardingElement,
    /// Context provider.
    Provider,
    /// Context consumer.
    Consumer,
    /// Portal, not itself visited.
    Portal,
}

impl NodeKind {
    /// Classifies a node.
    ///
    /// Falsy primitives (empty string, zero, NaN), host elements with an
    /// empty tag and lazy nodes outside a render result all count as
    /// [`NodeKind::Empty`].
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Empty | Node::Lazy(_) => NodeKind::Empty,
            Node::Text(_) | Node::Number(_) if !node.is_truthy() => NodeKind::Empty,
            Node::Text(_) | Node::Number(_) => NodeKind::Primitive,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Portal(_) => NodeKind::Portal,
            Node::Element(element) => match &element.element_type {
                ElementType::Host(tag) if tag.is_empty() => NodeKind::Empty,
                ElementType::Host(_) => NodeKind::HostElement,
                ElementType::Function(_) => NodeKind::FunctionComponent,
                ElementType::Class(_) => NodeKind::ClassComponent,
                ElementType::Forward(_) => NodeKind::ForwardingElement,
                ElementType::Provider(_) => NodeKind::Provider,
                ElementType::Consumer(_) => NodeKind::Consumer,
            },
        }
    }

    /// Returns true if nodes of this kind are passed to the visitor.
    #[inline]
    pub const fn is_visited(&self) -> bool {
        !matches!(
            self,
            NodeKind::Empty | NodeKind::Sequence | NodeKind::Portal
        )
    }

    /// Returns true if this kind is an element.
    #[inline]
    pub const fn is_element(&self) -> bool {
        matches!(
            self,
            NodeKind::HostElement
                | NodeKind::FunctionComponent
                | NodeKind::ClassComponent
                | NodeKind::ForwardingElement
                | NodeKind::Provider
                | NodeKind::Consumer
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Empty => "Empty",
            NodeKind::Primitive => "Primitive",
            NodeKind::Sequence => "Sequence",
            NodeKind::HostElement => "HostElement",
            NodeKind::FunctionComponent => "FunctionComponent",
            NodeKind::ClassComponent => "ClassComponent",
            NodeKind::ForwardingElement => "ForwardingElement",
            NodeKind::Provider => "Provider",
            NodeKind::Consumer => "Consumer",
            NodeKind::Portal => "Portal",
        };
        write!(f, "{}", name)
    }
}
