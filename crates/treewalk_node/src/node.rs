//! Node definitions.
//!
//! The tree being walked is built from [`Node`] values. Elements carry an
//! [`ElementType`] deciding how they render, and a [`Props`] bag.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    Children, ClassRef, Context, ForwardRef, FunctionComponent, PropMap, Props, RenderError,
    RenderProp,
};

/// A value appearing in the tree.
///
/// # Example
///
/// ```rust
/// use treewalk_node::{Element, Node};
///
/// let list: Node = vec![Node::from("a"), Node::from(1), Node::Empty].into();
/// let item: Node = Element::host("li").with_children(list).into();
///
/// assert!(item.as_element().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Absent value: null, undefined or `false`.
    #[default]
    Empty,
    /// String leaf.
    Text(String),
    /// Number leaf.
    Number(f64),
    /// Ordered list of sibling nodes.
    Sequence(Vec<Node>),
    /// An element with a type and props.
    Element(Element),
    /// A pass-through container rendering its children elsewhere.
    Portal(Portal),
    /// A child that produces the actual node when rendered.
    Lazy(LazyNode),
}

impl Node {
    /// Creates a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Returns the text of a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the number of a number leaf.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns true unless this node is absent, an empty string, zero or NaN.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Empty => false,
            Node::Text(text) => !text.is_empty(),
            Node::Number(n) => *n != 0.0 && !n.is_nan(),
            _ => true,
        }
    }

    /// Formats a primitive leaf the way it would be printed.
    ///
    /// Integral numbers print without a fractional part.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            Node::Text(text) => Some(text.clone()),
            Node::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Node::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Number(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Number(f64::from(value))
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Number(f64::from(value))
    }
}

/// Magnitudes above 2^53 are rounded to the nearest representable `f64`,
/// the same way a host runtime stores them.
impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(value as f64)
    }
}

/// Booleans never render: both map to [`Node::Empty`].
impl From<bool> for Node {
    fn from(_: bool) -> Self {
        Node::Empty
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Sequence(value)
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

impl From<Portal> for Node {
    fn from(value: Portal) -> Self {
        Node::Portal(value)
    }
}

impl From<LazyNode> for Node {
    fn from(value: LazyNode) -> Self {
        Node::Lazy(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Empty, Into::into)
    }
}

/// What an element renders as.
#[derive(Clone)]
pub enum ElementType {
    /// A host tag such as `div`. Renders its own children.
    Host(String),
    /// A function component.
    Function(FunctionComponent),
    /// A class-like component, instantiated once per visit.
    Class(ClassRef),
    /// A forwarding element.
    Forward(ForwardRef),
    /// A context provider.
    Provider(Context),
    /// A context consumer.
    Consumer(Context),
}

impl ElementType {
    /// Creates a host tag type.
    pub fn host(tag: impl Into<String>) -> Self {
        ElementType::Host(tag.into())
    }

    /// Returns a display name for logs.
    pub fn name(&self) -> &str {
        match self {
            ElementType::Host(tag) => tag,
            ElementType::Function(component) => component.name(),
            ElementType::Class(class) => class.name(),
            ElementType::Forward(forward) => forward.name(),
            ElementType::Provider(context) | ElementType::Consumer(context) => context.name(),
        }
    }

    /// Returns the context for providers and consumers.
    pub fn context(&self) -> Option<&Context> {
        match self {
            ElementType::Provider(context) | ElementType::Consumer(context) => Some(context),
            _ => None,
        }
    }

    /// Returns the default props declared by a component type.
    pub fn default_props(&self) -> Option<PropMap> {
        match self {
            ElementType::Function(component) => component.default_props().cloned(),
            ElementType::Forward(forward) => forward.default_props().cloned(),
            ElementType::Class(class) => class.default_props(),
            _ => None,
        }
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Host(tag) => f.debug_tuple("Host").field(tag).finish(),
            ElementType::Function(component) => fmt::Debug::fmt(component, f),
            ElementType::Class(class) => f.debug_tuple("Class").field(&class.name()).finish(),
            ElementType::Forward(forward) => fmt::Debug::fmt(forward, f),
            ElementType::Provider(context) => f.debug_tuple("Provider").field(context).finish(),
            ElementType::Consumer(context) => f.debug_tuple("Consumer").field(context).finish(),
        }
    }
}

/// An element: a type plus a props bag.
#[derive(Debug, Clone)]
pub struct Element {
    /// The element type.
    pub element_type: ElementType,

    /// Attributes and the `children` prop.
    pub props: Props,

    /// Children stored on the node itself rather than under props.
    pub children: Option<Box<Node>>,
}

impl Element {
    /// Creates an element with empty props.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            props: Props::new(),
            children: None,
        }
    }

    /// Creates a host element.
    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(ElementType::host(tag))
    }

    /// Creates an element of a class-like component.
    pub fn class(class: ClassRef) -> Self {
        Self::new(ElementType::Class(class))
    }

    /// Sets an attribute.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Replaces all attributes, keeping the `children` prop.
    pub fn with_props(mut self, attrs: PropMap) -> Self {
        let children = self.props.children().cloned();
        self.props = Props::from_map(attrs);
        self.props.set_children(children);
        self
    }

    /// Sets the `children` prop to nested nodes.
    pub fn with_children(mut self, children: impl Into<Node>) -> Self {
        self.props
            .set_children(Some(Children::Nodes(Box::new(children.into()))));
        self
    }

    /// Sets the `children` prop to an invocable child.
    pub fn with_render_prop(mut self, render: RenderProp) -> Self {
        self.props.set_children(Some(Children::Render(render)));
        self
    }

    /// Sets children on the node itself.
    pub fn with_node_children(mut self, children: impl Into<Node>) -> Self {
        self.children = Some(Box::new(children.into()));
        self
    }

    /// Returns the children of this element.
    ///
    /// The `children` prop wins when present; otherwise children stored on the
    /// node itself are used.
    pub fn resolved_children(&self) -> Option<Children> {
        match self.props.children() {
            Some(children) if children.is_present() => Some(children.clone()),
            _ => self
                .children
                .as_deref()
                .map(|node| Children::Nodes(Box::new(node.clone()))),
        }
    }

    /// Consumes the element and returns its nested nodes.
    ///
    /// Same precedence as [`Element::resolved_children`]. An invocable child
    /// and empty children yield `None`.
    pub fn into_children(mut self) -> Option<Node> {
        match self.props.take_children() {
            Some(Children::Render(_)) => None,
            Some(Children::Nodes(nodes)) if nodes.is_truthy() => Some(*nodes),
            _ => self.children.map(|node| *node).filter(Node::is_truthy),
        }
    }

    /// Returns the props a component of this element renders with: default
    /// props, then element attributes, then the resolved children.
    pub fn merged_props(&self) -> Props {
        let defaults = self.element_type.default_props();
        let mut props = Props::from_map(Props::merge(defaults.as_ref(), self.props.attrs()));
        props.set_children(self.resolved_children());
        props
    }
}

/// A portal: a container marker plus the children it renders.
#[derive(Debug, Clone)]
pub struct Portal {
    /// Opaque description of the target container.
    pub container_info: Value,

    /// Children rendered into the container.
    pub children: Vec<Node>,
}

impl Portal {
    /// Creates a portal.
    pub fn new(container_info: impl Into<Value>, children: Vec<Node>) -> Self {
        Self {
            container_info: container_info.into(),
            children,
        }
    }
}

type LazyRender = dyn Fn() -> Result<Node, RenderError> + Send + Sync;

/// A lazily wrapped child exposing a zero-argument render operation.
#[derive(Clone)]
pub struct LazyNode(Arc<LazyRender>);

impl LazyNode {
    /// Wraps a render function.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn() -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    /// Produces the wrapped node.
    pub fn render(&self) -> Result<Node, RenderError> {
        (self.0)()
    }
}

impl fmt::Debug for LazyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyNode(..)")
    }
}
