//! Props bag carried by elements.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{Node, RenderError};

/// Attribute mapping of an element (everything except `children`).
pub type PropMap = Map<String, Value>;

type RenderPropFn = dyn Fn(&Value) -> Result<Node, RenderError> + Send + Sync;

/// Function-as-child render prop.
///
/// Context consumers use this to turn the current context value into the
/// node actually rendered beneath them.
#[derive(Clone)]
pub struct RenderProp(Arc<RenderPropFn>);

impl RenderProp {
    /// Wraps a render function.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Value) -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    /// Invokes the render function with `value`.
    pub fn call(&self, value: &Value) -> Result<Node, RenderError> {
        (self.0)(value)
    }
}

impl fmt::Debug for RenderProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderProp(..)")
    }
}

/// Content of the `children` prop.
#[derive(Debug, Clone)]
pub enum Children {
    /// Nested nodes.
    Nodes(Box<Node>),
    /// An invocable child.
    Render(RenderProp),
}

impl Children {
    /// Returns true if the children would count as present.
    ///
    /// Render props are always present; nested nodes only when truthy.
    pub fn is_present(&self) -> bool {
        match self {
            Children::Nodes(node) => node.is_truthy(),
            Children::Render(_) => true,
        }
    }

    /// Returns the nested nodes, if any.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Children::Nodes(node) => Some(node),
            Children::Render(_) => None,
        }
    }

    /// Returns the render prop, if any.
    pub fn as_render_prop(&self) -> Option<&RenderProp> {
        match self {
            Children::Nodes(_) => None,
            Children::Render(render) => Some(render),
        }
    }
}

impl From<Node> for Children {
    fn from(node: Node) -> Self {
        Children::Nodes(Box::new(node))
    }
}

/// Props of an element: an attribute map plus an optional `children` entry.
#[derive(Debug, Clone, Default)]
pub struct Props {
    attrs: PropMap,
    children: Option<Children>,
}

impl Props {
    /// Creates an empty props bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates props from an attribute map.
    ///
    /// A `children` key in the map is ignored; children are set through
    /// [`Props::set_children`].
    pub fn from_map(mut attrs: PropMap) -> Self {
        attrs.remove("children");
        Self {
            attrs,
            children: None,
        }
    }

    /// Inserts an attribute, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attrs.insert(key.into(), value.into())
    }

    /// Returns an attribute value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Returns true if the attribute is present, even when its value is `null`.
    pub fn contains(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Returns the attribute map.
    pub fn attrs(&self) -> &PropMap {
        &self.attrs
    }

    /// Returns the `children` entry.
    pub fn children(&self) -> Option<&Children> {
        self.children.as_ref()
    }

    /// Replaces the `children` entry.
    pub fn set_children(&mut self, children: Option<Children>) {
        self.children = children;
    }

    /// Removes and returns the `children` entry.
    pub fn take_children(&mut self) -> Option<Children> {
        self.children.take()
    }

    /// Merges attribute maps in order: `defaults`, then `attrs`. Later keys win.
    pub fn merge(defaults: Option<&PropMap>, attrs: &PropMap) -> PropMap {
        let mut merged = defaults.cloned().unwrap_or_default();
        for (key, value) in attrs {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}
