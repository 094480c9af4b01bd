//! Host node descriptions.
//!
//! Trees described as JSON by a host runtime follow one of two naming
//! conventions:
//!
//! | Piece | Primary | Secondary |
//! |---|---|---|
//! | type | `type` | `nodeName` |
//! | attributes | `props` | `attributes` |
//! | children | `props.children` | `children` |
//!
//! The accessors here try the primary name first and fall back to the
//! secondary one. Nothing in this module fails: a description matching no
//! convention converts to [`Node::Empty`].

use serde_json::{Map, Value};
use tracing::trace;

use crate::{Children, Element, Node, Portal, Props};

/// Returns true for values a host runtime would treat as present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the type of a host description: `type`, then `nodeName`.
pub fn type_of(value: &Value) -> Option<&Value> {
    ["type", "nodeName"]
        .into_iter()
        .filter_map(|key| value.get(key))
        .find(|candidate| is_truthy(candidate))
}

/// Returns the attributes of a host description: `props`, then `attributes`.
pub fn props_of(value: &Value) -> Option<&Map<String, Value>> {
    ["props", "attributes"]
        .into_iter()
        .filter_map(|key| value.get(key))
        .find(|candidate| is_truthy(candidate))
        .and_then(Value::as_object)
}

/// Returns the children of a host description: `props.children`, then `children`.
pub fn children_of(value: &Value) -> Option<&Value> {
    value
        .get("props")
        .and_then(|props| props.get("children"))
        .filter(|children| is_truthy(children))
        .or_else(|| value.get("children").filter(|children| is_truthy(children)))
}

/// Returns true if the description has a non-empty type.
pub fn is_element(value: &Value) -> bool {
    type_of(value).is_some()
}

/// Returns true if the description is a portal: a `containerInfo` marker
/// plus a `children.props.children` array.
pub fn is_portal(value: &Value) -> bool {
    portal_children(value).is_some()
}

fn portal_children(value: &Value) -> Option<&Vec<Value>> {
    value.get("containerInfo").filter(|info| is_truthy(info))?;
    value
        .get("children")
        .and_then(|children| children.get("props"))
        .and_then(|props| props.get("children"))
        .and_then(Value::as_array)
}

/// Converts a host description into a node.
///
/// String types become host tags. Descriptions whose type is not a string
/// cannot name a component from JSON and convert to [`Node::Empty`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use treewalk_node::{host, NodeKind};
///
/// let react_style = json!({ "type": "div", "props": { "children": ["hi"] } });
/// let preact_style = json!({ "nodeName": "div", "attributes": {}, "children": ["hi"] });
///
/// assert_eq!(NodeKind::of(&host::node_from_value(&react_style)), NodeKind::HostElement);
/// assert_eq!(NodeKind::of(&host::node_from_value(&preact_style)), NodeKind::HostElement);
/// ```
pub fn node_from_value(value: &Value) -> Node {
    match value {
        Value::Null | Value::Bool(_) => Node::Empty,
        Value::String(text) => Node::Text(text.clone()),
        Value::Number(n) => n.as_f64().map_or(Node::Empty, Node::Number),
        Value::Array(items) => Node::Sequence(items.iter().map(node_from_value).collect()),
        Value::Object(_) => object_from_value(value),
    }
}

fn object_from_value(value: &Value) -> Node {
    if let Some(element_type) = type_of(value) {
        let Some(tag) = element_type.as_str() else {
            trace!("host description with non-string type converts to Empty");
            return Node::Empty;
        };
        let mut element = Element::host(tag);
        element.props = props_of(value).cloned().map(Props::from_map).unwrap_or_default();
        if let Some(children) = value
            .get("props")
            .and_then(|props| props.get("children"))
        {
            element
                .props
                .set_children(Some(Children::from(node_from_value(children))));
        }
        if let Some(children) = value.get("children") {
            element.children = Some(Box::new(node_from_value(children)));
        }
        return Node::Element(element);
    }

    if let Some(children) = portal_children(value) {
        let container_info = value.get("containerInfo").cloned().unwrap_or_default();
        return Node::Portal(Portal::new(
            container_info,
            children.iter().map(node_from_value).collect(),
        ));
    }

    trace!("host description matches no convention, treating as Empty");
    Node::Empty
}
