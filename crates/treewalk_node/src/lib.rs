//! # treewalk_node
//!
//! Element tree definitions for treewalk.
//!
//! This crate provides the virtual tree walked by `treewalk_core`: primitive
//! leaves, sequences, elements, portals and lazily rendered children, together
//! with the component capability traits that give elements their render
//! behavior.
//!
//! ## Architecture
//!
//! - [`Node`] is a closed tagged union; every value appearing in a tree is one
//!   of its variants
//! - [`ElementType`] distinguishes host tags, function components, class-like
//!   components, forwarding elements and context providers/consumers
//! - Class-like components declare optional lifecycle hooks through a
//!   [`Capabilities`] bit set, and the walker dispatches on its presence
//! - [`classify`] and [`NodeKind`] answer introspection questions about a node
//!   without side effects
//! - [`host`] converts JSON host descriptions, in either naming convention,
//!   into nodes
//!
//! ## Example
//!
//! ```rust
//! use treewalk_node::{Element, Node, NodeKind};
//!
//! let tree: Node = Element::host("ul")
//!     .with_children(vec![
//!         Node::from(Element::host("li").with_children("one")),
//!         Element::host("li").with_children("two").into(),
//!     ])
//!     .into();
//!
//! assert_eq!(NodeKind::of(&tree), NodeKind::HostElement);
//! ```

pub mod classify;
mod component;
mod context;
mod error;
pub mod host;
mod node;
mod node_kind;
mod props;

pub use component::{
    Capabilities, ClassRef, Component, ComponentClass, ContextMap, ForwardRef, FunctionComponent,
    InstanceFields, State, StateMap,
};
pub use context::{Context, ContextId};
pub use error::{BoxError, RenderError};
pub use node::{Element, ElementType, LazyNode, Node, Portal};
pub use node_kind::NodeKind;
pub use props::{Children, PropMap, Props, RenderProp};
