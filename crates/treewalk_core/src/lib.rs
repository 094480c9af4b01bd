//! # treewalk_core
//!
//! Asynchronous visitor over element trees.
//!
//! This crate walks a tree of [`treewalk_node::Node`]s, rendering components
//! on the way down and calling a [`Visitor`] for every element and primitive
//! leaf it reaches. A typical use is collecting data requirements of a tree
//! before it is rendered for real.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::ops::ControlFlow;
//!
//! use treewalk_core::{WalkOptions, visitor_fn, walk};
//! use treewalk_node::{ContextMap, Element, Node};
//!
//! # async fn run() -> Result<(), treewalk_core::WalkError> {
//! let tree: Node = Element::host("ul")
//!     .with_children(vec![
//!         Node::from(Element::host("li").with_children("one")),
//!         Element::host("li").with_children("two").into(),
//!     ])
//!     .into();
//!
//! let visitor = visitor_fn(|node, _instance, _context, _child_context| {
//!     println!("{:?}", node.as_text());
//!     Ok(ControlFlow::Continue(()))
//! });
//!
//! walk(&tree, &visitor, ContextMap::new(), WalkOptions::default()).await
//! # }
//! ```

mod error;
mod instance;
mod options;
mod scope;
pub mod sequence;
mod visitor;
mod walker;

pub use error::{VisitError, WalkError};
pub use instance::{Instance, MountStep};
pub use options::WalkOptions;
pub use scope::Scope;
pub use visitor::{FnVisitor, VisitResult, Visitor, visitor_fn};
pub use walker::{TreeWalker, walk};
