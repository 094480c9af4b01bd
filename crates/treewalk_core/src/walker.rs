//! Asynchronous tree walker.
//!
//! Every reachable element and primitive leaf is passed to a [`Visitor`]
//! exactly once, parents before their children. The walker renders
//! components on the way down: function components and forwarding elements
//! are called, class-like components are instantiated and run through their
//! mount lifecycle, and host elements yield their own children.
//!
//! # Ordering
//!
//! - Children produced by a single render are walked strictly in order, each
//!   one (with its whole subtree) before the next starts
//! - Sequences nested directly in the tree and portal children are walked
//!   concurrently, with no relative ordering
//!
//! # Scheduling
//!
//! The walk is driven by a loop over tasks rather than by recursion, so tree
//! depth costs heap, not stack. A task owns a stack of pending frames and
//! walks one branch depth-first. It suspends while its visitor call is in
//! flight, or while the tasks it forked for a concurrent sequence are
//! running. Visitor calls of all tasks are polled together.
//!
//! The first error anywhere ends the walk. Visitor calls still in flight at
//! that point are dropped, and their results are discarded.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tracing::{debug, trace};
use treewalk_node::classify::{self, ChildrenRef};
use treewalk_node::{ContextMap, ElementType, Node, NodeKind, RenderError};

use crate::{Instance, Scope, VisitError, VisitResult, Visitor, WalkError, WalkOptions};

/// Walks element trees with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    options: WalkOptions,
}

impl TreeWalker {
    /// Creates a new walker with the given options.
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    /// Returns the options of this walker.
    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Walks `root`, passing every visited node to `visitor`.
    ///
    /// `context` is the legacy context seen by the root.
    pub async fn walk<V>(&self, root: &Node, visitor: &V, context: ContextMap) -> Result<(), WalkError>
    where
        V: Visitor + ?Sized,
    {
        debug!(root = %NodeKind::of(root), options = ?self.options, "Starting walk");

        let result = Driver::new(visitor, &self.options)
            .run(root, Scope::new(context))
            .await;

        match &result {
            Ok(()) => debug!("Walk completed"),
            Err(e) => debug!(error = %e, "Walk failed"),
        }
        result
    }
}

/// Walks `root` with `options`, passing every visited node to `visitor`.
///
/// Shorthand for [`TreeWalker::walk`].
pub async fn walk<V>(
    root: &Node,
    visitor: &V,
    context: ContextMap,
    options: WalkOptions,
) -> Result<(), WalkError>
where
    V: Visitor + ?Sized,
{
    TreeWalker::new(options).walk(root, visitor, context).await
}

type TaskId = usize;

/// Pending work of a task, popped last-in first-out.
enum Frame<'a> {
    /// A node to classify and visit.
    Node(Cow<'a, Node>, Scope),
    /// The output of one render, walked one child at a time.
    Children(Cow<'a, Node>, Scope),
    /// An instance whose subtree has been walked.
    Unmount(Instance),
}

/// What happens once the visitor has settled.
enum Then {
    /// Primitive leaf: nothing to render.
    Nothing,
    /// Walk the element's own children.
    HostChildren,
    /// Call the function or forwarding component.
    Render,
    /// Render the instance with the given child scope.
    Mounted(Scope),
}

/// A visitor call and everything needed to continue after it.
struct Visit<'a> {
    node: Cow<'a, Node>,
    instance: Option<Instance>,
    scope: Scope,
    then: Then,
}

impl<'a> Visit<'a> {
    fn new(node: Cow<'a, Node>, scope: Scope, then: Then) -> Self {
        Self {
            node,
            instance: None,
            scope,
            then,
        }
    }

    async fn call<V>(&mut self, visitor: &V) -> Result<VisitResult, VisitError>
    where
        V: Visitor + ?Sized,
    {
        let child_context = match &self.then {
            Then::Nothing => None,
            Then::Mounted(child_scope) => Some(child_scope.context()),
            Then::HostChildren | Then::Render => Some(self.scope.context()),
        };
        visitor
            .visit(
                &self.node,
                self.instance.as_mut(),
                self.scope.context(),
                child_context,
            )
            .await
    }
}

struct Settled<'a> {
    task: TaskId,
    result: Result<VisitResult, VisitError>,
    visit: Visit<'a>,
}

enum Step<'a> {
    Next,
    Visit(Visit<'a>),
    Fork(Vec<Cow<'a, Node>>, Scope),
}

struct Task<'a> {
    stack: Vec<Frame<'a>>,
    parent: Option<TaskId>,
    /// Forked tasks not finished yet.
    pending: usize,
}

/// State of one walk.
struct Driver<'a, V: ?Sized> {
    visitor: &'a V,
    options: &'a WalkOptions,
    /// Suspended tasks. A running task is taken out of its slot.
    tasks: Vec<Option<Task<'a>>>,
    free: Vec<TaskId>,
    ready: VecDeque<TaskId>,
    visits: FuturesUnordered<BoxFuture<'a, Settled<'a>>>,
}

impl<'a, V> Driver<'a, V>
where
    V: Visitor + ?Sized,
{
    fn new(visitor: &'a V, options: &'a WalkOptions) -> Self {
        Self {
            visitor,
            options,
            tasks: Vec::new(),
            free: Vec::new(),
            ready: VecDeque::new(),
            visits: FuturesUnordered::new(),
        }
    }

    async fn run(mut self, root: &'a Node, scope: Scope) -> Result<(), WalkError> {
        self.spawn(None, Frame::Node(Cow::Borrowed(root), scope));

        loop {
            while let Some(id) = self.ready.pop_front() {
                if let Some(task) = self.take(id) {
                    self.advance(id, task)?;
                }
            }

            let Some(Settled { task: id, result, visit }) = self.visits.next().await else {
                return Ok(());
            };
            let flow = result.map_err(WalkError::Visitor)?;
            if let Some(mut task) = self.take(id) {
                self.settle(&mut task, flow, visit)?;
                self.advance(id, task)?;
            }
        }
    }

    fn spawn(&mut self, parent: Option<TaskId>, frame: Frame<'a>) {
        let task = Task {
            stack: vec![frame],
            parent,
            pending: 0,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.tasks[id] = Some(task);
                id
            }
            None => {
                self.tasks.push(Some(task));
                self.tasks.len() - 1
            }
        };
        self.ready.push_back(id);
    }

    fn take(&mut self, id: TaskId) -> Option<Task<'a>> {
        self.tasks.get_mut(id).and_then(Option::take)
    }

    fn park(&mut self, id: TaskId, task: Task<'a>) {
        if let Some(slot) = self.tasks.get_mut(id) {
            *slot = Some(task);
        }
    }

    /// Runs a task until it suspends or runs out of frames.
    fn advance(&mut self, id: TaskId, mut task: Task<'a>) -> Result<(), WalkError> {
        while let Some(frame) = task.stack.pop() {
            match frame {
                Frame::Node(node, scope) => match self.enter(&mut task, node, scope)? {
                    Step::Next => {}
                    Step::Visit(visit) => {
                        self.start_visit(id, visit);
                        self.park(id, task);
                        return Ok(());
                    }
                    Step::Fork(items, scope) => {
                        trace!(count = items.len(), "Forking concurrent siblings");
                        task.pending = items.len();
                        self.park(id, task);
                        for item in items {
                            self.spawn(Some(id), Frame::Node(item, scope.clone()));
                        }
                        return Ok(());
                    }
                },
                Frame::Children(rendered, scope) => push_children(&mut task, rendered, scope)?,
                Frame::Unmount(mut instance) => {
                    instance.unmount()?;
                }
            }
        }

        self.free.push(id);
        if let Some(parent_id) = task.parent
            && let Some(parent) = self.tasks.get_mut(parent_id).and_then(Option::as_mut)
        {
            parent.pending = parent.pending.saturating_sub(1);
            if parent.pending == 0 {
                self.ready.push_back(parent_id);
            }
        }
        Ok(())
    }

    fn start_visit(&mut self, id: TaskId, mut visit: Visit<'a>) {
        let visitor = self.visitor;
        self.visits.push(
            async move {
                let result = visit.call(visitor).await;
                Settled {
                    task: id,
                    result,
                    visit,
                }
            }
            .boxed(),
        );
    }

    /// Classifies a node and decides how to continue.
    fn enter(&self, task: &mut Task<'a>, node: Cow<'a, Node>, scope: Scope) -> Result<Step<'a>, WalkError> {
        let kind = NodeKind::of(&node);
        trace!(%kind, "Walking node");

        if !kind.is_visited() {
            let items = siblings(node);
            if items.is_empty() {
                return Ok(Step::Next);
            }
            return Ok(Step::Fork(items, scope));
        }
        if !kind.is_element() {
            return Ok(Step::Visit(Visit::new(node, scope, Then::Nothing)));
        }
        let Some(element) = node.as_element() else {
            return Ok(Step::Next);
        };

        match &element.element_type {
            ElementType::Provider(context) | ElementType::Consumer(context) => {
                let scope = match element.props.get("value") {
                    Some(value) => {
                        let scope = scope.provide(context, value.clone());
                        trace!(
                            context = context.name(),
                            depth = scope.provider_depth(),
                            "Providing context value"
                        );
                        scope
                    }
                    None => scope,
                };
                if let Some(ChildrenRef::Render(render)) = classify::children_of(&node) {
                    let rendered = render.call(scope.read(context))?;
                    let rendered = classify::unwrap(Cow::Owned(rendered))?.into_owned();
                    task.stack.push(Frame::Node(Cow::Owned(rendered), scope));
                    return Ok(Step::Next);
                }
                Ok(Step::Visit(Visit::new(node, scope, Then::HostChildren)))
            }
            ElementType::Host(_) => Ok(Step::Visit(Visit::new(node, scope, Then::HostChildren))),
            ElementType::Function(_) | ElementType::Forward(_) => {
                Ok(Step::Visit(Visit::new(node, scope, Then::Render)))
            }
            ElementType::Class(class) => {
                let mut instance = Instance::construct(
                    Arc::clone(class),
                    element.merged_props(),
                    scope.context().clone(),
                )?;
                let step = instance.mount()?;
                trace!(component = instance.name(), ?step, "Mounted instance");

                let child_scope = match instance.child_context()? {
                    Some(partial) => scope.with_child_context(partial),
                    None => scope.clone(),
                };
                Ok(Step::Visit(Visit {
                    node,
                    instance: Some(instance),
                    scope,
                    then: Then::Mounted(child_scope),
                }))
            }
        }
    }

    /// Continues a task after its visitor call settled.
    fn settle(&self, task: &mut Task<'a>, flow: VisitResult, visit: Visit<'a>) -> Result<(), WalkError> {
        let Visit {
            node,
            instance,
            scope,
            then,
        } = visit;
        let descend = flow.is_continue();
        if !descend {
            trace!("Pruned by visitor");
        }

        match then {
            Then::Nothing => {}
            Then::HostChildren => {
                if descend && let Some(children) = host_children(node) {
                    task.stack.push(Frame::Children(children, scope));
                }
            }
            Then::Render => {
                if descend {
                    let rendered = render_component(&node, &scope)?;
                    task.stack.push(Frame::Children(Cow::Owned(rendered), scope));
                }
            }
            Then::Mounted(child_scope) => {
                let Some(mut instance) = instance else {
                    return Ok(());
                };
                let rendered = if descend {
                    Some(instance.render()?)
                } else {
                    None
                };
                if self.options.component_will_unmount {
                    task.stack.push(Frame::Unmount(instance));
                }
                if let Some(rendered) = rendered {
                    task.stack.push(Frame::Children(Cow::Owned(rendered), child_scope));
                }
            }
        }
        Ok(())
    }
}

/// Members of a directly nested sequence or portal, without empties.
fn siblings(node: Cow<'_, Node>) -> Vec<Cow<'_, Node>> {
    let items: Vec<Cow<'_, Node>> = match node {
        Cow::Borrowed(Node::Sequence(items)) => items.iter().map(Cow::Borrowed).collect(),
        Cow::Borrowed(Node::Portal(portal)) => portal.children.iter().map(Cow::Borrowed).collect(),
        Cow::Owned(Node::Sequence(items)) => items.into_iter().map(Cow::Owned).collect(),
        Cow::Owned(Node::Portal(portal)) => portal.children.into_iter().map(Cow::Owned).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter(|item| NodeKind::of(item) != NodeKind::Empty)
        .collect()
}

/// Nested nodes of a host-like element. Invocable children render nothing.
fn host_children(node: Cow<'_, Node>) -> Option<Cow<'_, Node>> {
    match node {
        Cow::Borrowed(node) => classify::children_of(node)
            .and_then(|children| children.as_node())
            .map(Cow::Borrowed),
        Cow::Owned(Node::Element(element)) => element.into_children().map(Cow::Owned),
        Cow::Owned(_) => None,
    }
}

fn render_component(node: &Node, scope: &Scope) -> Result<Node, RenderError> {
    let Some(element) = node.as_element() else {
        return Ok(Node::Empty);
    };
    match &element.element_type {
        ElementType::Function(component) => component.call(&element.merged_props(), scope.context()),
        ElementType::Forward(forward) => forward.call(&element.merged_props()),
        _ => Ok(Node::Empty),
    }
}

/// Queues the output of one render so its children run in order.
fn push_children<'a>(task: &mut Task<'a>, rendered: Cow<'a, Node>, scope: Scope) -> Result<(), RenderError> {
    match classify::unwrap(rendered)? {
        Cow::Borrowed(Node::Sequence(items)) => task.stack.extend(
            items
                .iter()
                .rev()
                .map(|item| Frame::Node(Cow::Borrowed(item), scope.clone())),
        ),
        Cow::Owned(Node::Sequence(items)) => task.stack.extend(
            items
                .into_iter()
                .rev()
                .map(|item| Frame::Node(Cow::Owned(item), scope.clone())),
        ),
        child => task.stack.push(Frame::Node(child, scope)),
    }
    Ok(())
}
