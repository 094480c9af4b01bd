//! Component capability traits.
//!
//! Function components and forwarding elements are plain render functions.
//! Class-like components are split in two: a [`ComponentClass`] plays the
//! role of the constructor (static capabilities, default props, derived
//! state) and produces a [`Component`] instance object for every visit.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use serde_json::{Map, Value};

use crate::{Element, ElementType, Node, PropMap, Props, RenderError};

/// Legacy contextual environment passed down the tree.
pub type ContextMap = Map<String, Value>;

/// Component state mapping.
pub type StateMap = Map<String, Value>;

/// Instance state. `None` is the explicit "no state" marker.
pub type State = Option<StateMap>;

bitflags! {
    /// Optional capabilities exposed by a class-like component.
    ///
    /// The walker only invokes a hook whose capability is present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        /// Instances expose a render operation.
        const RENDER = 1 << 0;
        /// The class carries the component marker.
        const COMPONENT_MARKER = 1 << 1;
        /// Static `getDerivedStateFromProps`.
        const DERIVED_STATE_FROM_PROPS = 1 << 2;
        /// `UNSAFE_componentWillMount`.
        const UNSAFE_WILL_MOUNT = 1 << 3;
        /// `componentWillMount`.
        const WILL_MOUNT = 1 << 4;
        /// `getChildContext`.
        const CHILD_CONTEXT = 1 << 5;
        /// `componentWillUnmount`.
        const WILL_UNMOUNT = 1 << 6;
    }
}

impl Capabilities {
    /// Returns true if instances of the class can be constructed and rendered.
    #[inline]
    pub const fn is_class_like(&self) -> bool {
        self.intersects(Capabilities::RENDER.union(Capabilities::COMPONENT_MARKER))
    }
}

type FunctionRender = dyn Fn(&Props, &ContextMap) -> Result<Node, RenderError> + Send + Sync;
type ForwardRender = dyn Fn(&Props) -> Result<Node, RenderError> + Send + Sync;

/// A function component: rendering invokes it with `(props, context)`.
#[derive(Clone)]
pub struct FunctionComponent {
    name: Arc<str>,
    render: Arc<FunctionRender>,
    default_props: Option<Arc<PropMap>>,
}

impl FunctionComponent {
    /// Creates a function component.
    pub fn new<F>(name: impl Into<Arc<str>>, render: F) -> Self
    where
        F: Fn(&Props, &ContextMap) -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            render: Arc::new(render),
            default_props: None,
        }
    }

    /// Sets the default props merged beneath element props.
    pub fn with_default_props(mut self, defaults: PropMap) -> Self {
        self.default_props = Some(Arc::new(defaults));
        self
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default props.
    pub fn default_props(&self) -> Option<&PropMap> {
        self.default_props.as_deref()
    }

    /// Renders the component.
    pub fn call(&self, props: &Props, context: &ContextMap) -> Result<Node, RenderError> {
        (self.render)(props, context)
    }

    /// Creates an element of this component with empty props.
    pub fn element(&self) -> Element {
        Element::new(ElementType::Function(self.clone()))
    }
}

impl fmt::Debug for FunctionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FunctionComponent").field(&self.name).finish()
    }
}

/// A forwarding element type: rendering calls the nested render function
/// with props only, without instantiation.
#[derive(Clone)]
pub struct ForwardRef {
    name: Arc<str>,
    render: Arc<ForwardRender>,
    default_props: Option<Arc<PropMap>>,
}

impl ForwardRef {
    /// Creates a forwarding element type.
    pub fn new<F>(name: impl Into<Arc<str>>, render: F) -> Self
    where
        F: Fn(&Props) -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            render: Arc::new(render),
            default_props: None,
        }
    }

    /// Sets the default props merged beneath element props.
    pub fn with_default_props(mut self, defaults: PropMap) -> Self {
        self.default_props = Some(Arc::new(defaults));
        self
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default props.
    pub fn default_props(&self) -> Option<&PropMap> {
        self.default_props.as_deref()
    }

    /// Invokes the nested render function.
    pub fn call(&self, props: &Props) -> Result<Node, RenderError> {
        (self.render)(props)
    }

    /// Creates an element of this type with empty props.
    pub fn element(&self) -> Element {
        Element::new(ElementType::Forward(self.clone()))
    }
}

impl fmt::Debug for ForwardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ForwardRef").field(&self.name).finish()
    }
}

/// The constructor side of a class-like component.
///
/// # Example
///
/// ```rust
/// use treewalk_node::{
///     Capabilities, Component, ComponentClass, ContextMap, InstanceFields, Node, Props,
///     RenderError,
/// };
///
/// struct Greeting;
///
/// impl Component for Greeting {
///     fn render(&self, this: &InstanceFields) -> Result<Node, RenderError> {
///         let name = this.props().get("name").and_then(|v| v.as_str()).unwrap_or("world");
///         Ok(Node::from(format!("hello {name}")))
///     }
/// }
///
/// struct GreetingClass;
///
/// impl ComponentClass for GreetingClass {
///     fn name(&self) -> &str {
///         "Greeting"
///     }
///
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::RENDER
///     }
///
///     fn construct(
///         &self,
///         _props: &Props,
///         _context: &ContextMap,
///     ) -> Result<Box<dyn Component>, RenderError> {
///         Ok(Box::new(Greeting))
///     }
/// }
/// ```
pub trait ComponentClass: Send + Sync {
    /// Returns the display name.
    fn name(&self) -> &str;

    /// Returns the capabilities of this class and its instances.
    fn capabilities(&self) -> Capabilities;

    /// Returns the default props merged beneath element props.
    fn default_props(&self) -> Option<PropMap> {
        None
    }

    /// Static `getDerivedStateFromProps`.
    ///
    /// Only called when [`Capabilities::DERIVED_STATE_FROM_PROPS`] is present.
    /// A returned mapping is merged into the instance state.
    fn derive_state_from_props(
        &self,
        _props: &Props,
        _state: Option<&StateMap>,
    ) -> Result<Option<StateMap>, RenderError> {
        Ok(None)
    }

    /// Instantiates the component for one visit.
    fn construct(
        &self,
        props: &Props,
        context: &ContextMap,
    ) -> Result<Box<dyn Component>, RenderError>;
}

/// Shared handle to a component class.
pub type ClassRef = Arc<dyn ComponentClass>;

/// The instance side of a class-like component.
///
/// Hooks receive the instance fields separately from `self`, which keeps
/// `set_state` usable from inside any hook.
pub trait Component: Any + Send + Sync {
    /// Initial state assigned by the constructor. Defaults to "no state".
    fn initial_state(&self) -> State {
        None
    }

    /// Renders the instance from its current props and state.
    fn render(&self, this: &InstanceFields) -> Result<Node, RenderError>;

    /// `UNSAFE_componentWillMount`.
    fn unsafe_component_will_mount(&mut self, _this: &mut InstanceFields) -> Result<(), RenderError> {
        Ok(())
    }

    /// `componentWillMount`.
    fn component_will_mount(&mut self, _this: &mut InstanceFields) -> Result<(), RenderError> {
        Ok(())
    }

    /// `getChildContext`: a partial mapping merged over the parent context.
    fn child_context(&self, _this: &InstanceFields) -> Result<ContextMap, RenderError> {
        Ok(ContextMap::new())
    }

    /// `componentWillUnmount`.
    fn component_will_unmount(&mut self, _this: &mut InstanceFields) -> Result<(), RenderError> {
        Ok(())
    }
}

impl dyn Component {
    /// Returns the instance as `T` if it is of that type.
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// The `props`, `context` and `state` fields of a component instance.
#[derive(Debug, Clone)]
pub struct InstanceFields {
    props: Props,
    context: ContextMap,
    state: State,
}

impl InstanceFields {
    /// Creates instance fields.
    pub fn new(props: Props, context: ContextMap, state: State) -> Self {
        Self {
            props,
            context,
            state,
        }
    }

    /// Returns the merged props.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Returns the context inherited from the parent.
    pub fn context(&self) -> &ContextMap {
        &self.context
    }

    /// Returns the current state, or `None` for "no state".
    pub fn state(&self) -> Option<&StateMap> {
        self.state.as_ref()
    }

    /// Synchronously merges `partial` into the state.
    pub fn set_state(&mut self, partial: StateMap) {
        let state = self.state.get_or_insert_with(StateMap::new);
        for (key, value) in partial {
            state.insert(key, value);
        }
    }

    /// Synchronously merges the result of `updater(state, props, context)`
    /// into the state.
    pub fn set_state_with<F>(&mut self, updater: F)
    where
        F: FnOnce(Option<&StateMap>, &Props, &ContextMap) -> StateMap,
    {
        let partial = updater(self.state.as_ref(), &self.props, &self.context);
        self.set_state(partial);
    }
}
