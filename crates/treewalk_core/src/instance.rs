//! Per-visit instances of class-like components.

use std::fmt;

use tracing::trace;
use treewalk_node::{
    Capabilities, ClassRef, Component, ContextMap, InstanceFields, Node, Props, RenderError,
    StateMap,
};

/// Which mount-time lifecycle branch ran for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStep {
    /// `getDerivedStateFromProps` was called.
    DerivedState,
    /// `UNSAFE_componentWillMount` was called.
    UnsafeWillMount,
    /// `componentWillMount` was called.
    WillMount,
    /// The class exposes none of the mount hooks.
    Skipped,
}

/// A class-like component instantiated for one visit.
///
/// The visitor receives the instance before it renders, and can downcast it
/// to the concrete component type with [`Instance::downcast_ref`].
pub struct Instance {
    class: ClassRef,
    component: Box<dyn Component>,
    fields: InstanceFields,
}

impl Instance {
    /// Constructs an instance from merged props and the current context.
    ///
    /// The state starts as whatever the constructor assigned, or "no state".
    pub fn construct(class: ClassRef, props: Props, context: ContextMap) -> Result<Self, RenderError> {
        if !class.capabilities().is_class_like() {
            return Err(RenderError::not_callable(class.name()));
        }
        let component = class.construct(&props, &context)?;
        let state = component.initial_state();
        Ok(Self {
            class,
            component,
            fields: InstanceFields::new(props, context, state),
        })
    }

    /// Returns the class name.
    pub fn name(&self) -> &str {
        self.class.name()
    }

    /// Returns the capabilities of the class.
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.class.capabilities()
    }

    pub fn props(&self) -> &Props {
        self.fields.props()
    }

    pub fn context(&self) -> &ContextMap {
        self.fields.context()
    }

    pub fn state(&self) -> Option<&StateMap> {
        self.fields.state()
    }

    /// Returns the props, context and state together.
    pub fn fields(&self) -> &InstanceFields {
        &self.fields
    }

    /// Returns the component object.
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// Returns the component as `T` if it is of that type.
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.component().downcast_ref::<T>()
    }

    /// Merges `partial` into the state.
    pub fn set_state(&mut self, partial: StateMap) {
        self.fields.set_state(partial);
    }

    /// Merges the result of `updater(state, props, context)` into the state.
    pub fn set_state_with<F>(&mut self, updater: F)
    where
        F: FnOnce(Option<&StateMap>, &Props, &ContextMap) -> StateMap,
    {
        self.fields.set_state_with(updater);
    }

    /// Runs the first available mount-time lifecycle branch.
    pub fn mount(&mut self) -> Result<MountStep, RenderError> {
        let capabilities = self.capabilities();

        if capabilities.contains(Capabilities::DERIVED_STATE_FROM_PROPS) {
            trace!(component = self.name(), "deriving state from props");
            let derived = self
                .class
                .derive_state_from_props(self.fields.props(), self.fields.state())?;
            if let Some(partial) = derived {
                self.fields.set_state(partial);
            }
            return Ok(MountStep::DerivedState);
        }

        if capabilities.contains(Capabilities::UNSAFE_WILL_MOUNT) {
            trace!(component = self.name(), "UNSAFE_componentWillMount");
            self.component.unsafe_component_will_mount(&mut self.fields)?;
            return Ok(MountStep::UnsafeWillMount);
        }

        if capabilities.contains(Capabilities::WILL_MOUNT) {
            trace!(component = self.name(), "componentWillMount");
            self.component.component_will_mount(&mut self.fields)?;
            return Ok(MountStep::WillMount);
        }

        Ok(MountStep::Skipped)
    }

    /// Returns the child context, or `None` if the class provides none.
    pub fn child_context(&self) -> Result<Option<ContextMap>, RenderError> {
        if !self.capabilities().contains(Capabilities::CHILD_CONTEXT) {
            return Ok(None);
        }
        self.component.child_context(&self.fields).map(Some)
    }

    /// Renders from the current props and state.
    pub fn render(&self) -> Result<Node, RenderError> {
        self.component.render(&self.fields)
    }

    /// Runs `componentWillUnmount` if the class exposes it.
    ///
    /// Returns whether the hook ran.
    pub fn unmount(&mut self) -> Result<bool, RenderError> {
        if !self.capabilities().contains(Capabilities::WILL_UNMOUNT) {
            return Ok(false);
        }
        trace!(component = self.name(), "componentWillUnmount");
        self.component.component_will_unmount(&mut self.fields)?;
        Ok(true)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name())
            .field("capabilities", &self.capabilities())
            .field("fields", &self.fields)
            .finish()
    }
}
