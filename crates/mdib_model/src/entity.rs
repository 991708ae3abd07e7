//! Entity: the registry's unit of storage.

use crate::descriptor::Descriptor;
use crate::handle::Handle;
use crate::state::{ContextState, State};
use crate::version::MdibVersion;
use serde::{Deserialize, Serialize};

/// The state arrangement of an entity.
///
/// Single-state entities carry exactly one state identified by the
/// descriptor handle; multi-state entities carry zero or more context
/// states, each with its own handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityStates {
    /// Exactly one state.
    Single(State),
    /// Zero or more context states.
    Multi(Vec<ContextState>),
}

impl EntityStates {
    /// Whether this is the multi-state arrangement.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// The sole state, for single-state entities.
    #[must_use]
    pub fn single(&self) -> Option<&State> {
        match self {
            Self::Single(state) => Some(state),
            Self::Multi(_) => None,
        }
    }

    /// The multi-states; empty for single-state entities.
    #[must_use]
    pub fn multi(&self) -> &[ContextState] {
        match self {
            Self::Single(_) => &[],
            Self::Multi(states) => states,
        }
    }
}

/// A tree node pairing one descriptor with its state(s) and structural
/// links.
///
/// Parent and child handles are lookup keys, not ownership: the registry
/// resolves them against its handle index. Entities are replaced as a whole
/// on every change (copy-on-write); the `with_*` methods produce the
/// replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    handle: Handle,
    descriptor: Descriptor,
    states: EntityStates,
    parent: Option<Handle>,
    children: Vec<Handle>,
    last_changed: MdibVersion,
}

impl Entity {
    /// Creates an entity with no children.
    pub fn new(
        descriptor: Descriptor,
        states: EntityStates,
        parent: Option<Handle>,
        last_changed: MdibVersion,
    ) -> Self {
        Self {
            handle: descriptor.handle().clone(),
            descriptor,
            states,
            parent,
            children: Vec::new(),
            last_changed,
        }
    }

    /// The descriptor handle, which is also the entity's identity.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The owned descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The state arrangement.
    #[must_use]
    pub fn states(&self) -> &EntityStates {
        &self.states
    }

    /// The parent handle, if the entity is not a root.
    #[must_use]
    pub fn parent(&self) -> Option<&Handle> {
        self.parent.as_ref()
    }

    /// Ordered child handles.
    #[must_use]
    pub fn children(&self) -> &[Handle] {
        &self.children
    }

    /// The transaction at which this entity was last touched.
    #[must_use]
    pub fn last_changed(&self) -> MdibVersion {
        self.last_changed
    }

    /// The sole state, for single-state entities.
    #[must_use]
    pub fn single_state(&self) -> Option<&State> {
        self.states.single()
    }

    /// The multi-states; empty for single-state entities.
    #[must_use]
    pub fn multi_states(&self) -> &[ContextState] {
        self.states.multi()
    }

    /// Replacement with a new descriptor and states, keeping the links.
    #[must_use]
    pub fn with_descriptor_and_states(
        &self,
        descriptor: Descriptor,
        states: EntityStates,
        last_changed: MdibVersion,
    ) -> Self {
        Self {
            handle: self.handle.clone(),
            descriptor,
            states,
            parent: self.parent.clone(),
            children: self.children.clone(),
            last_changed,
        }
    }

    /// Replacement with new states only.
    #[must_use]
    pub fn with_states(&self, states: EntityStates, last_changed: MdibVersion) -> Self {
        Self {
            handle: self.handle.clone(),
            descriptor: self.descriptor.clone(),
            states,
            parent: self.parent.clone(),
            children: self.children.clone(),
            last_changed,
        }
    }

    /// Replacement with `child` appended to the child list.
    #[must_use]
    pub fn with_child_appended(&self, child: Handle) -> Self {
        let mut replacement = self.clone();
        replacement.children.push(child);
        replacement
    }

    /// Replacement with `child` removed from the child list.
    #[must_use]
    pub fn with_child_removed(&self, child: &Handle) -> Self {
        let mut replacement = self.clone();
        replacement.children.retain(|handle| handle != child);
        replacement
    }
}
