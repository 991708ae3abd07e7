//! Modification batches handed to the registry's write operations.

use mdib_model::{Descriptor, Handle, State};
use serde::{Deserialize, Serialize};

/// One structural change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DescriptionModification {
    /// Adds a new entity, optionally under a parent.
    Insert {
        /// Descriptor of the new entity.
        descriptor: Descriptor,
        /// Initial states; one for single-state kinds, any number for
        /// context kinds.
        states: Vec<State>,
        /// Parent handle, or `None` for a root entity.
        parent: Option<Handle>,
    },
    /// Replaces descriptor and states of an existing entity.
    Update {
        /// Replacement descriptor.
        descriptor: Descriptor,
        /// Replacement states.
        states: Vec<State>,
    },
    /// Removes an entity.
    Delete {
        /// Handle of the entity to remove.
        handle: Handle,
    },
}

impl DescriptionModification {
    /// The handle this modification targets.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        match self {
            Self::Insert { descriptor, .. } | Self::Update { descriptor, .. } => {
                descriptor.handle()
            }
            Self::Delete { handle } => handle,
        }
    }
}

/// An ordered batch of structural changes.
///
/// Built fluently and applied in submission order:
///
/// ```
/// use mdib_model::{ComponentState, Descriptor, DescriptorBody, State};
/// use mdib_storage::DescriptionModifications;
///
/// let mods = DescriptionModifications::new()
///     .insert(
///         Descriptor::new("MDS_0", DescriptorBody::Mds),
///         vec![State::Mds(ComponentState::new("MDS_0"))],
///     )
///     .insert_under(
///         Descriptor::new("VMD_0", DescriptorBody::Vmd),
///         vec![State::Vmd(ComponentState::new("VMD_0"))],
///         "MDS_0",
///     );
/// assert_eq!(mods.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionModifications {
    items: Vec<DescriptionModification>,
}

impl DescriptionModifications {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root insert.
    #[must_use]
    pub fn insert(mut self, descriptor: Descriptor, states: Vec<State>) -> Self {
        self.items.push(DescriptionModification::Insert {
            descriptor,
            states,
            parent: None,
        });
        self
    }

    /// Adds an insert under `parent`.
    #[must_use]
    pub fn insert_under(
        mut self,
        descriptor: Descriptor,
        states: Vec<State>,
        parent: impl Into<Handle>,
    ) -> Self {
        self.items.push(DescriptionModification::Insert {
            descriptor,
            states,
            parent: Some(parent.into()),
        });
        self
    }

    /// Adds an update.
    #[must_use]
    pub fn update(mut self, descriptor: Descriptor, states: Vec<State>) -> Self {
        self.items
            .push(DescriptionModification::Update { descriptor, states });
        self
    }

    /// Adds a delete.
    #[must_use]
    pub fn delete(mut self, handle: impl Into<Handle>) -> Self {
        self.items.push(DescriptionModification::Delete {
            handle: handle.into(),
        });
        self
    }

    /// Appends a prebuilt modification.
    pub fn push(&mut self, modification: DescriptionModification) {
        self.items.push(modification);
    }

    /// The modifications in submission order.
    #[must_use]
    pub fn items(&self) -> &[DescriptionModification] {
        &self.items
    }

    /// Mutable access for preprocessing segments.
    pub fn items_mut(&mut self) -> &mut Vec<DescriptionModification> {
        &mut self.items
    }

    /// Number of modifications in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the modifications in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, DescriptionModification> {
        self.items.iter()
    }
}

impl IntoIterator for DescriptionModifications {
    type Item = DescriptionModification;
    type IntoIter = std::vec::IntoIter<DescriptionModification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DescriptionModifications {
    type Item = &'a DescriptionModification;
    type IntoIter = std::slice::Iter<'a, DescriptionModification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// An ordered batch of state value changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateModifications {
    states: Vec<State>,
}

impl StateModifications {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state value.
    #[must_use]
    pub fn add(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// The states in submission order.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Mutable access for preprocessing segments.
    pub fn states_mut(&mut self) -> &mut Vec<State> {
        &mut self.states
    }

    /// Number of states in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl IntoIterator for StateModifications {
    type Item = State;
    type IntoIter = std::vec::IntoIter<State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}

impl FromIterator<State> for StateModifications {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdib_model::{ComponentState, DescriptorBody};

    #[test]
    fn batch_keeps_submission_order() {
        let mods = DescriptionModifications::new()
            .insert(
                Descriptor::new("MDS_0", DescriptorBody::Mds),
                vec![State::Mds(ComponentState::new("MDS_0"))],
            )
            .update(
                Descriptor::new("MDS_0", DescriptorBody::Mds),
                vec![State::Mds(ComponentState::new("MDS_0"))],
            )
            .delete("MDS_0");

        let handles: Vec<_> = mods.iter().map(|m| m.handle().clone()).collect();
        assert_eq!(handles, ["MDS_0", "MDS_0", "MDS_0"].map(Handle::from));
        assert!(matches!(
            mods.items()[2],
            DescriptionModification::Delete { .. }
        ));
    }

    #[test]
    fn insert_under_records_parent() {
        let mods = DescriptionModifications::new().insert_under(
            Descriptor::new("VMD_0", DescriptorBody::Vmd),
            vec![State::Vmd(ComponentState::new("VMD_0"))],
            "MDS_0",
        );
        match &mods.items()[0] {
            DescriptionModification::Insert { parent, .. } => {
                assert_eq!(parent.as_ref().map(Handle::as_str), Some("MDS_0"));
            }
            other => panic!("expected insert, got {other:?}"),
        }
    }
}
