//! Entity factory: builds and replaces entities, minting versions.

use crate::error::{StorageError, StorageResult};
use crate::ledger::VersionLedger;
use mdib_model::{
    ContextState, Descriptor, Entity, EntityStates, Handle, MdibVersion, State,
};

/// Builds and replaces entities.
///
/// The factory owns the [`VersionLedger`] and is the only component
/// permitted to mint version numbers: every descriptor and state passing
/// through here gets stamped with the next version for its identity,
/// regardless of what version the caller supplied.
#[derive(Debug, Default)]
pub struct EntityFactory {
    ledger: VersionLedger,
}

impl EntityFactory {
    /// Creates a factory with an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the ledger.
    #[must_use]
    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    /// Builds a fresh entity for an insert.
    ///
    /// Decides the state arrangement from the descriptor kind: context
    /// descriptors get the multi-state arrangement, everything else expects
    /// exactly one state. A state list that does not fit the arrangement is
    /// a contract violation.
    pub fn create(
        &mut self,
        mut descriptor: Descriptor,
        states: Vec<State>,
        parent: Option<Handle>,
        at: MdibVersion,
    ) -> StorageResult<Entity> {
        let mut states = self.arrange(&descriptor, states)?;
        self.stamp(&mut descriptor, &mut states);
        Ok(Entity::new(descriptor, states, parent, at))
    }

    /// Builds the replacement entity for an update, keeping the links of
    /// `existing`.
    pub fn replace(
        &mut self,
        existing: &Entity,
        mut descriptor: Descriptor,
        states: Vec<State>,
        at: MdibVersion,
    ) -> StorageResult<Entity> {
        let mut states = self.arrange(&descriptor, states)?;
        self.stamp(&mut descriptor, &mut states);
        Ok(existing.with_descriptor_and_states(descriptor, states, at))
    }

    /// Stamps the next single-state version onto `state`.
    pub fn stamp_single_state(&mut self, state: &mut State) {
        let version = self.ledger.next_state(state.descriptor_handle());
        state.set_version(version);
    }

    /// Stamps the next multi-state version onto `state`.
    pub fn stamp_multi_state(&mut self, state: &mut ContextState) {
        state.version = self
            .ledger
            .next_multi_state(&state.descriptor_handle, &state.handle);
    }

    /// Sorts the raw state list into the arrangement the descriptor kind
    /// dictates.
    fn arrange(&self, descriptor: &Descriptor, states: Vec<State>) -> StorageResult<EntityStates> {
        if descriptor.is_context() {
            let mut multi = Vec::with_capacity(states.len());
            for state in states {
                match state.into_context() {
                    Some(context) => multi.push(context),
                    None => {
                        return Err(StorageError::state_shape_mismatch(
                            descriptor.handle().clone(),
                        ))
                    }
                }
            }
            Ok(EntityStates::Multi(multi))
        } else {
            let mut states = states.into_iter();
            match (states.next(), states.next()) {
                (Some(state), None) => Ok(EntityStates::Single(state)),
                _ => Err(StorageError::state_shape_mismatch(
                    descriptor.handle().clone(),
                )),
            }
        }
    }

    fn stamp(&mut self, descriptor: &mut Descriptor, states: &mut EntityStates) {
        let handle = descriptor.handle().clone();
        descriptor.set_version(self.ledger.next_descriptor(&handle));
        match states {
            EntityStates::Single(state) => {
                state.set_version(self.ledger.next_state(&handle));
            }
            EntityStates::Multi(states) => {
                for state in states {
                    state.version = self.ledger.next_multi_state(&handle, &state.handle);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdib_model::{
        ComponentState, ContextAssociation, ContextKind, DescriptorBody, DescriptorVersion,
        StateVersion,
    };

    fn channel() -> (Descriptor, Vec<State>) {
        (
            Descriptor::new("CHANNEL_2", DescriptorBody::Channel),
            vec![State::Channel(ComponentState::new("CHANNEL_2"))],
        )
    }

    #[test]
    fn create_stamps_initial_versions() {
        let mut factory = EntityFactory::new();
        let (descriptor, states) = channel();
        let entity = factory
            .create(descriptor, states, None, MdibVersion::new(1))
            .unwrap();
        assert_eq!(entity.descriptor().version(), DescriptorVersion::new(0));
        assert_eq!(entity.single_state().unwrap().version(), StateVersion::new(0));
    }

    #[test]
    fn replace_bumps_versions_by_one() {
        let mut factory = EntityFactory::new();
        let (descriptor, states) = channel();
        let entity = factory
            .create(descriptor, states, None, MdibVersion::new(1))
            .unwrap();

        let (descriptor, states) = channel();
        let replacement = factory
            .replace(&entity, descriptor, states, MdibVersion::new(2))
            .unwrap();
        assert_eq!(replacement.descriptor().version(), DescriptorVersion::new(1));
        assert_eq!(
            replacement.single_state().unwrap().version(),
            StateVersion::new(1)
        );
    }

    #[test]
    fn versions_continue_after_reinsert() {
        // The entity built for the reinsert is a different object; only the
        // ledger connects it to the handle's history.
        let mut factory = EntityFactory::new();
        let (descriptor, states) = channel();
        let first = factory
            .create(descriptor, states, None, MdibVersion::new(1))
            .unwrap();
        let (descriptor, states) = channel();
        let _updated = factory
            .replace(&first, descriptor, states, MdibVersion::new(2))
            .unwrap();

        let (descriptor, states) = channel();
        let reinserted = factory
            .create(descriptor, states, None, MdibVersion::new(3))
            .unwrap();
        assert_eq!(reinserted.descriptor().version(), DescriptorVersion::new(2));
    }

    #[test]
    fn context_descriptor_gets_multi_arrangement() {
        let mut factory = EntityFactory::new();
        let descriptor = Descriptor::new(
            "PATIENTCONTEXT_0",
            DescriptorBody::Context(ContextKind::Patient),
        );
        let states = vec![State::Context(ContextState::new(
            ContextKind::Patient,
            "PAT_STATE_0",
            "PATIENTCONTEXT_0",
        ))];
        let entity = factory
            .create(descriptor, states, None, MdibVersion::new(1))
            .unwrap();
        assert!(entity.states().is_multi());
        assert_eq!(entity.multi_states().len(), 1);
        assert_eq!(entity.multi_states()[0].version, StateVersion::new(0));
        assert_eq!(
            entity.multi_states()[0].association,
            ContextAssociation::Associated
        );
    }

    #[test]
    fn context_descriptor_may_start_without_states() {
        let mut factory = EntityFactory::new();
        let descriptor = Descriptor::new(
            "LOCATIONCONTEXT_0",
            DescriptorBody::Context(ContextKind::Location),
        );
        let entity = factory
            .create(descriptor, Vec::new(), None, MdibVersion::new(1))
            .unwrap();
        assert!(entity.multi_states().is_empty());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let mut factory = EntityFactory::new();

        // Two states for a single-state kind.
        let descriptor = Descriptor::new("VMD_0", DescriptorBody::Vmd);
        let states = vec![
            State::Vmd(ComponentState::new("VMD_0")),
            State::Vmd(ComponentState::new("VMD_0")),
        ];
        let err = factory
            .create(descriptor, states, None, MdibVersion::new(1))
            .unwrap_err();
        assert_eq!(err, StorageError::state_shape_mismatch("VMD_0"));

        // Non-context state for a context kind.
        let descriptor = Descriptor::new(
            "ENSEMBLECONTEXT_0",
            DescriptorBody::Context(ContextKind::Ensemble),
        );
        let states = vec![State::Vmd(ComponentState::new("ENSEMBLECONTEXT_0"))];
        let err = factory
            .create(descriptor, states, None, MdibVersion::new(1))
            .unwrap_err();
        assert_eq!(err, StorageError::state_shape_mismatch("ENSEMBLECONTEXT_0"));
    }

    #[test]
    fn multi_state_stamping_is_per_state_handle() {
        let mut factory = EntityFactory::new();
        let mut a = ContextState::new(ContextKind::Operator, "OP_STATE_A", "OPERATORCONTEXT_0");
        let mut b = ContextState::new(ContextKind::Operator, "OP_STATE_B", "OPERATORCONTEXT_0");
        factory.stamp_multi_state(&mut a);
        factory.stamp_multi_state(&mut b);
        factory.stamp_multi_state(&mut a);
        assert_eq!(a.version, StateVersion::new(1));
        assert_eq!(b.version, StateVersion::new(0));
    }
}
