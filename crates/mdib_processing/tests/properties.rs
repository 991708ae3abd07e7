//! Property-based tests over registry versioning and context association
//! handling.

use mdib_model::{
    ComponentState, ContextAssociation, ContextKind, ContextState, Descriptor, DescriptorBody,
    DescriptorVersion, MdibVersion, State, StateVersion,
};
use mdib_storage::{DescriptionModifications, MdibRegistry, StateModifications};
use mdib_testkit::{actions_strategy, association_strategy, handle_strategy, HandleAction};
use proptest::prelude::*;
use std::collections::HashSet;

fn registry_with_root() -> MdibRegistry {
    let mut registry = MdibRegistry::new();
    registry
        .apply_description(
            MdibVersion::new(1),
            Some(1),
            Some(1),
            DescriptionModifications::new().insert(
                Descriptor::new("MDS_0", DescriptorBody::Mds),
                vec![State::Mds(ComponentState::new("MDS_0"))],
            ),
        )
        .unwrap();
    registry
}

fn vmd() -> (Descriptor, Vec<State>) {
    (
        Descriptor::new("VMD_0", DescriptorBody::Vmd),
        vec![State::Vmd(ComponentState::new("VMD_0"))],
    )
}

proptest! {
    /// Whatever the life cycle, descriptor versions assigned to one handle
    /// increase by exactly one per insert or update, across deletes and
    /// reinserts.
    #[test]
    fn descriptor_versions_increase_by_one_per_touch(actions in actions_strategy(16)) {
        let mut registry = registry_with_root();
        let mut present = false;
        let mut expected = 0u64;
        let mut transaction = 1u64;

        for action in actions {
            transaction += 1;
            let version = MdibVersion::new(transaction);
            match action {
                HandleAction::Insert if !present => {
                    let (descriptor, states) = vmd();
                    let result = registry
                        .apply_description(
                            version,
                            Some(transaction),
                            Some(transaction),
                            DescriptionModifications::new()
                                .insert_under(descriptor, states, "MDS_0"),
                        )
                        .unwrap();
                    prop_assert_eq!(
                        result.inserted[0].descriptor().version(),
                        DescriptorVersion::new(expected)
                    );
                    expected += 1;
                    present = true;
                }
                HandleAction::Update if present => {
                    let (descriptor, states) = vmd();
                    let result = registry
                        .apply_description(
                            version,
                            Some(transaction),
                            Some(transaction),
                            DescriptionModifications::new().update(descriptor, states),
                        )
                        .unwrap();
                    prop_assert_eq!(
                        result.updated[0].descriptor().version(),
                        DescriptorVersion::new(expected)
                    );
                    expected += 1;
                }
                HandleAction::Delete if present => {
                    registry
                        .apply_description(
                            version,
                            Some(transaction),
                            Some(transaction),
                            DescriptionModifications::new().delete("VMD_0"),
                        )
                        .unwrap();
                    present = false;
                }
                // Inserting a present handle or touching an absent one is
                // not part of this life cycle.
                _ => {}
            }
        }
    }

    /// N state writes after the initial insert leave the stored state at
    /// version N: the insert stamps 0 and every write advances by one.
    #[test]
    fn state_versions_count_the_writes(writes in 1usize..12) {
        let mut registry = registry_with_root();
        let (descriptor, states) = vmd();
        registry
            .apply_description(
                MdibVersion::new(2),
                Some(2),
                Some(2),
                DescriptionModifications::new().insert_under(descriptor, states, "MDS_0"),
            )
            .unwrap();

        for write in 0..writes {
            let version = MdibVersion::new(3 + write as u64);
            registry
                .apply_states(
                    version,
                    Some(version.as_u64()),
                    StateModifications::new().add(State::Vmd(ComponentState::new("VMD_0"))),
                )
                .unwrap();
        }

        let stored = registry.state("VMD_0").unwrap();
        prop_assert_eq!(stored.version(), StateVersion::new(writes as u64));
    }

    /// A context state lands in storage exactly when its association is not
    /// the not-associated tag.
    #[test]
    fn context_state_stored_iff_associated(association in association_strategy()) {
        let mut registry = registry_with_root();
        registry
            .apply_description(
                MdibVersion::new(2),
                Some(2),
                Some(2),
                DescriptionModifications::new().insert_under(
                    Descriptor::new("PATIENTCONTEXT_0", DescriptorBody::Context(ContextKind::Patient)),
                    vec![],
                    "MDS_0",
                ),
            )
            .unwrap();

        let state = ContextState::new(ContextKind::Patient, "PAT_A", "PATIENTCONTEXT_0")
            .with_association(association);
        registry
            .apply_states(
                MdibVersion::new(3),
                Some(3),
                StateModifications::new().add(State::Context(state)),
            )
            .unwrap();

        let stored = registry.multi_states("PATIENTCONTEXT_0");
        if association == ContextAssociation::No {
            prop_assert!(stored.is_empty());
            prop_assert!(registry.state("PAT_A").is_none());
        } else {
            prop_assert_eq!(stored.len(), 1);
            prop_assert_eq!(stored[0].association, association);
            prop_assert!(registry.state("PAT_A").is_some());
        }
    }

    /// Root inserts for distinct handles all land, and each is retrievable.
    #[test]
    fn distinct_root_inserts_all_land(handles in prop::collection::hash_set(handle_strategy(), 1..20)) {
        let mut mods = DescriptionModifications::new();
        for handle in &handles {
            mods = mods.insert(
                Descriptor::new(handle.as_str(), DescriptorBody::Mds),
                vec![State::Mds(ComponentState::new(handle.as_str()))],
            );
        }

        let mut registry = MdibRegistry::new();
        registry
            .apply_description(MdibVersion::new(1), Some(1), Some(1), mods)
            .unwrap();

        prop_assert_eq!(registry.entity_count(), handles.len());
        prop_assert_eq!(registry.root_entities().len(), handles.len());
        let roots: HashSet<_> = registry
            .root_entities()
            .iter()
            .map(|entity| entity.handle().clone())
            .collect();
        prop_assert_eq!(roots, handles);
    }
}
