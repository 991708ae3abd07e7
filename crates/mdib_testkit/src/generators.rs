//! Property-based test generators.

use mdib_model::{ContextAssociation, Handle};
use proptest::prelude::*;

/// Strategy producing plausible device-model handles.
pub fn handle_strategy() -> impl Strategy<Value = Handle> {
    "[A-Z]{2,10}_[0-9]{1,3}".prop_map(Handle::new)
}

/// Strategy producing any context association tag.
pub fn association_strategy() -> impl Strategy<Value = ContextAssociation> {
    prop_oneof![
        Just(ContextAssociation::Associated),
        Just(ContextAssociation::PreAssociated),
        Just(ContextAssociation::Disassociated),
        Just(ContextAssociation::No),
    ]
}

/// One step of a single-handle life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleAction {
    /// Insert the handle (skipped when it is present).
    Insert,
    /// Update the handle (skipped when it is absent).
    Update,
    /// Delete the handle (skipped when it is absent).
    Delete,
}

/// Strategy producing a life cycle of up to `max_len` actions.
///
/// Drives the version monotonicity property: whatever the sequence,
/// descriptor versions assigned to the handle must increase by exactly one
/// per touch, across deletes and reinserts.
pub fn actions_strategy(max_len: usize) -> impl Strategy<Value = Vec<HandleAction>> {
    prop::collection::vec(
        prop_oneof![
            Just(HandleAction::Insert),
            Just(HandleAction::Update),
            Just(HandleAction::Delete),
        ],
        1..=max_len,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn handles_are_non_empty(handle in handle_strategy()) {
            prop_assert!(!handle.as_str().is_empty());
        }

        #[test]
        fn actions_respect_length_bound(actions in actions_strategy(12)) {
            prop_assert!((1..=12).contains(&actions.len()));
        }
    }
}
