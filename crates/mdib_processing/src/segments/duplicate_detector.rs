//! Duplicate handle detection for description batches.

use crate::segment::{DescriptionSegment, SegmentError};
use mdib_model::Handle;
use mdib_storage::{DescriptionModification, DescriptionModifications, MdibRegistry};
use std::collections::HashSet;

/// Rejects description batches that would violate handle uniqueness.
///
/// Two conditions fail the batch: an insert for a handle the registry
/// already stores, and two inserts of the same handle within one batch.
/// A delete earlier in the batch frees the handle for a later insert.
#[derive(Debug, Default)]
pub struct DuplicateDetector;

impl DuplicateDetector {
    /// Creates the segment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DescriptionSegment for DuplicateDetector {
    fn name(&self) -> &str {
        "duplicate detector"
    }

    fn process(
        &mut self,
        modifications: &mut DescriptionModifications,
        registry: &MdibRegistry,
    ) -> Result<(), SegmentError> {
        let mut inserted: HashSet<&Handle> = HashSet::new();
        let mut deleted: HashSet<&Handle> = HashSet::new();

        for modification in modifications.items() {
            match modification {
                DescriptionModification::Insert { descriptor, .. } => {
                    let handle = descriptor.handle();
                    if !inserted.insert(handle) {
                        return Err(SegmentError::new(format!(
                            "handle {handle} inserted twice in one batch"
                        )));
                    }
                    if registry.entity(handle.as_str()).is_some() && !deleted.contains(handle) {
                        return Err(SegmentError::new(format!(
                            "handle {handle} already exists in the registry"
                        )));
                    }
                }
                DescriptionModification::Delete { handle } => {
                    deleted.insert(handle);
                }
                DescriptionModification::Update { .. } => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdib_model::{ComponentState, Descriptor, DescriptorBody, MdibVersion, State};

    fn mds(handle: &str) -> (Descriptor, Vec<State>) {
        (
            Descriptor::new(handle, DescriptorBody::Mds),
            vec![State::Mds(ComponentState::new(handle))],
        )
    }

    #[test]
    fn accepts_fresh_handles() {
        let registry = MdibRegistry::new();
        let (d0, s0) = mds("MDS_0");
        let (d1, s1) = mds("MDS_1");
        let mut mods = DescriptionModifications::new().insert(d0, s0).insert(d1, s1);

        assert!(DuplicateDetector::new()
            .process(&mut mods, &registry)
            .is_ok());
    }

    #[test]
    fn rejects_duplicate_within_batch() {
        let registry = MdibRegistry::new();
        let (d0, s0) = mds("MDS_0");
        let (d1, s1) = mds("MDS_0");
        let mut mods = DescriptionModifications::new().insert(d0, s0).insert(d1, s1);

        let err = DuplicateDetector::new()
            .process(&mut mods, &registry)
            .unwrap_err();
        assert!(err.to_string().contains("MDS_0"));
    }

    #[test]
    fn rejects_insert_of_stored_handle() {
        let mut registry = MdibRegistry::new();
        let (d0, s0) = mds("MDS_0");
        registry
            .apply_description(
                MdibVersion::new(1),
                Some(1),
                Some(1),
                DescriptionModifications::new().insert(d0, s0),
            )
            .unwrap();

        let (again, states) = mds("MDS_0");
        let mut mods = DescriptionModifications::new().insert(again, states);
        assert!(DuplicateDetector::new()
            .process(&mut mods, &registry)
            .is_err());
    }

    #[test]
    fn delete_then_reinsert_in_one_batch_is_allowed() {
        let mut registry = MdibRegistry::new();
        let (d0, s0) = mds("MDS_0");
        registry
            .apply_description(
                MdibVersion::new(1),
                Some(1),
                Some(1),
                DescriptionModifications::new().insert(d0, s0),
            )
            .unwrap();

        let (again, states) = mds("MDS_0");
        let mut mods = DescriptionModifications::new()
            .delete("MDS_0")
            .insert(again, states);
        assert!(DuplicateDetector::new()
            .process(&mut mods, &registry)
            .is_ok());
    }
}
