//! Kind consistency checking for state batches.

use crate::segment::{SegmentError, StateSegment};
use mdib_model::State;
use mdib_storage::MdibRegistry;

/// Rejects a state whose kind does not match the stored descriptor's kind.
///
/// States for handles the registry does not know pass through untouched;
/// the storage layer materializes placeholders for them.
#[derive(Debug, Default)]
pub struct KindConsistencyChecker;

impl KindConsistencyChecker {
    /// Creates the segment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StateSegment for KindConsistencyChecker {
    fn name(&self) -> &str {
        "kind consistency checker"
    }

    fn process(&mut self, state: &mut State, registry: &MdibRegistry) -> Result<(), SegmentError> {
        let handle = state.descriptor_handle();
        if let Some(descriptor) = registry.descriptor(handle.as_str()) {
            if !state.matches_descriptor(&descriptor) {
                return Err(SegmentError::new(format!(
                    "state kind {:?} does not match descriptor {handle} of kind {:?}",
                    state.kind(),
                    descriptor.kind()
                )));
            }
        }
        Ok(())
    }
}
