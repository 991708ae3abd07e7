//! The three-phase segment contract.

use mdib_model::State;
use mdib_storage::{DescriptionModifications, MdibRegistry, StateModifications};
use thiserror::Error;

/// Failure raised by a segment's own logic.
///
/// The chain wraps it with the segment's identity before propagating, so
/// callers can tell which plugin rejected the change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SegmentError {
    message: String,
}

impl SegmentError {
    /// Creates a segment error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A pluggable stage of the description preprocessing chain.
///
/// Segments transform or validate the working batch before it is committed.
/// They may read the registry (it reflects the state the batch will be
/// applied to) but have no way to write to it; the chain is a pure staging
/// transformation.
pub trait DescriptionSegment: Send {
    /// Identity used in error reporting.
    fn name(&self) -> &str;

    /// Called once before the process phase.
    fn before_first(
        &mut self,
        _modifications: &mut DescriptionModifications,
        _registry: &MdibRegistry,
    ) -> Result<(), SegmentError> {
        Ok(())
    }

    /// Transforms or validates the whole batch. Called once per write.
    fn process(
        &mut self,
        modifications: &mut DescriptionModifications,
        registry: &MdibRegistry,
    ) -> Result<(), SegmentError>;

    /// Called once after the process phase.
    fn after_last(
        &mut self,
        _modifications: &mut DescriptionModifications,
        _registry: &MdibRegistry,
    ) -> Result<(), SegmentError> {
        Ok(())
    }
}

/// A pluggable stage of the state preprocessing chain.
///
/// Unlike description segments, the process phase runs once per state item.
pub trait StateSegment: Send {
    /// Identity used in error reporting.
    fn name(&self) -> &str;

    /// Called once before the process phase, with the whole batch.
    fn before_first(
        &mut self,
        _states: &mut StateModifications,
        _registry: &MdibRegistry,
    ) -> Result<(), SegmentError> {
        Ok(())
    }

    /// Transforms or validates one state item.
    fn process(&mut self, state: &mut State, registry: &MdibRegistry) -> Result<(), SegmentError>;

    /// Called once after the process phase, with the whole batch.
    fn after_last(
        &mut self,
        _states: &mut StateModifications,
        _registry: &MdibRegistry,
    ) -> Result<(), SegmentError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_error_displays_message() {
        let err = SegmentError::new("metric unit missing");
        assert_eq!(err.to_string(), "metric unit missing");
    }
}
