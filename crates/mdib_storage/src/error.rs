//! Error types for MDIB storage.

use mdib_model::Handle;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while applying modifications to the registry.
///
/// Tolerated conditions (update/delete of a missing handle) are logged and
/// skipped, not raised; only contract violations surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// An insert named a parent handle that exists neither in the registry
    /// nor earlier in the batch. The batch is rejected before any mutation.
    #[error("insert of {handle} names unknown parent {parent}")]
    ParentNotFound {
        /// Handle of the entity being inserted.
        handle: Handle,
        /// The missing parent handle.
        parent: Handle,
    },

    /// A state write does not fit the shape of the targeted entity, e.g. a
    /// non-context state aimed at a multi-state entity.
    #[error("state for {handle} does not match the entity's state arrangement")]
    StateShapeMismatch {
        /// Handle of the targeted descriptor.
        handle: Handle,
    },
}

impl StorageError {
    /// Creates a parent-not-found error.
    pub fn parent_not_found(handle: impl Into<Handle>, parent: impl Into<Handle>) -> Self {
        Self::ParentNotFound {
            handle: handle.into(),
            parent: parent.into(),
        }
    }

    /// Creates a state-shape-mismatch error.
    pub fn state_shape_mismatch(handle: impl Into<Handle>) -> Self {
        Self::StateShapeMismatch {
            handle: handle.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_handles() {
        let e = StorageError::parent_not_found("VMD_9", "MDS_9");
        assert_eq!(e.to_string(), "insert of VMD_9 names unknown parent MDS_9");

        let e = StorageError::state_shape_mismatch("PATIENTCONTEXT_0");
        assert!(e.to_string().contains("PATIENTCONTEXT_0"));
    }
}
