//! Immutable snapshots of committed writes.

use mdib_model::{Entity, MdibVersion, State};
use serde::{Deserialize, Serialize};

/// What a description write changed.
///
/// Handed to the caller (and through it to observers) after a successful
/// `apply_description`. Entities appear in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteDescriptionResult {
    /// The transaction version that was applied.
    pub mdib_version: MdibVersion,
    /// Entities created by the write.
    pub inserted: Vec<Entity>,
    /// Entities replaced by the write.
    pub updated: Vec<Entity>,
    /// Entities removed by the write, as they were before removal.
    pub deleted: Vec<Entity>,
}

impl WriteDescriptionResult {
    /// Creates an empty result for `mdib_version`.
    #[must_use]
    pub fn new(mdib_version: MdibVersion) -> Self {
        Self {
            mdib_version,
            inserted: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Total number of affected entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }

    /// Whether the write affected nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a state write changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteStateResult {
    /// The transaction version that was applied.
    pub mdib_version: MdibVersion,
    /// The state values actually processed, in submission order, carrying
    /// their newly stamped versions.
    pub states: Vec<State>,
}

impl WriteStateResult {
    /// Creates an empty result for `mdib_version`.
    #[must_use]
    pub fn new(mdib_version: MdibVersion) -> Self {
        Self {
            mdib_version,
            states: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result() {
        let result = WriteDescriptionResult::new(MdibVersion::new(3));
        assert!(result.is_empty());
        assert_eq!(result.mdib_version, MdibVersion::new(3));
    }
}
