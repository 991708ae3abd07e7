//! Version counters of the MDIB.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The MDIB-wide transaction counter.
///
/// Strictly increases by one for every committed write transaction,
/// regardless of whether the write changed structure or values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MdibVersion(pub u64);

impl MdibVersion {
    /// Creates a version from a raw counter value.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next version.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MdibVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mdib:{}", self.0)
    }
}

/// Per-handle descriptor version.
///
/// Monotonic per handle across the handle's entire history, including
/// delete-then-reinsert cycles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DescriptorVersion(pub u64);

impl DescriptorVersion {
    /// The version stamped on the first use of a handle.
    pub const FIRST: Self = Self(0);

    /// Sentinel for placeholder descriptors synthesized before the real
    /// description arrives (remote-mirror path).
    pub const UNKNOWN: Self = Self(0);

    /// Creates a version from a raw counter value.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next version.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DescriptorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dv:{}", self.0)
    }
}

/// Per-identity state version.
///
/// For single states the identity is the descriptor handle; for
/// multi-states it is the state's own handle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StateVersion(pub u64);

impl StateVersion {
    /// The version stamped on the first use of an identity.
    pub const FIRST: Self = Self(0);

    /// Creates a version from a raw counter value.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next version.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sv:{}", self.0)
    }
}

/// The registry-wide version triple.
///
/// `md_description_version` moves on structural transactions,
/// `md_state_version` on structural or value transactions, and
/// `mdib_version` on every transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTriple {
    /// Per-transaction counter.
    pub mdib_version: MdibVersion,
    /// Structural change counter.
    pub md_description_version: u64,
    /// Structural-or-value change counter.
    pub md_state_version: u64,
}

impl VersionTriple {
    /// Creates a triple from raw values.
    #[must_use]
    pub const fn new(mdib_version: u64, md_description_version: u64, md_state_version: u64) -> Self {
        Self {
            mdib_version: MdibVersion::new(mdib_version),
            md_description_version,
            md_state_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mdib_version_next() {
        assert_eq!(MdibVersion::new(4).next(), MdibVersion::new(5));
    }

    #[test]
    fn first_versions_are_zero() {
        assert_eq!(DescriptorVersion::FIRST.as_u64(), 0);
        assert_eq!(StateVersion::FIRST.as_u64(), 0);
    }

    #[test]
    fn triple_default_is_zeroed() {
        let triple = VersionTriple::default();
        assert_eq!(triple, VersionTriple::new(0, 0, 0));
    }

    #[test]
    fn version_ordering() {
        assert!(DescriptorVersion::new(1) < DescriptorVersion::new(2));
        assert!(StateVersion::FIRST < StateVersion::new(1));
    }
}
