//! Per-handle version ledger.

use mdib_model::{DescriptorVersion, Handle, StateVersion};
use std::collections::HashMap;

/// Last-assigned versions for one handle.
#[derive(Debug, Clone, Default)]
struct LedgerEntry {
    /// Last assigned descriptor version, if any.
    descriptor: Option<u64>,
    /// Last assigned single-state version, if any.
    state: Option<u64>,
    /// Last assigned multi-state versions, keyed by the state's own handle.
    multi: HashMap<Handle, u64>,
}

/// The per-handle version ledger.
///
/// Records the last descriptor and state version assigned to every handle
/// that ever entered the registry. Entries are created on first use and
/// never removed, so delete-then-reinsert continues the version sequence
/// instead of resetting it.
#[derive(Debug, Clone, Default)]
pub struct VersionLedger {
    entries: HashMap<Handle, LedgerEntry>,
}

impl VersionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next descriptor version for `handle` and records it.
    ///
    /// First use yields version 0, every later call the successor of the
    /// last recorded value.
    pub fn next_descriptor(&mut self, handle: &Handle) -> DescriptorVersion {
        let entry = self.entry(handle);
        let next = entry.descriptor.map_or(0, |last| last + 1);
        entry.descriptor = Some(next);
        DescriptorVersion::new(next)
    }

    /// Returns the next single-state version for `handle` and records it.
    pub fn next_state(&mut self, handle: &Handle) -> StateVersion {
        let entry = self.entry(handle);
        let next = entry.state.map_or(0, |last| last + 1);
        entry.state = Some(next);
        StateVersion::new(next)
    }

    /// Returns the next version for the multi-state `state_handle` owned by
    /// `descriptor_handle` and records it.
    pub fn next_multi_state(
        &mut self,
        descriptor_handle: &Handle,
        state_handle: &Handle,
    ) -> StateVersion {
        let entry = self.entry(descriptor_handle);
        let next = entry
            .multi
            .get(state_handle)
            .map_or(0, |last| last + 1);
        entry.multi.insert(state_handle.clone(), next);
        StateVersion::new(next)
    }

    /// Number of handles the ledger has seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has seen no handle yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, handle: &Handle) -> &mut LedgerEntry {
        self.entries.entry(handle.clone()).or_default()
    }
}
