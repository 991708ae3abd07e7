//! The locked access layer owning registry, chains and event feed.

use crate::chain::{DescriptionChain, StateChain};
use crate::error::ProcessingResult;
use crate::event::{MdibEvent, MdibEventFeed};
use mdib_storage::{
    DescriptionModifications, MdibRegistry, StateModifications, WriteDescriptionResult,
    WriteStateResult,
};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::mpsc::Receiver;
use tracing::debug;

/// The locally written MDIB.
///
/// Owns the registry and serializes every write: the preprocessing chain
/// and the subsequent apply run under one exclusive write lock, so no
/// second writer can invalidate what a segment read from the registry
/// between chain and apply. Readers share the registry through [`read`]
/// guards and block only for the duration of a write.
///
/// Local writes mint their own versions: every write advances
/// `mdib_version` by one; description writes additionally advance both
/// `md_description_version` and `md_state_version`, state writes only the
/// latter.
///
/// [`read`]: LocalMdib::read
pub struct LocalMdib {
    registry: RwLock<MdibRegistry>,
    description_chain: Mutex<DescriptionChain>,
    state_chain: Mutex<StateChain>,
    feed: MdibEventFeed,
}

impl LocalMdib {
    /// Creates an MDIB with empty chains.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chains(DescriptionChain::empty(), StateChain::empty())
    }

    /// Creates an MDIB with the given preprocessing chains.
    ///
    /// Segment order is fixed here; there is no runtime re-ordering.
    #[must_use]
    pub fn with_chains(description_chain: DescriptionChain, state_chain: StateChain) -> Self {
        Self {
            registry: RwLock::new(MdibRegistry::new()),
            description_chain: Mutex::new(description_chain),
            state_chain: Mutex::new(state_chain),
            feed: MdibEventFeed::new(),
        }
    }

    /// Read access to the registry.
    ///
    /// The guard must not be held across a call to one of the write
    /// operations on the same thread.
    pub fn read(&self) -> RwLockReadGuard<'_, MdibRegistry> {
        self.registry.read()
    }

    /// Subscribes to committed write results.
    pub fn subscribe(&self) -> Receiver<MdibEvent> {
        self.feed.subscribe()
    }

    /// Preprocesses and applies a description modification batch.
    ///
    /// On chain failure the registry is untouched and the error names the
    /// offending segment.
    pub fn write_description(
        &self,
        modifications: DescriptionModifications,
    ) -> ProcessingResult<WriteDescriptionResult> {
        let mut chain = self.description_chain.lock();
        let mut registry = self.registry.write();

        let modifications = chain.process(modifications, &registry)?;

        let mdib_version = registry.mdib_version().next();
        let md_description_version = registry.md_description_version() + 1;
        let md_state_version = registry.md_state_version() + 1;
        let result = registry.apply_description(
            mdib_version,
            Some(md_description_version),
            Some(md_state_version),
            modifications,
        )?;
        drop(registry);
        drop(chain);

        debug!(%mdib_version, "committed description write");
        self.feed.emit(MdibEvent::Description(result.clone()));
        Ok(result)
    }

    /// Preprocesses and applies a state modification batch.
    pub fn write_states(
        &self,
        states: StateModifications,
    ) -> ProcessingResult<WriteStateResult> {
        let mut chain = self.state_chain.lock();
        let mut registry = self.registry.write();

        let states = chain.process(states, &registry)?;

        let mdib_version = registry.mdib_version().next();
        let md_state_version = registry.md_state_version() + 1;
        let result = registry.apply_states(mdib_version, Some(md_state_version), states)?;
        drop(registry);
        drop(chain);

        debug!(%mdib_version, "committed state write");
        self.feed.emit(MdibEvent::State(result.clone()));
        Ok(result)
    }
}

impl Default for LocalMdib {
    fn default() -> Self {
        Self::new()
    }
}
