//! # MDIB Storage
//!
//! The versioned entity registry at the heart of the MDIB: a handle-indexed
//! map of entities with an ordered root list and a context-state index,
//! mutated by two transactional write operations and read through a pure
//! query surface.
//!
//! This crate provides:
//! - [`VersionLedger`] — per-handle version counters surviving deletion
//! - [`EntityFactory`] — the only component minting version numbers
//! - [`DescriptionModifications`] / [`StateModifications`] — write batches
//! - [`MdibRegistry`] — the registry with its apply algorithms
//! - [`WriteDescriptionResult`] / [`WriteStateResult`] — commit snapshots
//!
//! The registry assumes a single synchronous writer; serialization of
//! writers and the preprocessing pipeline live in `mdib_processing`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod ledger;
pub mod modification;
pub mod registry;
pub mod result;

pub use error::{StorageError, StorageResult};
pub use factory::EntityFactory;
pub use ledger::VersionLedger;
pub use modification::{DescriptionModification, DescriptionModifications, StateModifications};
pub use registry::MdibRegistry;
pub use result::{WriteDescriptionResult, WriteStateResult};
