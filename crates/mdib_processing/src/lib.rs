//! # MDIB Processing
//!
//! The pluggable preprocessing pipeline in front of the MDIB registry, and
//! the access layer that owns registry, chains and result distribution.
//!
//! This crate provides:
//! - [`DescriptionSegment`] / [`StateSegment`] — the three-phase segment
//!   contract (`before_first`, `process`, `after_last`)
//! - [`DescriptionChain`] / [`StateChain`] — ordered segment lists with
//!   short-circuit error handling
//! - Built-in segments under [`segments`]
//! - [`LocalMdib`] — serializes chain execution and registry writes under
//!   one write lock and publishes commit results to subscribers
//!
//! A chain failure never reaches the registry: the batch is discarded and
//! the error names the offending segment.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod chain;
pub mod error;
pub mod event;
pub mod segment;
pub mod segments;

pub use access::LocalMdib;
pub use chain::{DescriptionChain, StateChain};
pub use error::{ProcessingError, ProcessingResult};
pub use event::{MdibEvent, MdibEventFeed};
pub use segment::{DescriptionSegment, SegmentError, StateSegment};
