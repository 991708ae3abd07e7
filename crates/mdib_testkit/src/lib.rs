//! # MDIB Testkit
//!
//! Test utilities shared across the MDIB crates:
//! - Fixture builders for descriptors, states and the reference device tree
//! - Property-based test generators using proptest

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
