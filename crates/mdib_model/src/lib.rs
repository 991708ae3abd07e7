//! # MDIB Model
//!
//! The information model of the Medical Device Information Base (MDIB):
//! a versioned, hierarchical description of a point-of-care device.
//!
//! This crate provides:
//! - [`Handle`] — string identity of descriptors and multi-states
//! - Version counters ([`MdibVersion`], [`DescriptorVersion`], [`StateVersion`])
//! - The closed descriptor and state unions ([`Descriptor`], [`State`])
//! - [`Entity`] — the registry's combined descriptor/state/tree-link record
//!
//! The model is pure data; storage and transaction semantics live in
//! `mdib_storage`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod descriptor;
pub mod entity;
pub mod handle;
pub mod state;
pub mod version;

pub use descriptor::{ContextKind, Descriptor, DescriptorBody, DescriptorKind};
pub use entity::{Entity, EntityStates};
pub use handle::Handle;
pub use state::{
    ComponentActivation, ComponentState, ContextAssociation, ContextState, MetricState,
    OperatingMode, OperationState, State,
};
pub use version::{DescriptorVersion, MdibVersion, StateVersion, VersionTriple};
