//! States: the runtime values attached to descriptors.

use crate::descriptor::{ContextKind, Descriptor, DescriptorBody, DescriptorKind};
use crate::handle::Handle;
use crate::version::StateVersion;
use serde::{Deserialize, Serialize};

/// Lifecycle tag of a context state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextAssociation {
    /// The context is associated.
    Associated,
    /// Association is being negotiated.
    PreAssociated,
    /// The context was associated and has been released.
    Disassociated,
    /// Not associated. States carrying this tag are never stored.
    No,
}

impl ContextAssociation {
    /// Whether this tag means "not associated".
    #[must_use]
    pub const fn is_not_associated(self) -> bool {
        matches!(self, Self::No)
    }
}

/// Activation state shared by component states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentActivation {
    /// Operating.
    On,
    /// Initializing.
    NotReady,
    /// Ready but inactive.
    StandBy,
    /// Inactive.
    Off,
    /// Shutting down.
    Shutdown,
    /// Failed.
    Failure,
}

/// Operating mode of a remote-control operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingMode {
    /// Invocation currently refused.
    Disabled,
    /// Invocation accepted.
    Enabled,
    /// Not available.
    NotAvailable,
}

/// State payload shared by device components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentState {
    /// Back-reference to the owning descriptor.
    pub descriptor_handle: Handle,
    /// State version, keyed by the descriptor handle.
    pub version: StateVersion,
    /// Current activation.
    pub activation: ComponentActivation,
}

impl ComponentState {
    /// Creates a component state in the `On` activation.
    pub fn new(descriptor_handle: impl Into<Handle>) -> Self {
        Self {
            descriptor_handle: descriptor_handle.into(),
            version: StateVersion::FIRST,
            activation: ComponentActivation::On,
        }
    }
}

/// State payload of a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricState {
    /// Back-reference to the owning descriptor.
    pub descriptor_handle: Handle,
    /// State version, keyed by the descriptor handle.
    pub version: StateVersion,
    /// Current observed value, if any.
    pub value: Option<f64>,
}

impl MetricState {
    /// Creates a metric state without a value.
    pub fn new(descriptor_handle: impl Into<Handle>) -> Self {
        Self {
            descriptor_handle: descriptor_handle.into(),
            version: StateVersion::FIRST,
            value: None,
        }
    }

    /// Creates a metric state carrying a value.
    pub fn with_value(descriptor_handle: impl Into<Handle>, value: f64) -> Self {
        Self {
            descriptor_handle: descriptor_handle.into(),
            version: StateVersion::FIRST,
            value: Some(value),
        }
    }
}

/// State payload of a remote-control operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationState {
    /// Back-reference to the owning descriptor.
    pub descriptor_handle: Handle,
    /// State version, keyed by the descriptor handle.
    pub version: StateVersion,
    /// Current operating mode.
    pub mode: OperatingMode,
}

impl OperationState {
    /// Creates an enabled operation state.
    pub fn new(descriptor_handle: impl Into<Handle>) -> Self {
        Self {
            descriptor_handle: descriptor_handle.into(),
            version: StateVersion::FIRST,
            mode: OperatingMode::Enabled,
        }
    }
}

/// A multi-state: one association of a context descriptor.
///
/// Unlike single states, a context state has its own handle; the version is
/// keyed by that handle, not by the descriptor handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextState {
    /// Context category; mirrors the owning descriptor's category.
    pub kind: ContextKind,
    /// The state's own handle, unique across all multi-states.
    pub handle: Handle,
    /// Back-reference to the owning descriptor.
    pub descriptor_handle: Handle,
    /// State version, keyed by the state's own handle.
    pub version: StateVersion,
    /// Association lifecycle tag.
    pub association: ContextAssociation,
}

impl ContextState {
    /// Creates an associated context state.
    pub fn new(
        kind: ContextKind,
        handle: impl Into<Handle>,
        descriptor_handle: impl Into<Handle>,
    ) -> Self {
        Self {
            kind,
            handle: handle.into(),
            descriptor_handle: descriptor_handle.into(),
            version: StateVersion::FIRST,
            association: ContextAssociation::Associated,
        }
    }

    /// Returns the same state with a different association tag.
    #[must_use]
    pub fn with_association(mut self, association: ContextAssociation) -> Self {
        self.association = association;
        self
    }
}

/// The closed state union, mirroring the descriptor kinds.
///
/// All variants except [`State::Context`] are single states: exactly one per
/// descriptor handle, identified by that handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum State {
    /// Medical device system state.
    Mds(ComponentState),
    /// Virtual medical device state.
    Vmd(ComponentState),
    /// Channel state.
    Channel(ComponentState),
    /// Metric state.
    Metric(MetricState),
    /// Service and control object state.
    Sco(ComponentState),
    /// Operation state.
    Operation(OperationState),
    /// Alert system state.
    AlertSystem(ComponentState),
    /// Alert condition state.
    AlertCondition(ComponentState),
    /// Alert signal state.
    AlertSignal(ComponentState),
    /// System context state.
    SystemContext(ComponentState),
    /// Clock state.
    Clock(ComponentState),
    /// Battery state.
    Battery(ComponentState),
    /// Context state, the only multi-state in scope.
    Context(ContextState),
}

impl State {
    /// Handle of the descriptor this state belongs to.
    #[must_use]
    pub fn descriptor_handle(&self) -> &Handle {
        match self {
            Self::Mds(s)
            | Self::Vmd(s)
            | Self::Channel(s)
            | Self::Sco(s)
            | Self::AlertSystem(s)
            | Self::AlertCondition(s)
            | Self::AlertSignal(s)
            | Self::SystemContext(s)
            | Self::Clock(s)
            | Self::Battery(s) => &s.descriptor_handle,
            Self::Metric(s) => &s.descriptor_handle,
            Self::Operation(s) => &s.descriptor_handle,
            Self::Context(s) => &s.descriptor_handle,
        }
    }

    /// The state version.
    #[must_use]
    pub fn version(&self) -> StateVersion {
        match self {
            Self::Mds(s)
            | Self::Vmd(s)
            | Self::Channel(s)
            | Self::Sco(s)
            | Self::AlertSystem(s)
            | Self::AlertCondition(s)
            | Self::AlertSignal(s)
            | Self::SystemContext(s)
            | Self::Clock(s)
            | Self::Battery(s) => s.version,
            Self::Metric(s) => s.version,
            Self::Operation(s) => s.version,
            Self::Context(s) => s.version,
        }
    }

    /// Overwrites the state version.
    pub fn set_version(&mut self, version: StateVersion) {
        match self {
            Self::Mds(s)
            | Self::Vmd(s)
            | Self::Channel(s)
            | Self::Sco(s)
            | Self::AlertSystem(s)
            | Self::AlertCondition(s)
            | Self::AlertSignal(s)
            | Self::SystemContext(s)
            | Self::Clock(s)
            | Self::Battery(s) => s.version = version,
            Self::Metric(s) => s.version = version,
            Self::Operation(s) => s.version = version,
            Self::Context(s) => s.version = version,
        }
    }

    /// The narrowing token of the descriptor kind this state belongs to.
    #[must_use]
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::Mds(_) => DescriptorKind::Mds,
            Self::Vmd(_) => DescriptorKind::Vmd,
            Self::Channel(_) => DescriptorKind::Channel,
            Self::Metric(_) => DescriptorKind::Metric,
            Self::Sco(_) => DescriptorKind::Sco,
            Self::Operation(_) => DescriptorKind::Operation,
            Self::AlertSystem(_) => DescriptorKind::AlertSystem,
            Self::AlertCondition(_) => DescriptorKind::AlertCondition,
            Self::AlertSignal(_) => DescriptorKind::AlertSignal,
            Self::SystemContext(_) => DescriptorKind::SystemContext,
            Self::Clock(_) => DescriptorKind::Clock,
            Self::Battery(_) => DescriptorKind::Battery,
            Self::Context(s) => s.kind.descriptor_kind(),
        }
    }

    /// Borrows the context state, if this is one.
    #[must_use]
    pub fn as_context(&self) -> Option<&ContextState> {
        match self {
            Self::Context(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the state into its context payload, if it is one.
    #[must_use]
    pub fn into_context(self) -> Option<ContextState> {
        match self {
            Self::Context(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is a context state tagged as not associated.
    #[must_use]
    pub fn is_not_associated_context(&self) -> bool {
        matches!(self, Self::Context(s) if s.association.is_not_associated())
    }

    /// Whether this state's kind matches the given descriptor's kind.
    #[must_use]
    pub fn matches_descriptor(&self, descriptor: &Descriptor) -> bool {
        self.kind() == descriptor.kind()
    }

    /// Synthesizes the descriptor payload a placeholder entity for this
    /// state would carry (remote-mirror path).
    #[must_use]
    pub fn placeholder_body(&self) -> DescriptorBody {
        match self {
            Self::Mds(_) => DescriptorBody::Mds,
            Self::Vmd(_) => DescriptorBody::Vmd,
            Self::Channel(_) => DescriptorBody::Channel,
            Self::Metric(_) => DescriptorBody::Metric { unit: None },
            Self::Sco(_) => DescriptorBody::Sco,
            Self::Operation(_) => DescriptorBody::Operation { target: None },
            Self::AlertSystem(_) => DescriptorBody::AlertSystem,
            Self::AlertCondition(_) => DescriptorBody::AlertCondition,
            Self::AlertSignal(_) => DescriptorBody::AlertSignal,
            Self::SystemContext(_) => DescriptorBody::SystemContext,
            Self::Clock(_) => DescriptorBody::Clock,
            Self::Battery(_) => DescriptorBody::Battery,
            Self::Context(s) => DescriptorBody::Context(s.kind),
        }
    }
}
