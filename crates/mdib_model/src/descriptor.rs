//! Descriptors: the static structure of a device.

use crate::handle::Handle;
use crate::version::DescriptorVersion;
use serde::{Deserialize, Serialize};

/// The context categories a device can associate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextKind {
    /// Patient demographics context.
    Patient,
    /// Physical location context.
    Location,
    /// Device ensemble membership context.
    Ensemble,
    /// Clinical workflow context.
    Workflow,
    /// Operator context.
    Operator,
    /// Means (equipment) context.
    Means,
}

impl ContextKind {
    /// Maps the context category to its narrowing token.
    #[must_use]
    pub const fn descriptor_kind(self) -> DescriptorKind {
        match self {
            Self::Patient => DescriptorKind::PatientContext,
            Self::Location => DescriptorKind::LocationContext,
            Self::Ensemble => DescriptorKind::EnsembleContext,
            Self::Workflow => DescriptorKind::WorkflowContext,
            Self::Operator => DescriptorKind::OperatorContext,
            Self::Means => DescriptorKind::MeansContext,
        }
    }
}

/// Narrowing token for the closed set of descriptor kinds.
///
/// Read queries filter on this token; a stored element whose kind differs
/// from the requested one is reported as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorKind {
    /// Medical device system, the tree root kind.
    Mds,
    /// Virtual medical device.
    Vmd,
    /// Channel grouping metrics.
    Channel,
    /// Measured or calculated metric.
    Metric,
    /// Service and control object.
    Sco,
    /// Remote-control operation.
    Operation,
    /// Alert system.
    AlertSystem,
    /// Alert condition.
    AlertCondition,
    /// Alert signal.
    AlertSignal,
    /// System context container.
    SystemContext,
    /// Real-time clock.
    Clock,
    /// Battery.
    Battery,
    /// Patient context.
    PatientContext,
    /// Location context.
    LocationContext,
    /// Ensemble context.
    EnsembleContext,
    /// Workflow context.
    WorkflowContext,
    /// Operator context.
    OperatorContext,
    /// Means context.
    MeansContext,
}

impl DescriptorKind {
    /// Whether this kind owns multi-states instead of a single state.
    #[must_use]
    pub const fn is_context(self) -> bool {
        matches!(
            self,
            Self::PatientContext
                | Self::LocationContext
                | Self::EnsembleContext
                | Self::WorkflowContext
                | Self::OperatorContext
                | Self::MeansContext
        )
    }
}

/// Kind-specific descriptor payload.
///
/// Payloads carry only the fields this core consumes; the full attribute
/// set travels with the protocol layers outside the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DescriptorBody {
    /// Medical device system.
    Mds,
    /// Virtual medical device.
    Vmd,
    /// Channel.
    Channel,
    /// Metric with an optional unit of measure.
    Metric {
        /// Unit of measure code.
        unit: Option<String>,
    },
    /// Service and control object.
    Sco,
    /// Operation targeting another descriptor.
    Operation {
        /// Handle of the descriptor the operation acts on.
        target: Option<Handle>,
    },
    /// Alert system.
    AlertSystem,
    /// Alert condition.
    AlertCondition,
    /// Alert signal.
    AlertSignal,
    /// System context container.
    SystemContext,
    /// Clock.
    Clock,
    /// Battery.
    Battery,
    /// Context descriptor; the only kind owning multi-states.
    Context(ContextKind),
}

impl DescriptorBody {
    /// Returns the narrowing token for this payload.
    #[must_use]
    pub const fn kind(&self) -> DescriptorKind {
        match self {
            Self::Mds => DescriptorKind::Mds,
            Self::Vmd => DescriptorKind::Vmd,
            Self::Channel => DescriptorKind::Channel,
            Self::Metric { .. } => DescriptorKind::Metric,
            Self::Sco => DescriptorKind::Sco,
            Self::Operation { .. } => DescriptorKind::Operation,
            Self::AlertSystem => DescriptorKind::AlertSystem,
            Self::AlertCondition => DescriptorKind::AlertCondition,
            Self::AlertSignal => DescriptorKind::AlertSignal,
            Self::SystemContext => DescriptorKind::SystemContext,
            Self::Clock => DescriptorKind::Clock,
            Self::Battery => DescriptorKind::Battery,
            Self::Context(kind) => kind.descriptor_kind(),
        }
    }
}

/// One structural element of the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    handle: Handle,
    version: DescriptorVersion,
    body: DescriptorBody,
}

impl Descriptor {
    /// Creates a descriptor with the initial version.
    ///
    /// The effective version is stamped by the entity factory when the
    /// descriptor enters the registry.
    pub fn new(handle: impl Into<Handle>, body: DescriptorBody) -> Self {
        Self {
            handle: handle.into(),
            version: DescriptorVersion::FIRST,
            body,
        }
    }

    /// Creates a descriptor with an explicit version.
    pub fn with_version(
        handle: impl Into<Handle>,
        body: DescriptorBody,
        version: DescriptorVersion,
    ) -> Self {
        Self {
            handle: handle.into(),
            version,
            body,
        }
    }

    /// The descriptor handle.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The descriptor version.
    #[must_use]
    pub fn version(&self) -> DescriptorVersion {
        self.version
    }

    /// Overwrites the descriptor version.
    pub fn set_version(&mut self, version: DescriptorVersion) {
        self.version = version;
    }

    /// The kind-specific payload.
    #[must_use]
    pub fn body(&self) -> &DescriptorBody {
        &self.body
    }

    /// The narrowing token of this descriptor.
    #[must_use]
    pub fn kind(&self) -> DescriptorKind {
        self.body.kind()
    }

    /// Whether this descriptor owns multi-states.
    #[must_use]
    pub fn is_context(&self) -> bool {
        matches!(self.body, DescriptorBody::Context(_))
    }

    /// The context category, for context descriptors.
    #[must_use]
    pub fn context_kind(&self) -> Option<ContextKind> {
        match self.body {
            DescriptorBody::Context(kind) => Some(kind),
            _ => None,
        }
    }
}
