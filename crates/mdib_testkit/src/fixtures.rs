//! Fixture builders for descriptors, states and the reference device tree.

use mdib_model::{
    ComponentState, ContextKind, ContextState, Descriptor, DescriptorBody, MetricState,
    OperationState, State,
};
use mdib_storage::DescriptionModifications;

/// Builds a descriptor/state pair for a component kind backed by
/// [`ComponentState`].
///
/// # Panics
///
/// Panics when called with a kind that is not component-shaped (metric,
/// operation, context).
#[must_use]
pub fn component(handle: &str, body: DescriptorBody) -> (Descriptor, Vec<State>) {
    let state = match &body {
        DescriptorBody::Mds => State::Mds(ComponentState::new(handle)),
        DescriptorBody::Vmd => State::Vmd(ComponentState::new(handle)),
        DescriptorBody::Channel => State::Channel(ComponentState::new(handle)),
        DescriptorBody::Sco => State::Sco(ComponentState::new(handle)),
        DescriptorBody::AlertSystem => State::AlertSystem(ComponentState::new(handle)),
        DescriptorBody::AlertCondition => State::AlertCondition(ComponentState::new(handle)),
        DescriptorBody::AlertSignal => State::AlertSignal(ComponentState::new(handle)),
        DescriptorBody::SystemContext => State::SystemContext(ComponentState::new(handle)),
        DescriptorBody::Clock => State::Clock(ComponentState::new(handle)),
        DescriptorBody::Battery => State::Battery(ComponentState::new(handle)),
        other => panic!("{other:?} is not a component kind"),
    };
    (Descriptor::new(handle, body), vec![state])
}

/// Builds a metric descriptor/state pair carrying a value.
#[must_use]
pub fn metric(handle: &str, value: f64) -> (Descriptor, Vec<State>) {
    (
        Descriptor::new(
            handle,
            DescriptorBody::Metric {
                unit: Some("MDC_DIM_DIMLESS".to_owned()),
            },
        ),
        vec![State::Metric(MetricState::with_value(handle, value))],
    )
}

/// Builds an operation descriptor/state pair targeting `target`.
#[must_use]
pub fn operation(handle: &str, target: &str) -> (Descriptor, Vec<State>) {
    (
        Descriptor::new(
            handle,
            DescriptorBody::Operation {
                target: Some(target.into()),
            },
        ),
        vec![State::Operation(OperationState::new(handle))],
    )
}

/// Builds a context descriptor with one associated context state.
#[must_use]
pub fn context(handle: &str, kind: ContextKind, state_handle: &str) -> (Descriptor, Vec<State>) {
    (
        Descriptor::new(handle, DescriptorBody::Context(kind)),
        vec![State::Context(ContextState::new(kind, state_handle, handle))],
    )
}

/// The reference device tree as one description batch.
///
/// Two MDS roots; under MDS_0 three VMDs plus seven children of the other
/// kinds (alert system, condition and signal, an SCO with seven
/// operations, a system context with six context descriptors carrying one
/// associated state each, a clock and a battery); two channels under VMD_0
/// and five metrics under CHANNEL_0.
#[must_use]
pub fn base_tree() -> DescriptionModifications {
    let mut mods = DescriptionModifications::new();

    for handle in ["MDS_0", "MDS_1"] {
        let (descriptor, states) = component(handle, DescriptorBody::Mds);
        mods = mods.insert(descriptor, states);
    }

    for handle in ["VMD_0", "VMD_1", "VMD_2"] {
        let (descriptor, states) = component(handle, DescriptorBody::Vmd);
        mods = mods.insert_under(descriptor, states, "MDS_0");
    }

    for (handle, body) in [
        ("ALERTSYSTEM_0", DescriptorBody::AlertSystem),
        ("ALERTCONDITION_0", DescriptorBody::AlertCondition),
        ("ALERTSIGNAL_0", DescriptorBody::AlertSignal),
        ("SCO_0", DescriptorBody::Sco),
        ("SYSTEMCONTEXT_0", DescriptorBody::SystemContext),
        ("CLOCK_0", DescriptorBody::Clock),
        ("BATTERY_0", DescriptorBody::Battery),
    ] {
        let (descriptor, states) = component(handle, body);
        mods = mods.insert_under(descriptor, states, "MDS_0");
    }

    for handle in ["CHANNEL_0", "CHANNEL_1"] {
        let (descriptor, states) = component(handle, DescriptorBody::Channel);
        mods = mods.insert_under(descriptor, states, "VMD_0");
    }

    for index in 0..5 {
        let (descriptor, states) = metric(&format!("METRIC_{index}"), f64::from(index));
        mods = mods.insert_under(descriptor, states, "CHANNEL_0");
    }

    for index in 0..7 {
        let (descriptor, states) = operation(&format!("OPERATION_{index}"), "METRIC_0");
        mods = mods.insert_under(descriptor, states, "SCO_0");
    }

    for (handle, kind) in [
        ("PATIENTCONTEXT_0", ContextKind::Patient),
        ("LOCATIONCONTEXT_0", ContextKind::Location),
        ("ENSEMBLECONTEXT_0", ContextKind::Ensemble),
        ("WORKFLOWCONTEXT_0", ContextKind::Workflow),
        ("OPERATORCONTEXT_0", ContextKind::Operator),
        ("MEANSCONTEXT_0", ContextKind::Means),
    ] {
        let (descriptor, states) = context(handle, kind, &format!("{handle}_STATE"));
        mods = mods.insert_under(descriptor, states, "SYSTEMCONTEXT_0");
    }

    mods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_tree_is_parent_ordered() {
        // Every insert must name a parent that appears earlier in the batch.
        use mdib_storage::DescriptionModification;
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for modification in base_tree().iter() {
            if let DescriptionModification::Insert {
                descriptor, parent, ..
            } = modification
            {
                if let Some(parent) = parent {
                    assert!(seen.contains(parent.as_str()), "parent {parent} not seen");
                }
                seen.insert(descriptor.handle().as_str().to_owned());
            }
        }
    }

    #[test]
    fn base_tree_size() {
        // 2 MDS + 3 VMD + 7 other MDS children + 2 channels + 5 metrics
        // + 7 operations + 6 contexts
        assert_eq!(base_tree().len(), 32);
    }

    #[test]
    fn mds_0_carries_the_seven_other_child_kinds() {
        use mdib_model::DescriptorKind;
        use mdib_storage::DescriptionModification;

        let mds_children: Vec<_> = base_tree()
            .iter()
            .filter_map(|modification| match modification {
                DescriptionModification::Insert {
                    descriptor,
                    parent: Some(parent),
                    ..
                } if parent == "MDS_0" => Some(descriptor.kind()),
                _ => None,
            })
            .collect();

        let non_vmd: Vec<_> = mds_children
            .iter()
            .filter(|kind| **kind != DescriptorKind::Vmd)
            .collect();
        assert_eq!(mds_children.len(), 10);
        assert_eq!(non_vmd.len(), 7);
    }
}
