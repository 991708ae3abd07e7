//! Ordered preprocessing chains.

use crate::error::{ProcessingError, ProcessingResult};
use crate::segment::{DescriptionSegment, StateSegment};
use mdib_storage::{DescriptionModifications, MdibRegistry, StateModifications};
use tracing::debug;

/// The preprocessing chain for description modification batches.
///
/// Segments run in registration order through three phases: every segment's
/// `before_first`, then every segment's `process` over the whole batch,
/// then every segment's `after_last`. The first failure aborts the chain
/// and discards the batch; the registry is never invoked for a failed
/// chain.
pub struct DescriptionChain {
    segments: Vec<Box<dyn DescriptionSegment>>,
}

impl DescriptionChain {
    /// Creates a chain from an ordered segment list.
    #[must_use]
    pub fn new(segments: Vec<Box<dyn DescriptionSegment>>) -> Self {
        Self { segments }
    }

    /// Creates a chain with no segments (the identity transformation).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the chain has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Runs the chain, returning the transformed batch.
    pub fn process(
        &mut self,
        mut modifications: DescriptionModifications,
        registry: &MdibRegistry,
    ) -> ProcessingResult<DescriptionModifications> {
        for segment in &mut self.segments {
            segment
                .before_first(&mut modifications, registry)
                .map_err(|source| ProcessingError::segment(segment.name(), source))?;
        }
        for segment in &mut self.segments {
            segment
                .process(&mut modifications, registry)
                .map_err(|source| ProcessingError::segment(segment.name(), source))?;
        }
        for segment in &mut self.segments {
            segment
                .after_last(&mut modifications, registry)
                .map_err(|source| ProcessingError::segment(segment.name(), source))?;
        }
        debug!(
            segments = self.segments.len(),
            modifications = modifications.len(),
            "description chain passed"
        );
        Ok(modifications)
    }
}

/// The preprocessing chain for state modification batches.
///
/// Same three-phase contract as [`DescriptionChain`], except the process
/// phase runs once per segment per state item.
pub struct StateChain {
    segments: Vec<Box<dyn StateSegment>>,
}

impl StateChain {
    /// Creates a chain from an ordered segment list.
    #[must_use]
    pub fn new(segments: Vec<Box<dyn StateSegment>>) -> Self {
        Self { segments }
    }

    /// Creates a chain with no segments (the identity transformation).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the chain has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Runs the chain, returning the transformed batch.
    pub fn process(
        &mut self,
        mut states: StateModifications,
        registry: &MdibRegistry,
    ) -> ProcessingResult<StateModifications> {
        for segment in &mut self.segments {
            segment
                .before_first(&mut states, registry)
                .map_err(|source| ProcessingError::segment(segment.name(), source))?;
        }
        for state in states.states_mut() {
            for segment in &mut self.segments {
                segment
                    .process(state, registry)
                    .map_err(|source| ProcessingError::segment(segment.name(), source))?;
            }
        }
        for segment in &mut self.segments {
            segment
                .after_last(&mut states, registry)
                .map_err(|source| ProcessingError::segment(segment.name(), source))?;
        }
        debug!(
            segments = self.segments.len(),
            states = states.len(),
            "state chain passed"
        );
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentError;
    use mdib_model::{ComponentState, MetricState, State};
    use std::sync::{Arc, Mutex};

    /// Records phase invocations into a shared log.
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_in_process: bool,
    }

    impl Recorder {
        fn push(&self, phase: &str) {
            self.log.lock().unwrap().push(format!("{}:{phase}", self.name));
        }
    }

    impl DescriptionSegment for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn before_first(
            &mut self,
            _modifications: &mut DescriptionModifications,
            _registry: &MdibRegistry,
        ) -> Result<(), SegmentError> {
            self.push("before");
            Ok(())
        }

        fn process(
            &mut self,
            _modifications: &mut DescriptionModifications,
            _registry: &MdibRegistry,
        ) -> Result<(), SegmentError> {
            self.push("process");
            if self.fail_in_process {
                return Err(SegmentError::new("refused"));
            }
            Ok(())
        }

        fn after_last(
            &mut self,
            _modifications: &mut DescriptionModifications,
            _registry: &MdibRegistry,
        ) -> Result<(), SegmentError> {
            self.push("after");
            Ok(())
        }
    }

    fn recorder_chain(
        log: &Arc<Mutex<Vec<String>>>,
        fail_second: bool,
    ) -> DescriptionChain {
        DescriptionChain::new(vec![
            Box::new(Recorder {
                name: "first",
                log: Arc::clone(log),
                fail_in_process: false,
            }),
            Box::new(Recorder {
                name: "second",
                log: Arc::clone(log),
                fail_in_process: fail_second,
            }),
        ])
    }

    #[test]
    fn phases_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = recorder_chain(&log, false);
        let registry = MdibRegistry::new();

        chain
            .process(DescriptionModifications::new(), &registry)
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:before",
                "second:before",
                "first:process",
                "second:process",
                "first:after",
                "second:after",
            ]
        );
    }

    #[test]
    fn failure_short_circuits_and_names_the_segment() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = recorder_chain(&log, true);
        let registry = MdibRegistry::new();

        let err = chain
            .process(DescriptionModifications::new(), &registry)
            .unwrap_err();
        match err {
            ProcessingError::Segment { segment, .. } => assert_eq!(segment, "second"),
            other => panic!("expected segment error, got {other:?}"),
        }
        // Nothing after the failing process call ran.
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:before",
                "second:before",
                "first:process",
                "second:process",
            ]
        );
    }

    /// Rewrites metric values, to prove state segments see each item.
    struct Doubler;

    impl StateSegment for Doubler {
        fn name(&self) -> &str {
            "doubler"
        }

        fn process(
            &mut self,
            state: &mut State,
            _registry: &MdibRegistry,
        ) -> Result<(), SegmentError> {
            if let State::Metric(metric) = state {
                metric.value = metric.value.map(|value| value * 2.0);
            }
            Ok(())
        }
    }

    #[test]
    fn state_chain_processes_every_item() {
        let mut chain = StateChain::new(vec![Box::new(Doubler)]);
        let registry = MdibRegistry::new();
        let states = StateModifications::new()
            .add(State::Metric(MetricState::with_value("METRIC_0", 2.0)))
            .add(State::Metric(MetricState::with_value("METRIC_1", 3.0)))
            .add(State::Vmd(ComponentState::new("VMD_0")));

        let states = chain.process(states, &registry).unwrap();
        match &states.states()[0] {
            State::Metric(metric) => assert_eq!(metric.value, Some(4.0)),
            other => panic!("unexpected state {other:?}"),
        }
        match &states.states()[1] {
            State::Metric(metric) => assert_eq!(metric.value, Some(6.0)),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn empty_chain_is_identity() {
        let mut chain = DescriptionChain::empty();
        let registry = MdibRegistry::new();
        let mods = DescriptionModifications::new();
        let out = chain.process(mods.clone(), &registry).unwrap();
        assert_eq!(out, mods);
        assert!(chain.is_empty());
    }
}
