//! The MDIB registry: handle-indexed entity storage with transactional
//! description and state writes.

use crate::error::{StorageError, StorageResult};
use crate::factory::EntityFactory;
use crate::modification::{
    DescriptionModification, DescriptionModifications, StateModifications,
};
use crate::result::{WriteDescriptionResult, WriteStateResult};
use mdib_model::{
    ContextKind, ContextState, Descriptor, DescriptorKind, DescriptorVersion, Entity,
    EntityStates, Handle, MdibVersion, State, VersionTriple,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// The versioned entity registry.
///
/// Holds the entity map, the ordered root list, a secondary index of
/// context states (multi-state handle to owning descriptor handle) and the
/// registry-wide version triple. All writes go through the two `apply_*`
/// operations; reads are pure.
///
/// The registry assumes a single synchronous writer. Callers that mix
/// readers and writers must serialize access themselves; the preprocessing
/// layer's access type does exactly that.
#[derive(Debug, Default)]
pub struct MdibRegistry {
    entities: HashMap<Handle, Entity>,
    roots: Vec<Handle>,
    context_index: HashMap<Handle, Handle>,
    versions: VersionTriple,
    factory: EntityFactory,
}

impl MdibRegistry {
    /// Creates an empty registry with a zeroed version triple.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry starting from the given version triple.
    #[must_use]
    pub fn with_initial_versions(versions: VersionTriple) -> Self {
        Self {
            versions,
            ..Self::default()
        }
    }

    // --- write operations ---------------------------------------------------

    /// Applies an ordered batch of description modifications.
    ///
    /// The caller-supplied version values are trusted and applied as-is; an
    /// absent override leaves the respective counter untouched (remote
    /// mirrors replay unverified upstream transactions through this path).
    ///
    /// Inserts naming a parent that will not exist when the insert is
    /// applied (absent, deleted earlier in the batch, or only inserted
    /// later) are rejected before any mutation. Updates and deletes of
    /// unknown handles are logged and skipped.
    pub fn apply_description(
        &mut self,
        mdib_version: MdibVersion,
        md_description_version: Option<u64>,
        md_state_version: Option<u64>,
        modifications: DescriptionModifications,
    ) -> StorageResult<WriteDescriptionResult> {
        self.validate_parents(&modifications)?;

        self.versions.mdib_version = mdib_version;
        if let Some(version) = md_description_version {
            self.versions.md_description_version = version;
        }
        if let Some(version) = md_state_version {
            self.versions.md_state_version = version;
        }

        let result = self.apply_modifications(mdib_version, modifications)?;
        debug!(
            %mdib_version,
            inserted = result.inserted.len(),
            updated = result.updated.len(),
            deleted = result.deleted.len(),
            "applied description modifications"
        );
        Ok(result)
    }

    /// Applies an ordered list of state values.
    ///
    /// A state for an unknown descriptor handle synthesizes a placeholder
    /// entity (unless it is a not-associated context state, which is
    /// dropped). Single states replace the sole state of their entity;
    /// context states are matched by their own handle and appended,
    /// replaced or removed depending on the association tag.
    pub fn apply_states(
        &mut self,
        mdib_version: MdibVersion,
        md_state_version: Option<u64>,
        states: StateModifications,
    ) -> StorageResult<WriteStateResult> {
        self.versions.mdib_version = mdib_version;
        if let Some(version) = md_state_version {
            self.versions.md_state_version = version;
        }

        let mut processed = Vec::with_capacity(states.len());

        for state in states {
            let handle = state.descriptor_handle().clone();
            let Some(entity) = self.entities.get(&handle).cloned() else {
                if state.is_not_associated_context() {
                    debug!(%handle, "dropping not-associated context state for unknown descriptor");
                    continue;
                }
                debug!(%handle, "state precedes its description, synthesizing placeholder entity");
                let descriptor = Descriptor::with_version(
                    handle.clone(),
                    state.placeholder_body(),
                    DescriptorVersion::UNKNOWN,
                );
                // Applied immediately so a second state for the same handle
                // in this batch finds the entity instead of synthesizing a
                // second placeholder.
                let folded = self.apply_modifications(
                    mdib_version,
                    DescriptionModifications::new().insert(descriptor, vec![state]),
                )?;
                match folded.inserted[0].states() {
                    EntityStates::Single(stamped) => processed.push(stamped.clone()),
                    EntityStates::Multi(stamped) => {
                        processed.push(State::Context(stamped[0].clone()));
                    }
                }
                continue;
            };

            match entity.states() {
                EntityStates::Single(_) => {
                    let mut state = state;
                    self.factory.stamp_single_state(&mut state);
                    let replacement =
                        entity.with_states(EntityStates::Single(state.clone()), mdib_version);
                    self.entities.insert(handle, replacement);
                    processed.push(state);
                }
                EntityStates::Multi(stored) => {
                    let Some(mut context) = state.into_context() else {
                        return Err(StorageError::state_shape_mismatch(handle));
                    };
                    let mut stored = stored.clone();
                    match stored.iter().position(|c| c.handle == context.handle) {
                        Some(index) if context.association.is_not_associated() => {
                            let removed = stored.remove(index);
                            self.context_index.remove(&removed.handle);
                            self.factory.stamp_multi_state(&mut context);
                            processed.push(State::Context(context));
                        }
                        Some(index) => {
                            self.factory.stamp_multi_state(&mut context);
                            stored[index] = context.clone();
                            processed.push(State::Context(context));
                        }
                        None if !context.association.is_not_associated() => {
                            // The state handle is unseen for this entity; it
                            // must be unseen everywhere, or the index entry
                            // of another owner would be overwritten.
                            if let Some(owner) = self.context_index.get(&context.handle) {
                                warn!(
                                    state_handle = %context.handle,
                                    %owner,
                                    "context state handle already owned by another descriptor, skipping"
                                );
                                continue;
                            }
                            self.factory.stamp_multi_state(&mut context);
                            self.context_index
                                .insert(context.handle.clone(), handle.clone());
                            stored.push(context.clone());
                            processed.push(State::Context(context));
                        }
                        None => {
                            debug!(
                                state_handle = %context.handle,
                                "ignoring not-associated context state with no stored counterpart"
                            );
                            continue;
                        }
                    }
                    let replacement =
                        entity.with_states(EntityStates::Multi(stored), mdib_version);
                    self.entities.insert(handle, replacement);
                }
            }
        }

        debug!(%mdib_version, states = processed.len(), "applied state modifications");
        Ok(WriteStateResult {
            mdib_version,
            states: processed,
        })
    }

    // --- read queries -------------------------------------------------------

    /// The per-transaction version counter.
    #[must_use]
    pub fn mdib_version(&self) -> MdibVersion {
        self.versions.mdib_version
    }

    /// The structural change counter.
    #[must_use]
    pub fn md_description_version(&self) -> u64 {
        self.versions.md_description_version
    }

    /// The structural-or-value change counter.
    #[must_use]
    pub fn md_state_version(&self) -> u64 {
        self.versions.md_state_version
    }

    /// The whole version triple.
    #[must_use]
    pub fn version_triple(&self) -> VersionTriple {
        self.versions
    }

    /// Number of stored entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Gets an entity by descriptor handle.
    #[must_use]
    pub fn entity(&self, handle: &str) -> Option<Entity> {
        self.entities.get(handle).cloned()
    }

    /// Gets a descriptor by handle.
    #[must_use]
    pub fn descriptor(&self, handle: &str) -> Option<Descriptor> {
        self.entities
            .get(handle)
            .map(|entity| entity.descriptor().clone())
    }

    /// Gets a descriptor by handle, narrowed to `kind`.
    ///
    /// Absent handle and kind mismatch are indistinguishable: both yield
    /// `None`.
    #[must_use]
    pub fn descriptor_of_kind(&self, handle: &str, kind: DescriptorKind) -> Option<Descriptor> {
        self.descriptor(handle)
            .filter(|descriptor| descriptor.kind() == kind)
    }

    /// Gets a state by handle: the single state of the entity with that
    /// descriptor handle, or the context state with that state handle.
    #[must_use]
    pub fn state(&self, handle: &str) -> Option<State> {
        if let Some(entity) = self.entities.get(handle) {
            return entity.single_state().cloned();
        }
        let owner = self.context_index.get(handle)?;
        self.entities
            .get(owner)?
            .multi_states()
            .iter()
            .find(|context| context.handle == *handle)
            .cloned()
            .map(State::Context)
    }

    /// Gets a state by handle, narrowed to `kind`.
    #[must_use]
    pub fn state_of_kind(&self, handle: &str, kind: DescriptorKind) -> Option<State> {
        self.state(handle).filter(|state| state.kind() == kind)
    }

    /// All entities whose descriptor has the given kind, in no particular
    /// order.
    #[must_use]
    pub fn entities_of_kind(&self, kind: DescriptorKind) -> Vec<Entity> {
        self.entities
            .values()
            .filter(|entity| entity.descriptor().kind() == kind)
            .cloned()
            .collect()
    }

    /// Ordered children of `handle` whose descriptor has the given kind.
    #[must_use]
    pub fn children_of_kind(&self, handle: &str, kind: DescriptorKind) -> Vec<Entity> {
        let Some(parent) = self.entities.get(handle) else {
            return Vec::new();
        };
        parent
            .children()
            .iter()
            .filter_map(|child| self.entities.get(child))
            .filter(|entity| entity.descriptor().kind() == kind)
            .cloned()
            .collect()
    }

    /// The root entities, in insertion order.
    #[must_use]
    pub fn root_entities(&self) -> Vec<Entity> {
        self.roots
            .iter()
            .filter_map(|handle| self.entities.get(handle))
            .cloned()
            .collect()
    }

    /// All stored context states, in no particular order.
    #[must_use]
    pub fn context_states(&self) -> Vec<ContextState> {
        self.context_index
            .iter()
            .filter_map(|(state_handle, owner)| {
                self.entities.get(owner).and_then(|entity| {
                    entity
                        .multi_states()
                        .iter()
                        .find(|context| context.handle == *state_handle)
                        .cloned()
                })
            })
            .collect()
    }

    /// Context states owned by one descriptor handle.
    #[must_use]
    pub fn context_states_for(&self, descriptor_handle: &str) -> Vec<ContextState> {
        self.multi_states(descriptor_handle)
    }

    /// All context states of one context category.
    #[must_use]
    pub fn context_states_of_kind(&self, kind: ContextKind) -> Vec<ContextState> {
        self.context_states()
            .into_iter()
            .filter(|context| context.kind == kind)
            .collect()
    }

    /// Multi-states of one descriptor handle, any association.
    #[must_use]
    pub fn multi_states(&self, descriptor_handle: &str) -> Vec<ContextState> {
        self.entities
            .get(descriptor_handle)
            .map(|entity| entity.multi_states().to_vec())
            .unwrap_or_default()
    }

    // --- internals ----------------------------------------------------------

    /// Rejects the batch if an insert names a parent that will not exist at
    /// the point the insert is applied: absent from the registry, deleted
    /// earlier in the batch, or only inserted later. Runs before any
    /// mutation so a rejected batch leaves the registry untouched.
    fn validate_parents(&self, modifications: &DescriptionModifications) -> StorageResult<()> {
        let mut pending: HashSet<&Handle> = HashSet::new();
        let mut removed: HashSet<&Handle> = HashSet::new();
        for modification in modifications {
            match modification {
                DescriptionModification::Insert {
                    descriptor, parent, ..
                } => {
                    if let Some(parent) = parent {
                        let stored = self.entities.contains_key(parent.as_str())
                            && !removed.contains(parent);
                        if !stored && !pending.contains(parent) {
                            return Err(StorageError::parent_not_found(
                                descriptor.handle().clone(),
                                parent.clone(),
                            ));
                        }
                    }
                    pending.insert(descriptor.handle());
                    removed.remove(descriptor.handle());
                }
                DescriptionModification::Delete { handle } => {
                    removed.insert(handle);
                    pending.remove(handle);
                }
                DescriptionModification::Update { .. } => {}
            }
        }
        Ok(())
    }

    fn apply_modifications(
        &mut self,
        mdib_version: MdibVersion,
        modifications: DescriptionModifications,
    ) -> StorageResult<WriteDescriptionResult> {
        let mut result = WriteDescriptionResult::new(mdib_version);

        for modification in modifications {
            match modification {
                DescriptionModification::Insert {
                    descriptor,
                    mut states,
                    parent,
                } => {
                    strip_not_associated(&mut states);
                    let entity = self
                        .factory
                        .create(descriptor, states, parent, mdib_version)?;
                    self.link(&entity);
                    self.index_context_states(&entity);
                    self.entities.insert(entity.handle().clone(), entity.clone());
                    result.inserted.push(entity);
                }
                DescriptionModification::Update {
                    descriptor,
                    mut states,
                } => {
                    strip_not_associated(&mut states);
                    let handle = descriptor.handle().clone();
                    let Some(existing) = self.entities.get(&handle).cloned() else {
                        warn!(%handle, "update targets unknown handle, skipping");
                        continue;
                    };
                    let replacement =
                        self.factory
                            .replace(&existing, descriptor, states, mdib_version)?;
                    self.unindex_context_states(&handle);
                    self.index_context_states(&replacement);
                    self.entities.insert(handle, replacement.clone());
                    result.updated.push(replacement);
                }
                DescriptionModification::Delete { handle } => {
                    let Some(entity) = self.entities.remove(&handle) else {
                        warn!(%handle, "delete targets unknown handle, skipping");
                        continue;
                    };
                    self.unlink(&entity);
                    self.unindex_context_states(&handle);
                    result.deleted.push(entity);
                }
            }
        }

        Ok(result)
    }

    /// Hooks a freshly created entity into the tree: appends its handle to
    /// the parent's child list, or to the root list if it has no parent.
    ///
    /// The upfront parent validation guarantees the parent is present when
    /// the insert is applied.
    fn link(&mut self, entity: &Entity) {
        match entity.parent() {
            Some(parent) => {
                if let Some(parent_entity) = self.entities.get(parent.as_str()) {
                    let replacement = parent_entity.with_child_appended(entity.handle().clone());
                    self.entities.insert(parent.clone(), replacement);
                }
            }
            None => self.roots.push(entity.handle().clone()),
        }
    }

    /// Unhooks a removed entity from the tree.
    fn unlink(&mut self, entity: &Entity) {
        match entity.parent() {
            Some(parent) => {
                if let Some(parent_entity) = self.entities.get(parent.as_str()) {
                    let replacement = parent_entity.with_child_removed(entity.handle());
                    self.entities.insert(parent.clone(), replacement);
                }
            }
            None => self.roots.retain(|handle| handle != entity.handle()),
        }
    }

    fn index_context_states(&mut self, entity: &Entity) {
        for context in entity.multi_states() {
            self.context_index
                .insert(context.handle.clone(), entity.handle().clone());
        }
    }

    fn unindex_context_states(&mut self, owner: &Handle) {
        self.context_index.retain(|_, indexed| indexed != owner);
    }
}

/// Removes every state tagged not-associated before it can reach storage.
fn strip_not_associated(states: &mut Vec<State>) {
    states.retain(|state| !state.is_not_associated_context());
}
