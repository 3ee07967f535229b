//! Particle store (C1): a dense arena of particle entries with stable
//! indices for the lifetime of a step.
use rxtop_core::{ParticleIndex, ParticleType, TopologyHandle, Vec3};
use tinymap::Key;

#[derive(Debug, Clone)]
pub struct ParticleEntry {
    pub position: Vec3,
    pub type_id: ParticleType,
    pub deactivated: bool,
    pub topology_index: Option<TopologyHandle>,
}

impl ParticleEntry {
    pub fn new(position: Vec3, type_id: ParticleType) -> Self {
        Self {
            position,
            type_id,
            deactivated: false,
            topology_index: None,
        }
    }
}

/// Dense particle arena. Indices are stable for the lifetime of an
/// arena generation; `deactivate` only tombstones an entry, `compact`
/// is what actually reclaims space and may renumber indices, so the
/// engine never calls it mid-step.
#[derive(Debug, Default, Clone)]
pub struct ParticleStore {
    entries: Vec<ParticleEntry>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, entry: ParticleEntry) -> ParticleIndex {
        let index = ParticleIndex::from(self.entries.len());
        self.entries.push(entry);
        index
    }

    pub fn entry_at(&self, index: ParticleIndex) -> &ParticleEntry {
        &self.entries[index.index()]
    }

    pub fn entry_at_mut(&mut self, index: ParticleIndex) -> &mut ParticleEntry {
        &mut self.entries[index.index()]
    }

    pub fn deactivate(&mut self, index: ParticleIndex) {
        self.entries[index.index()].deactivated = true;
        self.entries[index.index()].topology_index = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleIndex, &ParticleEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (ParticleIndex::from(i), e))
    }

    /// Drops tombstoned entries and renumbers the rest. Returns, for
    /// every old index, the new index it was moved to (or `None` if it
    /// was a tombstone). Not called by [`crate::engine::Engine::perform`]
    /// — index stability within a step is required, so compaction is a
    /// between-steps operation; the caller is responsible for applying
    /// the returned remap to anything outside this store that holds a
    /// `ParticleIndex` (topology vertices included).
    pub fn compact(&mut self) -> Vec<Option<ParticleIndex>> {
        let old_entries = std::mem::take(&mut self.entries);
        let mut remap = Vec::with_capacity(old_entries.len());
        for entry in old_entries {
            if entry.deactivated {
                remap.push(None);
            } else {
                remap.push(Some(ParticleIndex::from(self.entries.len())));
                self.entries.push(entry);
            }
        }
        remap
    }
}
