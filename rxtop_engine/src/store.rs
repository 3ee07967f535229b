//! Topology store (C4): the collection of live topologies, each with a
//! per-topology deactivation flag and a stable handle.
//!
//! Deactivation never physically removes a topology mid-step —
//! removing it would renumber [`TopologyHandle`]s other live topologies
//! still hold. Topologies are only actually dropped from the store by
//! [`TopologyStore::reap`], called once at the end of a step.
use rxtop_core::TopologyHandle;
use tinymap::TinySecondaryMap;
use tracing::trace;

use crate::graph::Topology;

#[derive(Debug, Default)]
pub struct TopologyStore {
    topologies: TinySecondaryMap<TopologyHandle, Topology>,
    next_handle: u64,
}

impl TopologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topology: Topology) -> TopologyHandle {
        let handle = TopologyHandle::from(self.next_handle as usize);
        self.next_handle += 1;
        self.topologies.insert(handle, topology);
        handle
    }

    pub fn get(&self, handle: TopologyHandle) -> Option<&Topology> {
        self.topologies.get(handle)
    }

    pub fn get_mut(&mut self, handle: TopologyHandle) -> Option<&mut Topology> {
        self.topologies.get_mut(handle)
    }

    pub fn is_deactivated(&self, handle: TopologyHandle) -> bool {
        self.topologies.get(handle).map(|t| t.deactivated).unwrap_or(true)
    }

    /// Removes `handle` from the store outright, returning its
    /// topology. Used by topology–topology fusion merges, which fold
    /// the second topology's vertices into the first and discard its
    /// handle immediately rather than waiting for end-of-step reaping.
    pub fn remove(&mut self, handle: TopologyHandle) -> Option<Topology> {
        self.topologies.remove(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TopologyHandle, &Topology)> {
        self.topologies.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (TopologyHandle, &Topology)> {
        self.topologies.iter().filter(|(_, t)| !t.deactivated)
    }

    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }

    /// Drops every topology flagged `deactivated`. Handles of surviving
    /// topologies are unchanged.
    pub fn reap(&mut self) -> usize {
        let before = self.topologies.len();
        let topologies = std::mem::take(&mut self.topologies);
        self.topologies = topologies
            .into_iter()
            .filter(|(handle, t)| {
                if t.deactivated {
                    trace!(?handle, "reaping deactivated topology");
                }
                !t.deactivated
            })
            .collect();
        before - self.topologies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxtop_core::{ParticleIndex, ParticleType, TopologyType};

    #[test]
    fn reap_drops_only_deactivated() {
        let mut store = TopologyStore::new();
        let keep = store.insert(Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0)));
        let dropped = store.insert(Topology::singleton(TopologyType(0), ParticleIndex::from(1), ParticleType(0)));
        store.get_mut(dropped).unwrap().deactivated = true;

        let reaped = store.reap();
        assert_eq!(reaped, 1);
        assert!(store.get(keep).is_some());
        assert!(store.get(dropped).is_none());
    }

    #[test]
    fn remove_drops_immediately() {
        let mut store = TopologyStore::new();
        let h = store.insert(Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0)));
        assert!(store.remove(h).is_some());
        assert!(store.get(h).is_none());
        assert_eq!(store.len(), 0);
    }
}
