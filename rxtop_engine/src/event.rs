//! The event type shared by the gatherer (C5) and executor (C6).
//!
//! A closed tagged variant rather than one flat struct with fields that
//! are meaningless for one of the two kinds: a structural event has no
//! educt particles, only a topology and a reaction index.
use rxtop_core::{ParticleIndex, ParticleType, TopologyHandle};

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Structural {
        topology_idx: TopologyHandle,
        reaction_idx: usize,
        rate: f64,
        cumulative_rate: f64,
    },
    Spatial {
        topology_idx: TopologyHandle,
        /// Second topology handle, for a topology–topology event.
        topology_idx2: Option<TopologyHandle>,
        reaction_idx: usize,
        /// `idx1` always references a particle inside `topology_idx`.
        idx1: ParticleIndex,
        idx2: ParticleIndex,
        t1: ParticleType,
        t2: ParticleType,
        rate: f64,
        cumulative_rate: f64,
    },
}

impl Event {
    pub fn topology_idx(&self) -> TopologyHandle {
        match *self {
            Event::Structural { topology_idx, .. } => topology_idx,
            Event::Spatial { topology_idx, .. } => topology_idx,
        }
    }

    pub fn topology_idx2(&self) -> Option<TopologyHandle> {
        match *self {
            Event::Structural { .. } => None,
            Event::Spatial { topology_idx2, .. } => topology_idx2,
        }
    }

    pub fn rate(&self) -> f64 {
        match *self {
            Event::Structural { rate, .. } => rate,
            Event::Spatial { rate, .. } => rate,
        }
    }

    pub fn cumulative_rate(&self) -> f64 {
        match *self {
            Event::Structural { cumulative_rate, .. } => cumulative_rate,
            Event::Spatial { cumulative_rate, .. } => cumulative_rate,
        }
    }

    /// Two events are dependent if they share any endpoint topology
    /// handle — the condition the executor uses to drop conflicting
    /// events once one of a pair has fired.
    pub fn depends_on(&self, other: &Event) -> bool {
        let mine = self.topology_idx();
        if mine == other.topology_idx() || Some(mine) == other.topology_idx2() {
            return true;
        }
        if let Some(mine2) = self.topology_idx2() {
            return mine2 == other.topology_idx() || Some(mine2) == other.topology_idx2();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spatial(topology_idx: usize, topology_idx2: Option<usize>) -> Event {
        Event::Spatial {
            topology_idx: TopologyHandle::from(topology_idx),
            topology_idx2: topology_idx2.map(TopologyHandle::from),
            reaction_idx: 0,
            idx1: ParticleIndex::from(0),
            idx2: ParticleIndex::from(1),
            t1: ParticleType(0),
            t2: ParticleType(0),
            rate: 1.0,
            cumulative_rate: 1.0,
        }
    }

    #[test]
    fn shared_topology_is_dependent() {
        assert!(spatial(1, None).depends_on(&spatial(1, None)));
        assert!(spatial(1, Some(2)).depends_on(&spatial(2, None)));
        assert!(spatial(1, Some(2)).depends_on(&spatial(3, Some(2))));
    }

    #[test]
    fn disjoint_topologies_are_independent() {
        assert!(!spatial(1, None).depends_on(&spatial(2, None)));
        assert!(!spatial(1, Some(2)).depends_on(&spatial(3, Some(4))));
    }
}
