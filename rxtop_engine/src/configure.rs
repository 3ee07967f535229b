//! Newborn-topology configure pass (C7).
//!
//! Every topology handed to [`admit_topology`] is either freshly spun
//! off by a structural reaction's `execute`, or the product of a
//! topology–topology fusion merge. Both arrive with stale reaction
//! rates and a stale particle→vertex lookup table; this is where they
//! get rebuilt, and where a topology that collapsed to a single
//! non-topology-flavored particle gets demoted back to a free particle
//! instead of being kept.
use rxtop_core::ParticleTypeRegistry;

use crate::graph::Topology;
use crate::particle::ParticleStore;
use crate::registry::TopologyRegistry;
use crate::store::TopologyStore;

/// Admits `topology` into `topologies`, or demotes it to a free
/// particle if it is a singleton of non-topology flavor. Updates every
/// transferred particle's `topology_index` to match.
pub fn admit_topology(
    mut topology: Topology,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    particle_types: &ParticleTypeRegistry,
) {
    if topology.is_normal_particle(particle_types) {
        let p = topology.particles().next().expect("singleton has exactly one particle");
        particles.entry_at_mut(p).topology_index = None;
        return;
    }

    topology.update_reaction_rates(registry.structural_reactions_of(topology.topology_type));
    topology.configure();

    let particle_indices: Vec<_> = topology.particles().collect();
    let handle = topologies.insert(topology);
    for p in particle_indices {
        particles.entry_at_mut(p).topology_index = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxtop_core::{ParticleIndex, ParticleType, TopologyType};

    #[test]
    fn singleton_of_normal_flavor_is_demoted_not_admitted() {
        let mut particles = ParticleStore::new();
        let p = particles.activate(crate::particle::ParticleEntry::new(rxtop_core::Vec3::ZERO, ParticleType(0)));
        particles.entry_at_mut(p).topology_index = Some(TopologyHandleStub::any());

        let topology = Topology::singleton(TopologyType(0), p, ParticleType(0));
        let mut topologies = TopologyStore::new();
        let registry = TopologyRegistry::new();
        let particle_types = ParticleTypeRegistry::new();

        admit_topology(topology, &mut topologies, &mut particles, &registry, &particle_types);

        assert!(topologies.is_empty());
        assert_eq!(particles.entry_at(p).topology_index, None);
    }

    #[test]
    fn multi_vertex_topology_is_admitted_with_rates_configured() {
        let mut particles = ParticleStore::new();
        let a = particles.activate(crate::particle::ParticleEntry::new(rxtop_core::Vec3::ZERO, ParticleType(0)));
        let b = particles.activate(crate::particle::ParticleEntry::new(rxtop_core::Vec3::ZERO, ParticleType(0)));

        let mut topology = Topology::singleton(TopologyType(0), a, ParticleType(0));
        let va = topology.vertex_for_particle(a).unwrap();
        topology.append_particle(va, ParticleType(0), b, ParticleType(0)).unwrap();

        let mut topologies = TopologyStore::new();
        let mut registry = TopologyRegistry::new();
        registry.add_structural_reaction(crate::registry::StructuralReaction {
            topology_type: TopologyType(0),
            execute: Box::new(|_t, _ctx| Vec::new()),
            rate: Box::new(|_t| 3.0),
        });
        let particle_types = ParticleTypeRegistry::new();

        admit_topology(topology, &mut topologies, &mut particles, &registry, &particle_types);

        assert_eq!(topologies.len(), 1);
        let (handle, stored) = topologies.iter().next().unwrap();
        assert_eq!(stored.rates(), &[3.0]);
        assert_eq!(particles.entry_at(a).topology_index, Some(handle));
        assert_eq!(particles.entry_at(b).topology_index, Some(handle));
    }

    // helper to avoid constructing a throwaway real handle in the first test
    struct TopologyHandleStub;
    impl TopologyHandleStub {
        fn any() -> rxtop_core::TopologyHandle {
            rxtop_core::TopologyHandle::from(0usize)
        }
    }
}
