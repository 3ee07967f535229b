//! Top-level orchestration: one simulation step end to end.
use rxtop_core::{ParticleIndex, ParticleType, TopologyHandle, TopologyType};
use tracing::{debug, error, instrument, warn};

use crate::adapters::{Context, NeighborList, Rng};
use crate::error::EngineError;
use crate::executor::execute_events;
use crate::gather::gather_events;
use crate::graph::Topology;
use crate::particle::{ParticleEntry, ParticleStore};
use crate::registry::TopologyRegistry;
use crate::store::TopologyStore;

/// Summary of one [`Engine::perform`] call. Carries counts only — no
/// event descriptors, so a caller cannot reconstruct (and come to
/// depend on) which specific events fired in what order.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepReport {
    pub events_gathered: usize,
    pub structural_applied: usize,
    pub spatial_applied: usize,
    pub topologies_created: usize,
    pub topologies_reaped: usize,
}

/// Owns the particle store, topology store, and reaction registry, and
/// drives them through one step of gather → execute → reap.
#[derive(Debug, Default)]
pub struct Engine {
    particles: ParticleStore,
    topologies: TopologyStore,
    registry: TopologyRegistry,
}

impl Engine {
    pub fn new(registry: TopologyRegistry) -> Self {
        Self {
            particles: ParticleStore::new(),
            topologies: TopologyStore::new(),
            registry,
        }
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleStore {
        &mut self.particles
    }

    pub fn topologies(&self) -> &TopologyStore {
        &self.topologies
    }

    pub fn registry(&self) -> &TopologyRegistry {
        &self.registry
    }

    /// Adds a free particle with no topology membership. Returns its
    /// stable index.
    pub fn spawn_particle(&mut self, position: rxtop_core::Vec3, type_id: ParticleType) -> ParticleIndex {
        self.particles.activate(ParticleEntry::new(position, type_id))
    }

    /// Adds a particle already wrapped in its own singleton topology.
    /// Convenience for scenarios and demos that need a spatial-reaction
    /// educt that already satisfies "has a topology" without going
    /// through a structural reaction first.
    pub fn spawn_topology(
        &mut self,
        position: rxtop_core::Vec3,
        type_id: ParticleType,
        topology_type: TopologyType,
    ) -> (ParticleIndex, TopologyHandle) {
        let particle = self.spawn_particle(position, type_id);
        let handle = self.topologies.insert(Topology::singleton(topology_type, particle, type_id));
        self.particles.entry_at_mut(particle).topology_index = Some(handle);
        (particle, handle)
    }

    /// Inserts an already-built, possibly multi-vertex topology, and
    /// wires every one of its particles' `topology_index` to match.
    /// Unlike [`crate::configure::admit_topology`], this never demotes
    /// a singleton of non-topology flavor — it is meant for seeding
    /// scenario state directly, not for admitting the output of a
    /// reaction's `execute` closure.
    pub fn seed_topology(&mut self, topology: Topology) -> TopologyHandle {
        let particle_indices: Vec<_> = topology.particles().collect();
        let handle = self.topologies.insert(topology);
        for p in particle_indices {
            self.particles.entry_at_mut(p).topology_index = Some(handle);
        }
        handle
    }

    /// Runs one step: gather the candidate event list against the
    /// current state, execute it one event at a time with Bernoulli
    /// trials and conflict elimination, then reap topologies that
    /// deactivated during execution.
    #[instrument(skip_all)]
    pub fn perform(
        &mut self,
        neighbor_list: &dyn NeighborList,
        rng: &mut dyn Rng,
        context: &dyn Context,
    ) -> Result<StepReport, EngineError> {
        let events = gather_events(&self.topologies, &self.particles, &self.registry, neighbor_list, context);
        debug!(events_gathered = events.len(), "gathered candidate events");
        if events.is_empty() && !self.registry.spatial_reaction_registry_empty() {
            warn!("no events gathered despite a non-empty spatial reaction registry; neighbor list may be degenerate");
        }

        let events_gathered = events.len();
        let execution = execute_events(events, &mut self.topologies, &mut self.particles, &self.registry, context, rng)
            .map_err(|err| {
                if matches!(err, EngineError::EventListCorruption) {
                    error!(error = %err, "event execution aborted the step");
                } else {
                    warn!(error = %err, "event execution aborted the step");
                }
                err
            })?;

        let topologies_reaped = self.topologies.reap();
        debug!(
            structural_applied = execution.structural_applied,
            spatial_applied = execution.spatial_applied,
            topologies_created = execution.topologies_created,
            topologies_reaped,
            "step complete"
        );

        Ok(StepReport {
            events_gathered,
            structural_applied: execution.structural_applied,
            spatial_applied: execution.spatial_applied,
            topologies_created: execution.topologies_created,
            topologies_reaped,
        })
    }
}
