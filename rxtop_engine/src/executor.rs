//! Event executor (C6): the conflict-aware, one-pass application of a
//! gathered event list.
//!
//! This is not Gillespie selection — there is no cumulative-rate draw
//! that picks exactly one event. Every event gets its own independent
//! Bernoulli trial, in gather order, with probability `1 - exp(-rate *
//! dt)` (the exact discretization of a Poisson process over one step)
//! unless the [`Context`] opts into [`EvalMode::Approximated`], which
//! uses the cheaper but less accurate `rate * dt`.
//! Once an event fires, every later event still sharing one of its
//! topology handles is dead for the rest of this pass — applying it
//! would act on a topology that no longer has the shape the event was
//! gathered against.
use rxtop_core::{ParticleType, TopologyHandle, TopologyType};
use tracing::debug;

use crate::adapters::{Context, EvalMode, Rng};
use crate::configure::admit_topology;
use crate::error::EngineError;
use crate::event::Event;
use crate::particle::ParticleStore;
use crate::registry::TopologyRegistry;
use crate::store::TopologyStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutionReport {
    pub structural_applied: usize,
    pub spatial_applied: usize,
    pub topologies_created: usize,
}

/// Runs the executor over `events` (assumed already gathered this
/// step, in gather order). Mutates `topologies` and `particles` in
/// place; deactivated topologies are left as tombstones for
/// [`TopologyStore::reap`] to drop at the end of the step.
pub fn execute_events(
    mut events: Vec<Event>,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    context: &dyn Context,
    rng: &mut dyn Rng,
) -> Result<ExecutionReport, EngineError> {
    let dt = context.time_step();
    let mut report = ExecutionReport::default();
    let mut applied: Vec<Event> = Vec::new();

    let mut live_len = events.len();
    let mut i = 0;
    while i < live_len {
        let event = events[i];
        let fire_probability = match context.eval_mode() {
            EvalMode::Exact => 1.0 - (-event.rate() * dt).exp(),
            EvalMode::Approximated => event.rate() * dt,
        };
        if rng.uniform_real() >= fire_probability {
            i += 1;
            continue;
        }

        for prior in &applied {
            if event.depends_on(prior) {
                return Err(EngineError::EventListCorruption);
            }
        }

        apply_event(event, topologies, particles, registry, context, &mut report)?;
        applied.push(event);

        // drop every remaining live event that now conflicts with the
        // one just applied, swapping it into the dead suffix.
        let mut j = i + 1;
        while j < live_len {
            if events[j].depends_on(&event) {
                live_len -= 1;
                events.swap(j, live_len);
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    Ok(report)
}

fn apply_event(
    event: Event,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    context: &dyn Context,
    report: &mut ExecutionReport,
) -> Result<(), EngineError> {
    match event {
        Event::Structural { topology_idx, reaction_idx, .. } => {
            debug!(?topology_idx, reaction_idx, kind = "structural", "applying event");
            apply_structural(topology_idx, reaction_idx, topologies, particles, registry, context, report)
        }
        Event::Spatial {
            topology_idx,
            topology_idx2,
            reaction_idx,
            idx1,
            idx2,
            t1,
            t2,
            ..
        } => match topology_idx2 {
            None => {
                debug!(?topology_idx, reaction_idx, educt1 = ?t1, educt2 = ?t2, kind = "topology-particle", "applying event");
                apply_topology_particle(
                    topology_idx, reaction_idx, idx1, idx2, t1, t2, topologies, particles, registry, context, report,
                )
            }
            Some(other) => {
                debug!(?topology_idx, topology_idx2 = ?other, reaction_idx, educt1 = ?t1, educt2 = ?t2, kind = "topology-topology", "applying event");
                apply_topology_topology(
                    topology_idx, other, reaction_idx, idx1, idx2, t1, t2, topologies, particles, registry, context, report,
                )
            }
        },
    }
}

fn apply_structural(
    handle: TopologyHandle,
    reaction_idx: usize,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    context: &dyn Context,
    report: &mut ExecutionReport,
) -> Result<(), EngineError> {
    let topology_type = topologies
        .get(handle)
        .ok_or(EngineError::DeactivatedTopology { handle, context: "structural" })?
        .topology_type;
    let reaction = registry
        .structural_reactions_of(topology_type)
        .get(reaction_idx)
        .ok_or(EngineError::ReactionNotFound)?;

    let topology = topologies.get_mut(handle).expect("checked live above");
    let newborn = (reaction.execute)(topology, context);

    finalize_existing(handle, topologies, particles, registry, context)?;
    report.structural_applied += 1;

    for child in newborn {
        admit_topology(child, topologies, particles, registry, context.particle_types());
        report.topologies_created += 1;
    }
    Ok(())
}

fn apply_topology_particle(
    handle: TopologyHandle,
    reaction_idx: usize,
    idx1: rxtop_core::ParticleIndex,
    idx2: rxtop_core::ParticleIndex,
    t1: ParticleType,
    t2: ParticleType,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    context: &dyn Context,
    report: &mut ExecutionReport,
) -> Result<(), EngineError> {
    let topology_type = topologies
        .get(handle)
        .ok_or(EngineError::DeactivatedTopology { handle, context: "topology-particle" })?
        .topology_type;
    let reaction = registry
        .find_spatial_reaction(t1, Some(topology_type), t2, None, reaction_idx)?;
    let (to1, to2, top_to1, _top_to2) = reaction.outcomes_for(t1, Some(topology_type), t2, None)?;

    let topology = topologies.get_mut(handle).expect("checked live above");
    let existing_v = topology
        .vertex_for_particle(idx1)
        .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx1:?} missing from topology {handle:?}")))?;
    topology.append_particle(existing_v, to2, idx2, to1)?;
    if let Some(new_type) = top_to1 {
        topology.topology_type = new_type;
    }

    particles.entry_at_mut(idx1).type_id = to1;
    particles.entry_at_mut(idx2).type_id = to2;
    particles.entry_at_mut(idx2).topology_index = Some(handle);

    finalize_existing(handle, topologies, particles, registry, context)?;
    report.spatial_applied += 1;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_topology_topology(
    handle1: TopologyHandle,
    handle2: TopologyHandle,
    reaction_idx: usize,
    idx1: rxtop_core::ParticleIndex,
    idx2: rxtop_core::ParticleIndex,
    t1: ParticleType,
    t2: ParticleType,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    context: &dyn Context,
    report: &mut ExecutionReport,
) -> Result<(), EngineError> {
    let top1 = topologies
        .get(handle1)
        .ok_or(EngineError::DeactivatedTopology { handle: handle1, context: "topology-topology" })?
        .topology_type;
    let top2 = topologies
        .get(handle2)
        .ok_or(EngineError::DeactivatedTopology { handle: handle2, context: "topology-topology" })?
        .topology_type;

    let reaction = registry.find_spatial_reaction(t1, Some(top1), t2, Some(top2), reaction_idx)?;
    let (to1, to2, top_to1, top_to2) = reaction.outcomes_for(t1, Some(top1), t2, Some(top2))?;

    if handle1 == handle2 {
        // Both educts already live in the same topology: even a
        // reaction flagged `is_fusion` degenerates into adding a bond
        // between two of its own vertices, since there is nothing
        // outside it left to merge.
        let t = topologies.get_mut(handle1).expect("checked live above");
        let v1 = t
            .vertex_for_particle(idx1)
            .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx1:?} missing from topology {handle1:?}")))?;
        let v2 = t
            .vertex_for_particle(idx2)
            .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx2:?} missing from topology {handle1:?}")))?;
        t.set_vertex_type(v1, to1);
        t.set_vertex_type(v2, to2);
        t.add_edge(v1, v2)?;
        if let Some(new_type) = top_to1 {
            t.topology_type = new_type;
        }

        particles.entry_at_mut(idx1).type_id = to1;
        particles.entry_at_mut(idx2).type_id = to2;

        finalize_existing(handle1, topologies, particles, registry, context)?;
    } else if reaction.is_fusion {
        // "left wins": handle1 is the lower-indexed particle's topology
        // (gather.rs enforces this ordering), so it survives and
        // absorbs handle2's vertices and edges.
        let other = topologies
            .remove(handle2)
            .ok_or(EngineError::DeactivatedTopology { handle: handle2, context: "topology-topology fusion" })?;

        for p in other.particles() {
            particles.entry_at_mut(p).topology_index = Some(handle1);
        }

        let v_in_other = other
            .vertex_for_particle(idx2)
            .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx2:?} missing from topology {handle2:?}")))?;

        let new_type = top_to1.ok_or_else(|| EngineError::InvariantViolation("fusion reaction produced no topology type".into()))?;

        let survivor = topologies.get_mut(handle1).expect("checked live above");
        let v_in_self = survivor
            .vertex_for_particle(idx1)
            .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx1:?} missing from topology {handle1:?}")))?;
        survivor.append_topology(other, v_in_other, to2, v_in_self, to1, new_type)?;

        particles.entry_at_mut(idx1).type_id = to1;
        particles.entry_at_mut(idx2).type_id = to2;

        finalize_existing(handle1, topologies, particles, registry, context)?;
    } else {
        let t = topologies.get_mut(handle1).expect("checked live above");
        let v1 = t
            .vertex_for_particle(idx1)
            .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx1:?} missing from topology {handle1:?}")))?;
        t.set_vertex_type(v1, to1);
        if let Some(new_type) = top_to1 {
            t.topology_type = new_type;
        }

        let t2ref = topologies.get_mut(handle2).expect("checked live above");
        let v2 = t2ref
            .vertex_for_particle(idx2)
            .ok_or_else(|| EngineError::InvariantViolation(format!("particle {idx2:?} missing from topology {handle2:?}")))?;
        t2ref.set_vertex_type(v2, to2);
        if let Some(new_type) = top_to2 {
            t2ref.topology_type = new_type;
        }

        particles.entry_at_mut(idx1).type_id = to1;
        particles.entry_at_mut(idx2).type_id = to2;

        finalize_existing(handle1, topologies, particles, registry, context)?;
        finalize_existing(handle2, topologies, particles, registry, context)?;
    }

    report.spatial_applied += 1;
    Ok(())
}

/// Recomputes reaction rates and the vertex lookup table for a
/// topology mutated in place, or demotes it to a free particle if it
/// has collapsed to a single non-topology-flavored vertex.
fn finalize_existing(
    handle: TopologyHandle,
    topologies: &mut TopologyStore,
    particles: &mut ParticleStore,
    registry: &TopologyRegistry,
    context: &dyn Context,
) -> Result<(), EngineError> {
    let topology = topologies
        .get_mut(handle)
        .ok_or(EngineError::DeactivatedTopology { handle, context: "finalize" })?;
    if topology.is_normal_particle(context.particle_types()) {
        topology.deactivated = true;
        let p = topology.particles().next().expect("singleton has exactly one particle");
        particles.entry_at_mut(p).topology_index = None;
    } else {
        topology.update_reaction_rates(registry.structural_reactions_of(topology.topology_type));
        topology.configure();
    }
    Ok(())
}
