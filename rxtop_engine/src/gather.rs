//! Event gatherer (C5): produces the step's candidate event list.
use rxtop_core::TopologyType;
use tinymap::Key;

use crate::adapters::{Context, NeighborList};
use crate::event::Event;
use crate::particle::ParticleStore;
use crate::registry::TopologyRegistry;
use crate::store::TopologyStore;

/// Runs the two-phase gather described in the event gatherer: one
/// event per nonzero structural rate on every active topology, then
/// one event per in-range spatial reaction pair, in that order, with a
/// running cumulative rate across both phases.
pub fn gather_events(
    topologies: &TopologyStore,
    particles: &ParticleStore,
    registry: &TopologyRegistry,
    neighbor_list: &dyn NeighborList,
    context: &dyn Context,
) -> Vec<Event> {
    let mut events = Vec::new();
    let mut cumulative_rate = 0.0;

    for (handle, topology) in topologies.iter() {
        if topology.deactivated {
            continue;
        }
        for (reaction_idx, &rate) in topology.rates().iter().enumerate() {
            if rate == 0.0 {
                continue;
            }
            cumulative_rate += rate;
            events.push(Event::Structural {
                topology_idx: handle,
                reaction_idx,
                rate,
                cumulative_rate,
            });
        }
    }

    if registry.spatial_reaction_registry_empty() {
        return events;
    }

    for cell in 0..neighbor_list.n_cells() {
        for &p in neighbor_list.particles_in_cell(cell) {
            let entry = particles.entry_at(p);
            if entry.deactivated || !registry.is_spatial_reaction_type(entry.type_id) {
                continue;
            }
            let entry_top = entry.topology_index.filter(|h| !topologies.is_deactivated(*h));

            neighbor_list.for_each_neighbor(p, cell, &mut |q| {
                let neighbor = particles.entry_at(q);
                let neighbor_top = neighbor.topology_index.filter(|h| !topologies.is_deactivated(*h));

                // symmetry filter: skip if neither side has a topology, or
                // enforce p < q when both do, to avoid double counting.
                if entry_top.is_none() && neighbor_top.is_none() {
                    return;
                }
                if neighbor_top.is_some() && p.index() > q.index() {
                    return;
                }

                let tt1: Option<TopologyType> = entry_top.map(|h| topologies.get(h).expect("live handle").topology_type);
                let tt2: Option<TopologyType> = neighbor_top.map(|h| topologies.get(h).expect("live handle").topology_type);

                let dist_sq = context.dist_squared(entry.position, neighbor.position);
                let reactions = registry.spatial_reactions_by_type(entry.type_id, tt1, neighbor.type_id, tt2);

                for (reaction_idx, reaction) in reactions.into_iter().enumerate() {
                    if !reaction.allow_self_connection && entry.topology_index == neighbor.topology_index {
                        continue;
                    }
                    if dist_sq >= reaction.radius * reaction.radius {
                        continue;
                    }

                    cumulative_rate += reaction.rate;

                    let (topology_idx, topology_idx2, idx1, idx2, t1, t2) = match (entry_top, neighbor_top) {
                        (Some(h), None) => (h, None, p, q, entry.type_id, neighbor.type_id),
                        (None, Some(h)) => (h, None, q, p, neighbor.type_id, entry.type_id),
                        (Some(h1), Some(h2)) => (h1, Some(h2), p, q, entry.type_id, neighbor.type_id),
                        (None, None) => unreachable!("symmetry filter already skipped this pair"),
                    };

                    events.push(Event::Spatial {
                        topology_idx,
                        topology_idx2,
                        reaction_idx,
                        idx1,
                        idx2,
                        t1,
                        t2,
                        rate: reaction.rate,
                        cumulative_rate,
                    });
                }
            });
        }
    }

    events
}
