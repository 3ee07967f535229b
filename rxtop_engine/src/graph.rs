//! Topology graph (C2): an undirected labeled graph over vertices, each
//! bound to a particle index and particle type.
//!
//! Vertices are owned by their topology (arena + index, per the
//! cyclic-ownership design): a topology's vertex arena only ever grows
//! within its own lifetime, so a [`VertexHandle`] stays valid until the
//! whole topology is reaped. Fission and fusion never remove individual
//! vertices from a live topology; they either move a topology's entire
//! vertex set into another one or retire the topology as a whole.
use std::collections::{HashMap, HashSet};

use rxtop_core::{ParticleIndex, ParticleType, ParticleTypeRegistry, TopologyType};
use tinymap::{Key, TinyMap};

use crate::error::EngineError;
use crate::registry::StructuralReaction;

tinymap::key_type! {
    /// Handle to a vertex inside a single topology's graph.
    pub VertexHandle
}

#[derive(Debug)]
pub struct Vertex {
    pub particle_index: ParticleIndex,
    pub particle_type: ParticleType,
    adjacency: Vec<VertexHandle>,
}

#[derive(Debug)]
pub struct Topology {
    pub topology_type: TopologyType,
    vertices: TinyMap<VertexHandle, Vertex>,
    edges: HashSet<(VertexHandle, VertexHandle)>,
    by_particle: HashMap<ParticleIndex, VertexHandle>,
    rates: Vec<f64>,
    pub deactivated: bool,
}

fn normalize(a: VertexHandle, b: VertexHandle) -> (VertexHandle, VertexHandle) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

impl Topology {
    /// Creates a topology containing a single vertex.
    pub fn singleton(topology_type: TopologyType, particle_index: ParticleIndex, particle_type: ParticleType) -> Self {
        let mut vertices = TinyMap::new();
        let handle = vertices.insert(Vertex {
            particle_index,
            particle_type,
            adjacency: Vec::new(),
        });
        let mut by_particle = HashMap::new();
        by_particle.insert(particle_index, handle);
        Self {
            topology_type,
            vertices,
            edges: HashSet::new(),
            by_particle,
            rates: Vec::new(),
            deactivated: false,
        }
    }

    pub fn vertex(&self, v: VertexHandle) -> &Vertex {
        &self.vertices[v]
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexHandle, &Vertex)> {
        self.vertices.iter()
    }

    pub fn n_particles(&self) -> usize {
        self.vertices.len()
    }

    pub fn particles(&self) -> impl Iterator<Item = ParticleIndex> + '_ {
        self.vertices.values().map(|v| v.particle_index)
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn vertex_for_particle(&self, p: ParticleIndex) -> Option<VertexHandle> {
        self.by_particle.get(&p).copied()
    }

    /// True iff this topology has collapsed to a single vertex whose
    /// particle type carries a non-topology flavor — the singleton
    /// demotion condition.
    pub fn is_normal_particle(&self, registry: &ParticleTypeRegistry) -> bool {
        if self.vertices.len() != 1 {
            return false;
        }
        let only = self.vertices.values().next().expect("checked len == 1");
        registry.is_normal_flavor(only.particle_type)
    }

    pub fn contains_edge(&self, v1: VertexHandle, v2: VertexHandle) -> bool {
        self.edges.contains(&normalize(v1, v2))
    }

    /// Edges as particle index pairs, in arbitrary order — the shape a
    /// format exporter needs rather than the internal vertex handles.
    pub fn particle_edges(&self) -> impl Iterator<Item = (ParticleIndex, ParticleIndex)> + '_ {
        self.edges
            .iter()
            .map(|&(a, b)| (self.vertices[a].particle_index, self.vertices[b].particle_index))
    }

    /// Idempotent: adding an already-present edge is a no-op. Fails
    /// with [`EngineError::InvariantViolation`] on a self-loop.
    pub fn add_edge(&mut self, v1: VertexHandle, v2: VertexHandle) -> Result<(), EngineError> {
        if v1 == v2 {
            return Err(EngineError::InvariantViolation(format!(
                "self-loop on vertex {v1:?}"
            )));
        }
        let key = normalize(v1, v2);
        if self.edges.insert(key) {
            self.vertices[v1].adjacency.push(v2);
            self.vertices[v2].adjacency.push(v1);
        }
        Ok(())
    }

    pub fn set_vertex_type(&mut self, v: VertexHandle, new_type: ParticleType) {
        self.vertices[v].particle_type = new_type;
    }

    /// Adds a new vertex for `new_particle_index` bonded to
    /// `existing_v`, and retypes `existing_v` in the same motion (the
    /// two particles of a topology–particle fusion are always retyped
    /// together per the reaction's orientation).
    pub fn append_particle(
        &mut self,
        existing_v: VertexHandle,
        new_particle_type: ParticleType,
        new_particle_index: ParticleIndex,
        existing_vertex_new_type: ParticleType,
    ) -> Result<VertexHandle, EngineError> {
        self.set_vertex_type(existing_v, existing_vertex_new_type);
        let new_handle = self.vertices.insert(Vertex {
            particle_index: new_particle_index,
            particle_type: new_particle_type,
            adjacency: Vec::new(),
        });
        self.by_particle.insert(new_particle_index, new_handle);
        self.add_edge(existing_v, new_handle)?;
        Ok(new_handle)
    }

    /// Moves every vertex and edge of `other` into `self`, retypes the
    /// two bridging endpoints, adds the bridge edge, and sets `self`'s
    /// new topology type. `other` is left empty; the caller is
    /// responsible for retiring its handle in the topology store.
    ///
    /// Does **not** touch any [`crate::particle::ParticleStore`]:
    /// rewriting the `topology_index` of every particle transferred
    /// from `other` is the executor's responsibility, performed before
    /// this call using `other.particles()` (mirrors the original
    /// kernel, which rewrites indices before merging the graphs).
    pub fn append_topology(
        &mut self,
        other: Topology,
        v_in_other: VertexHandle,
        other_new_type: ParticleType,
        v_in_self: VertexHandle,
        self_new_type: ParticleType,
        new_topology_type: TopologyType,
    ) -> Result<(), EngineError> {
        let mut remap: HashMap<VertexHandle, VertexHandle> = HashMap::new();
        for (old_handle, vertex) in other.vertices.iter() {
            let new_handle = self.vertices.insert(Vertex {
                particle_index: vertex.particle_index,
                particle_type: vertex.particle_type,
                adjacency: Vec::new(),
            });
            self.by_particle.insert(vertex.particle_index, new_handle);
            remap.insert(old_handle, new_handle);
        }
        for (a, b) in other.edges.iter().copied() {
            self.add_edge(remap[&a], remap[&b])?;
        }

        self.set_vertex_type(v_in_self, self_new_type);
        let bridged_other_v = *remap
            .get(&v_in_other)
            .ok_or_else(|| EngineError::InvariantViolation("v_in_other not in merged topology".into()))?;
        self.set_vertex_type(bridged_other_v, other_new_type);
        self.add_edge(v_in_self, bridged_other_v)?;

        self.topology_type = new_topology_type;
        Ok(())
    }

    /// Recomputes derived per-vertex adjacency-adjacent bookkeeping.
    /// There is no potential-specific "bond table" in scope here (that
    /// lives with the diffusion stepper's potentials, out of scope);
    /// this rebuilds the particle→vertex lookup table, the one derived
    /// structure the engine itself relies on.
    pub fn configure(&mut self) {
        self.by_particle.clear();
        for (handle, vertex) in self.vertices.iter() {
            self.by_particle.insert(vertex.particle_index, handle);
        }
    }

    pub fn update_reaction_rates(&mut self, reactions: &[StructuralReaction]) {
        let rates = reactions.iter().map(|r| (r.rate)(self)).collect();
        self.rates = rates;
    }

    /// Connected components by vertex handle, useful for authoring a
    /// structural split reaction's `execute` closure.
    pub fn connected_components(&self) -> Vec<Vec<VertexHandle>> {
        let mut seen: HashSet<VertexHandle> = HashSet::new();
        let mut components = Vec::new();
        for (start, _) in self.vertices.iter() {
            if seen.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                if !seen.insert(v) {
                    continue;
                }
                component.push(v);
                for &n in &self.vertices[v].adjacency {
                    if !seen.contains(&n) {
                        stack.push(n);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_type_registry() -> ParticleTypeRegistry {
        ParticleTypeRegistry::new()
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut t = Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0));
        let v1 = t.vertex_for_particle(ParticleIndex::from(0)).unwrap();
        let v2 = t
            .append_particle(v1, ParticleType(1), ParticleIndex::from(1), ParticleType(0))
            .unwrap();
        assert!(t.contains_edge(v1, v2));
        t.add_edge(v1, v2).unwrap();
        t.add_edge(v2, v1).unwrap();
        assert_eq!(t.edges.len(), 1);
    }

    #[test]
    fn self_loop_is_invariant_violation() {
        let mut t = Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0));
        let v1 = t.vertex_for_particle(ParticleIndex::from(0)).unwrap();
        assert!(matches!(
            t.add_edge(v1, v1),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn is_normal_particle_after_singleton_demotion() {
        let registry = particle_type_registry();
        let t = Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0));
        assert!(t.is_normal_particle(&registry));
    }

    #[test]
    fn append_topology_merges_vertices_and_edges() {
        let mut a = Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0));
        let av = a.vertex_for_particle(ParticleIndex::from(0)).unwrap();

        let b = Topology::singleton(TopologyType(0), ParticleIndex::from(1), ParticleType(0));
        let bv = b.vertex_for_particle(ParticleIndex::from(1)).unwrap();

        a.append_topology(b, bv, ParticleType(2), av, ParticleType(3), TopologyType(1))
            .unwrap();

        assert_eq!(a.n_particles(), 2);
        assert_eq!(a.topology_type, TopologyType(1));
        let merged_v = a.vertex_for_particle(ParticleIndex::from(1)).unwrap();
        assert!(a.contains_edge(av, merged_v));
    }

    #[test]
    fn connected_components_splits_disjoint_vertices() {
        let mut t = Topology::singleton(TopologyType(0), ParticleIndex::from(0), ParticleType(0));
        let v0 = t.vertex_for_particle(ParticleIndex::from(0)).unwrap();
        let v1 = t
            .append_particle(v0, ParticleType(0), ParticleIndex::from(1), ParticleType(0))
            .unwrap();
        let _ = t
            .vertices
            .insert(Vertex {
                particle_index: ParticleIndex::from(2),
                particle_type: ParticleType(0),
                adjacency: Vec::new(),
            });
        let components = t.connected_components();
        assert_eq!(components.len(), 2);
        let sizes: HashSet<usize> = components.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, HashSet::from([2, 1]));
        // sanity: the two-vertex component is the bonded pair
        assert!(components.iter().any(|c| c.contains(&v0) && c.contains(&v1)));
    }
}
