//! Topology registry (C3): the catalog of topology types, their
//! structural reactions, and the spatial reaction rules keyed by
//! (particle type, topology type) pairs on either side.
//!
//! Reactions are a closed tagged variant rather than a class hierarchy
//! with virtual dispatch: a structural reaction's `execute` is captured
//! as a boxed function value per registry entry, matching the "closed
//! tagged variant... new reaction kinds are added by extending the
//! variant" design.
use std::collections::HashMap;

use rxtop_core::{ParticleType, TopologyType};

use crate::adapters::Context;
use crate::error::EngineError;
use crate::graph::Topology;

pub type ExecuteFn = Box<dyn Fn(&mut Topology, &dyn Context) -> Vec<Topology> + Send + Sync>;
pub type RateFn = Box<dyn Fn(&Topology) -> f64 + Send + Sync>;

pub struct StructuralReaction {
    pub topology_type: TopologyType,
    pub execute: ExecuteFn,
    pub rate: RateFn,
}

impl std::fmt::Debug for StructuralReaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuralReaction")
            .field("topology_type", &self.topology_type)
            .finish_non_exhaustive()
    }
}

/// A spatial reaction between two educts, each optionally bound inside
/// a topology. `top_type1`/`top_type2` of `None` encode "not inside a
/// topology" (the ⊥ of the spec).
#[derive(Debug, Clone, Copy)]
pub struct SpatialReaction {
    pub type1: ParticleType,
    pub top_type1: Option<TopologyType>,
    pub type2: ParticleType,
    pub top_type2: Option<TopologyType>,
    pub type_to1: ParticleType,
    pub type_to2: ParticleType,
    pub top_type_to1: Option<TopologyType>,
    pub top_type_to2: Option<TopologyType>,
    pub rate: f64,
    pub radius: f64,
    pub is_fusion: bool,
    pub allow_self_connection: bool,
}

impl SpatialReaction {
    fn matches_orientation(&self, t1: ParticleType, top1: Option<TopologyType>, t2: ParticleType, top2: Option<TopologyType>) -> bool {
        (self.type1 == t1 && self.top_type1 == top1 && self.type2 == t2 && self.top_type2 == top2)
            || (self.type1 == t2 && self.top_type1 == top2 && self.type2 == t1 && self.top_type2 == top1)
    }

    /// Resolves this reaction's output types for the concrete pair
    /// queried in `(t1, top1, t2, top2)` order, matching whichever of
    /// the reaction's two orientations applies. The returned tuple is
    /// `(type for the first educt, type for the second, same for the
    /// topology types)` — always in the caller's query order, not the
    /// registry's stored order.
    pub fn outcomes_for(
        &self,
        t1: ParticleType,
        top1: Option<TopologyType>,
        t2: ParticleType,
        top2: Option<TopologyType>,
    ) -> Result<(ParticleType, ParticleType, Option<TopologyType>, Option<TopologyType>), EngineError> {
        if self.type1 == t1 && self.top_type1 == top1 && self.type2 == t2 && self.top_type2 == top2 {
            Ok((self.type_to1, self.type_to2, self.top_type_to1, self.top_type_to2))
        } else if self.type1 == t2 && self.top_type1 == top2 && self.type2 == t1 && self.top_type2 == top1 {
            Ok((self.type_to2, self.type_to1, self.top_type_to2, self.top_type_to1))
        } else {
            Err(EngineError::OrientationMismatch)
        }
    }
}

#[derive(Debug, Default)]
pub struct TopologyRegistry {
    structural: HashMap<TopologyType, Vec<StructuralReaction>>,
    spatial: Vec<SpatialReaction>,
}

impl TopologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_structural_reaction(&mut self, reaction: StructuralReaction) {
        self.structural
            .entry(reaction.topology_type)
            .or_default()
            .push(reaction);
    }

    pub fn add_spatial_reaction(&mut self, reaction: SpatialReaction) {
        self.spatial.push(reaction);
    }

    pub fn structural_reactions_of(&self, top_type: TopologyType) -> &[StructuralReaction] {
        self.structural.get(&top_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lookups are symmetric in educt ordering: the registry stores one
    /// canonical direction per reaction and matches both orderings of
    /// the concrete observed pair.
    pub fn spatial_reactions_by_type(
        &self,
        t1: ParticleType,
        top1: Option<TopologyType>,
        t2: ParticleType,
        top2: Option<TopologyType>,
    ) -> Vec<&SpatialReaction> {
        self.spatial
            .iter()
            .filter(|r| r.matches_orientation(t1, top1, t2, top2))
            .collect()
    }

    pub fn is_spatial_reaction_type(&self, particle_type: ParticleType) -> bool {
        self.spatial
            .iter()
            .any(|r| r.type1 == particle_type || r.type2 == particle_type)
    }

    pub fn spatial_reaction_registry_empty(&self) -> bool {
        self.spatial.is_empty()
    }

    pub fn find_spatial_reaction(
        &self,
        t1: ParticleType,
        top1: Option<TopologyType>,
        t2: ParticleType,
        top2: Option<TopologyType>,
        reaction_idx: usize,
    ) -> Result<&SpatialReaction, EngineError> {
        self.spatial_reactions_by_type(t1, top1, t2, top2)
            .into_iter()
            .nth(reaction_idx)
            .ok_or(EngineError::ReactionNotFound)
    }
}
