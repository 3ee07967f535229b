//! Particle and topology type identifiers.
//!
//! Mirrors the type-info/flavor split of a typical particle-type
//! registry: a type id is just a small integer, but a particle type
//! additionally carries a "flavor" describing how it participates in
//! topologies.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleType(pub u16);

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticleType({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopologyType(pub u16);

impl fmt::Display for TopologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopologyType({})", self.0)
    }
}

/// How a particle type participates in the topology graph.
///
/// `Normal` particles never belong to a topology; `Topology` particles
/// are the ones a topology's graph is built from. There is no
/// `Membrane` variant here: membrane-flavored particles are a spatial
/// extension the surface/area reactions of the original kernel use, out
/// of scope for a reaction-diffusion topology engine with no surface
/// potentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleFlavor {
    Normal,
    Topology,
}

#[derive(Debug, Clone, Copy)]
pub struct ParticleTypeInfo {
    pub type_id: ParticleType,
    pub flavor: ParticleFlavor,
}

impl ParticleTypeInfo {
    pub fn is_normal_flavor(&self) -> bool {
        matches!(self.flavor, ParticleFlavor::Normal)
    }
}

/// Maps particle type ids to their registered flavor.
///
/// A type with no registered info defaults to `Normal`, matching a
/// freshly-added particle type before anyone calls `add` with an
/// explicit flavor.
#[derive(Debug, Default, Clone)]
pub struct ParticleTypeRegistry {
    flavors: std::collections::HashMap<ParticleType, ParticleFlavor>,
}

impl ParticleTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, type_id: ParticleType, flavor: ParticleFlavor) {
        self.flavors.insert(type_id, flavor);
    }

    pub fn flavor_of(&self, type_id: ParticleType) -> ParticleFlavor {
        self.flavors.get(&type_id).copied().unwrap_or(ParticleFlavor::Normal)
    }

    pub fn is_normal_flavor(&self, type_id: ParticleType) -> bool {
        matches!(self.flavor_of(type_id), ParticleFlavor::Normal)
    }
}
