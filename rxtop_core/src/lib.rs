//! Core value types shared by the topology engine and its format adapters.

pub mod box_geometry;
pub mod keys;
pub mod particle_type;
pub mod vec3;

pub use box_geometry::BoxGeometry;
pub use keys::{ParticleIndex, TopologyHandle};
pub use particle_type::{
    ParticleFlavor, ParticleType, ParticleTypeInfo, ParticleTypeRegistry, TopologyType,
};
pub use vec3::Vec3;
