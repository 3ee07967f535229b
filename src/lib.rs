//! rxtop is a reactive topology engine for a reaction-diffusion
//! particle simulation: particles drift freely until a spatial or
//! structural reaction binds them into a topology, an undirected graph
//! tracked alongside the particle positions, which can itself grow,
//! split, or fuse with another topology as the simulation proceeds.
//!
//! This crate re-exports the engine and GEXF exporter; [`runner`]
//! wires both into a small standalone CLI demo binary.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

#[cfg(feature = "runner")]
pub mod runner;

pub use rxtop_core as core;
pub use rxtop_engine as engine;
pub use rxtop_gexf as gexf;
