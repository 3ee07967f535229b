//! Arena handles for the topology engine.
//!
//! Every handle is a small, `Copy` newtype minted by insertion order and
//! never reused within a step, so it stays valid across graph surgery
//! until the engine explicitly retires the slot it names.

tinymap::key_type! {
    /// Handle to a particle entry in the particle store.
    ///
    /// This is also the id written out by the GEXF exporter for a graph
    /// node: node identity in the exported format is particle identity,
    /// not vertex identity.
    pub ParticleIndex
}

tinymap::key_type! {
    /// Handle to a topology in the topology store.
    pub TopologyHandle
}
