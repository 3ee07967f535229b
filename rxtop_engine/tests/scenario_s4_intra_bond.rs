//! S4: a topology of four vertices forming a path 0-1-2-3. A fusion-
//! flagged spatial reaction is proposed between the two end particles,
//! which already live in the same topology — end to end through
//! [`Engine::perform`], this must add the bridging edge and retype,
//! never merge two separate topologies (there is only one here).
use rxtop_engine::adapters::{FixedNeighborList, Rng, SimpleContext};
use rxtop_engine::registry::{SpatialReaction, TopologyRegistry};
use rxtop_engine::{Engine, Topology};
use rxtop_core::{BoxGeometry, ParticleType, TopologyType, Vec3};

struct AlwaysFire;
impl Rng for AlwaysFire {
    fn uniform_real(&mut self) -> f64 {
        0.0
    }
}

fn context() -> SimpleContext {
    SimpleContext {
        box_size: BoxGeometry::new(Vec3::new(10.0, 10.0, 10.0), [false; 3]),
        k_bt: 1.0,
        time_step: 1.0,
        particle_types: Default::default(),
        eval_mode: Default::default(),
    }
}

#[test]
fn intra_topology_fusion_event_adds_a_bond_through_a_full_step() {
    let mut registry = TopologyRegistry::new();
    registry.add_spatial_reaction(SpatialReaction {
        type1: ParticleType(0),
        top_type1: Some(TopologyType(0)),
        type2: ParticleType(0),
        top_type2: Some(TopologyType(0)),
        type_to1: ParticleType(0),
        type_to2: ParticleType(0),
        top_type_to1: Some(TopologyType(9)),
        top_type_to2: None,
        rate: 5.0,
        radius: 1.0,
        is_fusion: true,
        allow_self_connection: true,
    });

    let mut engine = Engine::new(registry);
    let p0 = engine.spawn_particle(Vec3::new(0.0, 0.0, 0.0), ParticleType(0));
    let p1 = engine.spawn_particle(Vec3::new(1.0, 0.0, 0.0), ParticleType(0));
    let p2 = engine.spawn_particle(Vec3::new(2.0, 0.0, 0.0), ParticleType(0));
    let p3 = engine.spawn_particle(Vec3::new(3.0, 0.0, 0.0), ParticleType(0));

    let mut path = Topology::singleton(TopologyType(0), p0, ParticleType(0));
    let v0 = path.vertex_for_particle(p0).unwrap();
    let v1 = path.append_particle(v0, ParticleType(0), p1, ParticleType(0)).unwrap();
    let v2 = path.append_particle(v1, ParticleType(0), p2, ParticleType(0)).unwrap();
    let _v3 = path.append_particle(v2, ParticleType(0), p3, ParticleType(0)).unwrap();
    engine.seed_topology(path);

    let mut neighbors = FixedNeighborList::new();
    for p in [p0, p1, p2, p3] {
        neighbors.place(p);
    }
    neighbors.bond(p0, p3);

    let mut rng = AlwaysFire;
    let report = engine.perform(&neighbors, &mut rng, &context()).unwrap();

    assert_eq!(report.spatial_applied, 1);
    let live: Vec<_> = engine.topologies().iter_active().collect();
    assert_eq!(live.len(), 1, "no merge should have happened — it's the same topology on both sides");
    let (_, merged) = live[0];
    assert_eq!(merged.topology_type, TopologyType(9));
    assert_eq!(merged.n_particles(), 4);
    let mv0 = merged.vertex_for_particle(p0).unwrap();
    let mv3 = merged.vertex_for_particle(p3).unwrap();
    assert!(merged.contains_edge(mv0, mv3));
}
