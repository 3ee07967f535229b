//! S6: two topologies fuse into one. The GEXF export of the result
//! must carry exactly |V_A| + |V_B| node elements and
//! |E_A| + |E_B| + 1 edge elements — the "+1" being the bridge edge
//! the fusion itself adds.
use rxtop_core::{ParticleIndex, ParticleType, TopologyType};
use rxtop_engine::Topology;
use rxtop_gexf::to_gexf;

#[test]
fn fused_topology_gexf_has_the_expected_node_and_edge_counts() {
    let mut a = Topology::singleton(TopologyType(0), ParticleIndex::from(0usize), ParticleType(0));
    let a0 = a.vertex_for_particle(ParticleIndex::from(0usize)).unwrap();
    let a1 = a.append_particle(a0, ParticleType(0), ParticleIndex::from(1usize), ParticleType(0)).unwrap();

    let mut b = Topology::singleton(TopologyType(0), ParticleIndex::from(2usize), ParticleType(0));
    let b0 = b.vertex_for_particle(ParticleIndex::from(2usize)).unwrap();
    let b1 = b.append_particle(b0, ParticleType(0), ParticleIndex::from(3usize), ParticleType(0)).unwrap();
    let _b2 = b.append_particle(b1, ParticleType(0), ParticleIndex::from(4usize), ParticleType(0)).unwrap();

    let v_a_count = a.n_particles();
    let v_b_count = b.n_particles();
    let e_a_count = 1; // a is a 2-vertex path: one edge
    let e_b_count = 2; // b is a 3-vertex path: two edges

    a.append_topology(b, b0, ParticleType(1), a1, ParticleType(1), TopologyType(1)).unwrap();

    assert_eq!(a.n_particles(), v_a_count + v_b_count);

    let xml = to_gexf(&a);
    let node_count = xml.matches("<node ").count();
    let edge_count = xml.matches("<edge ").count();

    assert_eq!(node_count, v_a_count + v_b_count);
    assert_eq!(edge_count, e_a_count + e_b_count + 1);
}
