//! GEXF 1.2 export for a single topology graph.
//!
//! Node identity in the exported format is particle identity, not the
//! topology's internal vertex handle: two exports of the same topology
//! taken at different times will assign the same node id to the same
//! particle even if vertex handles were reused or renumbered in
//! between, since [`ParticleIndex`](rxtop_core::ParticleIndex) is what
//! gets written out.
use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use rxtop_engine::Topology;
use tinymap::Key;

#[derive(thiserror::Error, Debug)]
pub enum GexfError {
    #[error("failed to write GEXF XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to encode GEXF output as UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders `topology` as a static, undirected GEXF 1.2 document. Node
/// ids are particle indices; edge ids are a 0-based counter over the
/// topology's edge set in iteration order.
///
/// Writing into an in-memory buffer of well-formed element names and
/// decimal-digit attribute values cannot actually fail; `render`
/// carries the `Result` for callers that want it, but this is the
/// entry point every other crate in the workspace uses.
pub fn to_gexf(topology: &Topology) -> String {
    render(topology).expect("writing GEXF into an in-memory buffer cannot fail")
}

/// The fallible form of [`to_gexf`], kept separate so the `quick_xml`
/// error surface isn't hidden from a caller who wants it.
pub fn render(topology: &Topology) -> Result<String, GexfError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(quick_xml::events::BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gexf = BytesStart::new("gexf");
    gexf.push_attribute(("xmlns", "http://www.gexf.net/1.2draft"));
    gexf.push_attribute(("version", "1.2"));
    writer.write_event(Event::Start(gexf))?;

    let mut graph = BytesStart::new("graph");
    graph.push_attribute(("mode", "static"));
    graph.push_attribute(("defaultedgetype", "undirected"));
    writer.write_event(Event::Start(graph))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for (_, vertex) in topology.vertices() {
        let mut node = BytesStart::new("node");
        node.push_attribute(("id", vertex.particle_index.index().to_string().as_str()));
        writer.write_event(Event::Empty(node))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (id, (p1, p2)) in topology.particle_edges().enumerate() {
        let mut edge = BytesStart::new("edge");
        edge.push_attribute(("id", id.to_string().as_str()));
        edge.push_attribute(("source", p1.index().to_string().as_str()));
        edge.push_attribute(("target", p2.index().to_string().as_str()));
        writer.write_event(Event::Empty(edge))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}
