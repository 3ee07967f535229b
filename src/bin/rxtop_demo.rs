//! rxtop-demo: runs a small fixed reaction-diffusion topology scenario
//! and prints a summary, optionally exporting surviving topologies as
//! GEXF.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    rxtop::runner::run()
}
