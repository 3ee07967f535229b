//! A small standalone demo: seeds a line of singleton topologies,
//! registers one spatial fusion reaction, steps the engine, and
//! optionally writes a GEXF snapshot of every surviving topology.
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use tracing::info;

use rxtop_core::{BoxGeometry, ParticleType, TopologyType, Vec3};
use rxtop_engine::adapters::{EvalMode, FixedNeighborList, RandRng, SimpleContext};
use rxtop_engine::registry::{SpatialReaction, TopologyRegistry};
use rxtop_engine::{Engine, StepReport};
use tinymap::Key;

#[derive(Parser, Debug)]
#[command(about = "Runs a small demo reaction-diffusion topology simulation")]
pub struct Args {
    /// Number of steps to perform.
    #[arg(long, default_value_t = 100)]
    pub steps: u64,

    /// RNG seed, for reproducible runs.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Event time step.
    #[arg(long, default_value_t = 0.1)]
    pub dt: f64,

    /// Edge length of the (non-periodic) cubic simulation box.
    #[arg(long, default_value_t = 10.0)]
    pub box_size: f64,

    /// Number of singleton topologies placed on a line, 0.5 apart, so
    /// neighboring pairs start out in range of the fusion reaction.
    #[arg(long, default_value_t = 8)]
    pub seed_topologies: usize,

    /// Write a GEXF snapshot of every surviving topology to this
    /// directory after the run.
    #[arg(long)]
    pub gexf_out: Option<PathBuf>,

    /// Use the cheaper `rate * dt` firing probability instead of the
    /// exact `1 - exp(-rate * dt)` discretization.
    #[arg(long, default_value_t = false)]
    pub approximated: bool,
}

/// Total counts accumulated across every step of a demo run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunReport {
    pub structural_applied: usize,
    pub spatial_applied: usize,
}

impl RunReport {
    fn accumulate(&mut self, step: StepReport) {
        self.structural_applied += step.structural_applied;
        self.spatial_applied += step.spatial_applied;
    }
}

/// Entry point for the `rxtop-demo` binary: parses arguments from
/// `std::env::args` and runs the demo scenario described by them.
pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let (engine, report) = run_with(&args)?;

    info!(
        steps = args.steps,
        topologies_remaining = engine.topologies().iter_active().count(),
        structural_applied = report.structural_applied,
        spatial_applied = report.spatial_applied,
        "demo run complete"
    );

    if let Some(dir) = &args.gexf_out {
        std::fs::create_dir_all(dir).with_context(|| format!("creating GEXF output dir {}", dir.display()))?;
        for (handle, topology) in engine.topologies().iter_active() {
            let xml = rxtop_gexf::to_gexf(topology);
            let path = dir.join(format!("topology-{}.gexf", handle.index()));
            std::fs::write(&path, xml).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote GEXF snapshot");
        }
    }

    Ok(())
}

/// Builds the demo scenario and runs it for `args.steps` steps,
/// without touching `std::env::args` — used directly by tests.
pub fn run_with(args: &Args) -> anyhow::Result<(Engine, RunReport)> {
    let mut registry = TopologyRegistry::new();
    registry.add_spatial_reaction(SpatialReaction {
        type1: ParticleType(0),
        top_type1: Some(TopologyType(0)),
        type2: ParticleType(0),
        top_type2: Some(TopologyType(0)),
        type_to1: ParticleType(1),
        type_to2: ParticleType(1),
        top_type_to1: Some(TopologyType(1)),
        top_type_to2: None,
        rate: 10.0,
        radius: 1.0,
        is_fusion: true,
        allow_self_connection: true,
    });

    let mut engine = Engine::new(registry);
    let mut neighbors = FixedNeighborList::new();
    let mut previous = None;
    for i in 0..args.seed_topologies {
        let position = Vec3::new(0.5 * i as f64, 0.0, 0.0);
        let (particle, _handle) = engine.spawn_topology(position, ParticleType(0), TopologyType(0));
        neighbors.place(particle);
        if let Some(prev) = previous {
            neighbors.bond(prev, particle);
        }
        previous = Some(particle);
    }

    let context = SimpleContext {
        box_size: BoxGeometry::new(Vec3::new(args.box_size, args.box_size, args.box_size), [false; 3]),
        k_bt: 1.0,
        time_step: args.dt,
        particle_types: Default::default(),
        eval_mode: if args.approximated { EvalMode::Approximated } else { EvalMode::Exact },
    };
    let mut rng = RandRng(ChaCha8Rng::seed_from_u64(args.seed));

    let mut total = RunReport::default();
    for step in 0..args.steps {
        let report = engine
            .perform(&neighbors, &mut rng, &context)
            .with_context(|| format!("engine step {step} failed"))?;
        total.accumulate(report);
    }

    Ok((engine, total))
}
