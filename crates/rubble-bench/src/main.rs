//! Headless sandbox runner: the frame loop without a window, fed by a
//! scripted input schedule. Prints the final state digest.

mod host;
mod logging;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rubble_sim::{run, Sandbox, SandboxConfig};
use tracing::info;

use crate::host::HeadlessHost;
use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "rubble-bench", about = "Run the debris sandbox without a window")]
struct Args {
    /// JSON config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Debris population
    #[arg(long)]
    objects: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated frame rate when not running in real time
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// JSON input schedule
    #[arg(long)]
    script: Option<PathBuf>,
    /// Log the world debug block every N ticks (0 = off)
    #[arg(long)]
    print_every: Option<u32>,
    /// Log HUD lines every N frames (0 = off)
    #[arg(long, default_value_t = 0)]
    hud_every: u64,
    /// Pace frames against the wall clock instead of a fixed frame time
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => SandboxConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SandboxConfig::default(),
    };
    if let Some(n) = args.objects { cfg.debris.count = n; }
    if let Some(s) = args.seed { cfg.seed = Some(s); }
    if let Some(n) = args.print_every { cfg.debug.print_every = n; }
    anyhow::ensure!(args.fps.is_finite() && args.fps > 0.0, "--fps must be positive, got {}", args.fps);

    let script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };

    let mut sandbox = Sandbox::new(cfg).context("building sandbox")?;
    let mut host = HeadlessHost::new(args.frames, args.fps, args.realtime, args.hud_every, script);
    let frames = run(&mut sandbox, &mut host);

    let digest = blake3::Hash::from(sandbox.digest());
    info!(
        frames,
        ticks = sandbox.world().tick_index(),
        capped = host.capped_frames(),
        seed = sandbox.seed(),
        "run finished"
    );
    println!("seed {}  frames {}  digest {}", sandbox.seed(), frames, digest.to_hex());
    Ok(())
}
