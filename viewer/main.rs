//! kvolve viewer
//!
//! Live view of a random feed-forward network and the periodic random-grid
//! animation, served by a synchronous tiny_http server.
//!
//! Run with:
//!   cargo run --bin viewer --release
//! Then open http://127.0.0.1:7878

mod page;
mod routes;
mod sse;
mod state;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use kvolve::render::{animate, AnimationConfig};
use kvolve::TopologySpec;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tiny_http::Server;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use state::{SharedState, ViewerState};

#[derive(Parser)]
#[command(name = "viewer")]
#[command(about = "Live kvolve network and grid viewer", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: String,

    /// JSON topology file; defaults to 3-5-2
    #[arg(short, long)]
    config: Option<String>,

    /// Number of animation frames
    #[arg(long, default_value = "1000")]
    frames: u64,

    /// Milliseconds between frames
    #[arg(long, default_value = "500")]
    interval_ms: u64,

    /// Seed for the network and the animation
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(level).finish(),
    )?;

    let mut spec = match &cli.config {
        Some(path) => TopologySpec::load_json(path)?,
        None => TopologySpec::default(),
    };
    if cli.seed.is_some() {
        spec.seed = cli.seed;
    }

    let mut viewer = ViewerState::new(spec.build()?, seeded(cli.seed.map(|s| s.wrapping_add(1))));
    viewer.randomize_inputs()?;
    let shared_state: SharedState = Arc::new(Mutex::new(viewer));

    let animation = AnimationConfig {
        frames: cli.frames,
        interval: Duration::from_millis(cli.interval_ms),
        ..AnimationConfig::default()
    };
    spawn_animation(shared_state.clone(), animation, seeded(cli.seed.map(|s| s.wrapping_add(2))));

    let server = Server::http(&cli.addr).map_err(|e| anyhow!("failed to bind {}: {}", cli.addr, e))?;
    info!(addr = %cli.addr, "viewer listening; open http://{}", cli.addr);

    // One thread per request so the SSE stream does not stall page loads.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}

/// Publishes animation frames into the shared state until the run ends or
/// the state becomes unusable.
fn spawn_animation(state: SharedState, config: AnimationConfig, mut rng: StdRng) {
    thread::spawn(move || {
        let delivered = animate(&mut rng, config, |frame| match state.lock() {
            Ok(mut st) => {
                st.frame = Some(frame);
                true
            }
            Err(_) => false,
        });
        if let Ok(mut st) = state.lock() {
            st.finished = true;
        }
        info!(delivered, "animation finished");
    });
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
