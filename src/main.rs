//! kvolve command-line tool.
//!
//! Builds a random feed-forward network, feeds it random inputs, runs one
//! pass and prints or renders the resulting graph.
//!
//!   cargo run -- export --seed 7
//!   cargo run -- render --out test
//!   cargo run -- frame --out frame.png

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kvolve::render::{random_frame, Canvas};
use kvolve::{render_png, Network, RenderOptions, TopologySpec};
use rand::Rng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "kvolve")]
#[command(about = "Random feed-forward network builder and graph exporter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Args)]
struct TopologyArgs {
    /// JSON topology file; flags below override its fields
    #[arg(short, long)]
    config: Option<String>,

    /// Number of input terminals
    #[arg(long, allow_negative_numbers = true)]
    input: Option<i64>,

    /// Hidden layer size
    #[arg(long, allow_negative_numbers = true)]
    hidden: Option<i64>,

    /// Output layer size
    #[arg(long, allow_negative_numbers = true)]
    output: Option<i64>,

    /// Seed for weights, biases and input values
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the graph of one evaluated network
    Export {
        #[command(flatten)]
        topology: TopologyArgs,
    },

    /// Render the graph of one evaluated network to PNG with Graphviz
    Render {
        #[command(flatten)]
        topology: TopologyArgs,

        /// Output path without extension; writes <out>.png
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Keep the intermediate .dot file
        #[arg(long)]
        keep_dot: bool,

        /// Graphviz executable
        #[arg(long, default_value = "dot")]
        program: String,

        /// Per-attempt timeout in milliseconds
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,

        /// Maximum number of renderer runs
        #[arg(long, default_value = "8")]
        attempts: usize,
    },

    /// Write one random grid frame as PNG
    Frame {
        /// Output file
        #[arg(short, long, default_value = "frame.png")]
        out: PathBuf,

        /// Seed for the cell positions
        #[arg(long)]
        seed: Option<u64>,

        /// Number of cells
        #[arg(long, default_value = "101")]
        items: usize,
    },

    /// Write the default topology file
    InitConfig {
        /// Destination path
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Export { topology } => {
            let (_, network) = evaluated_network(&topology)?;
            println!("{}", network.export_graph());
        }
        Commands::Render { topology, out, keep_dot, program, timeout_ms, attempts } => {
            let (spec, network) = evaluated_network(&topology)?;
            let stem = out.unwrap_or_else(|| PathBuf::from(&spec.name));
            let options = RenderOptions {
                program,
                timeout: std::time::Duration::from_millis(timeout_ms),
                max_attempts: attempts,
                keep_dot_file: keep_dot,
                ..RenderOptions::default()
            };
            let png = render_png(&network.export_graph(), &stem, &options)
                .with_context(|| format!("rendering {}", stem.display()))?;
            println!("{}", png.display());
        }
        Commands::Frame { out, seed, items } => {
            let mut rng = seeded(seed);
            let frame = random_frame(0, &mut rng, items, 50);
            let bytes = Canvas::default().encode_png(&frame)?;
            std::fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
            info!(path = %out.display(), items, "wrote grid frame");
        }
        Commands::InitConfig { path } => {
            TopologySpec::default().save_json(&path)?;
        }
    }

    Ok(())
}

/// Resolves the topology, builds it, sets random inputs and runs one pass.
fn evaluated_network(args: &TopologyArgs) -> Result<(TopologySpec, Network)> {
    let mut spec = match &args.config {
        Some(path) => TopologySpec::load_json(path).with_context(|| format!("loading {}", path))?,
        None => TopologySpec::default(),
    };
    if let Some(v) = args.input {
        spec.input_size = v;
    }
    if let Some(v) = args.hidden {
        spec.hidden_size = v;
    }
    if let Some(v) = args.output {
        spec.output_size = v;
    }
    if args.seed.is_some() {
        spec.seed = args.seed;
    }

    let (input, hidden, output) = spec.layer_sizes()?;
    let mut rng = spec.rng();
    let mut network = kvolve::build_feed_forward(input, hidden, output, &mut rng)?;
    let values: Vec<f64> = (0..network.inputs().len()).map(|_| rng.gen::<f64>()).collect();
    network.set_inputs(&values)?;
    network.compute()?;

    info!(
        name = %spec.name,
        input, hidden, output,
        "evaluated network"
    );
    Ok((spec, network))
}

fn seeded(seed: Option<u64>) -> rand::rngs::StdRng {
    use rand::SeedableRng;
    match seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_entropy(),
    }
}
