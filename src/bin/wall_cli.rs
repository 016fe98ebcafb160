//! Wall layout CLI
//!
//! Generates a wall, partitions it and prints the layout with each brick's
//! stride, optionally after placing the first N bricks.
//!
//! ```bash
//! cargo run --bin wall_cli --features cli -- --width 20 --height 8 --bond flemish \
//!     --mode optimal-strides --stride-width 14 --stride-height 4
//! cargo run --bin wall_cli --features cli -- --width 12 --height 6 --bond wildverband --format yaml
//! ```

use std::collections::HashMap;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use wall_builder::config::{ReachEnvelope, WallConfig, DEFAULT_STRIDE_HEIGHT, DEFAULT_STRIDE_WIDTH};
use wall_builder::sequencer::{BuildProgress, BuildSequencer};
use wall_builder::stride::StrideBounds;
use wall_builder::wall::{BrickId, WallSnapshot};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate and sequence a brick wall", long_about = None)]
struct Args {
    /// Wall width in half bricks
    #[arg(long)]
    width: i64,

    /// Number of courses
    #[arg(long)]
    height: i64,

    /// stretcher, flemish, english or wildverband
    #[arg(long, default_value = "stretcher")]
    bond: String,

    /// left-to-right or optimal-strides
    #[arg(long, default_value = "left-to-right")]
    mode: String,

    /// Stride width in quarter-brick modules
    #[arg(long, env = "WALL_STRIDE_WIDTH", default_value_t = DEFAULT_STRIDE_WIDTH)]
    stride_width: u32,

    /// Stride height in courses
    #[arg(long, env = "WALL_STRIDE_HEIGHT", default_value_t = DEFAULT_STRIDE_HEIGHT)]
    stride_height: u32,

    /// Place this many bricks before printing
    #[arg(long, default_value_t = 0)]
    place: usize,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Report {
    progress: BuildProgress,
    strides: Vec<StrideBounds>,
    build_order: Vec<BrickId>,
    wall: WallSnapshot,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = WallConfig::new(args.width, args.height, &args.bond, &args.mode)?;
    let reach = ReachEnvelope::new(args.stride_width, args.stride_height)?;
    let mut sequencer = BuildSequencer::init(config, reach)?;

    for _ in 0..args.place {
        sequencer.advance()?;
    }

    match args.format {
        OutputFormat::Text => print!("{}", render(&sequencer)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report(&sequencer))
                .context("Failed to serialize report")?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml =
                serde_yaml::to_string(&report(&sequencer)).context("Failed to serialize report")?;
            print!("{yaml}");
        }
    }

    Ok(())
}

fn report(sequencer: &BuildSequencer) -> Report {
    Report {
        progress: sequencer.progress(),
        strides: sequencer.strides().iter().map(|s| s.bounds).collect(),
        build_order: sequencer.build_order().iter().map(|(id, _)| *id).collect(),
        wall: sequencer.snapshot(),
    }
}

/// Top course first. Each module is one character: the owning stride's
/// symbol, upper case once placed.
fn render(sequencer: &BuildSequencer) -> String {
    let owners: HashMap<BrickId, usize> = sequencer.build_order().iter().copied().collect();
    let mut out = String::new();

    for course in sequencer.wall().courses().iter().rev() {
        out.push('|');
        for (index, brick) in course.bricks.iter().enumerate() {
            let owner = owners.get(&BrickId::new(course.row, index)).copied().unwrap_or(0);
            let symbol = stride_symbol(owner, brick.placed);
            out.extend(std::iter::repeat(symbol).take(brick.width as usize));
            out.push('|');
        }
        out.push('\n');
    }

    let progress = sequencer.progress();
    out.push_str(&format!(
        "{} / {} bricks placed, {} strides, {:?}\n",
        progress.placed, progress.total, progress.stride_count, progress.state
    ));
    out
}

fn stride_symbol(stride: usize, placed: bool) -> char {
    const SYMBOLS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    let symbol = SYMBOLS[stride % SYMBOLS.len()] as char;
    if placed {
        symbol.to_ascii_uppercase()
    } else {
        symbol
    }
}
