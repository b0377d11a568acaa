use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use slm_holo::buffer::{Canvas, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use slm_holo::sink::write_pgm;
use slm_holo::slm::{HadamardLevels, Slm};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT_DIR: &str = "hadamard_frames";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hadamard_sweep",
    version,
    about = "Export a Hadamard macropixel basis as PGM frames"
)]
pub(crate) struct Cli {
    #[arg(long, default_value_t = 256)]
    pub(crate) length: usize,

    #[arg(long, default_value_t = 50)]
    pub(crate) macropixel: usize,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub(crate) height: usize,

    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub(crate) out: PathBuf,

    #[arg(long, default_value_t = 0)]
    pub(crate) first: usize,

    #[arg(long, value_name = "ROWS")]
    pub(crate) count: Option<usize>,

    #[arg(long)]
    pub(crate) plus: Option<u8>,

    #[arg(long)]
    pub(crate) minus: Option<u8>,

    /// Wavefront correction composed onto every frame.
    #[arg(long, value_name = "FILE")]
    pub(crate) wfc: Option<PathBuf>,
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.macropixel == 0 {
        bail!("--macropixel must be >= 1");
    }
    if !args.length.is_power_of_two() {
        bail!("--length must be a power of two (got {})", args.length);
    }
    if args.count == Some(0) {
        bail!("--count must be >= 1");
    }
    Ok(())
}

/// Rows exported for a basis of `length`, clipped to the basis size.
pub(crate) fn compute_row_range(length: usize, first: usize, count: Option<usize>) -> Result<Range<usize>> {
    if first >= length {
        bail!("--first {} out of range (0..{})", first, length.saturating_sub(1));
    }
    let end = match count {
        Some(n) => first.saturating_add(n).min(length),
        None => length,
    };
    Ok(first..end)
}

pub(crate) fn frame_path(dir: &Path, row: usize, length: usize) -> PathBuf {
    let digits = length.saturating_sub(1).max(1).to_string().len();
    dir.join(format!("hadamard_{length}_{row:0digits$}.pgm"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;
    let rows = compute_row_range(args.length, args.first, args.count)?;

    let mut slm = Slm::new(Canvas::new(args.width, args.height)?);
    let raw = HadamardLevels::default();
    slm.set_hadamard_levels(HadamardLevels {
        plus: args.plus.unwrap_or(raw.plus),
        minus: args.minus.unwrap_or(raw.minus),
    });
    if let Some(path) = &args.wfc {
        slm.load_wfc(path)
            .with_context(|| format!("load wavefront correction {}", path.display()))?;
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output directory {}", args.out.display()))?;

    let start = Instant::now();
    let frame_count = rows.len();
    for row in rows {
        let mut holo = slm
            .hadamard_pattern(args.length, row, args.macropixel)
            .with_context(|| format!("generate hadamard row {row}"))?;
        if args.wfc.is_some() {
            holo = slm.apply_wavefront_correction(&holo)?;
        }
        write_pgm(&frame_path(&args.out, row, args.length), &holo)?;
    }

    println!(
        "exported {} frames ({}x{}, length {}, macropixel {}) in {:.3}s -> {}",
        frame_count,
        args.width,
        args.height,
        args.length,
        args.macropixel,
        start.elapsed().as_secs_f64(),
        args.out.display()
    );
    Ok(())
}
