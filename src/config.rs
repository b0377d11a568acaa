use crate::buffer::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::device::{DEFAULT_LUT_DIR, DEFAULT_TIMEOUT_MS};
use crate::prefs::SlmPrefs;
use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "slm_holo", version, about = "Phase hologram generator for spatial light modulators")]
pub struct Config {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// LUT profile (global, local, linear) or a calibration file path.
    #[arg(long, default_value = "global")]
    pub lut: String,

    #[arg(long)]
    pub lut_dir: Option<PathBuf>,

    /// Wavefront-correction file: 19 Zernike weights, one per line.
    #[arg(long)]
    pub wfc: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub apply_wfc: bool,

    #[arg(long, value_enum, default_value_t = SinkMode::Preview)]
    pub sink: SinkMode,

    #[arg(long, default_value = "hologram.pgm")]
    pub out: PathBuf,

    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    /// Prefs file; defaults to the per-user config location.
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub pattern: PatternCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PatternCommand {
    /// Uniform gray level.
    Blank {
        #[arg(long, default_value_t = 0)]
        value: u8,
    },
    /// Vertical binary stripes.
    Stripes {
        #[arg(long, default_value_t = 0)]
        gray1: u8,
        #[arg(long, default_value_t = 255)]
        gray2: u8,
        #[arg(long, default_value_t = 8)]
        width: usize,
    },
    Checkerboard {
        #[arg(long, default_value_t = 16)]
        period: usize,
    },
    /// Tilt-only Zernike surface.
    Blazed {
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
    },
    /// Macropixels carrying 0, 1, .. length-1.
    Ramp {
        #[arg(long, default_value_t = 256)]
        length: usize,
        #[arg(long, default_value_t = 50)]
        macropixel: usize,
    },
    Macropixels {
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<u8>,
        #[arg(long, default_value_t = 50)]
        macropixel: usize,
    },
    /// One row of a Sylvester-Hadamard basis as macropixels.
    Hadamard {
        #[arg(long, default_value_t = 256)]
        length: usize,
        #[arg(long, default_value_t = 0)]
        row: usize,
        #[arg(long, default_value_t = 50)]
        macropixel: usize,
        /// Byte for +1 entries (default: raw cast, 1).
        #[arg(long)]
        plus: Option<u8>,
        /// Byte for -1 entries (default: raw cast, 255).
        #[arg(long)]
        minus: Option<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkMode {
    #[value(alias = "screen")]
    Preview,
    #[value(alias = "file")]
    Pgm,
    /// Only hand the frame to the device.
    Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}

/// CLI flags layered over the prefs file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub lut_dir: PathBuf,
    pub wfc_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 {
            bail!("--width must be >= 1");
        }
        if self.height == 0 {
            bail!("--height must be >= 1");
        }
        if self.timeout_ms == Some(0) {
            bail!("--timeout-ms must be >= 1");
        }
        Ok(())
    }

    pub fn settings(&self, prefs: &SlmPrefs) -> Settings {
        let lut_dir = self
            .lut_dir
            .clone()
            .or_else(|| prefs.lut_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LUT_DIR));
        let wfc_path = self.wfc.clone().or_else(|| prefs.wfc_path.clone());
        let timeout_ms = self
            .timeout_ms
            .or(prefs.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Settings {
            lut_dir,
            wfc_path,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}
