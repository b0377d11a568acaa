use crate::buffer::{Canvas, PixelBuffer};
use crate::error::{PatternError, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LUT_DIR: &str =
    "C:\\Program Files\\Meadowlark Optics\\Blink OverDrive Plus\\LUT Files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LutProfile {
    Global,
    Local,
    Linear,
}

impl LutProfile {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Global => "SN5721_WL532_Global.lut",
            Self::Local => "SN5721_WL532_Local.txt",
            Self::Linear => "12bit_linear.lut",
        }
    }

    pub fn resolve(self, lut_dir: &Path) -> PathBuf {
        lut_dir.join(self.file_name())
    }
}

/// Named profile or an explicit calibration file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LutSelection {
    Profile(LutProfile),
    File(PathBuf),
}

impl LutSelection {
    /// Profile names are matched case-insensitively; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        match LutProfile::from_str(raw.trim(), true) {
            Ok(profile) => Self::Profile(profile),
            Err(_) => Self::File(PathBuf::from(raw.trim())),
        }
    }

    pub fn resolve(&self, lut_dir: &Path) -> PathBuf {
        match self {
            Self::Profile(profile) => profile.resolve(lut_dir),
            Self::File(path) => path.clone(),
        }
    }
}

/// Hardware collaborator. Implementations own device lifetime; the pattern
/// engine only reads the canvas and hands over finished buffers.
pub trait SlmDevice {
    fn canvas(&self) -> Canvas;
    fn load_lut(&mut self, path: &Path) -> Result<()>;
    fn write_image(&mut self, holo: &PixelBuffer, timeout: Duration) -> Result<()>;
}

/// In-memory stand-in that records what the hardware would have received.
#[derive(Debug)]
pub struct VirtualDevice {
    canvas: Canvas,
    lut: Option<PathBuf>,
    last_frame: Option<PixelBuffer>,
    frames_written: usize,
}

impl VirtualDevice {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            lut: None,
            last_frame: None,
            frames_written: 0,
        }
    }

    pub fn lut(&self) -> Option<&Path> {
        self.lut.as_deref()
    }

    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last_frame.as_ref()
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl SlmDevice for VirtualDevice {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn load_lut(&mut self, path: &Path) -> Result<()> {
        tracing::info!(lut = %path.display(), "virtual device LUT selected");
        self.lut = Some(path.to_path_buf());
        Ok(())
    }

    fn write_image(&mut self, holo: &PixelBuffer, timeout: Duration) -> Result<()> {
        if holo.canvas() != self.canvas {
            return Err(PatternError::InvalidDimension(format!(
                "device expects {}x{} frames, got {}x{}",
                self.canvas.width,
                self.canvas.height,
                holo.width(),
                holo.height()
            )));
        }
        tracing::debug!(timeout_ms = timeout.as_millis() as u64, "virtual frame write");
        self.last_frame = Some(holo.clone());
        self.frames_written += 1;
        Ok(())
    }
}
