use crate::buffer::{Canvas, PixelBuffer};
use crate::device::SlmDevice;
use crate::error::Result;
use crate::hadamard::HadamardCache;
use crate::zernike::{self, ZernikeCoefficients};
use crate::{macropixel, padding, primitives};
use std::path::Path;

/// Historical checkerboard levels.
pub const CHECKERBOARD_LEVELS: (u8, u8) = (0, 122);

/// Bytes written for the +1 and -1 entries of a Hadamard row.
///
/// The default is the raw two's-complement cast (+1 -> 1, -1 -> 255), which is
/// what downstream calibration has been built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HadamardLevels {
    pub plus: u8,
    pub minus: u8,
}

impl Default for HadamardLevels {
    fn default() -> Self {
        Self {
            plus: 1i8 as u8,
            minus: -1i8 as u8,
        }
    }
}

impl HadamardLevels {
    pub fn map(self, entry: i8) -> u8 {
        if entry >= 0 { self.plus } else { self.minus }
    }
}

/// One display session: canvas geometry, loaded wavefront correction, and the
/// Hadamard cache shared by every Hadamard pattern generated in the session.
#[derive(Debug)]
pub struct Slm {
    canvas: Canvas,
    wfc: ZernikeCoefficients,
    hadamard: HadamardCache,
    levels: HadamardLevels,
}

impl Slm {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            wfc: ZernikeCoefficients::default(),
            hadamard: HadamardCache::new(),
            levels: HadamardLevels::default(),
        }
    }

    pub fn from_device(device: &dyn SlmDevice) -> Self {
        Self::new(device.canvas())
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn wfc(&self) -> &ZernikeCoefficients {
        &self.wfc
    }

    pub fn set_wfc(&mut self, coefficients: ZernikeCoefficients) {
        self.wfc = coefficients;
    }

    /// Replaces the session correction only when the whole file parses.
    pub fn load_wfc(&mut self, path: &Path) -> Result<()> {
        self.wfc = ZernikeCoefficients::load(path)?;
        Ok(())
    }

    pub fn load_lut(&self, device: &mut dyn SlmDevice, path: &Path) -> Result<()> {
        device.load_lut(path)
    }

    pub fn hadamard_levels(&self) -> HadamardLevels {
        self.levels
    }

    pub fn set_hadamard_levels(&mut self, levels: HadamardLevels) {
        self.levels = levels;
    }

    pub fn hadamard_cache(&self) -> &HadamardCache {
        &self.hadamard
    }

    pub fn reset_hadamard(&mut self) {
        self.hadamard.reset();
    }

    pub fn blank_holo(&self) -> PixelBuffer {
        primitives::blank(self.canvas, 0)
    }

    pub fn binary_grating(&self, gray1: u8, gray2: u8, pixels_per_stripe: usize) -> Result<PixelBuffer> {
        primitives::stripe_grating(self.canvas, gray1, gray2, pixels_per_stripe)
    }

    pub fn checkerboard(&self, period: usize) -> Result<PixelBuffer> {
        let (a, b) = CHECKERBOARD_LEVELS;
        primitives::checkerboard(self.canvas, a, b, period)
    }

    pub fn blazed_grating(&self, weight_x: f64, weight_y: f64) -> Result<PixelBuffer> {
        primitives::blazed_grating(self.canvas, weight_x, weight_y)
    }

    pub fn apply_padding(&self, source: &PixelBuffer) -> Result<PixelBuffer> {
        padding::pad(source, self.canvas, 0)
    }

    pub fn apply_zernikes(&self, holo: &PixelBuffer, coefficients: &ZernikeCoefficients) -> Result<PixelBuffer> {
        zernike::apply(holo, coefficients)
    }

    pub fn apply_wavefront_correction(&self, holo: &PixelBuffer) -> Result<PixelBuffer> {
        zernike::apply(holo, &self.wfc)
    }

    pub fn macropixels(&self, sequence: &[u8], macropixel_px: usize) -> Result<PixelBuffer> {
        macropixel::expand(sequence, macropixel_px, self.canvas, 0)
    }

    /// Row `row` of the `length`-point Hadamard basis as symbols.
    pub fn hadamard_sequence(&mut self, length: usize, row: usize) -> Result<Vec<u8>> {
        self.hadamard.ensure_size(length)?;
        let entries = self.hadamard.extract_row(row, length)?;
        Ok(entries.into_iter().map(|e| self.levels.map(e)).collect())
    }

    /// Hadamard row `row` expanded into macropixels. The canvas check runs
    /// before the `length`-point matrix is built.
    pub fn hadamard_pattern(&mut self, length: usize, row: usize, macropixel_px: usize) -> Result<PixelBuffer> {
        macropixel::check_fits(length, macropixel_px, self.canvas)?;
        let sequence = self.hadamard_sequence(length, row)?;
        self.macropixels(&sequence, macropixel_px)
    }
}
