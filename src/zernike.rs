//! Zernike aberration surfaces.
//!
//! A correction surface is the weighted sum of 19 unnormalized Zernike modes
//! (piston excluded) evaluated on a unit disc inscribed in the canvas. Weights
//! are in waves: one wave spans the full 0..=255 phase range, and the surface
//! wraps modulo 256 like the optical phase it encodes.

use crate::buffer::{Canvas, PixelBuffer};
use crate::error::{PatternError, Result};
use std::path::Path;

pub const ZERNIKE_MODE_COUNT: usize = 19;

/// Gray levels per wave of phase.
pub const LEVELS_PER_WAVE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZernikeMode {
    TiltX,
    TiltY,
    Defocus,
    AstigX,
    AstigY,
    ComaX,
    ComaY,
    Spherical,
    TrefoilX,
    TrefoilY,
    SecondaryAstigX,
    SecondaryAstigY,
    SecondaryComaX,
    SecondaryComaY,
    SecondarySpherical,
    TetrafoilX,
    TetrafoilY,
    TertiarySpherical,
    QuaternarySpherical,
}

impl ZernikeMode {
    /// File and array order.
    pub const fn all() -> [Self; ZERNIKE_MODE_COUNT] {
        [
            Self::TiltX,
            Self::TiltY,
            Self::Defocus,
            Self::AstigX,
            Self::AstigY,
            Self::ComaX,
            Self::ComaY,
            Self::Spherical,
            Self::TrefoilX,
            Self::TrefoilY,
            Self::SecondaryAstigX,
            Self::SecondaryAstigY,
            Self::SecondaryComaX,
            Self::SecondaryComaY,
            Self::SecondarySpherical,
            Self::TetrafoilX,
            Self::TetrafoilY,
            Self::TertiarySpherical,
            Self::QuaternarySpherical,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|mode| mode.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TiltX => "tilt_x",
            Self::TiltY => "tilt_y",
            Self::Defocus => "defocus",
            Self::AstigX => "astig_x",
            Self::AstigY => "astig_y",
            Self::ComaX => "coma_x",
            Self::ComaY => "coma_y",
            Self::Spherical => "spherical",
            Self::TrefoilX => "trefoil_x",
            Self::TrefoilY => "trefoil_y",
            Self::SecondaryAstigX => "secondary_astig_x",
            Self::SecondaryAstigY => "secondary_astig_y",
            Self::SecondaryComaX => "secondary_coma_x",
            Self::SecondaryComaY => "secondary_coma_y",
            Self::SecondarySpherical => "secondary_spherical",
            Self::TetrafoilX => "tetrafoil_x",
            Self::TetrafoilY => "tetrafoil_y",
            Self::TertiarySpherical => "tertiary_spherical",
            Self::QuaternarySpherical => "quaternary_spherical",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Mode value at normalized pupil coordinates.
    pub fn evaluate(self, x: f64, y: f64) -> f64 {
        let r2 = x * x + y * y;
        match self {
            Self::TiltX => x,
            Self::TiltY => y,
            Self::Defocus => 2.0 * r2 - 1.0,
            Self::AstigX => x * x - y * y,
            Self::AstigY => 2.0 * x * y,
            Self::ComaX => (3.0 * r2 - 2.0) * x,
            Self::ComaY => (3.0 * r2 - 2.0) * y,
            Self::Spherical => 6.0 * r2 * r2 - 6.0 * r2 + 1.0,
            Self::TrefoilX => x * x * x - 3.0 * x * y * y,
            Self::TrefoilY => 3.0 * x * x * y - y * y * y,
            Self::SecondaryAstigX => (4.0 * r2 - 3.0) * (x * x - y * y),
            Self::SecondaryAstigY => (4.0 * r2 - 3.0) * 2.0 * x * y,
            Self::SecondaryComaX => (10.0 * r2 * r2 - 12.0 * r2 + 3.0) * x,
            Self::SecondaryComaY => (10.0 * r2 * r2 - 12.0 * r2 + 3.0) * y,
            Self::SecondarySpherical => {
                let r4 = r2 * r2;
                20.0 * r4 * r2 - 30.0 * r4 + 12.0 * r2 - 1.0
            }
            Self::TetrafoilX => {
                let (x2, y2) = (x * x, y * y);
                x2 * x2 - 6.0 * x2 * y2 + y2 * y2
            }
            Self::TetrafoilY => 4.0 * x * x * x * y - 4.0 * x * y * y * y,
            Self::TertiarySpherical => {
                let r4 = r2 * r2;
                70.0 * r4 * r4 - 140.0 * r4 * r2 + 90.0 * r4 - 20.0 * r2 + 1.0
            }
            Self::QuaternarySpherical => {
                let r4 = r2 * r2;
                let r8 = r4 * r4;
                252.0 * r8 * r2 - 630.0 * r8 + 560.0 * r4 * r2 - 210.0 * r4 + 30.0 * r2 - 1.0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZernikeCoefficients {
    weights: [f64; ZERNIKE_MODE_COUNT],
}

impl ZernikeCoefficients {
    pub fn new(weights: [f64; ZERNIKE_MODE_COUNT]) -> Self {
        Self { weights }
    }

    pub fn tilt(x: f64, y: f64) -> Self {
        Self::default()
            .with(ZernikeMode::TiltX, x)
            .with(ZernikeMode::TiltY, y)
    }

    pub fn with(mut self, mode: ZernikeMode, weight: f64) -> Self {
        self.weights[mode.index()] = weight;
        self
    }

    pub fn get(&self, mode: ZernikeMode) -> f64 {
        self.weights[mode.index()]
    }

    pub fn set(&mut self, mode: ZernikeMode, weight: f64) {
        self.weights[mode.index()] = weight;
    }

    pub fn weights(&self) -> &[f64; ZERNIKE_MODE_COUNT] {
        &self.weights
    }

    pub fn is_zero(&self) -> bool {
        self.weights.iter().all(|w| *w == 0.0)
    }

    /// Surface height in waves at normalized pupil coordinates.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        ZernikeMode::all()
            .into_iter()
            .filter(|mode| self.weights[mode.index()] != 0.0)
            .map(|mode| self.weights[mode.index()] * mode.evaluate(x, y))
            .sum()
    }

    /// Parses a wavefront-correction file: one decimal value per line in
    /// [`ZernikeMode::all`] order. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = Vec::with_capacity(ZERNIKE_MODE_COUNT);
        for (line_idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let value = line
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PatternError::ConfigFileCorrupt {
                    line: Some(line_idx + 1),
                    message: format!("expected a decimal coefficient, got '{line}'"),
                })?;
            values.push(value);
        }

        let weights: [f64; ZERNIKE_MODE_COUNT] =
            values
                .try_into()
                .map_err(|values: Vec<f64>| PatternError::ConfigFileCorrupt {
                    line: None,
                    message: format!(
                        "expected {ZERNIKE_MODE_COUNT} coefficients, found {}",
                        values.len()
                    ),
                })?;
        Ok(Self { weights })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PatternError::Io(format!("{}: {e}", path.display())))?;
        let coeffs = Self::parse(&text)?;
        tracing::info!(path = %path.display(), "loaded wavefront correction");
        Ok(coeffs)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for w in self.weights {
            out.push_str(&format!("{w}\n"));
        }
        out
    }
}

/// Center and radius of the unit pupil for a canvas.
pub fn pupil(canvas: Canvas) -> (f64, f64, f64) {
    let cx = canvas.width / 2;
    let cy = canvas.height / 2;
    let radius = cx.min(cy).max(1);
    (cx as f64, cy as f64, radius as f64)
}

pub fn quantize(waves: f64) -> u8 {
    (waves * LEVELS_PER_WAVE).round().rem_euclid(LEVELS_PER_WAVE) as u8
}

pub fn synthesize(canvas: Canvas, coefficients: &ZernikeCoefficients) -> PixelBuffer {
    let _span = tracing::debug_span!(
        "zernike_synthesize",
        w = canvas.width,
        h = canvas.height
    )
    .entered();

    if coefficients.is_zero() {
        return PixelBuffer::for_canvas(canvas, 0);
    }

    let (cx, cy, radius) = pupil(canvas);
    PixelBuffer::from_fn(canvas.width, canvas.height, |row, col| {
        let x = (col as f64 - cx) / radius;
        let y = (cy - row as f64) / radius;
        quantize(coefficients.evaluate(x, y))
    })
}

/// Per-pixel `(base + surface) mod 256`.
pub fn compose_onto(base: &PixelBuffer, surface: &PixelBuffer) -> Result<PixelBuffer> {
    if base.canvas() != surface.canvas() {
        return Err(PatternError::InvalidDimension(format!(
            "cannot compose {}x{} surface onto {}x{} buffer",
            surface.width(),
            surface.height(),
            base.width(),
            base.height()
        )));
    }
    let pixels = base
        .as_bytes()
        .iter()
        .zip(surface.as_bytes())
        .map(|(b, s)| b.wrapping_add(*s))
        .collect();
    PixelBuffer::from_vec(base.width(), base.height(), pixels)
}

pub fn apply(base: &PixelBuffer, coefficients: &ZernikeCoefficients) -> Result<PixelBuffer> {
    let surface = synthesize(base.canvas(), coefficients);
    compose_onto(base, &surface)
}
