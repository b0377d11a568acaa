use crate::error::{PatternError, Result};

/// Meadowlark 1920x1152 panel geometry.
pub const DEFAULT_WIDTH: usize = 1920;
pub const DEFAULT_HEIGHT: usize = 1152;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PatternError::InvalidDimension(format!(
                "canvas must be non-empty (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn fits(self, width: usize, height: usize) -> bool {
        width <= self.width && height <= self.height
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Row-major 8-bit grayscale pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    pub fn for_canvas(canvas: Canvas, value: u8) -> Self {
        Self::filled(canvas.width, canvas.height, value)
    }

    pub fn from_vec(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(PatternError::InvalidDimension(format!(
                "{} bytes cannot form a {width}x{height} buffer",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Fills every pixel from `f(row, col)`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                pixels.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.pixels[row * self.width + col])
    }

    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let start = row * self.width;
        &mut self.pixels[start..start + self.width]
    }

    /// Box-averaged downscale by an integer factor. Trailing rows/columns that
    /// do not make up a full block are dropped.
    pub fn downscale(&self, factor: usize) -> Self {
        let factor = factor.max(1);
        if factor == 1 {
            return self.clone();
        }
        let w = self.width / factor;
        let h = self.height / factor;
        let area = (factor * factor) as u32;
        Self::from_fn(w, h, |row, col| {
            let mut sum = 0u32;
            for dy in 0..factor {
                let src = self.row(row * factor + dy);
                for dx in 0..factor {
                    sum += u32::from(src[col * factor + dx]);
                }
            }
            ((sum + area / 2) / area) as u8
        })
    }
}
