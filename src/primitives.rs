use crate::buffer::{Canvas, PixelBuffer};
use crate::error::{PatternError, Result};
use crate::zernike::{self, ZernikeCoefficients};

pub fn blank(canvas: Canvas, value: u8) -> PixelBuffer {
    PixelBuffer::for_canvas(canvas, value)
}

/// Vertical stripes `stripe_width_px` wide, starting with `gray1` at column 0.
pub fn stripe_grating(
    canvas: Canvas,
    gray1: u8,
    gray2: u8,
    stripe_width_px: usize,
) -> Result<PixelBuffer> {
    if stripe_width_px == 0 {
        return Err(PatternError::InvalidDimension(
            "stripe width must be >= 1 pixel".to_string(),
        ));
    }
    let line: Vec<u8> = (0..canvas.width)
        .map(|col| if (col / stripe_width_px) % 2 == 0 { gray1 } else { gray2 })
        .collect();
    let mut holo = blank(canvas, 0);
    for row in 0..canvas.height {
        holo.row_mut(row).copy_from_slice(&line);
    }
    Ok(holo)
}

pub fn checkerboard(canvas: Canvas, value_a: u8, value_b: u8, period: usize) -> Result<PixelBuffer> {
    if period == 0 {
        return Err(PatternError::InvalidDimension(
            "checkerboard period must be >= 1 pixel".to_string(),
        ));
    }
    Ok(PixelBuffer::from_fn(canvas.width, canvas.height, |row, col| {
        if (row / period + col / period) % 2 == 0 {
            value_a
        } else {
            value_b
        }
    }))
}

/// Tilt-only Zernike surface on a blank canvas.
pub fn blazed_grating(canvas: Canvas, weight_x: f64, weight_y: f64) -> Result<PixelBuffer> {
    let coeffs = ZernikeCoefficients::tilt(weight_x, weight_y);
    zernike::compose_onto(&blank(canvas, 0), &zernike::synthesize(canvas, &coeffs))
}
