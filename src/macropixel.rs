use crate::buffer::{Canvas, PixelBuffer};
use crate::error::{PatternError, Result};
use crate::padding;

/// Side of the square grid for a perfect-square sequence length.
pub fn grid_side(length: usize) -> Option<usize> {
    let side = (length as f64).sqrt().floor() as usize;
    // Float sqrt can land one off for large lengths.
    [side.saturating_sub(1), side, side + 1]
        .into_iter()
        .find(|s| s.checked_mul(*s) == Some(length))
}

/// Grid side and pixel width of the square block image for a sequence of
/// `length` symbols.
pub fn layout(length: usize, macropixel_px: usize) -> Result<(usize, usize)> {
    if length == 0 {
        return Err(PatternError::InvalidDimension(
            "macropixel sequence is empty".to_string(),
        ));
    }
    if macropixel_px == 0 {
        return Err(PatternError::InvalidDimension(
            "macropixel side must be >= 1 pixel".to_string(),
        ));
    }
    let side = grid_side(length).ok_or_else(|| {
        PatternError::InvalidDimension(format!(
            "sequence length {length} is not a perfect square"
        ))
    })?;
    let width_px = side
        .checked_mul(macropixel_px)
        .filter(|w| w.checked_mul(*w).is_some())
        .ok_or_else(|| {
            PatternError::OutOfBounds(format!(
                "{side}x{side} grid of {macropixel_px} px macropixels overflows usize"
            ))
        })?;
    Ok((side, width_px))
}

/// Checks that the block image for `length` symbols fits on `canvas`, before
/// anything is allocated. Returns the block width in pixels.
pub fn check_fits(length: usize, macropixel_px: usize, canvas: Canvas) -> Result<usize> {
    let (_, width_px) = layout(length, macropixel_px)?;
    if !canvas.fits(width_px, width_px) {
        return Err(PatternError::OutOfBounds(format!(
            "{width_px}x{width_px} macropixel pattern too large for {}x{} canvas",
            canvas.width, canvas.height
        )));
    }
    Ok(width_px)
}

/// Square block image where macropixel `(r, c)` carries `sequence[r * side + c]`,
/// without padding.
pub fn blocks(sequence: &[u8], macropixel_px: usize) -> Result<PixelBuffer> {
    let (side, width_px) = layout(sequence.len(), macropixel_px)?;
    let mut holo = PixelBuffer::filled(width_px, width_px, 0);
    for mr in 0..side {
        let symbols = &sequence[mr * side..(mr + 1) * side];
        let first = mr * macropixel_px;
        {
            let line = holo.row_mut(first);
            for (mc, value) in symbols.iter().enumerate() {
                line[mc * macropixel_px..(mc + 1) * macropixel_px].fill(*value);
            }
        }
        for i in 1..macropixel_px {
            let bytes = holo.as_bytes_mut();
            bytes.copy_within(first * width_px..(first + 1) * width_px, (first + i) * width_px);
        }
    }
    Ok(holo)
}

/// Expands `sequence` into macropixels and centers the result on `canvas`.
pub fn expand(
    sequence: &[u8],
    macropixel_px: usize,
    canvas: Canvas,
    background: u8,
) -> Result<PixelBuffer> {
    let _span = tracing::debug_span!(
        "macropixel_expand",
        len = sequence.len(),
        macropixel_px
    )
    .entered();

    check_fits(sequence.len(), macropixel_px, canvas)?;
    let block = blocks(sequence, macropixel_px)?;
    padding::pad(&block, canvas, background)
}
