use crate::buffer::{Canvas, PixelBuffer};
use crate::error::{PatternError, Result};

/// Top-left position of `source` when centered on `canvas`, if it fits.
pub fn center_offset(source: Canvas, canvas: Canvas) -> Option<(usize, usize)> {
    let ox = (canvas.width / 2).checked_sub(source.width / 2)?;
    let oy = (canvas.height / 2).checked_sub(source.height / 2)?;
    if ox + source.width > canvas.width || oy + source.height > canvas.height {
        return None;
    }
    Some((ox, oy))
}

/// Centers `source` on a `canvas`-sized buffer filled with `background`.
pub fn pad(source: &PixelBuffer, canvas: Canvas, background: u8) -> Result<PixelBuffer> {
    let (ox, oy) = center_offset(source.canvas(), canvas).ok_or_else(|| {
        PatternError::OutOfBounds(format!(
            "{}x{} source does not fit on {}x{} canvas",
            source.width(),
            source.height(),
            canvas.width,
            canvas.height
        ))
    })?;

    let mut holo = PixelBuffer::for_canvas(canvas, background);
    for i in 0..source.height() {
        holo.row_mut(oy + i)[ox..ox + source.width()].copy_from_slice(source.row(i));
    }
    Ok(holo)
}
