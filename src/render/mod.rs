mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use crate::buffer::PixelBuffer;
use std::io::Write;

/// Grayscale image already sized for the terminal grid.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Terminal cells covered by one pixel, as (columns, rows).
    fn cell_pixels(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Nearest-neighbour resample preserving aspect ratio inside `max_w` x `max_h`.
pub fn fit_to(holo: &PixelBuffer, max_w: usize, max_h: usize) -> PixelBuffer {
    if holo.width() == 0 || holo.height() == 0 || max_w == 0 || max_h == 0 {
        return PixelBuffer::filled(0, 0, 0);
    }
    let (src_w, src_h) = (holo.width(), holo.height());
    let (w, h) = if max_w * src_h <= max_h * src_w {
        (max_w, (src_h * max_w / src_w).max(1))
    } else {
        ((src_w * max_h / src_h).max(1), max_h)
    };
    PixelBuffer::from_fn(w, h, |row, col| {
        let sy = (row * holo.height() / h).min(holo.height() - 1);
        let sx = (col * holo.width() / w).min(holo.width() - 1);
        holo.row(sy)[sx]
    })
}

pub(crate) fn frame_begin(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    // Home, reset, autowrap off while painting full-width rows.
    out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
    Ok(())
}

pub(crate) fn frame_end(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", frame.visual_rows as usize + i + 1)?;
        if let Some(line) = hud_lines.next() {
            let line: String = line.chars().take(cols).collect();
            write!(out, "{line}")?;
        }
    }

    out.write_all(b"\x1b[0m\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}
