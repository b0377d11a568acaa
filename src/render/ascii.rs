use crate::render::{frame_begin, frame_end, Frame, Renderer};
use std::io::Write;

pub struct AsciiRenderer {
    last_fg: Option<u8>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { last_fg: None }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 1)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let w = frame.pixel_width;
        let cols = w.min(frame.term_cols as usize);
        let visual_rows = frame.pixel_height.min(frame.visual_rows as usize);
        if cols == 0 || visual_rows == 0 {
            return Ok(());
        }
        if frame.pixels.len() < w * frame.pixel_height {
            anyhow::bail!(
                "pixel buffer too small (need {}, got {})",
                w * frame.pixel_height,
                frame.pixels.len()
            );
        }

        frame_begin(frame, out)?;
        self.last_fg = None;

        // Dark -> bright ramp. Keep it ASCII-safe and compact.
        const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";

        for y in 0..visual_rows {
            for x in 0..cols {
                let l = frame.pixels[y * w + x];
                let ch = RAMP[l as usize * (RAMP.len() - 1) / 255];
                if self.last_fg != Some(l) {
                    write!(out, "\x1b[38;2;{l};{l};{l}m")?;
                    self.last_fg = Some(l);
                }
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, out)
    }
}
