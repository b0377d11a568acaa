use crate::render::{frame_begin, frame_end, Frame, Renderer};
use std::io::Write;

pub struct HalfBlockRenderer {
    last_fg: Option<u8>,
    last_bg: Option<u8>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let w = frame.pixel_width;
        let h = frame.pixel_height;
        let cols = w.min(frame.term_cols as usize);
        let visual_rows = h.div_ceil(2).min(frame.visual_rows as usize);

        if cols == 0 || visual_rows == 0 {
            return Ok(());
        }
        if frame.pixels.len() < w * h {
            anyhow::bail!(
                "pixel buffer too small (need {}, got {})",
                w * h,
                frame.pixels.len()
            );
        }

        frame_begin(frame, out)?;
        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';

        for row in 0..visual_rows {
            let top_y = row * 2;
            let bot_y = top_y + 1;
            for x in 0..cols {
                let top = frame.pixels[top_y * w + x];
                // Odd heights leave the last bottom half black.
                let bot = if bot_y < h { frame.pixels[bot_y * w + x] } else { 0 };

                if self.last_fg != Some(top) {
                    write!(out, "\x1b[38;2;{top};{top};{top}m")?;
                    self.last_fg = Some(top);
                }
                if self.last_bg != Some(bot) {
                    write!(out, "\x1b[48;2;{bot};{bot};{bot}m")?;
                    self.last_bg = Some(bot);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\x1b[0m\r\n")?;
            self.last_fg = None;
            self.last_bg = None;
        }

        frame_end(frame, out)
    }
}
