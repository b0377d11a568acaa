use crate::buffer::PixelBuffer;
use crate::device::SlmDevice;
use crate::render::{fit_to, Frame, Renderer};
use crate::terminal::TerminalGuard;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// On-screen previews show the pattern at half resolution.
pub const PREVIEW_DOWNSCALE: usize = 2;

pub trait PatternSink {
    fn name(&self) -> &'static str;
    fn present(&mut self, holo: &PixelBuffer) -> anyhow::Result<()>;
}

pub struct DeviceSink<'a> {
    device: &'a mut dyn SlmDevice,
    timeout: Duration,
}

impl<'a> DeviceSink<'a> {
    pub fn new(device: &'a mut dyn SlmDevice, timeout: Duration) -> Self {
        Self { device, timeout }
    }
}

impl PatternSink for DeviceSink<'_> {
    fn name(&self) -> &'static str {
        "device"
    }

    fn present(&mut self, holo: &PixelBuffer) -> anyhow::Result<()> {
        self.device
            .write_image(holo, self.timeout)
            .context("write hologram to device")
    }
}

/// Builds the terminal frame for `holo`: half-resolution, then fitted to the
/// renderer's pixel grid for a `cols` x `rows` terminal with one HUD row.
pub fn preview_image(holo: &PixelBuffer, renderer: &dyn Renderer, cols: u16, rows: u16) -> PixelBuffer {
    let (cell_w, cell_h) = renderer.cell_pixels();
    let visual_rows = rows.saturating_sub(1) as usize;
    let half = holo.downscale(PREVIEW_DOWNSCALE);
    fit_to(&half, cols as usize * cell_w, visual_rows * cell_h)
}

pub fn render_preview(
    holo: &PixelBuffer,
    renderer: &mut dyn Renderer,
    cols: u16,
    rows: u16,
    hud: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let image = preview_image(holo, &*renderer, cols, rows);
    let frame = Frame {
        term_cols: cols,
        visual_rows: rows.saturating_sub(1),
        pixel_width: image.width(),
        pixel_height: image.height(),
        pixels: image.as_bytes(),
        hud,
        hud_rows: 1,
        sync_updates: true,
    };
    renderer.render(&frame, out)
}

/// Interactive terminal preview; returns after a key press.
pub struct PreviewSink {
    renderer: Box<dyn Renderer>,
}

impl PreviewSink {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self { renderer }
    }
}

impl PatternSink for PreviewSink {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn present(&mut self, holo: &PixelBuffer) -> anyhow::Result<()> {
        let (cols, rows) = TerminalGuard::size()?;
        let guard = TerminalGuard::new()?;
        let hud = format!(
            "{}x{} hologram ({}) | press any key",
            holo.width(),
            holo.height(),
            self.renderer.name()
        );
        let mut out = TerminalGuard::stdout();
        render_preview(holo, &mut *self.renderer, cols, rows, &hud, &mut out)?;
        guard.wait_for_key()
    }
}

pub fn encode_pgm(holo: &PixelBuffer) -> Vec<u8> {
    let mut bytes = format!("P5\n{} {}\n255\n", holo.width(), holo.height()).into_bytes();
    bytes.extend_from_slice(holo.as_bytes());
    bytes
}

pub fn write_pgm(path: &Path, holo: &PixelBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    std::fs::write(path, encode_pgm(holo)).with_context(|| format!("write {}", path.display()))
}

pub struct PgmSink {
    path: PathBuf,
}

impl PgmSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PatternSink for PgmSink {
    fn name(&self) -> &'static str {
        "pgm"
    }

    fn present(&mut self, holo: &PixelBuffer) -> anyhow::Result<()> {
        write_pgm(&self.path, holo)?;
        tracing::info!(path = %self.path.display(), "hologram written");
        Ok(())
    }
}
