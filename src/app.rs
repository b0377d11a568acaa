use crate::buffer::{Canvas, PixelBuffer};
use crate::config::{Config, PatternCommand, RendererMode, Settings, SinkMode};
use crate::device::{LutSelection, SlmDevice, VirtualDevice};
use crate::prefs::{prefs_storage_path, SlmPrefs};
use crate::render::{AsciiRenderer, HalfBlockRenderer, Renderer};
use crate::sink::{DeviceSink, PatternSink, PgmSink, PreviewSink};
use crate::slm::{HadamardLevels, Slm};
use anyhow::{bail, Context};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    cfg.validate()?;

    let prefs_path = cfg.prefs.clone().or_else(prefs_storage_path);
    let prefs = SlmPrefs::load(prefs_path.as_deref())
        .with_context(|| format!("load prefs {:?}", prefs_path))?;
    let settings = cfg.settings(&prefs);

    let canvas = Canvas::new(cfg.width, cfg.height)?;
    let mut device = VirtualDevice::new(canvas);
    let mut slm = open_session(&mut device, &cfg, &settings)?;

    let mut holo = generate(&mut slm, &cfg.pattern)?;
    if cfg.apply_wfc {
        holo = slm.apply_wavefront_correction(&holo)?;
    }
    tracing::info!(
        pattern = pattern_label(&cfg.pattern),
        w = holo.width(),
        h = holo.height(),
        "hologram generated"
    );

    DeviceSink::new(&mut device, settings.timeout).present(&holo)?;
    match cfg.sink {
        SinkMode::Device => {}
        SinkMode::Pgm => PgmSink::new(cfg.out.clone()).present(&holo)?,
        SinkMode::Preview => PreviewSink::new(make_renderer(cfg.renderer)).present(&holo)?,
    }
    Ok(())
}

/// Builds the session for `device`: LUT first, then the wavefront correction.
pub fn open_session(
    device: &mut dyn SlmDevice,
    cfg: &Config,
    settings: &Settings,
) -> anyhow::Result<Slm> {
    let mut slm = Slm::from_device(&*device);

    let lut = LutSelection::parse(&cfg.lut).resolve(&settings.lut_dir);
    slm.load_lut(device, &lut)
        .with_context(|| format!("load LUT {}", lut.display()))?;

    match &settings.wfc_path {
        Some(path) => slm
            .load_wfc(path)
            .with_context(|| format!("load wavefront correction {}", path.display()))?,
        None if cfg.apply_wfc => bail!("--apply-wfc needs --wfc <FILE> or wfc_path in prefs"),
        None => {}
    }
    Ok(slm)
}

pub fn generate(slm: &mut Slm, pattern: &PatternCommand) -> anyhow::Result<PixelBuffer> {
    let holo = match pattern {
        PatternCommand::Blank { value } => crate::primitives::blank(slm.canvas(), *value),
        PatternCommand::Stripes {
            gray1,
            gray2,
            width,
        } => slm.binary_grating(*gray1, *gray2, *width)?,
        PatternCommand::Checkerboard { period } => slm.checkerboard(*period)?,
        PatternCommand::Blazed { x, y } => slm.blazed_grating(*x, *y)?,
        PatternCommand::Ramp { length, macropixel } => {
            let values = ramp_sequence(*length);
            slm.macropixels(&values, *macropixel)?
        }
        PatternCommand::Macropixels { values, macropixel } => {
            slm.macropixels(values, *macropixel)?
        }
        PatternCommand::Hadamard {
            length,
            row,
            macropixel,
            plus,
            minus,
        } => {
            let raw = HadamardLevels::default();
            slm.set_hadamard_levels(HadamardLevels {
                plus: plus.unwrap_or(raw.plus),
                minus: minus.unwrap_or(raw.minus),
            });
            slm.hadamard_pattern(*length, *row, *macropixel)?
        }
    };
    Ok(holo)
}

/// `0, 1, .. length-1`, wrapping past 255.
pub fn ramp_sequence(length: usize) -> Vec<u8> {
    (0..length).map(|i| (i % 256) as u8).collect()
}

fn make_renderer(mode: RendererMode) -> Box<dyn Renderer> {
    match mode {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    }
}

fn pattern_label(pattern: &PatternCommand) -> &'static str {
    match pattern {
        PatternCommand::Blank { .. } => "blank",
        PatternCommand::Stripes { .. } => "stripes",
        PatternCommand::Checkerboard { .. } => "checkerboard",
        PatternCommand::Blazed { .. } => "blazed",
        PatternCommand::Ramp { .. } => "ramp",
        PatternCommand::Macropixels { .. } => "macropixels",
        PatternCommand::Hadamard { .. } => "hadamard",
    }
}
