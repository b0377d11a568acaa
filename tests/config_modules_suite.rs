use clap::Parser;
use slm_holo::app::{generate, open_session, ramp_sequence};
use slm_holo::buffer::{Canvas, PixelBuffer};
use slm_holo::config::{Config, PatternCommand, RendererMode, SinkMode};
use slm_holo::device::{LutProfile, LutSelection, SlmDevice, VirtualDevice, DEFAULT_TIMEOUT_MS};
use slm_holo::prefs::{PrefsError, SlmPrefs};
use slm_holo::zernike::{ZernikeCoefficients, ZernikeMode};
use slm_holo::PatternError;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn wfc_text(count: usize) -> String {
    (0..count).map(|i| format!("{}\n", 0.01 * i as f64)).collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("slm_holo_{}_{name}", std::process::id()))
}

// ── Wavefront-correction file ──────────────────────────────────────────────

#[test]
fn wfc_parses_nineteen_values_in_mode_order() {
    let coeffs = ZernikeCoefficients::parse(&wfc_text(19)).expect("19 lines should parse");
    assert_eq!(coeffs.get(ZernikeMode::TiltX), 0.0);
    assert!((coeffs.get(ZernikeMode::TiltY) - 0.01).abs() < 1e-12);
    assert!((coeffs.get(ZernikeMode::QuaternarySpherical) - 0.18).abs() < 1e-12);
}

#[test]
fn wfc_skips_blank_and_comment_lines() {
    let text = format!("# measured 2023-03\n\n{}\n", wfc_text(19));
    assert!(ZernikeCoefficients::parse(&text).is_ok());
}

#[test]
fn wfc_rejects_wrong_line_count() {
    for count in [0usize, 18, 20] {
        let err = ZernikeCoefficients::parse(&wfc_text(count)).expect_err("count must be 19");
        assert!(
            matches!(err, PatternError::ConfigFileCorrupt { line: None, .. }),
            "count={count}"
        );
        assert!(err.to_string().contains(&count.to_string()));
    }
}

#[test]
fn wfc_reports_bad_line_number() {
    let mut text = wfc_text(19);
    text = text.replacen("0.03", "three", 1);
    let err = ZernikeCoefficients::parse(&text).expect_err("non-numeric line must fail");
    assert!(matches!(
        err,
        PatternError::ConfigFileCorrupt { line: Some(4), .. }
    ));
}

#[test]
fn wfc_text_round_trips() {
    let coeffs = ZernikeCoefficients::default()
        .with(ZernikeMode::ComaX, 0.125)
        .with(ZernikeMode::Spherical, -2.5);
    let parsed = ZernikeCoefficients::parse(&coeffs.to_text()).expect("serialized form parses");
    assert_eq!(parsed, coeffs);
}

#[test]
fn wfc_load_reports_missing_file() {
    let err = ZernikeCoefficients::load(Path::new("/definitely/not/here/wfc.txt"))
        .expect_err("missing file must fail");
    assert!(matches!(err, PatternError::Io(_)));
}

// ── Prefs ──────────────────────────────────────────────────────────────────

#[test]
fn prefs_parse_known_keys() {
    let text = r#"
        # slm_holo prefs v1
        lut_dir=/opt/luts
        wfc_path=/opt/wfc/zernikes.txt
        timeout_ms=750
        unknown_key=ignored
    "#;
    let prefs = SlmPrefs::parse(text).expect("prefs should parse");
    assert_eq!(prefs.lut_dir, Some(PathBuf::from("/opt/luts")));
    assert_eq!(prefs.wfc_path, Some(PathBuf::from("/opt/wfc/zernikes.txt")));
    assert_eq!(prefs.timeout_ms, Some(750));
}

#[test]
fn prefs_reject_bad_timeout_and_missing_equals() {
    let err = SlmPrefs::parse("timeout_ms=0").expect_err("zero timeout must fail");
    assert!(matches!(err, PrefsError::Parse { line: 1, .. }));
    let err = SlmPrefs::parse("\nlut_dir /opt").expect_err("missing '=' must fail");
    assert!(matches!(err, PrefsError::Parse { line: 2, .. }));
}

#[test]
fn prefs_save_then_load() {
    let path = temp_path("prefs.txt");
    let prefs = SlmPrefs {
        lut_dir: Some(PathBuf::from("/luts")),
        wfc_path: None,
        timeout_ms: Some(1200),
    };
    prefs.save(Some(&path)).expect("save should succeed");
    let loaded = SlmPrefs::load(Some(&path)).expect("load should succeed");
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, prefs);
}

#[test]
fn prefs_missing_file_is_default() {
    let prefs = SlmPrefs::load(Some(Path::new("/definitely/not/here/prefs.txt")))
        .expect("missing prefs fall back to defaults");
    assert_eq!(prefs, SlmPrefs::default());
}

// ── LUT selection ──────────────────────────────────────────────────────────

#[test]
fn lut_profiles_resolve_inside_lut_dir() {
    let dir = Path::new("/luts");
    assert_eq!(
        LutSelection::parse("Global").resolve(dir),
        dir.join("SN5721_WL532_Global.lut")
    );
    assert_eq!(
        LutSelection::parse("local"),
        LutSelection::Profile(LutProfile::Local)
    );
    assert_eq!(
        LutSelection::parse("LINEAR").resolve(dir),
        dir.join("12bit_linear.lut")
    );
    assert_eq!(
        LutSelection::parse("/cal/custom.lut").resolve(dir),
        PathBuf::from("/cal/custom.lut")
    );
}

// ── CLI ────────────────────────────────────────────────────────────────────

#[test]
fn cli_defaults_are_stable() {
    let cfg = Config::try_parse_from(["slm_holo", "ramp"]).expect("parse should succeed");
    assert_eq!((cfg.width, cfg.height), (1920, 1152));
    assert_eq!(cfg.lut, "global");
    assert_eq!(cfg.sink, SinkMode::Preview);
    assert_eq!(cfg.renderer, RendererMode::HalfBlock);
    assert!(!cfg.apply_wfc);
    assert_eq!(
        cfg.pattern,
        PatternCommand::Ramp {
            length: 256,
            macropixel: 50
        }
    );
}

#[test]
fn cli_parses_pattern_arguments() {
    let cfg = Config::try_parse_from([
        "slm_holo", "--sink", "pgm", "--out", "h.pgm", "blazed", "--x", "-0.5", "--y", "2",
    ])
    .expect("parse should succeed");
    assert_eq!(cfg.sink, SinkMode::Pgm);
    assert_eq!(cfg.pattern, PatternCommand::Blazed { x: -0.5, y: 2.0 });

    let cfg = Config::try_parse_from(["slm_holo", "macropixels", "--values", "1,2,3,4", "--macropixel", "3"])
        .expect("parse should succeed");
    assert_eq!(
        cfg.pattern,
        PatternCommand::Macropixels {
            values: vec![1, 2, 3, 4],
            macropixel: 3
        }
    );
}

#[test]
fn cli_validate_rejects_zero_geometry() {
    let cfg = Config::try_parse_from(["slm_holo", "--width", "0", "blank"]).expect("parse should succeed");
    let err = cfg.validate().expect_err("width=0 must fail validation");
    assert!(err.to_string().contains("--width"));
}

#[test]
fn cli_flags_override_prefs() {
    let prefs = SlmPrefs {
        lut_dir: Some(PathBuf::from("/prefs/luts")),
        wfc_path: Some(PathBuf::from("/prefs/wfc.txt")),
        timeout_ms: Some(900),
    };
    let cfg = Config::try_parse_from(["slm_holo", "--timeout-ms", "100", "--lut-dir", "/cli/luts", "blank"])
        .expect("parse should succeed");
    let settings = cfg.settings(&prefs);
    assert_eq!(settings.lut_dir, PathBuf::from("/cli/luts"));
    assert_eq!(settings.wfc_path, Some(PathBuf::from("/prefs/wfc.txt")));
    assert_eq!(settings.timeout, Duration::from_millis(100));

    let cfg = Config::try_parse_from(["slm_holo", "blank"]).expect("parse should succeed");
    let settings = cfg.settings(&SlmPrefs::default());
    assert_eq!(settings.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    assert_eq!(settings.wfc_path, None);
}

// ── Session wiring ─────────────────────────────────────────────────────────

#[test]
fn open_session_loads_lut_and_wfc() {
    let wfc = temp_path("wfc.txt");
    std::fs::write(&wfc, wfc_text(19)).expect("write wfc");
    let wfc_arg = wfc.to_string_lossy().into_owned();
    let cfg = Config::try_parse_from(["slm_holo", "--lut", "linear", "--lut-dir", "/luts", "--wfc", wfc_arg.as_str(), "blank"])
        .expect("parse should succeed");
    let settings = cfg.settings(&SlmPrefs::default());

    let mut device = VirtualDevice::new(Canvas::new(64, 48).expect("canvas"));
    let slm = open_session(&mut device, &cfg, &settings).expect("session should open");
    let _ = std::fs::remove_file(&wfc);

    assert_eq!(device.lut(), Some(Path::new("/luts/12bit_linear.lut")));
    assert_eq!(slm.canvas(), Canvas::new(64, 48).expect("canvas"));
    assert!((slm.wfc().get(ZernikeMode::TiltY) - 0.01).abs() < 1e-12);
}

#[test]
fn open_session_requires_wfc_when_applying() {
    let cfg = Config::try_parse_from(["slm_holo", "--apply-wfc", "--prefs", "/definitely/not/here", "blank"])
        .expect("parse should succeed");
    let settings = cfg.settings(&SlmPrefs::default());
    let mut device = VirtualDevice::new(Canvas::default());
    assert!(open_session(&mut device, &cfg, &settings).is_err());
}

#[test]
fn generate_ramp_matches_original_demo() {
    let mut device = VirtualDevice::new(Canvas::default());
    let cfg = Config::try_parse_from(["slm_holo", "ramp"]).expect("parse should succeed");
    let settings = cfg.settings(&SlmPrefs::default());
    let mut slm = open_session(&mut device, &cfg, &settings).expect("session should open");

    let holo = generate(&mut slm, &cfg.pattern).expect("ramp should generate");
    assert_eq!(holo.get(176 + 775, 560 + 775), Some(255));
    assert_eq!(ramp_sequence(300)[256], 0);

    device
        .write_image(&holo, Duration::from_millis(10))
        .expect("full-canvas frame should be accepted");
    assert_eq!(device.frames_written(), 1);
    assert_eq!(device.last_frame(), Some(&holo));
}

#[test]
fn generate_hadamard_honours_level_overrides() {
    let mut slm = slm_holo::Slm::new(Canvas::new(8, 8).expect("canvas"));
    let pattern = PatternCommand::Hadamard {
        length: 4,
        row: 3,
        macropixel: 2,
        plus: Some(100),
        minus: None,
    };
    let holo = generate(&mut slm, &pattern).expect("hadamard should generate");
    // Row 3 = [+1, -1, -1, +1].
    assert_eq!(holo.get(2, 2), Some(100));
    assert_eq!(holo.get(2, 4), Some(255));
    assert_eq!(holo.get(4, 2), Some(255));
    assert_eq!(holo.get(4, 4), Some(100));
}

#[test]
fn virtual_device_rejects_wrong_frame_size() {
    let mut device = VirtualDevice::new(Canvas::new(8, 8).expect("canvas"));
    let err = device
        .write_image(&PixelBuffer::filled(4, 4, 0), Duration::from_millis(10))
        .expect_err("wrong size must fail");
    assert!(matches!(err, PatternError::InvalidDimension(_)));
    assert_eq!(device.frames_written(), 0);
}
