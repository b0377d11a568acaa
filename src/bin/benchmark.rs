use std::time::{Duration, Instant};

use anyhow::Result;
use slm_holo::buffer::{Canvas, PixelBuffer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use slm_holo::hadamard::HadamardCache;
use slm_holo::slm::Slm;
use slm_holo::zernike::{self, ZernikeCoefficients, ZernikeMode};

struct Args {
    frames: usize,
    w: usize,
    h: usize,
    length: usize,
    macropixel: usize,
    seed: u64,
    ci_smoke: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        frames: 20,
        w: DEFAULT_WIDTH,
        h: DEFAULT_HEIGHT,
        length: 256,
        macropixel: 50,
        seed: 0x5_1A_2023,
        ci_smoke: false,
        max_ms: 250.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--w", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--h", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--length", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.length = n.max(1);
                }
                i += 2;
            }
            ("--macropixel", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.macropixel = n.max(1);
                }
                i += 2;
            }
            ("--seed", Some(x)) => {
                if let Ok(n) = x.parse::<u64>() {
                    args.seed = n;
                }
                i += 2;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(n) = x.parse::<f64>() {
                    args.max_ms = n.max(0.0);
                }
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    args
}

fn full_correction() -> ZernikeCoefficients {
    let mut coeffs = ZernikeCoefficients::default();
    for (idx, mode) in ZernikeMode::all().into_iter().enumerate() {
        coeffs.set(mode, 0.05 * (idx as f64 + 1.0));
    }
    coeffs
}

fn time_frames(frames: usize, mut f: impl FnMut() -> Result<PixelBuffer>) -> Result<(Duration, usize)> {
    let mut lit = 0usize;
    let start = Instant::now();
    for _ in 0..frames {
        let holo = f()?;
        if holo.as_bytes().iter().any(|px| *px != 0) {
            lit += 1;
        }
    }
    Ok((start.elapsed(), lit))
}

fn main() -> Result<()> {
    let args = parse_args();
    let canvas = Canvas::new(args.w, args.h)?;
    let mut slm = Slm::new(canvas);
    let correction = full_correction();
    let mut rng = fastrand::Rng::with_seed(args.seed);

    println!(
        "pattern benchmark: frames={} size={}x{} length={} macropixel={}",
        args.frames, args.w, args.h, args.length, args.macropixel
    );

    let build_start = Instant::now();
    let mut cache = HadamardCache::new();
    cache.ensure_size(args.length)?;
    println!(
        "hadamard build: n={} {:>8.3} ms",
        args.length,
        build_start.elapsed().as_secs_f64() * 1000.0
    );

    let mut results: Vec<(&'static str, Duration, usize)> = Vec::new();

    let (t, lit) = time_frames(args.frames, || Ok(slm.blank_holo()))?;
    results.push(("blank", t, lit));
    let (t, lit) = time_frames(args.frames, || Ok(slm.binary_grating(0, 255, 8)?))?;
    results.push(("stripes", t, lit));
    let (t, lit) = time_frames(args.frames, || Ok(slm.checkerboard(16)?))?;
    results.push(("checkerboard", t, lit));
    let (t, lit) = time_frames(args.frames, || Ok(slm.blazed_grating(4.0, 2.0)?))?;
    results.push(("blazed", t, lit));
    let (t, lit) = time_frames(args.frames, || Ok(zernike::synthesize(canvas, &correction)))?;
    results.push(("zernike-19", t, lit));
    let (t, lit) = time_frames(args.frames, || {
        let seq = (0..args.length).map(|_| rng.u8(..)).collect::<Vec<_>>();
        Ok(slm.macropixels(&seq, args.macropixel)?)
    })?;
    results.push(("macropixels-random", t, lit));
    let mut row = 0usize;
    let (t, lit) = time_frames(args.frames, || {
        row = (row + 1) % args.length;
        Ok(slm.hadamard_pattern(args.length, row, args.macropixel)?)
    })?;
    results.push(("hadamard", t, lit));

    let mut slow = Vec::new();
    for (idx, (name, elapsed, lit)) in results.iter().enumerate() {
        let ms = elapsed.as_secs_f64() * 1000.0 / args.frames as f64;
        println!("{:>2}. {:<20} {:>8.3} ms/frame  lit={:>3}/{}", idx, name, ms, lit, args.frames);
        if args.ci_smoke && ms > args.max_ms {
            slow.push((*name, ms));
        }
    }

    if args.ci_smoke {
        if !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            for (name, ms) in slow {
                eprintln!("  slow pattern: {} ({:.3} ms/frame > {:.3})", name, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}
