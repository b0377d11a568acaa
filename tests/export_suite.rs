#[allow(dead_code)]
#[path = "../src/bin/hadamard_sweep.rs"]
mod hadamard_sweep;

use clap::Parser;
use std::path::{Path, PathBuf};

#[test]
fn parse_args_defaults_are_stable() {
    let args = hadamard_sweep::Cli::try_parse_from(["hadamard_sweep"]).expect("parse should succeed");

    assert_eq!(args.length, 256);
    assert_eq!(args.macropixel, 50);
    assert_eq!(args.width, 1920);
    assert_eq!(args.height, 1152);
    assert_eq!(args.out, PathBuf::from("hadamard_frames"));
    assert_eq!(args.first, 0);
    assert_eq!(args.count, None);
    assert_eq!(args.plus, None);
    assert_eq!(args.minus, None);
    assert_eq!(args.wfc, None);
}

#[test]
fn parse_args_overrides_work() {
    let args = hadamard_sweep::Cli::try_parse_from([
        "hadamard_sweep",
        "--length",
        "64",
        "--macropixel",
        "20",
        "--width",
        "800",
        "--height",
        "600",
        "--out",
        "frames/h64",
        "--first",
        "8",
        "--count",
        "4",
        "--plus",
        "0",
        "--minus",
        "128",
        "--wfc",
        "wfc.txt",
    ])
    .expect("parse should succeed");

    assert_eq!(args.length, 64);
    assert_eq!(args.macropixel, 20);
    assert_eq!((args.width, args.height), (800, 600));
    assert_eq!(args.out, PathBuf::from("frames/h64"));
    assert_eq!((args.first, args.count), (8, Some(4)));
    assert_eq!((args.plus, args.minus), (Some(0), Some(128)));
    assert_eq!(args.wfc, Some(PathBuf::from("wfc.txt")));
}

#[test]
fn validate_rejects_bad_arguments() {
    let cases: [(&[&str], &str); 4] = [
        (&["hadamard_sweep", "--length", "100"], "--length"),
        (&["hadamard_sweep", "--macropixel", "0"], "--macropixel"),
        (&["hadamard_sweep", "--width", "0"], "--width"),
        (&["hadamard_sweep", "--count", "0"], "--count"),
    ];
    for (argv, flag) in cases {
        let args = hadamard_sweep::Cli::try_parse_from(argv.iter().copied()).expect("parse should succeed");
        let err = hadamard_sweep::validate_args(&args).expect_err("validation must fail");
        assert!(err.to_string().contains(flag), "{flag}: {err}");
    }
}

#[test]
fn row_range_is_clipped_to_basis() {
    assert_eq!(hadamard_sweep::compute_row_range(16, 0, None).unwrap(), 0..16);
    assert_eq!(hadamard_sweep::compute_row_range(16, 4, Some(3)).unwrap(), 4..7);
    assert_eq!(hadamard_sweep::compute_row_range(16, 10, Some(100)).unwrap(), 10..16);
    assert!(hadamard_sweep::compute_row_range(16, 16, None).is_err());
}

#[test]
fn frame_names_sort_lexically() {
    let dir = Path::new("out");
    assert_eq!(
        hadamard_sweep::frame_path(dir, 7, 256),
        dir.join("hadamard_256_007.pgm")
    );
    assert_eq!(
        hadamard_sweep::frame_path(dir, 3, 4),
        dir.join("hadamard_4_3.pgm")
    );
    assert_eq!(
        hadamard_sweep::frame_path(dir, 0, 1),
        dir.join("hadamard_1_0.pgm")
    );
}
