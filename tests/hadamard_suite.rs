use proptest::prelude::*;
use slm_holo::hadamard::{HadamardCache, HadamardMatrix};
use slm_holo::PatternError;

fn assert_orthogonal(m: &HadamardMatrix) {
    let n = m.size();
    for i in 0..n {
        for j in 0..n {
            let dot: i32 = (0..n)
                .map(|k| i32::from(m.get(i, k)) * i32::from(m.get(j, k)))
                .sum();
            let expected = if i == j { n as i32 } else { 0 };
            assert_eq!(dot, expected, "row {i} . row {j} for n={n}");
        }
    }
}

#[test]
fn small_sizes_are_orthogonal_and_signed() {
    for n in [1usize, 2, 4, 8, 16] {
        let mut cache = HadamardCache::new();
        cache.ensure_size(n).expect("power of two should build");
        let m = cache.matrix().expect("matrix should be cached");
        assert_eq!(m.size(), n);
        for i in 0..n {
            assert!(m.row(i).iter().all(|v| *v == 1 || *v == -1));
        }
        assert_orthogonal(m);
    }
}

#[test]
fn sylvester_layout_matches_canonical_form() {
    let m = HadamardMatrix::sylvester(4).expect("n=4 should build");
    assert_eq!(m.row(0), &[1, 1, 1, 1]);
    assert_eq!(m.row(1), &[1, -1, 1, -1]);
    assert_eq!(m.row(2), &[1, 1, -1, -1]);
    assert_eq!(m.row(3), &[1, -1, -1, 1]);
}

#[test]
fn rejects_non_power_of_two() {
    let mut cache = HadamardCache::new();
    for n in [0usize, 3, 6, 12, 255] {
        let err = cache.ensure_size(n).expect_err("non power of two must fail");
        assert!(matches!(err, PatternError::InvalidDimension(_)), "n={n}");
    }
    assert_eq!(cache.size(), 0);
}

#[test]
fn rejects_sizes_whose_area_overflows() {
    let mut cache = HadamardCache::new();
    let err = cache
        .ensure_size(1usize << 33)
        .expect_err("2^33 x 2^33 entries cannot be addressed");
    assert!(matches!(err, PatternError::InvalidDimension(_)));
    assert_eq!(cache.size(), 0);
    assert!(HadamardMatrix::sylvester(1usize << 40).is_err());
}

#[test]
fn cache_only_grows() {
    let mut cache = HadamardCache::new();
    cache.ensure_size(8).expect("n=8 should build");
    let before = cache.matrix().cloned().expect("matrix should be cached");
    cache.ensure_size(4).expect("smaller request is a no-op");
    assert_eq!(cache.size(), 8);
    assert_eq!(cache.matrix(), Some(&before));

    cache.ensure_size(16).expect("n=16 should build");
    assert_eq!(cache.size(), 16);
}

#[test]
fn extract_row_returns_prefix() {
    let mut cache = HadamardCache::new();
    cache.ensure_size(16).expect("n=16 should build");
    let full = cache.matrix().expect("cached").row(5).to_vec();
    let row = cache.extract_row(5, 4).expect("prefix extraction should succeed");
    assert_eq!(row, full[..4].to_vec());
    assert_eq!(row, vec![1, -1, 1, -1]);
}

#[test]
fn extract_row_before_growth_is_uninitialized() {
    let mut cache = HadamardCache::new();
    let err = cache.extract_row(0, 4).expect_err("empty cache must fail");
    assert!(matches!(
        err,
        PatternError::Uninitialized {
            requested: 4,
            cached: 0
        }
    ));

    cache.ensure_size(4).expect("n=4 should build");
    let err = cache.extract_row(0, 8).expect_err("too-small cache must fail");
    assert!(matches!(err, PatternError::Uninitialized { cached: 4, .. }));
}

#[test]
fn extract_row_rejects_index_past_cache() {
    let mut cache = HadamardCache::new();
    cache.ensure_size(4).expect("n=4 should build");
    let err = cache.extract_row(4, 4).expect_err("row 4 of a 4x4 must fail");
    assert!(matches!(err, PatternError::OutOfBounds(_)));
}

#[test]
fn reset_drops_matrix() {
    let mut cache = HadamardCache::new();
    cache.ensure_size(8).expect("n=8 should build");
    cache.reset();
    assert_eq!(cache.size(), 0);
    assert!(cache.matrix().is_none());
    assert!(cache.extract_row(0, 1).is_err());
}

proptest! {
    #[test]
    fn distinct_rows_are_orthogonal(exp in 1u32..7, a in 0usize..64, b in 0usize..64) {
        let n = 1usize << exp;
        let (a, b) = (a % n, b % n);
        let m = HadamardMatrix::sylvester(n).unwrap();
        let dot: i32 = m.row(a).iter().zip(m.row(b)).map(|(x, y)| i32::from(*x) * i32::from(*y)).sum();
        prop_assert_eq!(dot, if a == b { n as i32 } else { 0 });
    }

    #[test]
    fn smaller_basis_is_prefix_of_larger(exp in 0u32..6, row in 0usize..32) {
        let n = 1usize << exp;
        let row = row % n;
        let small = HadamardMatrix::sylvester(n).unwrap();
        let big = HadamardMatrix::sylvester(n * 2).unwrap();
        prop_assert_eq!(small.row(row), &big.row(row)[..n]);
    }
}
