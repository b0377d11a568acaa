use crate::error::{PatternError, Result};

/// Square Sylvester-Hadamard matrix with entries in {+1, -1}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HadamardMatrix {
    size: usize,
    entries: Vec<i8>,
}

impl HadamardMatrix {
    /// Doubling construction: start from `[+1]`, then for each block size
    /// `x` copy the block right and down and negate it bottom-right.
    pub fn sylvester(n: usize) -> Result<Self> {
        if !n.is_power_of_two() {
            return Err(PatternError::InvalidDimension(format!(
                "hadamard size must be a power of two (got {n})"
            )));
        }

        let area = n.checked_mul(n).ok_or_else(|| {
            PatternError::InvalidDimension(format!("{n}x{n} hadamard matrix overflows usize"))
        })?;
        let mut entries = Vec::new();
        entries.try_reserve_exact(area).map_err(|_| {
            PatternError::InvalidDimension(format!("cannot allocate {n}x{n} hadamard matrix"))
        })?;
        entries.resize(area, 0i8);
        entries[0] = 1;
        let mut x = 1usize;
        while x < n {
            for i in 0..x {
                for j in 0..x {
                    let v = entries[i * n + j];
                    entries[(i + x) * n + j] = v;
                    entries[i * n + j + x] = v;
                    entries[(i + x) * n + j + x] = -v;
                }
            }
            x += x;
        }

        Ok(Self { size: n, entries })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.entries[row * self.size + col]
    }

    pub fn row(&self, row: usize) -> &[i8] {
        let start = row * self.size;
        &self.entries[start..start + self.size]
    }
}

/// Grow-only cache for the largest Hadamard matrix requested so far.
#[derive(Debug, Default)]
pub struct HadamardCache {
    matrix: Option<HadamardMatrix>,
}

impl HadamardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached side length, 0 when empty.
    pub fn size(&self) -> usize {
        self.matrix.as_ref().map_or(0, HadamardMatrix::size)
    }

    pub fn matrix(&self) -> Option<&HadamardMatrix> {
        self.matrix.as_ref()
    }

    pub fn ensure_size(&mut self, n: usize) -> Result<()> {
        if !n.is_power_of_two() {
            return Err(PatternError::InvalidDimension(format!(
                "hadamard size must be a power of two (got {n})"
            )));
        }
        if self.size() >= n {
            return Ok(());
        }

        let _span = tracing::debug_span!("hadamard_build", n).entered();
        let matrix = HadamardMatrix::sylvester(n)?;
        tracing::info!(previous = self.size(), size = n, "hadamard cache rebuilt");
        self.matrix = Some(matrix);
        Ok(())
    }

    /// First `length` entries of row `index`.
    pub fn extract_row(&self, index: usize, length: usize) -> Result<Vec<i8>> {
        let cached = self.size();
        let Some(matrix) = self.matrix.as_ref().filter(|_| cached >= length) else {
            return Err(PatternError::Uninitialized {
                requested: length,
                cached,
            });
        };
        if index >= cached {
            return Err(PatternError::OutOfBounds(format!(
                "hadamard row {index} outside cached {cached}x{cached} matrix"
            )));
        }
        Ok(matrix.row(index)[..length].to_vec())
    }

    pub fn reset(&mut self) {
        self.matrix = None;
    }
}
