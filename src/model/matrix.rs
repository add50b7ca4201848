//! # Square Distance Matrix
//!
//! A symmetric, zero-diagonal `n × n` matrix stored row-major.
//!
//! ## Pair order
//!
//! Unordered index pairs are enumerated lexicographically with `i < j`:
//!
//! ```text
//! n = 4:  (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
//!           0     1     2     3     4     5     ← condensed position
//! ```
//!
//! [`pair_indices`] produces this order and [`condensed_index`] maps a pair
//! back to its position. Both the oracle batch and the condensed → square
//! expansion go through these two functions, so they cannot drift apart.

use serde::{Deserialize, Serialize};

/// Number of unordered pairs for `n` entities: `n·(n−1)/2`.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// All unordered pairs `(i, j)` with `i < j`, in lexicographic order.
pub fn pair_indices(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Position of pair `(i, j)` in the condensed sequence. Arguments may be given
/// in either order; `i == j` has no condensed position.
pub fn condensed_index(n: usize, i: usize, j: usize) -> Option<usize> {
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    if i == j || j >= n {
        return None;
    }
    // Pairs before row i: sum_{r<i} (n-1-r) = n·i − i·(i+1)/2
    Some(n * i - i * (i + 1) / 2 + (j - i - 1))
}

/// Square, symmetric, zero-diagonal distance matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix", into = "RawMatrix")]
pub struct DistanceMatrix {
    dim: usize,
    values: Vec<f64>,
}

/// Unchecked wire form of [`DistanceMatrix`].
#[derive(Serialize, Deserialize)]
struct RawMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl TryFrom<RawMatrix> for DistanceMatrix {
    type Error = String;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        if raw.values.len() != raw.dim * raw.dim {
            return Err(format!("{} values for a {}x{} matrix", raw.values.len(), raw.dim, raw.dim));
        }
        let matrix = Self { dim: raw.dim, values: raw.values };
        if !matrix.is_symmetric() || !matrix.has_zero_diagonal() {
            return Err("matrix is not symmetric with a zero diagonal".into());
        }
        Ok(matrix)
    }
}

impl From<DistanceMatrix> for RawMatrix {
    fn from(matrix: DistanceMatrix) -> Self {
        Self { dim: matrix.dim, values: matrix.values }
    }
}

impl DistanceMatrix {
    /// Expand a condensed upper triangle into the full square matrix.
    ///
    /// Returns `None` when `condensed.len()` is not `pair_count(dim)`.
    pub fn from_condensed(dim: usize, condensed: &[f64]) -> Option<Self> {
        if condensed.len() != pair_count(dim) {
            return None;
        }
        let mut values = vec![0.0; dim * dim];
        for ((i, j), &d) in pair_indices(dim).zip(condensed) {
            values[i * dim + j] = d;
            values[j * dim + i] = d;
        }
        Some(Self { dim, values })
    }

    /// Number of rows (and columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.dim && j < self.dim {
            Some(self.values[i * self.dim + j])
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.dim {
            Some(&self.values[i * self.dim..(i + 1) * self.dim])
        } else {
            None
        }
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Upper triangle in pair order.
    pub fn condensed(&self) -> Vec<f64> {
        pair_indices(self.dim)
            .map(|(i, j)| self.values[i * self.dim + j])
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        pair_indices(self.dim).all(|(i, j)| {
            self.values[i * self.dim + j].to_bits() == self.values[j * self.dim + i].to_bits()
        })
    }

    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.dim).all(|i| self.values[i * self.dim + i] == 0.0)
    }
}
