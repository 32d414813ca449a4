//! Compressed sparse row matrices
//!
//! Feature and interaction matrices are built elsewhere and only read here.
//! The structure is validated once when a matrix is constructed or
//! deserialized, so row access afterwards never needs bounds checks beyond
//! the row index itself.

use crate::error::RecommendError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw CSR parts as they appear on disk, before validation.
#[derive(Deserialize)]
struct RawCsr {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f32>,
}

impl TryFrom<RawCsr> for CsrMatrix {
    type Error = RecommendError;

    fn try_from(raw: RawCsr) -> Result<Self, Self::Error> {
        CsrMatrix::try_new(raw.rows, raw.cols, raw.indptr, raw.indices, raw.data)
    }
}

/// Read-only sparse matrix in CSR layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCsr")]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f32>,
}

/// Borrowed view of a single matrix row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub data: &'a [f32],
}

impl CsrMatrix {
    /// Build a matrix from CSR parts.
    ///
    /// Column indices within a row must be strictly increasing.
    pub fn try_new(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f32>,
    ) -> Result<Self, RecommendError> {
        if indptr.len() != rows + 1 {
            return Err(RecommendError::DimensionMismatch {
                what: "indptr",
                expected: rows + 1,
                actual: indptr.len(),
            });
        }
        if indices.len() != data.len() {
            return Err(RecommendError::DimensionMismatch {
                what: "data",
                expected: indices.len(),
                actual: data.len(),
            });
        }
        if indptr[0] != 0 || indptr[rows] != indices.len() {
            return Err(RecommendError::InvalidParameter(format!(
                "indptr must span 0..{}, got {}..{}",
                indices.len(),
                indptr[0],
                indptr[rows]
            )));
        }

        for row in 0..rows {
            let (start, end) = (indptr[row], indptr[row + 1]);
            if start > end || end > indices.len() {
                return Err(RecommendError::InvalidParameter(format!(
                    "indptr is not monotonic at row {}",
                    row
                )));
            }
            let cols_in_row = &indices[start..end];
            if cols_in_row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(RecommendError::InvalidParameter(format!(
                    "column indices of row {} are not strictly increasing",
                    row
                )));
            }
            if let Some(&last) = cols_in_row.last() {
                if last >= cols {
                    return Err(RecommendError::InvalidParameter(format!(
                        "row {} references column {} but matrix has {} columns",
                        row, last, cols
                    )));
                }
            }
        }

        if data.iter().any(|v| !v.is_finite()) {
            return Err(RecommendError::InvalidParameter(
                "matrix contains non-finite values".to_string(),
            ));
        }

        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Build a matrix from dense rows, dropping zeros.
    pub fn from_dense(rows: &[Vec<f32>]) -> Result<Self, RecommendError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(RecommendError::DimensionMismatch {
                    what: "dense row",
                    expected: cols,
                    actual: rows[i].len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                if v != 0.0 {
                    indices.push(j);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }

        Self::try_new(rows.len(), cols, indptr, indices, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> SparseRow<'_> {
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            data: &self.data[start..end],
        }
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn cosine_scores(&self, query: SparseRow<'_>) -> Vec<f64> {
        let query_norm = query.norm();
        (0..self.rows)
            .into_par_iter()
            .map(|i| {
                let row = self.row(i);
                normalized(query.dot(&row), query_norm, row.norm())
            })
            .collect()
    }

    /// Cosine similarity of row `query_row` against every row of the matrix.
    pub fn row_cosine_scores(&self, query_row: usize) -> Result<Vec<f64>, RecommendError> {
        if query_row >= self.rows {
            return Err(RecommendError::DimensionMismatch {
                what: "query row",
                expected: self.rows,
                actual: query_row + 1,
            });
        }
        Ok(self.cosine_scores(self.row(query_row)))
    }
}

impl<'a> SparseRow<'a> {
    /// Dot product by merging the two sorted index lists.
    pub fn dot(&self, other: &SparseRow<'_>) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f64;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.data[i] as f64 * other.data[j] as f64;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// L2 norm.
    pub fn norm(&self) -> f64 {
        self.data
            .iter()
            .map(|&v| (v as f64) * (v as f64))
            .sum::<f64>()
            .sqrt()
    }
}

fn normalized(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    // A zero vector is similar to nothing.
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Cosine similarity between two sparse rows. Zero vectors score 0.
pub fn cosine(a: &SparseRow<'_>, b: &SparseRow<'_>) -> f64 {
    normalized(a.dot(b), a.norm(), b.norm())
}
