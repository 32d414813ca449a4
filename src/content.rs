//! Content-based recommendation
//!
//! Ranks every track of a content-feature matrix by cosine similarity to the
//! query track's feature row.

use crate::dataset::ContentDataset;
use crate::error::Result;
use crate::ranking::{self, ScoredRow};
use crate::sparse::CsrMatrix;
use tracing::debug;

/// Similarity of `query_row` to every row of `features`, untruncated.
pub fn scores(query_row: usize, features: &CsrMatrix) -> Result<Vec<f64>> {
    features.row_cosine_scores(query_row)
}

/// Top `k` rows most similar to `query_row`, excluding the query itself.
pub fn recommend(query_row: usize, features: &CsrMatrix, k: usize) -> Result<Vec<ScoredRow>> {
    ranking::validate_k(k)?;
    let scores = scores(query_row, features)?;
    Ok(ranking::top_k(&scores, query_row, k))
}

/// Locate `(name, artist)` in the full catalog and recommend from its
/// content features.
pub fn recommend_track(
    dataset: &ContentDataset,
    name: &str,
    artist: &str,
    k: usize,
) -> Result<Vec<ScoredRow>> {
    ranking::validate_k(k)?;
    let query_row = dataset.catalog().locate(name, artist)?;
    debug!(query_row, k, "content recommendation");
    recommend(query_row, dataset.features(), k)
}
