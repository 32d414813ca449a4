//! Item-item collaborative filtering
//!
//! The interaction matrix has one row per track (item) and one column per
//! user. Two tracks are similar when the same users engaged with both.

use crate::dataset::CollaborativeDataset;
use crate::error::Result;
use crate::ranking::{self, ScoredRow};
use tracing::debug;

/// Item-item similarity of the track at `query_row` against every track of
/// the filtered catalog, untruncated.
pub fn scores(dataset: &CollaborativeDataset, query_row: usize) -> Result<Vec<f64>> {
    dataset.interactions().row_cosine_scores(query_row)
}

/// Locate `(name, artist)` in the filtered catalog and recommend by shared
/// listeners.
///
/// Tracks without enough interactions are absent from the filtered catalog
/// and yield `NotFound` even if the full catalog knows them.
pub fn recommend(
    dataset: &CollaborativeDataset,
    name: &str,
    artist: &str,
    k: usize,
) -> Result<Vec<ScoredRow>> {
    ranking::validate_k(k)?;
    let query_row = dataset.catalog().locate(name, artist)?;
    debug!(
        query_row,
        track_id = dataset.track_id(query_row).unwrap_or_default(),
        k,
        "collaborative recommendation"
    );

    let scores = scores(dataset, query_row)?;
    Ok(ranking::top_k(&scores, query_row, k))
}
