use crate::error::{RecommendError, Result};
use serde::Serialize;
use std::cmp::Ordering;

/// A candidate row with its relevance score (higher = more similar)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredRow {
    pub row_index: usize,
    pub score: f64,
}

pub fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(RecommendError::InvalidParameter(
            "number of recommendations must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Rank a full score vector and keep the best `k`, skipping `exclude`.
///
/// Scores sort descending; equal scores keep ascending row order.
pub fn top_k(scores: &[f64], exclude: usize, k: usize) -> Vec<ScoredRow> {
    let mut ranked: Vec<ScoredRow> = scores
        .iter()
        .enumerate()
        .filter(|(row_index, _)| *row_index != exclude)
        .map(|(row_index, &score)| ScoredRow { row_index, score })
        .collect();

    ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.row_index.cmp(&b.row_index),
        ord => ord,
    });

    ranked.truncate(k);
    ranked
}
