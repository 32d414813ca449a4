//! Hybrid recommendation
//!
//! Blends full content and collaborative score vectors over the filtered
//! catalog, then ranks the blended scores. Both vectors are computed in full
//! before truncation so a track that is only strong in the blend still
//! surfaces.

use crate::collaborative;
use crate::dataset::CollaborativeDataset;
use crate::error::{RecommendError, Result};
use crate::ranking::{self, ScoredRow};
use serde::Serialize;
use tracing::debug;

/// Share of the blended score taken from content similarity, in `[0, 1]`.
/// The collaborative share is the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentWeight(f64);

impl ContentWeight {
    pub fn new(weight: f64) -> Result<Self> {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(RecommendError::InvalidParameter(format!(
                "content weight must be within [0, 1], got {}",
                weight
            )));
        }
        Ok(Self(weight))
    }

    /// Weight from the 1..=10 diversity scale: higher diversity leans on
    /// collaborative signal.
    pub fn from_diversity(diversity: u8) -> Result<Self> {
        if !(1..=10).contains(&diversity) {
            return Err(RecommendError::InvalidParameter(format!(
                "diversity must be within 1..=10, got {}",
                diversity
            )));
        }
        Self::new(1.0 - diversity as f64 / 10.0)
    }

    pub fn content(self) -> f64 {
        self.0
    }

    pub fn collaborative(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for ContentWeight {
    fn default() -> Self {
        ContentWeight(0.5)
    }
}

/// Elementwise `w * content + (1 - w) * collaborative`.
pub fn blend(content: &[f64], collaborative: &[f64], weight: ContentWeight) -> Result<Vec<f64>> {
    if content.len() != collaborative.len() {
        return Err(RecommendError::DimensionMismatch {
            what: "collaborative scores",
            expected: content.len(),
            actual: collaborative.len(),
        });
    }

    let (wc, wi) = (weight.content(), weight.collaborative());
    Ok(content
        .iter()
        .zip(collaborative)
        .map(|(c, i)| {
            // Pure weights reproduce the single engine exactly
            if wi == 0.0 {
                *c
            } else if wc == 0.0 {
                *i
            } else {
                wc * c + wi * i
            }
        })
        .collect())
}

pub fn recommend(
    dataset: &CollaborativeDataset,
    name: &str,
    artist: &str,
    k: usize,
    weight: ContentWeight,
) -> Result<Vec<ScoredRow>> {
    ranking::validate_k(k)?;
    let query_row = dataset.catalog().locate(name, artist)?;
    debug!(
        query_row,
        k,
        content_weight = weight.content(),
        "hybrid recommendation"
    );

    let content_scores = dataset.hybrid_features().row_cosine_scores(query_row)?;
    let collaborative_scores = collaborative::scores(dataset, query_row)?;
    let blended = blend(&content_scores, &collaborative_scores, weight)?;

    Ok(ranking::top_k(&blended, query_row, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds() {
        assert!(ContentWeight::new(0.0).is_ok());
        assert!(ContentWeight::new(1.0).is_ok());
        assert!(ContentWeight::new(1.01).is_err());
        assert!(ContentWeight::new(-0.1).is_err());
        assert!(ContentWeight::new(f64::NAN).is_err());
    }

    #[test]
    fn test_diversity_scale() {
        let w = ContentWeight::from_diversity(5).unwrap();
        assert!((w.content() - 0.5).abs() < 1e-12);
        let w = ContentWeight::from_diversity(10).unwrap();
        assert_eq!(w.content(), 0.0);
        let w = ContentWeight::from_diversity(1).unwrap();
        assert!((w.content() - 0.9).abs() < 1e-12);
        assert!(ContentWeight::from_diversity(0).is_err());
        assert!(ContentWeight::from_diversity(11).is_err());
    }

    #[test]
    fn test_blend_elementwise() {
        let w = ContentWeight::new(0.25).unwrap();
        let blended = blend(&[1.0, 0.0], &[0.0, 1.0], w).unwrap();
        assert!((blended[0] - 0.25).abs() < 1e-12);
        assert!((blended[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_blend_length_mismatch() {
        let w = ContentWeight::default();
        assert!(matches!(
            blend(&[1.0], &[1.0, 2.0], w),
            Err(RecommendError::DimensionMismatch { .. })
        ));
    }
}
