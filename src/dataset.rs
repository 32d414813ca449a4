//! Aligned datasets
//!
//! Each dataset bundles a catalog with the matrices whose rows it indexes.
//! Construction (including deserialization) fails with `DimensionMismatch`
//! unless every part has the same row count, so engines can index any part
//! with a catalog row without re-checking.

use crate::catalog::Catalog;
use crate::error::{RecommendError, Result};
use crate::sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

fn check_rows(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(RecommendError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawContent {
    catalog: Catalog,
    features: CsrMatrix,
}

/// Full catalog paired with its content-feature matrix.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(try_from = "RawContent")]
pub struct ContentDataset {
    catalog: Catalog,
    features: CsrMatrix,
}

impl ContentDataset {
    pub fn try_new(catalog: Catalog, features: CsrMatrix) -> Result<Self> {
        check_rows("content feature rows", catalog.len(), features.rows())?;
        Ok(Self { catalog, features })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &CsrMatrix {
        &self.features
    }
}

impl TryFrom<RawContent> for ContentDataset {
    type Error = RecommendError;

    fn try_from(raw: RawContent) -> Result<Self> {
        ContentDataset::try_new(raw.catalog, raw.features)
    }
}

#[derive(Deserialize)]
struct RawCollaborative {
    catalog: Catalog,
    track_ids: Vec<String>,
    interactions: CsrMatrix,
    hybrid_features: CsrMatrix,
}

/// Filtered catalog of tracks with enough interactions, with its track ids,
/// the item x user interaction matrix and the hybrid content matrix, all in
/// the same row order.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(try_from = "RawCollaborative")]
pub struct CollaborativeDataset {
    catalog: Catalog,
    track_ids: Vec<String>,
    interactions: CsrMatrix,
    hybrid_features: CsrMatrix,
}

impl CollaborativeDataset {
    pub fn try_new(
        catalog: Catalog,
        track_ids: Vec<String>,
        interactions: CsrMatrix,
        hybrid_features: CsrMatrix,
    ) -> Result<Self> {
        let rows = catalog.len();
        check_rows("track ids", rows, track_ids.len())?;
        check_rows("interaction matrix rows", rows, interactions.rows())?;
        check_rows("hybrid feature rows", rows, hybrid_features.rows())?;
        Ok(Self {
            catalog,
            track_ids,
            interactions,
            hybrid_features,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn track_ids(&self) -> &[String] {
        &self.track_ids
    }

    pub fn interactions(&self) -> &CsrMatrix {
        &self.interactions
    }

    pub fn hybrid_features(&self) -> &CsrMatrix {
        &self.hybrid_features
    }

    /// Track id of a catalog row. Rows and track id positions coincide.
    pub fn track_id(&self, row_index: usize) -> Option<&str> {
        self.track_ids.get(row_index).map(String::as_str)
    }
}

impl TryFrom<RawCollaborative> for CollaborativeDataset {
    type Error = RecommendError;

    fn try_from(raw: RawCollaborative) -> Result<Self> {
        CollaborativeDataset::try_new(
            raw.catalog,
            raw.track_ids,
            raw.interactions,
            raw.hybrid_features,
        )
    }
}
