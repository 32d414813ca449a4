//! Dataset bundle storage
//!
//! Each aligned dataset is written as one bincode file so its catalog and
//! matrices can never be loaded from different builds. JSON parts produced
//! by the feature pipeline can be packed into bundles with [`pack_content`]
//! and [`pack_collaborative`].

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::Catalog;
use crate::dataset::{CollaborativeDataset, ContentDataset};
use crate::engine::Recommender;
use crate::sparse::CsrMatrix;

pub const CONTENT_BUNDLE: &str = "content.bin";
pub const COLLABORATIVE_BUNDLE: &str = "collaborative.bin";

/// Load a bundle from a binary file. A missing file is an error: there is
/// no useful empty dataset.
pub fn load_bundle<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read bundle {:?}", path))?;
    let bundle = bincode::deserialize(&bytes)
        .with_context(|| format!("Failed to deserialize bundle {:?}", path))?;
    Ok(bundle)
}

/// Save a bundle to a binary file, creating parent directories.
pub fn save_bundle<T: Serialize>(bundle: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create bundle directory")?;
    }
    let bytes = bincode::serialize(bundle).context("Failed to serialize bundle")?;
    fs::write(path, bytes).with_context(|| format!("Failed to write bundle {:?}", path))?;
    Ok(())
}

/// Directory holding both bundles.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn content_path(&self) -> PathBuf {
        self.root.join(CONTENT_BUNDLE)
    }

    pub fn collaborative_path(&self) -> PathBuf {
        self.root.join(COLLABORATIVE_BUNDLE)
    }

    pub fn load_content(&self) -> Result<ContentDataset> {
        let dataset: ContentDataset = load_bundle(&self.content_path())?;
        info!(
            path = ?self.content_path(),
            tracks = dataset.catalog().len(),
            nnz = dataset.features().nnz(),
            "loaded content bundle"
        );
        Ok(dataset)
    }

    pub fn load_collaborative(&self) -> Result<CollaborativeDataset> {
        let dataset: CollaborativeDataset = load_bundle(&self.collaborative_path())?;
        info!(
            path = ?self.collaborative_path(),
            tracks = dataset.catalog().len(),
            interactions = dataset.interactions().nnz(),
            "loaded collaborative bundle"
        );
        Ok(dataset)
    }

    pub fn load_recommender(&self) -> Result<Recommender> {
        Ok(Recommender::new(
            self.load_content()?,
            self.load_collaborative()?,
        ))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {} {:?}", what, path))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} JSON {:?}", what, path))?;
    Ok(value)
}

/// Build a content bundle from a catalog JSON array and a CSR matrix JSON.
pub fn pack_content(catalog: &Path, features: &Path) -> Result<ContentDataset> {
    let catalog: Catalog = read_json(catalog, "catalog")?;
    let features: CsrMatrix = read_json(features, "content matrix")?;
    let dataset = ContentDataset::try_new(catalog, features)
        .context("Content catalog and matrix are not aligned")?;
    Ok(dataset)
}

/// Build a collaborative bundle from the filtered catalog, track ids,
/// interaction matrix and hybrid matrix JSON files.
pub fn pack_collaborative(
    catalog: &Path,
    track_ids: &Path,
    interactions: &Path,
    hybrid_features: &Path,
) -> Result<CollaborativeDataset> {
    let catalog: Catalog = read_json(catalog, "filtered catalog")?;
    let track_ids: Vec<String> = read_json(track_ids, "track ids")?;
    let interactions: CsrMatrix = read_json(interactions, "interaction matrix")?;
    let hybrid_features: CsrMatrix = read_json(hybrid_features, "hybrid matrix")?;
    let dataset = CollaborativeDataset::try_new(catalog, track_ids, interactions, hybrid_features)
        .context("Collaborative catalog, track ids and matrices are not aligned")?;
    Ok(dataset)
}
