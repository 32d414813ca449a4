//! Recommender facade
//!
//! Owns the two aligned datasets and dispatches a request to the matching
//! strategy. Datasets are loaded once by the caller and never mutated, so a
//! `Recommender` can be shared across threads behind an `Arc`.

use crate::catalog::Catalog;
use crate::dataset::{CollaborativeDataset, ContentDataset};
use crate::error::{RecommendError, Result};
use crate::hybrid::ContentWeight;
use crate::materialize::{materialize, Recommendation};
use crate::{collaborative, content, hybrid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Result counts offered to users.
pub const K_CHOICES: [usize; 4] = [5, 10, 15, 20];
pub const DEFAULT_K: usize = 10;
pub const DEFAULT_DIVERSITY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Content,
    Collaborative,
    Hybrid,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Content => "Content-Based Filtering",
            Strategy::Collaborative => "Collaborative Filtering",
            Strategy::Hybrid => "Hybrid Recommender System",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Content => "content",
            Strategy::Collaborative => "collaborative",
            Strategy::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "content" | "content-based" => Ok(Strategy::Content),
            "collaborative" | "collab" => Ok(Strategy::Collaborative),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(RecommendError::InvalidParameter(format!(
                "unknown strategy '{}'",
                other
            ))),
        }
    }
}

/// How the hybrid strategy splits content and collaborative scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weighting {
    /// 1..=10, mapped to content weight `1 - diversity / 10`
    Diversity(u8),
    ContentWeight(f64),
}

impl Default for Weighting {
    fn default() -> Self {
        Weighting::Diversity(DEFAULT_DIVERSITY)
    }
}

impl Weighting {
    pub fn content_weight(self) -> Result<ContentWeight> {
        match self {
            Weighting::Diversity(d) => ContentWeight::from_diversity(d),
            Weighting::ContentWeight(w) => ContentWeight::new(w),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub name: String,
    pub artist: String,
    pub strategy: Strategy,
    pub k: usize,
    pub weighting: Weighting,
}

impl RecommendRequest {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            strategy,
            k: DEFAULT_K,
            weighting: Weighting::default(),
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }
}

pub struct Recommender {
    content: ContentDataset,
    collaborative: CollaborativeDataset,
}

impl Recommender {
    pub fn new(content: ContentDataset, collaborative: CollaborativeDataset) -> Self {
        info!(
            tracks = content.catalog().len(),
            content_features = content.features().cols(),
            filtered_tracks = collaborative.catalog().len(),
            users = collaborative.interactions().cols(),
            "recommender ready"
        );
        Self {
            content,
            collaborative,
        }
    }

    pub fn content(&self) -> &ContentDataset {
        &self.content
    }

    pub fn collaborative(&self) -> &CollaborativeDataset {
        &self.collaborative
    }

    /// Strategies that can serve this track. Collaborative and hybrid need
    /// the track in the filtered catalog.
    pub fn available_strategies(&self, name: &str, artist: &str) -> Vec<Strategy> {
        if self.collaborative.catalog().contains(name, artist) {
            vec![Strategy::Content, Strategy::Collaborative, Strategy::Hybrid]
        } else {
            vec![Strategy::Content]
        }
    }

    /// Hybrid when available, content otherwise.
    pub fn default_strategy(&self, name: &str, artist: &str) -> Strategy {
        if self.collaborative.catalog().contains(name, artist) {
            Strategy::Hybrid
        } else {
            Strategy::Content
        }
    }

    /// Catalog whose rows a strategy ranks.
    pub fn catalog_for(&self, strategy: Strategy) -> &Catalog {
        match strategy {
            Strategy::Content => self.content.catalog(),
            Strategy::Collaborative | Strategy::Hybrid => self.collaborative.catalog(),
        }
    }

    pub fn recommend(&self, request: &RecommendRequest) -> Result<Vec<Recommendation>> {
        let RecommendRequest {
            name,
            artist,
            strategy,
            k,
            weighting,
        } = request;

        let ranked = match strategy {
            Strategy::Content => content::recommend_track(&self.content, name, artist, *k)?,
            Strategy::Collaborative => {
                collaborative::recommend(&self.collaborative, name, artist, *k)?
            }
            Strategy::Hybrid => {
                let weight = weighting.content_weight()?;
                hybrid::recommend(&self.collaborative, name, artist, *k, weight)?
            }
        };

        materialize(self.catalog_for(*strategy), &ranked)
    }
}

/// User-facing text for a track missing from the catalog.
pub fn not_found_message(name: &str) -> String {
    format!(
        "Sorry, we couldn't find {} in our database. Please try another song.",
        name
    )
}
