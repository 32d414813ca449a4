//! Song recommendations from precomputed feature spaces.
//!
//! Three strategies share one ranking discipline: cosine similarity against
//! the query track's row, query excluded, scores descending with ties in
//! ascending row order.
//!
//! - [`content`] ranks the full catalog by content features.
//! - [`collaborative`] ranks the filtered catalog by shared listeners.
//! - [`hybrid`] blends both score vectors over the filtered catalog.
//!
//! Datasets are loaded once ([`store`]) and passed to a [`engine::Recommender`].

pub mod cache;
pub mod catalog;
pub mod collaborative;
pub mod content;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod hybrid;
pub mod materialize;
pub mod ranking;
pub mod server;
pub mod sparse;
pub mod store;

pub use catalog::{Catalog, CatalogEntry, TrackRecord};
pub use dataset::{CollaborativeDataset, ContentDataset};
pub use engine::{RecommendRequest, Recommender, Strategy, Weighting};
pub use error::RecommendError;
pub use materialize::{Recommendation, Role};
pub use sparse::CsrMatrix;
