//! Catalog index
//!
//! A catalog is the ordered track table paired with a feature matrix. Row
//! position is the only identity a track has; names and artists may repeat.

use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One catalog row as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub artist: String,
    #[serde(alias = "spotify_preview_url", default)]
    pub preview_audio_ref: String,
}

/// A track together with its row in the paired matrices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub name: String,
    pub artist: String,
    pub preview_audio_ref: String,
    pub row_index: usize,
}

/// Lowercase and trim a user-supplied or stored name.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct Catalog {
    tracks: Vec<TrackRecord>,
    index: HashMap<(String, String), usize>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        let tracks: Vec<TrackRecord> = entries
            .into_iter()
            .enumerate()
            .map(|(row_index, e)| {
                // First row wins for duplicate (name, artist) pairs
                index
                    .entry((normalize(&e.name), normalize(&e.artist)))
                    .or_insert(row_index);
                TrackRecord {
                    name: e.name,
                    artist: e.artist,
                    preview_audio_ref: e.preview_audio_ref,
                    row_index,
                }
            })
            .collect();

        Self { tracks, index }
    }

    /// Row of the first track matching `name` and `artist` case-insensitively.
    pub fn locate(&self, name: &str, artist: &str) -> Result<usize> {
        self.index
            .get(&(normalize(name), normalize(artist)))
            .copied()
            .ok_or_else(|| RecommendError::NotFound {
                name: name.to_string(),
                artist: artist.to_string(),
            })
    }

    pub fn contains(&self, name: &str, artist: &str) -> bool {
        self.locate(name, artist).is_ok()
    }

    pub fn get(&self, row_index: usize) -> Option<&TrackRecord> {
        self.tracks.get(row_index)
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Catalog::new(entries)
    }
}

impl From<Catalog> for Vec<CatalogEntry> {
    fn from(catalog: Catalog) -> Self {
        catalog
            .tracks
            .into_iter()
            .map(|t| CatalogEntry {
                name: t.name,
                artist: t.artist,
                preview_audio_ref: t.preview_audio_ref,
            })
            .collect()
    }
}
