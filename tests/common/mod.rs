#![allow(dead_code)]

use song_recommender::{
    Catalog, CatalogEntry, CollaborativeDataset, ContentDataset, CsrMatrix, Recommender,
};

pub fn entry(name: &str, artist: &str) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        artist: artist.to_string(),
        preview_audio_ref: format!("https://p.scdn.co/mp3-preview/{}", name.replace(' ', "-")),
    }
}

/// Full catalog; the last track has too few listeners for the filtered one.
pub fn full_entries() -> Vec<CatalogEntry> {
    vec![
        entry("blinding lights", "the weeknd"),
        entry("save your tears", "the weeknd"),
        entry("levitating", "dua lipa"),
        entry("starboy", "the weeknd"),
        entry("physical", "dua lipa"),
        entry("obscure b-side", "nobody"),
    ]
}

pub fn content_rows() -> Vec<Vec<f32>> {
    vec![
        vec![1.0, 0.9, 0.1],
        vec![0.9, 1.0, 0.1],
        vec![0.1, 0.2, 1.0],
        vec![0.8, 0.5, 0.3],
        vec![0.2, 0.1, 0.9],
        vec![0.5, 0.5, 0.5],
    ]
}

pub fn content_dataset() -> ContentDataset {
    let features = CsrMatrix::from_dense(&content_rows()).unwrap();
    ContentDataset::try_new(Catalog::new(full_entries()), features).unwrap()
}

pub fn collaborative_dataset() -> CollaborativeDataset {
    let entries: Vec<CatalogEntry> = full_entries().into_iter().take(5).collect();
    let track_ids = (0..entries.len()).map(|i| format!("track-{}", i)).collect();
    // rows = tracks, columns = users
    let interactions = CsrMatrix::from_dense(&[
        vec![5.0, 3.0, 0.0, 0.0],
        vec![4.0, 2.0, 0.0, 1.0],
        vec![0.0, 0.0, 5.0, 2.0],
        vec![3.0, 3.0, 0.0, 0.0],
        vec![0.0, 1.0, 4.0, 3.0],
    ])
    .unwrap();
    let hybrid = CsrMatrix::from_dense(&content_rows()[..5]).unwrap();
    CollaborativeDataset::try_new(Catalog::new(entries), track_ids, interactions, hybrid).unwrap()
}

pub fn recommender() -> Recommender {
    Recommender::new(content_dataset(), collaborative_dataset())
}
