mod common;

use song_recommender::ranking::ScoredRow;
use song_recommender::{
    collaborative, content, hybrid::{self, ContentWeight}, Catalog, CollaborativeDataset,
    ContentDataset, CsrMatrix, RecommendError, RecommendRequest, Role, Strategy, Weighting,
};

fn rows(ranked: &[ScoredRow]) -> Vec<usize> {
    ranked.iter().map(|r| r.row_index).collect()
}

fn assert_well_ranked(ranked: &[ScoredRow], query_row: usize, expected_len: usize) {
    assert_eq!(ranked.len(), expected_len);
    assert!(ranked.iter().all(|r| r.row_index != query_row));
    for pair in ranked.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].row_index < pair[1].row_index),
            "bad order: {:?}",
            pair
        );
    }
}

#[test]
fn locate_matches_case_insensitively() {
    let dataset = common::content_dataset();
    let catalog = dataset.catalog();
    for track in catalog.tracks() {
        let row = catalog
            .locate(&track.name.to_uppercase(), &track.artist.to_uppercase())
            .unwrap();
        let found = catalog.get(row).unwrap();
        assert!(found.name.eq_ignore_ascii_case(&track.name));
        assert!(found.artist.eq_ignore_ascii_case(&track.artist));
    }
    assert!(catalog.locate("starboy", "dua lipa").unwrap_err().is_not_found());
}

#[test]
fn near_duplicate_ranks_before_unrelated() {
    let catalog = Catalog::new(vec![
        common::entry("a", "x"),
        common::entry("b", "x"),
        common::entry("c", "y"),
    ]);
    let features = CsrMatrix::from_dense(&[
        vec![1.0, 1.0, 0.0],
        vec![1.0, 0.95, 0.0],
        vec![0.0, 0.1, 1.0],
    ])
    .unwrap();
    let dataset = ContentDataset::try_new(catalog, features).unwrap();

    let recs = content::recommend_track(&dataset, "A", "X", 2).unwrap();
    assert_eq!(rows(&recs), vec![1, 2]);
    assert!(recs[0].score > recs[1].score);
}

#[test]
fn every_strategy_returns_well_ranked_lists() {
    let content_data = common::content_dataset();
    let collab_data = common::collaborative_dataset();

    for k in [1, 3, 4, 10] {
        for track in content_data.catalog().tracks() {
            let recs =
                content::recommend_track(&content_data, &track.name, &track.artist, k).unwrap();
            assert_well_ranked(&recs, track.row_index, k.min(5));
        }
        for track in collab_data.catalog().tracks() {
            let recs = collaborative::recommend(&collab_data, &track.name, &track.artist, k)
                .unwrap();
            assert_well_ranked(&recs, track.row_index, k.min(4));

            let recs = hybrid::recommend(
                &collab_data,
                &track.name,
                &track.artist,
                k,
                ContentWeight::default(),
            )
            .unwrap();
            assert_well_ranked(&recs, track.row_index, k.min(4));
        }
    }
}

#[test]
fn recommendations_are_reproducible() {
    let recommender = common::recommender();
    for strategy in [Strategy::Content, Strategy::Collaborative, Strategy::Hybrid] {
        let request = RecommendRequest::new("Starboy", "The Weeknd", strategy).with_k(3);
        let first = recommender.recommend(&request).unwrap();
        let second = recommender.recommend(&request).unwrap();
        assert_eq!(first, second);
        let first_bits: Vec<u64> = first.iter().map(|r| r.score.to_bits()).collect();
        let second_bits: Vec<u64> = second.iter().map(|r| r.score.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }
}

#[test]
fn k_beyond_catalog_returns_every_other_track() {
    let recommender = common::recommender();
    let request = RecommendRequest::new("levitating", "dua lipa", Strategy::Collaborative).with_k(20);
    let recs = recommender.recommend(&request).unwrap();
    assert_eq!(recs.len(), 4);
    assert!(recs.iter().all(|r| r.track.name != "levitating"));
}

#[test]
fn track_outside_filtered_catalog_only_gets_content() {
    let recommender = common::recommender();
    let (name, artist) = ("Obscure B-Side", "Nobody");

    let content_req = RecommendRequest::new(name, artist, Strategy::Content);
    assert_eq!(recommender.recommend(&content_req).unwrap().len(), 5);

    for strategy in [Strategy::Collaborative, Strategy::Hybrid] {
        let err = recommender
            .recommend(&RecommendRequest::new(name, artist, strategy))
            .unwrap_err();
        assert!(err.is_not_found(), "{:?} should be NotFound", strategy);
    }

    assert_eq!(recommender.available_strategies(name, artist), vec![Strategy::Content]);
    assert_eq!(recommender.default_strategy(name, artist), Strategy::Content);
    assert_eq!(
        recommender.available_strategies("starboy", "the weeknd"),
        vec![Strategy::Content, Strategy::Collaborative, Strategy::Hybrid]
    );
    assert_eq!(recommender.default_strategy("starboy", "the weeknd"), Strategy::Hybrid);
}

#[test]
fn unknown_track_is_not_found_for_all_strategies() {
    let recommender = common::recommender();
    for strategy in [Strategy::Content, Strategy::Collaborative, Strategy::Hybrid] {
        let err = recommender
            .recommend(&RecommendRequest::new("no such song", "nobody", strategy))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

#[test]
fn pure_weights_match_single_engines() {
    let dataset = common::collaborative_dataset();
    for track in dataset.catalog().tracks() {
        let (name, artist) = (&track.name, &track.artist);

        let content_only =
            hybrid::recommend(&dataset, name, artist, 4, ContentWeight::new(1.0).unwrap()).unwrap();
        let expected =
            content::recommend(track.row_index, dataset.hybrid_features(), 4).unwrap();
        assert_eq!(content_only, expected);

        let collab_only =
            hybrid::recommend(&dataset, name, artist, 4, ContentWeight::new(0.0).unwrap()).unwrap();
        let expected = collaborative::recommend(&dataset, name, artist, 4).unwrap();
        assert_eq!(collab_only, expected);
    }
}

/// Q is the query. Content prefers X, listeners prefer Y, W is second for
/// both but wins the even blend.
fn blend_dataset() -> CollaborativeDataset {
    let catalog = Catalog::new(vec![
        common::entry("q", "a"),
        common::entry("x", "a"),
        common::entry("w", "a"),
        common::entry("y", "a"),
    ]);
    let track_ids = vec!["q".into(), "x".into(), "w".into(), "y".into()];
    let hybrid_features = CsrMatrix::from_dense(&[
        vec![1.0, 0.0],
        vec![0.9, 0.435_89],
        vec![0.7, 0.714_14],
        vec![0.1, 0.994_99],
    ])
    .unwrap();
    let interactions = CsrMatrix::from_dense(&[
        vec![1.0, 0.0],
        vec![0.1, 0.994_99],
        vec![0.7, 0.714_14],
        vec![0.9, 0.435_89],
    ])
    .unwrap();
    CollaborativeDataset::try_new(catalog, track_ids, interactions, hybrid_features).unwrap()
}

#[test]
fn blend_is_recomputed_from_scores() {
    let dataset = blend_dataset();

    let content_top = content::recommend(0, dataset.hybrid_features(), 1).unwrap();
    let collab_top = collaborative::recommend(&dataset, "q", "a", 1).unwrap();
    assert_eq!(rows(&content_top), vec![1]);
    assert_eq!(rows(&collab_top), vec![3]);

    let weight = ContentWeight::new(0.5).unwrap();
    let blended = hybrid::recommend(&dataset, "q", "a", 1, weight).unwrap();
    assert_eq!(rows(&blended), vec![2]);
    assert!((blended[0].score - 0.7).abs() < 1e-4);

    let all = hybrid::recommend(&dataset, "q", "a", 3, weight).unwrap();
    let content_scores = content::scores(0, dataset.hybrid_features()).unwrap();
    let collab_scores = collaborative::scores(&dataset, 0).unwrap();
    for r in &all {
        let expected = 0.5 * content_scores[r.row_index] + 0.5 * collab_scores[r.row_index];
        assert!((r.score - expected).abs() < 1e-12);
    }
}

#[test]
fn invalid_weighting_is_rejected_before_lookup() {
    let recommender = common::recommender();
    let base = RecommendRequest::new("q", "a", Strategy::Hybrid);
    // Not in the fixture; parameter validation still comes first
    let err = recommender
        .recommend(&base.clone().with_weighting(Weighting::Diversity(11)))
        .unwrap_err();
    assert!(matches!(err, RecommendError::InvalidParameter(_)));
    let err = recommender
        .recommend(&base.with_weighting(Weighting::ContentWeight(1.5)))
        .unwrap_err();
    assert!(matches!(err, RecommendError::InvalidParameter(_)));
}

#[test]
fn zero_k_is_rejected() {
    let recommender = common::recommender();
    for strategy in [Strategy::Content, Strategy::Collaborative, Strategy::Hybrid] {
        let err = recommender
            .recommend(&RecommendRequest::new("starboy", "the weeknd", strategy).with_k(0))
            .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidParameter(_)));
    }
}

#[test]
fn materialized_results_carry_roles_and_records() {
    let recommender = common::recommender();
    let request = RecommendRequest::new("Blinding Lights", "The Weeknd", Strategy::Content).with_k(3);
    let recs = recommender.recommend(&request).unwrap();

    assert_eq!(recs[0].track.name, "save your tears");
    assert_eq!(recs[0].role, Role::CurrentlyPlaying);
    assert_eq!(recs[1].role, Role::NextUp);
    assert_eq!(recs[2].role, Role::Additional);
    for (rank, rec) in recs.iter().enumerate() {
        assert_eq!(rec.rank, rank);
        let catalog_track = recommender.content().catalog().get(rec.track.row_index).unwrap();
        assert_eq!(&rec.track, catalog_track);
    }
}

#[test]
fn misaligned_parts_are_rejected() {
    let catalog = Catalog::new(common::full_entries());
    let features = CsrMatrix::from_dense(&common::content_rows()[..4]).unwrap();
    let err = ContentDataset::try_new(catalog, features).unwrap_err();
    assert!(matches!(err, RecommendError::DimensionMismatch { .. }));
}
