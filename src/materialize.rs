use crate::catalog::{Catalog, TrackRecord};
use crate::error::{RecommendError, Result};
use crate::ranking::ScoredRow;
use serde::Serialize;

/// Display position of a result. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    CurrentlyPlaying,
    NextUp,
    Additional,
}

impl Role {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            0 => Role::CurrentlyPlaying,
            1 => Role::NextUp,
            _ => Role::Additional,
        }
    }

    pub fn heading(self) -> Option<&'static str> {
        match self {
            Role::CurrentlyPlaying => Some("Currently Playing"),
            Role::NextUp => Some("Next Up"),
            Role::Additional => None,
        }
    }
}

/// A ranked result ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rank: usize,
    pub role: Role,
    #[serde(flatten)]
    pub track: TrackRecord,
    pub score: f64,
}

/// Turn ranked rows back into catalog records, keeping rank order.
///
/// `catalog` must be the catalog whose rows the engine ranked.
pub fn materialize(catalog: &Catalog, ranked: &[ScoredRow]) -> Result<Vec<Recommendation>> {
    ranked
        .iter()
        .enumerate()
        .map(|(rank, scored)| -> Result<Recommendation> {
            let track = catalog.get(scored.row_index).ok_or(
                RecommendError::DimensionMismatch {
                    what: "ranked row",
                    expected: catalog.len(),
                    actual: scored.row_index + 1,
                },
            )?;
            Ok(Recommendation {
                rank,
                role: Role::for_rank(rank),
                track: track.clone(),
                score: scored.score,
            })
        })
        .collect()
}

/// Capitalize the first letter of every word, e.g. "mr. brightside" ->
/// "Mr. Brightside".
pub fn display_title(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.push(c);
            if c.is_whitespace() || c == '-' || c == '(' || c == '/' {
                word_start = true;
            } else if c.is_alphanumeric() {
                word_start = false;
            }
        }
    }
    out
}
