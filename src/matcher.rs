use crate::error::{Error, Result};
use crate::parser::PriorYearIndex;
use std::fmt;
use tracing::debug;

/// Best prior-year record found for a student
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub search_name: String,
    pub matched_name: String,
    pub position: usize,
    pub score: f64,
}

impl fmt::Display for NameMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matched \"{}\" to \"{}\" (position {}) with a score of {:.1}",
            self.search_name, self.matched_name, self.position, self.score
        )
    }
}

/// Similarity in [0, 1] between two lowercase names
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Find the prior-year name most similar to `search_name`.
///
/// Candidates are scanned in index order and only a strictly better score
/// replaces the current best, so the first of several equal scores wins.
pub fn find_position(search_name: &str, index: &PriorYearIndex) -> Result<NameMatch> {
    let mut best: Option<NameMatch> = None;

    for (name, position) in index.entries() {
        let score = similarity(name, search_name);
        let improves = best.as_ref().map_or(true, |b| score > b.score);
        if improves {
            best = Some(NameMatch {
                search_name: search_name.to_string(),
                matched_name: name.to_string(),
                position,
                score,
            });
        }
    }

    let found = best.ok_or_else(|| Error::NoMatchCandidates {
        name: search_name.to_string(),
    })?;
    debug!(
        search = %found.search_name,
        matched = %found.matched_name,
        position = found.position,
        score = found.score,
        "fuzzy match"
    );
    Ok(found)
}
