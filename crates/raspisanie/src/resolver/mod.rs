//! Maps a user-supplied group label to a group known to the source.
//!
//! Strategies run in order and the first hit wins:
//! 1. exact match,
//! 2. code-page repairs of the input, exact or case-insensitive,
//! 3. closest fuzzy match, case-sensitive then case-folded.

mod encoding;
mod similarity;

pub use encoding::{encoding_variants, LegacyCodePage};
pub use similarity::{closest_match, ratio};

use crate::error::{Result, ScheduleError};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Minimum similarity ratio accepted by the fuzzy strategy.
pub const FUZZY_CUTOFF: f64 = 0.6;

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Exact,
    Encoding,
    Fuzzy,
}

/// A resolved group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Label as the source knows it
    pub label: String,
    /// Source's internal id for the group
    pub id: String,
    pub strategy: MatchStrategy,
    /// True if `label` differs from what was requested
    pub substituted: bool,
}

/// Resolves `requested` against a label → id mapping.
///
/// Fails with [`ScheduleError::GroupNotFound`] when no strategy matches.
pub fn resolve(requested: &str, known: &BTreeMap<String, String>) -> Result<Resolution> {
    let (label, strategy) = if known.contains_key(requested) {
        (requested, MatchStrategy::Exact)
    } else if let Some(label) = match_encoding_variants(requested, known) {
        (label, MatchStrategy::Encoding)
    } else if let Some(label) = match_fuzzy(requested, known) {
        (label, MatchStrategy::Fuzzy)
    } else {
        debug!(group = %requested, candidates = known.len(), "No group matched");
        return Err(ScheduleError::GroupNotFound {
            group: requested.to_string(),
        });
    };

    let substituted = label != requested;
    if substituted {
        warn!(
            requested = %requested,
            resolved = %label,
            strategy = ?strategy,
            "Using closest group match"
        );
    }

    Ok(Resolution {
        label: label.to_string(),
        id: known[label].clone(),
        strategy,
        substituted,
    })
}

/// Tries the input and its code-page repairs, exactly and case-insensitively.
pub fn match_encoding_variants<'a>(
    requested: &str,
    known: &'a BTreeMap<String, String>,
) -> Option<&'a str> {
    encoding_variants(requested).into_iter().find_map(|variant| {
        if let Some((label, _)) = known.get_key_value(&variant) {
            return Some(label.as_str());
        }
        let folded = variant.to_lowercase();
        known
            .keys()
            .find(|label| label.to_lowercase() == folded)
            .map(String::as_str)
    })
}

/// Picks the most similar known label, first as typed, then case-folded.
pub fn match_fuzzy<'a>(requested: &str, known: &'a BTreeMap<String, String>) -> Option<&'a str> {
    if let Some(label) = closest_match(requested, known.keys().map(String::as_str), FUZZY_CUTOFF) {
        return Some(label);
    }

    let folded: Vec<(String, &'a str)> = known
        .keys()
        .map(|label| (label.to_lowercase(), label.as_str()))
        .collect();
    let best = closest_match(
        &requested.to_lowercase(),
        folded.iter().map(|(lower, _)| lower.as_str()),
        FUZZY_CUTOFF,
    )?;
    folded
        .iter()
        .find(|(lower, _)| lower == best)
        .map(|(_, label)| *label)
}
