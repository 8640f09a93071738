//! Tunables shared by the diff, match and patch engines.

use crate::constants::*;

/// Configuration bundle owned by the caller.
///
/// Engines copy the bundle at construction time and treat it as read-only
/// for the duration of every call; no derived state is cached across calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Soft deadline for the diff bisection, in seconds. Zero or a negative
    /// value removes the deadline entirely.
    pub diff_timeout: f32,
    /// Cost of an empty edit operation in characters, used by the
    /// efficiency cleanup to decide which equalities are worth keeping.
    pub diff_edit_cost: usize,
    /// Maximum Bitap score still accepted as a match (0.0 = perfection,
    /// 1.0 = anything goes).
    pub match_threshold: f32,
    /// How far from the expected location a match may stray before its
    /// score degrades to `match_threshold`. Zero demands the exact spot.
    pub match_distance: usize,
    /// Longest pattern Bitap accepts; hunks are split down to this size
    /// before application. Must not exceed 64.
    pub match_max_bits: usize,
    /// Characters of equality context grown around each patch hunk.
    pub patch_margin: usize,
    /// When deleting a large block, how closely the surrounding text must
    /// match the expectation (0.0 = exactly, 1.0 = very loosely).
    pub patch_delete_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            diff_timeout: DIFF_TIMEOUT,
            diff_edit_cost: DIFF_EDIT_COST,
            match_threshold: MATCH_THRESHOLD,
            match_distance: MATCH_DISTANCE,
            match_max_bits: MATCH_MAX_BITS,
            patch_margin: PATCH_MARGIN,
            patch_delete_threshold: PATCH_DELETE_THRESHOLD,
        }
    }
}
