//! Constants used throughout text-patch.
//!
//! Default tunable values mirror the widely deployed diff-match-patch
//! reference so that patch and delta texts interoperate.

/// Default soft deadline for the diff bisection, in seconds. Zero disables it.
pub const DIFF_TIMEOUT: f32 = 1.0;

/// Default cost threshold of the efficiency cleanup, in characters.
pub const DIFF_EDIT_COST: usize = 4;

/// Default maximum Bitap score accepted as a match (0.0 = exact only).
pub const MATCH_THRESHOLD: f32 = 0.5;

/// Default positional tolerance of the Bitap score function. Zero demands
/// the match sit exactly at the requested location.
pub const MATCH_DISTANCE: usize = 1000;

/// Default maximum pattern length accepted by Bitap; also caps hunk sizes
/// when patches are split for application.
pub const MATCH_MAX_BITS: usize = 32;

/// Hard ceiling on `match_max_bits`: Bitap state is a 64-bit mask.
pub const MATCH_MASK_BITS: usize = 64;

/// Default characters of equality context kept around each patch hunk.
pub const PATCH_MARGIN: usize = 4;

/// Default tolerance for applying a patch whose surrounding text has
/// drifted (fraction of the hunk that may fail to match).
pub const PATCH_DELETE_THRESHOLD: f32 = 0.5;

/// Inputs shorter than this skip the line-mode speedup.
pub const LINE_MODE_MIN_CHARS: usize = 100;

/// Maximum number of distinct lines the line folding can intern. Folded
/// indices at or above the surrogate range shift up by 0x800, so the last
/// usable code point is U+10FFFD.
pub const MAX_FOLD_LINES: usize = 0x10F7FD;
