//! Patch synthesis: grouping a diff into hunks with unique context.

use crate::config::Config;
use crate::diff::{self, cleanup, Diff, Differ, Op};
use crate::patch::Patch;
use crate::text;

/// Builds and applies patches.
///
/// A `Patcher` carries the shared [`Config`] and hands it down to the diff
/// and match engines it drives internally.
#[derive(Debug, Clone, Default)]
pub struct Patcher {
    pub(crate) config: Config,
}

impl Patcher {
    /// Creates a patcher with the default configuration.
    pub fn new() -> Self {
        Patcher {
            config: Config::default(),
        }
    }

    /// Creates a patcher with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Patcher { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes a list of patches turning `text1` into `text2`.
    pub fn make(&self, text1: &str, text2: &str) -> Vec<Patch> {
        // No diffs provided, compute our own.
        let differ = Differ::with_config(self.config);
        let mut diffs = differ.main(text1, text2, true);
        if diffs.len() > 2 {
            cleanup::cleanup_semantic(&mut diffs);
            cleanup::cleanup_efficiency(&mut diffs, self.config.diff_edit_cost);
        }
        let text1: Vec<char> = text1.chars().collect();
        self.make_inner(&text1, &diffs)
    }

    /// Computes a list of patches from a diff; the pre-image is
    /// reconstructed from the diff itself.
    pub fn make_from_diffs(&self, diffs: &[Diff]) -> Vec<Patch> {
        let text1 = diff::text1_chars(diffs);
        self.make_inner(&text1, diffs)
    }

    /// Computes a list of patches from a pre-image and a diff.
    pub fn make_from_text_diffs(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
        let text1: Vec<char> = text1.chars().collect();
        self.make_inner(&text1, diffs)
    }

    /// Computes a list of patches from both texts and a diff.
    #[deprecated(note = "the second text is redundant; use make_from_text_diffs")]
    pub fn make_from_texts_and_diffs(
        &self,
        text1: &str,
        _text2: &str,
        diffs: &[Diff],
    ) -> Vec<Patch> {
        self.make_from_text_diffs(text1, diffs)
    }

    fn make_inner(&self, text1: &[char], diffs: &[Diff]) -> Vec<Patch> {
        let mut patches = Vec::new();
        if diffs.is_empty() {
            return patches; // no diffs, no patches
        }
        let margin = self.config.patch_margin;
        let mut patch = Patch::new();
        let mut char_count1 = 0; // cursor in the pre-image
        let mut char_count2 = 0; // cursor in the post-image
        // Rolling context: `prepatch` is text1 with the already-closed
        // hunks applied, so later headers account for earlier edits.
        let mut prepatch_text: Vec<char> = text1.to_vec();
        let mut postpatch_text: Vec<char> = text1.to_vec();
        for (i, diff) in diffs.iter().enumerate() {
            if patch.diffs.is_empty() && diff.op != Op::Equal {
                // A new patch starts here.
                patch.start1 = char_count1;
                patch.start2 = char_count2;
            }

            match diff.op {
                Op::Insert => {
                    patch.diffs.push(diff.clone());
                    patch.length2 += diff.len();
                    postpatch_text.splice(char_count2..char_count2, diff.text.iter().copied());
                }
                Op::Delete => {
                    patch.length1 += diff.len();
                    patch.diffs.push(diff.clone());
                    postpatch_text.drain(char_count2..char_count2 + diff.len());
                }
                Op::Equal => {
                    if diff.len() <= 2 * margin && !patch.diffs.is_empty() && i != diffs.len() - 1
                    {
                        // Small equality inside a patch.
                        patch.diffs.push(diff.clone());
                        patch.length1 += diff.len();
                        patch.length2 += diff.len();
                    }
                    if diff.len() >= 2 * margin && !patch.diffs.is_empty() {
                        // Time for a new patch.
                        self.add_context(&mut patch, &prepatch_text);
                        patches.push(std::mem::take(&mut patch));
                        // Unlike Unidiff, our patch lists have a rolling
                        // context. Update prepatch to reflect the
                        // application of the just completed patch.
                        prepatch_text = postpatch_text.clone();
                        char_count1 = char_count2;
                    }
                }
            }

            // Update the current character count.
            if diff.op != Op::Insert {
                char_count1 += diff.len();
            }
            if diff.op != Op::Delete {
                char_count2 += diff.len();
            }
        }
        // Pick up the leftover patch if not empty.
        if !patch.diffs.is_empty() {
            self.add_context(&mut patch, &prepatch_text);
            patches.push(patch);
        }
        patches
    }

    /// Increases the context of `patch` until it is unique in `text`, then
    /// adds one margin of padding on both sides.
    pub(crate) fn add_context(&self, patch: &mut Patch, text: &[char]) {
        if text.is_empty() {
            return;
        }
        let margin = self.config.patch_margin;
        let mut pattern = text[patch.start2..patch.start2 + patch.length1].to_vec();
        let mut padding = 0;

        // Grow the pattern around the patch until it is unique, stopping
        // short of what Bitap can still match after the margins are added.
        let max_pattern = self.config.match_max_bits.saturating_sub(2 * margin);
        while !unique_in(text, &pattern) && pattern.len() < max_pattern {
            padding += margin;
            let start = patch.start2.saturating_sub(padding);
            let end = (patch.start2 + patch.length1 + padding).min(text.len());
            pattern = text[start..end].to_vec();
        }
        // Add one chunk for good luck.
        padding += margin;

        // Add the prefix.
        let prefix = &text[patch.start2.saturating_sub(padding)..patch.start2];
        if !prefix.is_empty() {
            patch
                .diffs
                .insert(0, Diff::from_chars(Op::Equal, prefix.to_vec()));
        }
        // Add the suffix.
        let suffix_start = patch.start2 + patch.length1;
        let suffix = &text[suffix_start..(suffix_start + padding).min(text.len())];
        if !suffix.is_empty() {
            patch
                .diffs
                .push(Diff::from_chars(Op::Equal, suffix.to_vec()));
        }

        // Roll back the start points and extend the lengths.
        patch.start1 -= prefix.len();
        patch.start2 -= prefix.len();
        patch.length1 += prefix.len() + suffix.len();
        patch.length2 += prefix.len() + suffix.len();
    }
}

/// True when `pattern` occurs at most once in `text`. An empty pattern is
/// never unique in a non-empty text.
fn unique_in(text: &[char], pattern: &[char]) -> bool {
    if pattern.is_empty() {
        return text.is_empty();
    }
    match text::find_sub(text, pattern) {
        None => true,
        Some(first) => text::find_sub_from(text, pattern, first + 1).is_none(),
    }
}
