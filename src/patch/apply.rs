//! Patch application onto a possibly-drifted target.
//!
//! Each hunk is located in the target with the fuzzy matcher, starting from
//! where earlier hunks left off. A located hunk either splices in directly
//! (exact surroundings) or replays its edits through a fresh diff of the
//! expected against the actual text. Application never fails as a whole;
//! every hunk reports its own outcome.

use crate::diff::{self, cleanup, Diff, Differ, Op};
use crate::matching::Matcher;
use crate::patch::{make::Patcher, Patch};

impl Patcher {
    /// Applies `patches` against `text`, returning the patched text and a
    /// per-hunk success flag. The input patch list is never modified.
    pub fn apply(&self, patches: &[Patch], text: &str) -> (String, Vec<bool>) {
        if patches.is_empty() {
            return (text.to_string(), Vec::new());
        }
        // Work on a deep copy so the caller's patches survive untouched.
        let mut patches = patches.to_vec();
        let null_padding: Vec<char> = self.add_padding(&mut patches).chars().collect();
        let mut text: Vec<char> = null_padding
            .iter()
            .copied()
            .chain(text.chars())
            .chain(null_padding.iter().copied())
            .collect();
        self.split_max(&mut patches);

        let differ = Differ::with_config(self.config);
        let matcher = Matcher::with_config(self.config);
        let max_bits = self.config.match_max_bits;

        // `delta` tracks the offset between the expected and actual
        // location of the previous patch. If there are patches expected at
        // positions 10 and 20, but the first was found at 12, the second is
        // expected at 22.
        let mut delta: isize = 0;
        let mut results = vec![false; patches.len()];
        for (x, patch) in patches.iter().enumerate() {
            // The search clamps into the text, but the drift bookkeeping
            // keeps the raw expectation.
            let raw_expected = patch.start2 as isize + delta;
            let expected_loc = raw_expected.max(0) as usize;
            let text1 = diff::text1_chars(&patch.diffs);
            let mut start_loc = None;
            let mut end_loc = None;
            if text1.len() > max_bits {
                // A large hunk: look for its endpoints separately.
                start_loc = locate(&matcher, &text, &text1[..max_bits], expected_loc);
                if let Some(start) = start_loc {
                    end_loc = locate(
                        &matcher,
                        &text,
                        &text1[text1.len() - max_bits..],
                        expected_loc + text1.len() - max_bits,
                    );
                    match end_loc {
                        Some(end) if start < end => {}
                        // Can't find valid trailing context, drop this patch.
                        _ => start_loc = None,
                    }
                }
            } else {
                start_loc = locate(&matcher, &text, &text1, expected_loc);
            }
            match start_loc {
                None => {
                    // No match found.
                    results[x] = false;
                    // Subtract the delta for this failed patch from
                    // subsequent patches.
                    delta -= patch.length2 as isize - patch.length1 as isize;
                }
                Some(start_loc) => {
                    // Found a match.
                    results[x] = true;
                    delta = start_loc as isize - raw_expected;
                    let end = match end_loc {
                        Some(end_loc) => (end_loc + max_bits).min(text.len()),
                        None => (start_loc + text1.len()).min(text.len()),
                    };
                    let text2: Vec<char> = text[start_loc..end].to_vec();
                    if text1 == text2 {
                        // Perfect match, just shove the replacement in.
                        text.splice(
                            start_loc..start_loc + text1.len(),
                            diff::text2_chars(&patch.diffs),
                        );
                    } else {
                        // Imperfect match. Run a diff to get a framework of
                        // equivalent indices.
                        let diffs = imperfect_diff(&differ, &text1, &text2);
                        let too_lossy = text1.len() > max_bits
                            && diff::levenshtein(&diffs) as f32 / text1.len() as f32
                                > self.config.patch_delete_threshold;
                        if too_lossy {
                            // The end points match, but the content is
                            // unacceptably bad.
                            results[x] = false;
                        } else {
                            let mut index1 = 0;
                            for edit in &patch.diffs {
                                if edit.op != Op::Equal {
                                    let index2 = diff::x_index(&diffs, index1);
                                    match edit.op {
                                        Op::Insert => {
                                            text.splice(
                                                start_loc + index2..start_loc + index2,
                                                edit.text.iter().copied(),
                                            );
                                        }
                                        Op::Delete => {
                                            let del_end = diff::x_index(
                                                &diffs,
                                                index1 + edit.len(),
                                            );
                                            text.drain(start_loc + index2..start_loc + del_end);
                                        }
                                        Op::Equal => {}
                                    }
                                }
                                if edit.op != Op::Delete {
                                    index1 += edit.len();
                                }
                            }
                        }
                    }
                }
            }
        }
        // Strip the padding off.
        let text: String = text[null_padding.len()..text.len() - null_padding.len()]
            .iter()
            .collect();
        (text, results)
    }

    /// Adds a guard of non-text characters to the edges of the first and
    /// last patch so edge hunks have matchable context. Returns the padding
    /// string; patch coordinates shift accordingly.
    pub fn add_padding(&self, patches: &mut Vec<Patch>) -> String {
        let padding_length = self.config.patch_margin;
        let null_padding: Vec<char> = (1..=padding_length as u32)
            .filter_map(char::from_u32)
            .collect();
        if patches.is_empty() {
            return null_padding.iter().collect();
        }

        // Bump all the patches forward.
        for patch in patches.iter_mut() {
            patch.start1 += padding_length;
            patch.start2 += padding_length;
        }

        // Add some padding on start of first diff.
        if let Some(patch) = patches.first_mut() {
            let needs_full = patch.diffs.first().map_or(true, |d| d.op != Op::Equal);
            if needs_full {
                patch
                    .diffs
                    .insert(0, Diff::from_chars(Op::Equal, null_padding.clone()));
                patch.start1 -= padding_length; // should be 0
                patch.start2 -= padding_length; // should be 0
                patch.length1 += padding_length;
                patch.length2 += padding_length;
            } else if padding_length > patch.diffs[0].len() {
                // Grow first equality.
                let extra = padding_length - patch.diffs[0].len();
                let mut grown: Vec<char> = null_padding[patch.diffs[0].len()..].to_vec();
                grown.extend_from_slice(&patch.diffs[0].text);
                patch.diffs[0].text = grown;
                patch.start1 -= extra;
                patch.start2 -= extra;
                patch.length1 += extra;
                patch.length2 += extra;
            }
        }

        // Add some padding on end of last diff.
        if let Some(patch) = patches.last_mut() {
            let needs_full = patch.diffs.last().map_or(true, |d| d.op != Op::Equal);
            if needs_full {
                patch
                    .diffs
                    .push(Diff::from_chars(Op::Equal, null_padding.clone()));
                patch.length1 += padding_length;
                patch.length2 += padding_length;
            } else if let Some(last) = patch.diffs.last_mut() {
                if padding_length > last.len() {
                    // Grow last equality.
                    let extra = padding_length - last.len();
                    last.text.extend_from_slice(&null_padding[..extra]);
                    patch.length1 += extra;
                    patch.length2 += extra;
                }
            }
        }

        null_padding.iter().collect()
    }

    /// Splits patches whose pre-image exceeds the Bitap width into smaller
    /// hunks the matcher can locate.
    pub fn split_max(&self, patches: &mut Vec<Patch>) {
        let patch_size = self.config.match_max_bits;
        let margin = self.config.patch_margin;
        let mut x = 0;
        while x < patches.len() {
            if patches[x].length1 <= patch_size {
                x += 1;
                continue;
            }
            let mut bigpatch = patches.remove(x);
            let mut start1 = bigpatch.start1;
            let mut start2 = bigpatch.start2;
            let mut precontext: Vec<char> = Vec::new();
            while !bigpatch.diffs.is_empty() {
                // Create one of several smaller patches.
                let mut patch = Patch::new();
                let mut empty = true;
                patch.start1 = start1 - precontext.len();
                patch.start2 = start2 - precontext.len();
                if !precontext.is_empty() {
                    patch.length1 = precontext.len();
                    patch.length2 = precontext.len();
                    patch
                        .diffs
                        .push(Diff::from_chars(Op::Equal, precontext.clone()));
                }
                while !bigpatch.diffs.is_empty() && patch.length1 < patch_size - margin {
                    let diff_type = bigpatch.diffs[0].op;
                    match diff_type {
                        Op::Insert => {
                            // Insertions are harmless.
                            let diff = bigpatch.diffs.remove(0);
                            patch.length2 += diff.len();
                            start2 += diff.len();
                            patch.diffs.push(diff);
                            empty = false;
                        }
                        Op::Delete
                            if patch.diffs.len() == 1
                                && patch.diffs[0].op == Op::Equal
                                && bigpatch.diffs[0].len() > 2 * patch_size =>
                        {
                            // This is a large deletion. Let it pass in one
                            // chunk.
                            let diff = bigpatch.diffs.remove(0);
                            patch.length1 += diff.len();
                            start1 += diff.len();
                            patch.diffs.push(diff);
                            empty = false;
                        }
                        _ => {
                            // Deletion or equality; only take as much as we
                            // can stomach.
                            let take = bigpatch.diffs[0]
                                .len()
                                .min(patch_size - patch.length1 - margin);
                            let diff_text: Vec<char> =
                                bigpatch.diffs[0].text[..take].to_vec();
                            patch.length1 += take;
                            start1 += take;
                            if diff_type == Op::Equal {
                                patch.length2 += take;
                                start2 += take;
                            } else {
                                empty = false;
                            }
                            patch.diffs.push(Diff::from_chars(diff_type, diff_text));
                            if take == bigpatch.diffs[0].len() {
                                bigpatch.diffs.remove(0);
                            } else {
                                bigpatch.diffs[0].text.drain(..take);
                            }
                        }
                    }
                }
                // Compute the head context for the next patch.
                precontext = diff::text2_chars(&patch.diffs);
                if precontext.len() > margin {
                    precontext = precontext[precontext.len() - margin..].to_vec();
                }
                // Append the end context for this patch.
                let mut postcontext = diff::text1_chars(&bigpatch.diffs);
                postcontext.truncate(margin);
                if !postcontext.is_empty() {
                    patch.length1 += postcontext.len();
                    patch.length2 += postcontext.len();
                    match patch.diffs.last_mut() {
                        Some(last) if last.op == Op::Equal => {
                            last.text.extend_from_slice(&postcontext);
                        }
                        _ => patch
                            .diffs
                            .push(Diff::from_chars(Op::Equal, postcontext)),
                    }
                }
                if !empty {
                    patches.insert(x, patch);
                    x += 1;
                }
            }
        }
    }
}

fn locate(matcher: &Matcher, text: &[char], pattern: &[char], loc: usize) -> Option<usize> {
    // Patterns here never exceed the Bitap width by construction; an
    // over-wide configuration simply fails the hunk.
    matcher.main_chars(text, pattern, loc).unwrap_or(None)
}

fn imperfect_diff(differ: &Differ, text1: &[char], text2: &[char]) -> Vec<Diff> {
    let text1: String = text1.iter().collect();
    let text2: String = text2.iter().collect();
    let mut diffs = differ.main(&text1, &text2, false);
    cleanup::cleanup_semantic_lossless(&mut diffs);
    diffs
}
