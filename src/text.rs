//! String primitives shared by the diff, match and patch engines.
//!
//! All operations index Unicode scalar values, never bytes: callers convert
//! a `&str` to `Vec<char>` once at the API boundary and every length or
//! offset below is a count of scalars. Comparisons are code-point exact; a
//! ligature is never equated with its decomposition.

use rustc_hash::FxHashMap;

use crate::constants::MAX_FOLD_LINES;

/// Length of the longest common prefix of `a` and `b`, in scalars.
///
/// Binary-searches the boundary so the cost is O(log n) slice comparisons.
pub fn common_prefix(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() || a[0] != b[0] {
        return 0;
    }
    let mut pointer_min = 0;
    let mut pointer_max = a.len().min(b.len());
    let mut pointer_mid = pointer_max;
    let mut pointer_start = 0;
    while pointer_min < pointer_mid {
        if a[pointer_start..pointer_mid] == b[pointer_start..pointer_mid] {
            pointer_min = pointer_mid;
            pointer_start = pointer_min;
        } else {
            pointer_max = pointer_mid;
        }
        pointer_mid = (pointer_max - pointer_min) / 2 + pointer_min;
    }
    pointer_mid
}

/// Length of the longest common suffix of `a` and `b`, in scalars.
pub fn common_suffix(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() || a[a.len() - 1] != b[b.len() - 1] {
        return 0;
    }
    let mut pointer_min = 0;
    let mut pointer_max = a.len().min(b.len());
    let mut pointer_mid = pointer_max;
    let mut pointer_end = 0;
    while pointer_min < pointer_mid {
        if a[a.len() - pointer_mid..a.len() - pointer_end]
            == b[b.len() - pointer_mid..b.len() - pointer_end]
        {
            pointer_min = pointer_mid;
            pointer_end = pointer_min;
        } else {
            pointer_max = pointer_mid;
        }
        pointer_mid = (pointer_max - pointer_min) / 2 + pointer_min;
    }
    pointer_mid
}

/// Largest k such that the last k scalars of `a` equal the first k of `b`.
pub fn common_overlap(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    // Truncate to equal lengths.
    let a = if a.len() > b.len() {
        &a[a.len() - b.len()..]
    } else {
        a
    };
    let b = if b.len() > a.len() { &b[..a.len()] } else { b };
    let text_length = a.len();
    if a == b {
        return text_length;
    }

    // Quadratic worst case, but the far more common case is that the
    // pattern jumps straight to the answer.
    let mut best = 0;
    let mut length = 1;
    loop {
        let pattern = &a[text_length - length..];
        match find_sub(b, pattern) {
            None => return best,
            Some(found) => {
                length += found;
                if found == 0 || a[text_length - length..] == b[..length] {
                    best = length;
                    length += 1;
                }
            }
        }
    }
}

/// First occurrence of `needle` in `haystack`, or `Some(0)` when the needle
/// is empty (mirroring `str::find`).
pub(crate) fn find_sub(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// First occurrence of `needle` at or after `from`.
pub(crate) fn find_sub_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    let from = from.min(haystack.len());
    find_sub(&haystack[from..], needle).map(|i| i + from)
}

/// Last occurrence of `needle` starting at or before `from`; an empty
/// needle reports the end of the haystack.
pub(crate) fn rfind_sub(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    if needle.len() > haystack.len() {
        return None;
    }
    let last_start = from.min(haystack.len() - needle.len());
    (0..=last_start)
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Result of the half-match heuristic: the texts split around a shared
/// middle of at least half the longer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfMatch {
    /// Prefix of the first text.
    pub prefix1: Vec<char>,
    /// Suffix of the first text.
    pub suffix1: Vec<char>,
    /// Prefix of the second text.
    pub prefix2: Vec<char>,
    /// Suffix of the second text.
    pub suffix2: Vec<char>,
    /// The shared middle.
    pub common: Vec<char>,
}

/// Do the two texts share a substring which is at least half the length of
/// the longer text? Probes seeds at the first, second and third quarter of
/// the longer text and keeps the longest middle found (first probe wins
/// ties). The split is speculative: it trades edit-script minimality for
/// speed, so callers skip it when running without a deadline.
pub fn half_match(text1: &[char], text2: &[char]) -> Option<HalfMatch> {
    let (long_text, short_text) = if text1.len() > text2.len() {
        (text1, text2)
    } else {
        (text2, text1)
    };
    if long_text.len() < 4 || short_text.len() * 2 < long_text.len() {
        return None;
    }

    let quarter = (long_text.len() + 3) / 4;
    let half = (long_text.len() + 1) / 2;
    let seeds = [quarter, half, (half + quarter).min(long_text.len() * 3 / 4)];
    let mut best: Option<HalfMatch> = None;
    for seed in seeds {
        if let Some(hm) = half_match_at(long_text, short_text, seed) {
            let longer = match &best {
                Some(b) => hm.common.len() > b.common.len(),
                None => true,
            };
            if longer {
                best = Some(hm);
            }
        }
    }
    let hm = best?;

    // The halves were computed relative to (long, short); swap back when
    // text2 was the longer input.
    if text1.len() > text2.len() {
        Some(hm)
    } else {
        Some(HalfMatch {
            prefix1: hm.prefix2,
            suffix1: hm.suffix2,
            prefix2: hm.prefix1,
            suffix2: hm.suffix1,
            common: hm.common,
        })
    }
}

/// Probe one seed: does a substring of `long_text` starting near `i` occur
/// in `short_text` with enough shared neighborhood to cover half of
/// `long_text`?
fn half_match_at(long_text: &[char], short_text: &[char], i: usize) -> Option<HalfMatch> {
    let seed = &long_text[i..i + long_text.len() / 4];
    let mut j = 0;
    let mut best_common: Vec<char> = Vec::new();
    let mut best = None;
    while let Some(found) = find_sub_from(short_text, seed, j) {
        j = found + 1;
        let prefix_length = common_prefix(&long_text[i..], &short_text[found..]);
        let suffix_length = common_suffix(&long_text[..i], &short_text[..found]);
        if best_common.len() < suffix_length + prefix_length {
            best_common = short_text[found - suffix_length..found + prefix_length].to_vec();
            best = Some((
                long_text[..i - suffix_length].to_vec(),
                long_text[i + prefix_length..].to_vec(),
                short_text[..found - suffix_length].to_vec(),
                short_text[found + prefix_length..].to_vec(),
            ));
        }
    }
    if best_common.len() * 2 >= long_text.len() {
        let (prefix1, suffix1, prefix2, suffix2) = best?;
        Some(HalfMatch {
            prefix1,
            suffix1,
            prefix2,
            suffix2,
            common: best_common,
        })
    } else {
        None
    }
}

/// Folds each distinct line of the two texts down to one code point,
/// returning the folded texts and the line dictionary. Entry 0 of the
/// dictionary is a padding line so real indices start at 1; indices that
/// would land in the surrogate gap shift past it.
pub fn lines_to_chars(text1: &[char], text2: &[char]) -> (Vec<char>, Vec<char>, Vec<String>) {
    let mut line_array: Vec<String> = vec![String::new()];
    let mut line_hash: FxHashMap<String, usize> = FxHashMap::default();
    let chars1 = lines_to_chars_munge(text1, &mut line_array, &mut line_hash);
    let chars2 = lines_to_chars_munge(text2, &mut line_array, &mut line_hash);
    (chars1, chars2, line_array)
}

fn lines_to_chars_munge(
    text: &[char],
    line_array: &mut Vec<String>,
    line_hash: &mut FxHashMap<String, usize>,
) -> Vec<char> {
    let mut chars = Vec::new();
    let mut line_start = 0;
    while line_start < text.len() {
        // The terminator belongs to its line.
        let mut line_end = match text[line_start..].iter().position(|&c| c == '\n') {
            Some(i) => line_start + i + 1,
            None => text.len(),
        };
        let mut line: String = text[line_start..line_end].iter().collect();
        let index = if let Some(&index) = line_hash.get(&line) {
            index
        } else {
            if line_array.len() >= MAX_FOLD_LINES {
                // Dictionary exhausted; the rest of the text folds as one
                // final line.
                line = text[line_start..].iter().collect();
                line_end = text.len();
            }
            let index = line_array.len();
            line_array.push(line.clone());
            line_hash.insert(line, index);
            index
        };
        line_start = line_end;
        chars.push(fold_index_to_char(index));
    }
    chars
}

/// Rehydrates the text of each diff from folded code points back to lines.
pub fn chars_to_lines(diffs: &mut [crate::diff::Diff], line_array: &[String]) {
    for diff in diffs.iter_mut() {
        let mut text = Vec::new();
        for &c in &diff.text {
            text.extend(line_array[char_to_fold_index(c)].chars());
        }
        diff.text = text;
    }
}

fn fold_index_to_char(index: usize) -> char {
    debug_assert!(index <= MAX_FOLD_LINES);
    let cp = if index < 0xD800 {
        index as u32
    } else {
        index as u32 + 0x800
    };
    // In range by construction: MAX_FOLD_LINES keeps cp at or below U+10FFFD.
    char::from_u32(cp).unwrap_or('\u{0}')
}

fn char_to_fold_index(c: char) -> usize {
    let cp = c as u32;
    if cp < 0xD800 {
        cp as usize
    } else {
        cp as usize - 0x800
    }
}
