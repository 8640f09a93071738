//! The diff engine: time-bounded Myers bisection with speedup heuristics.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::constants::LINE_MODE_MIN_CHARS;
use crate::diff::{cleanup, Diff, Op};
use crate::text;

/// Produces edit scripts between two texts.
///
/// A `Differ` copies its [`Config`] at construction and holds no other
/// state, so one instance can serve any number of calls.
#[derive(Debug, Clone, Default)]
pub struct Differ {
    config: Config,
}

impl Differ {
    /// Creates a differ with the default configuration.
    pub fn new() -> Self {
        Differ {
            config: Config::default(),
        }
    }

    /// Creates a differ with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Differ { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Finds the differences between two texts with the line-mode speedup
    /// enabled.
    pub fn diff(&self, text1: &str, text2: &str) -> Vec<Diff> {
        self.main(text1, text2, true)
    }

    /// Runs the efficiency cleanup with the configured edit cost.
    pub fn cleanup_efficiency(&self, diffs: &mut Vec<Diff>) {
        cleanup::cleanup_efficiency(diffs, self.config.diff_edit_cost);
    }

    /// Finds the differences between two texts.
    ///
    /// When `check_lines` is true and the texts are large, a faster
    /// line-level pre-pass trades optimality for speed.
    pub fn main(&self, text1: &str, text2: &str, check_lines: bool) -> Vec<Diff> {
        // Set a deadline by which time the diff must be complete.
        let deadline = if self.config.diff_timeout > 0.0 {
            Some(Instant::now() + Duration::from_secs_f32(self.config.diff_timeout))
        } else {
            None
        };
        let text1: Vec<char> = text1.chars().collect();
        let text2: Vec<char> = text2.chars().collect();
        self.main_deadline(&text1, &text2, check_lines, deadline)
    }

    fn main_deadline(
        &self,
        text1: &[char],
        text2: &[char],
        check_lines: bool,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        if text1 == text2 {
            if text1.is_empty() {
                return Vec::new();
            }
            return vec![Diff::from_chars(Op::Equal, text1.to_vec())];
        }

        // Trim off the common prefix and suffix.
        let common_length = text::common_prefix(text1, text2);
        let common_prefix = &text1[..common_length];
        let trimmed1 = &text1[common_length..];
        let trimmed2 = &text2[common_length..];

        let common_length = text::common_suffix(trimmed1, trimmed2);
        let common_suffix = &trimmed1[trimmed1.len() - common_length..];
        let trimmed1 = &trimmed1[..trimmed1.len() - common_length];
        let trimmed2 = &trimmed2[..trimmed2.len() - common_length];

        // Compute the diff on the middle block.
        let mut diffs = self.compute(trimmed1, trimmed2, check_lines, deadline);

        // Restore the prefix and suffix.
        if !common_prefix.is_empty() {
            diffs.insert(0, Diff::from_chars(Op::Equal, common_prefix.to_vec()));
        }
        if !common_suffix.is_empty() {
            diffs.push(Diff::from_chars(Op::Equal, common_suffix.to_vec()));
        }
        cleanup::cleanup_merge(&mut diffs);
        diffs
    }

    /// Finds the differences between two texts known to have no common
    /// prefix or suffix.
    fn compute(
        &self,
        text1: &[char],
        text2: &[char],
        check_lines: bool,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        if text1.is_empty() {
            // Just add some text.
            return vec![Diff::from_chars(Op::Insert, text2.to_vec())];
        }
        if text2.is_empty() {
            // Just delete some text.
            return vec![Diff::from_chars(Op::Delete, text1.to_vec())];
        }

        let (long_text, short_text) = if text1.len() > text2.len() {
            (text1, text2)
        } else {
            (text2, text1)
        };
        if let Some(i) = text::find_sub(long_text, short_text) {
            // The shorter text is inside the longer text.
            let op = if text1.len() > text2.len() {
                Op::Delete
            } else {
                Op::Insert
            };
            return vec![
                Diff::from_chars(op, long_text[..i].to_vec()),
                Diff::from_chars(Op::Equal, short_text.to_vec()),
                Diff::from_chars(op, long_text[i + short_text.len()..].to_vec()),
            ];
        }
        if short_text.len() == 1 {
            // Single character string; after the previous check it can't be
            // an equality.
            return vec![
                Diff::from_chars(Op::Delete, text1.to_vec()),
                Diff::from_chars(Op::Insert, text2.to_vec()),
            ];
        }

        // A half-match split is speculative, so only worth it when a
        // deadline keeps the run short of optimal anyway.
        if self.config.diff_timeout > 0.0 {
            if let Some(hm) = text::half_match(text1, text2) {
                // Send both pairs off for separate processing and merge the
                // results around the common middle.
                let mut diffs =
                    self.main_deadline(&hm.prefix1, &hm.prefix2, check_lines, deadline);
                diffs.push(Diff::from_chars(Op::Equal, hm.common));
                diffs.extend(self.main_deadline(&hm.suffix1, &hm.suffix2, check_lines, deadline));
                return diffs;
            }
        }

        if check_lines && text1.len() > LINE_MODE_MIN_CHARS && text2.len() > LINE_MODE_MIN_CHARS {
            return self.line_mode(text1, text2, deadline);
        }

        self.bisect(text1, text2, deadline)
    }

    /// Diffs folded line representations of the texts, then refines the
    /// changed regions at character granularity.
    fn line_mode(&self, text1: &[char], text2: &[char], deadline: Option<Instant>) -> Vec<Diff> {
        // Scan the text on a line-by-line basis first.
        let (chars1, chars2, line_array) = text::lines_to_chars(text1, text2);
        let mut diffs = self.main_deadline(&chars1, &chars2, false, deadline);

        // Convert the diff back to real text.
        text::chars_to_lines(&mut diffs, &line_array);
        // Eliminate freak matches (e.g. blank lines).
        cleanup::cleanup_semantic(&mut diffs);

        // Rediff any replacement blocks, this time character-by-character.
        diffs.push(Diff::equal("")); // sentinel
        let mut pointer = 0;
        let mut count_delete = 0;
        let mut count_insert = 0;
        let mut text_delete: Vec<char> = Vec::new();
        let mut text_insert: Vec<char> = Vec::new();
        while pointer < diffs.len() {
            match diffs[pointer].op {
                Op::Insert => {
                    count_insert += 1;
                    text_insert.extend_from_slice(&diffs[pointer].text);
                }
                Op::Delete => {
                    count_delete += 1;
                    text_delete.extend_from_slice(&diffs[pointer].text);
                }
                Op::Equal => {
                    // Upon reaching an equality, rediff any preceding
                    // replacement block character by character.
                    if count_delete >= 1 && count_insert >= 1 {
                        let start = pointer - count_delete - count_insert;
                        diffs.drain(start..pointer);
                        let sub = self.main_deadline(&text_delete, &text_insert, false, deadline);
                        let sub_len = sub.len();
                        for (offset, diff) in sub.into_iter().enumerate() {
                            diffs.insert(start + offset, diff);
                        }
                        pointer = start + sub_len;
                    }
                    count_insert = 0;
                    count_delete = 0;
                    text_delete.clear();
                    text_insert.clear();
                }
            }
            pointer += 1;
        }
        diffs.pop(); // drop the sentinel
        diffs
    }

    /// Finds the middle snake of an optimal d-path, splits the problem in
    /// two and recurses. Interrupted by the deadline, it falls back to a
    /// coarse delete-plus-insert answer.
    pub(crate) fn bisect(
        &self,
        text1: &[char],
        text2: &[char],
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        let text1_length = text1.len() as isize;
        let text2_length = text2.len() as isize;
        let max_d = (text1_length + text2_length + 1) / 2;
        let v_offset = max_d;
        let v_length = 2 * max_d;
        let mut v1 = vec![-1isize; v_length as usize];
        let mut v2 = vec![-1isize; v_length as usize];
        v1[(v_offset + 1) as usize] = 0;
        v2[(v_offset + 1) as usize] = 0;
        let delta = text1_length - text2_length;
        // If the total number of characters is odd, the front path will
        // collide with the reverse path.
        let front = delta % 2 != 0;
        // Offsets for start and end of k loop; prevents mapping of space
        // beyond the grid.
        let mut k1start: isize = 0;
        let mut k1end: isize = 0;
        let mut k2start: isize = 0;
        let mut k2end: isize = 0;
        for d in 0..max_d {
            // Bail out if deadline is reached.
            if deadline.map_or(false, |t| Instant::now() > t) {
                break;
            }

            // Walk the front path one step.
            let mut k1 = -d + k1start;
            while k1 <= d - k1end {
                let k1_offset = (v_offset + k1) as usize;
                let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                    v1[k1_offset + 1]
                } else {
                    v1[k1_offset - 1] + 1
                };
                let mut y1 = x1 - k1;
                while x1 < text1_length
                    && y1 < text2_length
                    && text1[x1 as usize] == text2[y1 as usize]
                {
                    x1 += 1;
                    y1 += 1;
                }
                v1[k1_offset] = x1;
                if x1 > text1_length {
                    // Ran off the right of the graph.
                    k1end += 2;
                } else if y1 > text2_length {
                    // Ran off the bottom of the graph.
                    k1start += 2;
                } else if front {
                    let k2_offset = v_offset + delta - k1;
                    if k2_offset >= 0 && k2_offset < v_length && v2[k2_offset as usize] != -1 {
                        // Mirror x2 onto top-left coordinate system.
                        let x2 = text1_length - v2[k2_offset as usize];
                        if x1 >= x2 {
                            // Overlap detected.
                            return self.bisect_split(
                                text1,
                                text2,
                                x1 as usize,
                                y1 as usize,
                                deadline,
                            );
                        }
                    }
                }
                k1 += 2;
            }

            // Walk the reverse path one step.
            let mut k2 = -d + k2start;
            while k2 <= d - k2end {
                let k2_offset = (v_offset + k2) as usize;
                let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                    v2[k2_offset + 1]
                } else {
                    v2[k2_offset - 1] + 1
                };
                let mut y2 = x2 - k2;
                while x2 < text1_length
                    && y2 < text2_length
                    && text1[(text1_length - x2 - 1) as usize]
                        == text2[(text2_length - y2 - 1) as usize]
                {
                    x2 += 1;
                    y2 += 1;
                }
                v2[k2_offset] = x2;
                if x2 > text1_length {
                    // Ran off the left of the graph.
                    k2end += 2;
                } else if y2 > text2_length {
                    // Ran off the top of the graph.
                    k2start += 2;
                } else if !front {
                    let k1_offset = v_offset + delta - k2;
                    if k1_offset >= 0 && k1_offset < v_length && v1[k1_offset as usize] != -1 {
                        let x1 = v1[k1_offset as usize];
                        let y1 = v_offset + x1 - k1_offset;
                        // Mirror x2 onto top-left coordinate system.
                        let x2 = text1_length - x2;
                        if x1 >= x2 {
                            // Overlap detected.
                            return self.bisect_split(
                                text1,
                                text2,
                                x1 as usize,
                                y1 as usize,
                                deadline,
                            );
                        }
                    }
                }
                k2 += 2;
            }
        }
        // Diff took too long and hit the deadline, or the number of diffs
        // equals the number of characters: no commonality at all.
        vec![
            Diff::from_chars(Op::Delete, text1.to_vec()),
            Diff::from_chars(Op::Insert, text2.to_vec()),
        ]
    }

    /// Given the location of the middle snake, splits the diff in two parts
    /// and recurses.
    fn bisect_split(
        &self,
        text1: &[char],
        text2: &[char],
        x: usize,
        y: usize,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        let mut diffs = self.main_deadline(&text1[..x], &text2[..y], false, deadline);
        diffs.extend(self.main_deadline(&text1[x..], &text2[y..], false, deadline));
        diffs
    }
}
