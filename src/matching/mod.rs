//! Fuzzy substring location.
//!
//! Locates the position in a text which best matches a pattern near an
//! expected location, using the Bitap bit-parallel algorithm. A match is
//! scored by combining its error count with its distance from the expected
//! location; [`Config::match_threshold`] bounds the acceptable score and
//! [`Config::match_distance`] weighs the positional term.

use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::constants::MATCH_MASK_BITS;
use crate::error::{Error, Result};
use crate::text;

/// Locates approximate pattern occurrences in a text.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: Config,
}

impl Matcher {
    /// Creates a matcher with the default configuration.
    pub fn new() -> Self {
        Matcher {
            config: Config::default(),
        }
    }

    /// Creates a matcher with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Matcher { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Locates the best instance of `pattern` in `text` near `loc`.
    ///
    /// Returns `None` when no match scores within the threshold, and
    /// [`Error::PatternTooLong`] when the pattern exceeds the Bitap width.
    pub fn main(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        self.main_chars(&text, &pattern, loc)
    }

    pub(crate) fn main_chars(
        &self,
        text: &[char],
        pattern: &[char],
        loc: usize,
    ) -> Result<Option<usize>> {
        let loc = loc.min(text.len());
        if text == pattern {
            // Shortcut (potentially not guaranteed by the algorithm).
            Ok(Some(0))
        } else if text.is_empty() {
            // Nothing to match.
            Ok(None)
        } else if loc + pattern.len() <= text.len()
            && text[loc..loc + pattern.len()] == pattern[..]
        {
            // Perfect match at the perfect spot.
            Ok(Some(loc))
        } else {
            // Do a fuzzy compare.
            self.bitap_chars(text, pattern, loc)
        }
    }

    /// Locates the best instance of `pattern` in `text` near `loc` using
    /// the Bitap algorithm.
    pub fn bitap(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        self.bitap_chars(&text, &pattern, loc)
    }

    fn bitap_chars(&self, text: &[char], pattern: &[char], loc: usize) -> Result<Option<usize>> {
        let max_bits = self.config.match_max_bits.min(MATCH_MASK_BITS);
        if pattern.len() > max_bits {
            return Err(Error::PatternTooLong {
                len: pattern.len(),
                max: max_bits,
            });
        }
        if pattern.is_empty() {
            // Anything matches an empty pattern.
            return Ok(Some(loc.min(text.len())));
        }

        // Initialise the alphabet.
        let alphabet = alphabet(pattern);

        // Highest score beyond which we give up.
        let mut score_threshold = f64::from(self.config.match_threshold);
        // Is there a nearby exact match? (speedup)
        if let Some(best_loc) = text::find_sub_from(text, pattern, loc) {
            score_threshold = self.bitap_score(0, best_loc, loc, pattern).min(score_threshold);
            // What about in the other direction? (speedup)
            if let Some(best_loc) = text::rfind_sub(text, pattern, loc + pattern.len()) {
                score_threshold = self
                    .bitap_score(0, best_loc, loc, pattern)
                    .min(score_threshold);
            }
        }

        // Initialise the bit arrays.
        let match_mask = 1u64 << (pattern.len() - 1);
        let mut best_loc: Option<usize> = None;

        let mut bin_max = pattern.len() + text.len();
        let mut last_rd: Vec<u64> = Vec::new();
        for d in 0..pattern.len() {
            // Scan for the best match; each iteration allows for one more
            // error. Run a binary search to determine how far from `loc`
            // we can stray at this error level.
            let mut bin_min = 0;
            let mut bin_mid = bin_max;
            while bin_min < bin_mid {
                if self.bitap_score(d, loc + bin_mid, loc, pattern) <= score_threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            // Use the result from this iteration as the maximum for the next.
            bin_max = bin_mid;
            let mut start = 1.max(loc as isize - bin_mid as isize + 1) as usize;
            let finish = (loc + bin_mid).min(text.len()) + pattern.len();

            let mut rd = vec![0u64; finish + 2];
            rd[finish + 1] = (1 << d) - 1;
            let mut j = finish;
            while j >= start {
                let char_match = if text.len() < j {
                    // Out of range.
                    0
                } else {
                    alphabet.get(&text[j - 1]).copied().unwrap_or(0)
                };
                rd[j] = if d == 0 {
                    // First pass: exact match.
                    ((rd[j + 1] << 1) | 1) & char_match
                } else {
                    // Subsequent passes: fuzzy match.
                    (((rd[j + 1] << 1) | 1) & char_match)
                        | (((get(&last_rd, j + 1) | get(&last_rd, j)) << 1) | 1)
                        | get(&last_rd, j + 1)
                };
                if rd[j] & match_mask != 0 {
                    let score = self.bitap_score(d, j - 1, loc, pattern);
                    // This match will almost certainly be better than any
                    // existing match, but check anyway.
                    if score <= score_threshold {
                        // Told you so.
                        score_threshold = score;
                        best_loc = Some(j - 1);
                        if j - 1 > loc {
                            // When passing loc, don't exceed our current
                            // distance from loc.
                            start = 1.max(2 * loc as isize - (j - 1) as isize) as usize;
                        } else {
                            // Already passed loc; downhill from here.
                            break;
                        }
                    }
                }
                j -= 1;
            }
            // No hope for a better match at greater error levels.
            if self.bitap_score(d + 1, loc, loc, pattern) > score_threshold {
                break;
            }
            last_rd = rd;
        }
        Ok(best_loc)
    }

    /// Computes and returns the score for a match with `e` errors at `x`.
    /// Lower is better: 0.0 is a perfect match sitting exactly at `loc`.
    fn bitap_score(&self, e: usize, x: usize, loc: usize, pattern: &[char]) -> f64 {
        let accuracy = e as f64 / pattern.len() as f64;
        let proximity = (loc as isize - x as isize).unsigned_abs();
        if self.config.match_distance == 0 {
            // Dodge divide by zero.
            return if proximity == 0 { accuracy } else { 1.0 };
        }
        accuracy + proximity as f64 / self.config.match_distance as f64
    }
}

fn get(rd: &[u64], index: usize) -> u64 {
    rd.get(index).copied().unwrap_or(0)
}

/// Builds the alphabet bitmask: bit `i` of `alphabet[c]` is set when the
/// pattern has `c` at position `len - 1 - i`.
pub(crate) fn alphabet(pattern: &[char]) -> FxHashMap<char, u64> {
    let mut map: FxHashMap<char, u64> = FxHashMap::default();
    for (i, &c) in pattern.iter().enumerate() {
        *map.entry(c).or_insert(0) |= 1 << (pattern.len() - 1 - i);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(threshold: f32, distance: usize) -> Matcher {
        Matcher::with_config(Config {
            match_threshold: threshold,
            match_distance: distance,
            ..Config::default()
        })
    }

    #[test]
    fn test_alphabet() {
        // Unique.
        let mut expected: FxHashMap<char, u64> = FxHashMap::default();
        expected.insert('a', 4);
        expected.insert('b', 2);
        expected.insert('c', 1);
        assert_eq!(expected, alphabet(&['a', 'b', 'c']));

        // Duplicates.
        let mut expected: FxHashMap<char, u64> = FxHashMap::default();
        expected.insert('a', 37);
        expected.insert('b', 18);
        expected.insert('c', 8);
        assert_eq!(expected, alphabet(&['a', 'b', 'c', 'a', 'b', 'a']));
    }

    #[test]
    fn test_bitap_exact() {
        let m = matcher(0.5, 100);
        assert_eq!(Some(5), m.bitap("abcdefghijk", "fgh", 5).unwrap());
        assert_eq!(Some(5), m.bitap("abcdefghijk", "fgh", 0).unwrap());
    }

    #[test]
    fn test_bitap_fuzzy() {
        let m = matcher(0.5, 100);
        assert_eq!(Some(4), m.bitap("abcdefghijk", "efxhi", 0).unwrap());
        assert_eq!(Some(2), m.bitap("abcdefghijk", "cdefxyhijk", 5).unwrap());
        assert_eq!(None, m.bitap("abcdefghijk", "bxy", 1).unwrap());

        // Overflow.
        assert_eq!(Some(2), m.bitap("123456789xx0", "3456789x0", 2).unwrap());

        // Edges.
        assert_eq!(Some(0), m.bitap("abcdef", "xxabc", 4).unwrap());
        assert_eq!(Some(3), m.bitap("abcdef", "defyy", 4).unwrap());
        assert_eq!(Some(0), m.bitap("abcdef", "xabcdefy", 0).unwrap());
    }

    #[test]
    fn test_bitap_threshold() {
        let m = matcher(0.4, 100);
        assert_eq!(Some(4), m.bitap("abcdefghijk", "efxyhi", 1).unwrap());

        let m = matcher(0.3, 100);
        assert_eq!(None, m.bitap("abcdefghijk", "efxyhi", 1).unwrap());

        let m = matcher(0.0, 100);
        assert_eq!(Some(1), m.bitap("abcdefghijk", "bcdef", 1).unwrap());
    }

    #[test]
    fn test_bitap_multiple_select() {
        let m = matcher(0.5, 100);
        assert_eq!(Some(0), m.bitap("abcdexyzabcde", "abccde", 3).unwrap());
        assert_eq!(Some(8), m.bitap("abcdexyzabcde", "abccde", 5).unwrap());
    }

    #[test]
    fn test_bitap_distance() {
        // Strict location.
        let m = matcher(0.5, 10);
        assert_eq!(
            None,
            m.bitap("abcdefghijklmnopqrstuvwxyz", "abcdefg", 24).unwrap()
        );
        assert_eq!(
            Some(0),
            m.bitap("abcdefghijklmnopqrstuvwxyz", "abcdxxefg", 1).unwrap()
        );

        // Loose location.
        let m = matcher(0.5, 1000);
        assert_eq!(
            Some(0),
            m.bitap("abcdefghijklmnopqrstuvwxyz", "abcdefg", 24).unwrap()
        );
    }

    #[test]
    fn test_bitap_pattern_too_long() {
        let m = matcher(0.5, 100);
        let pattern = "x".repeat(33);
        match m.bitap("text", &pattern, 0) {
            Err(Error::PatternTooLong { len, max }) => {
                assert_eq!(33, len);
                assert_eq!(32, max);
            }
            other => panic!("expected PatternTooLong, got {:?}", other),
        }
        // Exactly at the boundary is fine.
        let pattern = "x".repeat(32);
        assert!(m.bitap("text", &pattern, 0).is_ok());
    }

    #[test]
    fn test_match_main() {
        let m = matcher(0.5, 1000);
        // Equality.
        assert_eq!(Some(0), m.main("abcdef", "abcdef", 1000).unwrap());
        // Empty text.
        assert_eq!(None, m.main("", "abcdef", 1).unwrap());
        // Empty pattern returns the clamped location.
        assert_eq!(Some(3), m.main("abcdef", "", 3).unwrap());
        // Exact match.
        assert_eq!(Some(3), m.main("abcdef", "de", 3).unwrap());

        let m = matcher(0.7, 1000);
        assert_eq!(
            Some(4),
            m.main(
                "I am the very model of a modern major general.",
                " that berry ",
                5
            )
            .unwrap()
        );
    }
}
