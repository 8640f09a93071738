//! Canonicalization passes over diff lists.
//!
//! Each pass is idempotent on its own. `cleanup_merge` establishes the
//! structural invariants (no adjacent entries with the same operation, no
//! empty entries, deletions before insertions); the semantic and efficiency
//! passes trade minimality for human-aligned or machine-cheap hunks and
//! re-run the merge afterwards.

use crate::diff::{Diff, Op};
use crate::text;

/// Reorders and merges like edit sections, merges equalities, and slides
/// single edits that sit between two equalities toward whichever side lets
/// the equalities coalesce. Any edit section can move as long as it doesn't
/// cross an equality.
pub fn cleanup_merge(diffs: &mut Vec<Diff>) {
    loop {
        merge_adjacent(diffs);
        if !shift_single_edits(diffs) {
            break;
        }
    }
}

fn merge_adjacent(diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }
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
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Equal => {
                // Upon reaching an equality, check for prior redundancies.
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        // Factor out any common prefix.
                        let common = text::common_prefix(&text_insert, &text_delete);
                        if common > 0 {
                            let prefix: Vec<char> = text_insert[..common].to_vec();
                            let pos = pointer - count_delete - count_insert;
                            if pos > 0 && diffs[pos - 1].op == Op::Equal {
                                diffs[pos - 1].text.extend_from_slice(&prefix);
                            } else {
                                diffs.insert(0, Diff::from_chars(Op::Equal, prefix));
                                pointer += 1;
                            }
                            text_insert.drain(..common);
                            text_delete.drain(..common);
                        }
                        // Factor out any common suffix.
                        let common = text::common_suffix(&text_insert, &text_delete);
                        if common > 0 {
                            let mut shifted: Vec<char> =
                                text_insert[text_insert.len() - common..].to_vec();
                            shifted.extend_from_slice(&diffs[pointer].text);
                            diffs[pointer].text = shifted;
                            text_insert.truncate(text_insert.len() - common);
                            text_delete.truncate(text_delete.len() - common);
                        }
                    }
                    // Delete the offending records and add the merged ones.
                    pointer -= count_delete + count_insert;
                    diffs.drain(pointer..pointer + count_delete + count_insert);
                    if !text_delete.is_empty() {
                        diffs.insert(
                            pointer,
                            Diff::from_chars(Op::Delete, std::mem::take(&mut text_delete)),
                        );
                        pointer += 1;
                    }
                    if !text_insert.is_empty() {
                        diffs.insert(
                            pointer,
                            Diff::from_chars(Op::Insert, std::mem::take(&mut text_insert)),
                        );
                        pointer += 1;
                    }
                    pointer += 1;
                } else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
                    // Merge this equality with the previous one.
                    let merged = diffs.remove(pointer).text;
                    diffs[pointer - 1].text.extend_from_slice(&merged);
                } else {
                    pointer += 1;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }
    if diffs.last().map_or(false, |d| d.is_empty()) {
        diffs.pop(); // drop the sentinel
    }
}

/// Second pass of the merge: single edits surrounded on both sides by
/// equalities can shift sideways to eliminate one of the equalities.
/// Returns true when anything moved (the caller then re-merges).
fn shift_single_edits(diffs: &mut Vec<Diff>) -> bool {
    if diffs.len() < 3 {
        return false;
    }
    let mut changes = false;
    let mut pointer = 1;
    while pointer < diffs.len() - 1 {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let prev_len = diffs[pointer - 1].len();
            let next_len = diffs[pointer + 1].len();
            let edit_len = diffs[pointer].len();
            if edit_len >= prev_len
                && diffs[pointer].text[edit_len - prev_len..] == diffs[pointer - 1].text[..]
            {
                // Shift the edit over the previous equality.
                let prev = diffs[pointer - 1].text.clone();
                let mut shifted = prev.clone();
                shifted.extend_from_slice(&diffs[pointer].text[..edit_len - prev_len]);
                diffs[pointer].text = shifted;
                let mut next = prev;
                next.extend_from_slice(&diffs[pointer + 1].text);
                diffs[pointer + 1].text = next;
                diffs.remove(pointer - 1);
                changes = true;
            } else if edit_len >= next_len
                && diffs[pointer].text[..next_len] == diffs[pointer + 1].text[..]
            {
                // Shift the edit over the next equality.
                let next = diffs[pointer + 1].text.clone();
                diffs[pointer - 1].text.extend_from_slice(&next);
                let mut shifted: Vec<char> = diffs[pointer].text[next_len..].to_vec();
                shifted.extend_from_slice(&next);
                diffs[pointer].text = shifted;
                diffs.remove(pointer + 1);
                changes = true;
            }
        }
        pointer += 1;
    }
    changes
}

/// Reduces the number of edits by eliminating semantically trivial
/// equalities, then extracts any overlap between adjacent deletions and
/// insertions as a shared equality.
pub fn cleanup_semantic(diffs: &mut Vec<Diff>) {
    let mut changes = false;
    // Indices of candidate equalities.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    let mut pointer: isize = 0;
    // Number of characters changed before and after the candidate.
    let mut length_insertions1 = 0;
    let mut length_deletions1 = 0;
    let mut length_insertions2 = 0;
    let mut length_deletions2 = 0;
    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            equalities.push(idx);
            length_insertions1 = length_insertions2;
            length_deletions1 = length_deletions2;
            length_insertions2 = 0;
            length_deletions2 = 0;
            last_equality = Some(diffs[idx].text.clone());
        } else {
            if diffs[idx].op == Op::Insert {
                length_insertions2 += diffs[idx].len();
            } else {
                length_deletions2 += diffs[idx].len();
            }
            // An equality no longer than the edits on both of its sides is
            // noise: fold it into the edits.
            let eliminate = matches!(&last_equality, Some(last)
                if last.len() <= length_insertions1.max(length_deletions1)
                && last.len() <= length_insertions2.max(length_deletions2));
            if eliminate {
                if let (Some(last), Some(&pos)) = (last_equality.take(), equalities.last()) {
                    // Duplicate the equality as a deletion and downgrade the
                    // original to an insertion.
                    diffs[pos].op = Op::Insert;
                    diffs.insert(pos, Diff::from_chars(Op::Delete, last));
                    equalities.pop(); // the equality just eliminated
                    equalities.pop(); // the previous one needs reevaluation
                    pointer = match equalities.last() {
                        Some(&p) => p as isize,
                        None => -1,
                    };
                    length_insertions1 = 0;
                    length_deletions1 = 0;
                    length_insertions2 = 0;
                    length_deletions2 = 0;
                    changes = true;
                }
            }
        }
        pointer += 1;
    }

    // Normalize the diff.
    if changes {
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);

    // Find overlaps between deletions and insertions:
    //   <del>abcxxx</del><ins>xxxdef</ins> -> <del>abc</del>xxx<ins>def</ins>
    //   <del>xxxabc</del><ins>defxxx</ins> -> <ins>def</ins>xxx<del>abc</del>
    // Only extract an overlap at least as big as half the edit.
    let mut pointer = 1;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let overlap_length1 = text::common_overlap(&deletion, &insertion);
            let overlap_length2 = text::common_overlap(&insertion, &deletion);
            if overlap_length1 >= overlap_length2 {
                if overlap_length1 * 2 >= deletion.len() || overlap_length1 * 2 >= insertion.len()
                {
                    diffs.insert(
                        pointer,
                        Diff::from_chars(Op::Equal, insertion[..overlap_length1].to_vec()),
                    );
                    diffs[pointer - 1].text = deletion[..deletion.len() - overlap_length1].to_vec();
                    diffs[pointer + 1].text = insertion[overlap_length1..].to_vec();
                    pointer += 1;
                }
            } else if overlap_length2 * 2 >= deletion.len()
                || overlap_length2 * 2 >= insertion.len()
            {
                // The insertion slides in front of the deletion.
                diffs.insert(
                    pointer,
                    Diff::from_chars(Op::Equal, deletion[..overlap_length2].to_vec()),
                );
                diffs[pointer - 1] = Diff::from_chars(
                    Op::Insert,
                    insertion[..insertion.len() - overlap_length2].to_vec(),
                );
                diffs[pointer + 1] =
                    Diff::from_chars(Op::Delete, deletion[overlap_length2..].to_vec());
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Slides edits that sit between two equalities so their boundaries land on
/// word, line or paragraph edges. Purely cosmetic: the reconstructed texts
/// are unchanged.
pub fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    let mut pointer = 1;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let mut equality1 = diffs[pointer - 1].text.clone();
            let mut edit = diffs[pointer].text.clone();
            let mut equality2 = diffs[pointer + 1].text.clone();

            // First, shift the edit as far left as possible.
            let common_offset = text::common_suffix(&equality1, &edit);
            if common_offset > 0 {
                let common: Vec<char> = edit[edit.len() - common_offset..].to_vec();
                equality1.truncate(equality1.len() - common_offset);
                let mut shifted = common.clone();
                shifted.extend_from_slice(&edit[..edit.len() - common_offset]);
                edit = shifted;
                let mut prefixed = common;
                prefixed.extend_from_slice(&equality2);
                equality2 = prefixed;
            }

            // Second, step character by character to the right, keeping the
            // best scoring split.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                let from_edit = edit[0];
                let from_equality = equality2[0];
                equality1.push(from_edit);
                edit.remove(0);
                edit.push(from_equality);
                equality2.remove(0);
                let score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                // The >= favors trailing over leading whitespace on edits.
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].text != best_equality1 {
                // An improvement was found, save it back.
                if !best_equality1.is_empty() {
                    diffs[pointer - 1].text = best_equality1;
                } else {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                }
                diffs[pointer].text = best_edit;
                if !best_equality2.is_empty() {
                    diffs[pointer + 1].text = best_equality2;
                } else {
                    diffs.remove(pointer + 1);
                }
            }
        }
        pointer += 1;
    }
}

/// Scores the quality of splitting two texts at their junction. Boundaries
/// ranked from best to worst: text edge, blank line, line break, end of
/// sentence, whitespace, other non-alphanumerics, alphanumerics.
fn semantic_score(one: &[char], two: &[char]) -> usize {
    if one.is_empty() || two.is_empty() {
        return 7;
    }
    let char1 = one[one.len() - 1];
    let char2 = two[0];
    let non_alphanumeric1 = !char1.is_alphanumeric();
    let non_alphanumeric2 = !char2.is_alphanumeric();
    let whitespace1 = non_alphanumeric1 && char1.is_whitespace();
    let whitespace2 = non_alphanumeric2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\n' || char1 == '\r');
    let line_break2 = whitespace2 && (char2 == '\n' || char2 == '\r');
    let blank_line1 = line_break1 && (ends_with(one, "\n\n") || ends_with(one, "\n\r\n"));
    let blank_line2 = line_break2
        && (starts_with(two, "\n\n")
            || starts_with(two, "\n\r\n")
            || starts_with(two, "\r\n\n")
            || starts_with(two, "\r\n\r\n"));

    if blank_line1 || blank_line2 {
        6
    } else if line_break1 || line_break2 {
        5
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        // End of sentence.
        4
    } else if whitespace1 || whitespace2 {
        3
    } else if non_alphanumeric1 || non_alphanumeric2 {
        2
    } else {
        1
    }
}

fn ends_with(text: &[char], pattern: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    text.len() >= pattern.len() && text[text.len() - pattern.len()..] == pattern[..]
}

fn starts_with(text: &[char], pattern: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    text.len() >= pattern.len() && text[..pattern.len()] == pattern[..]
}

/// Reduces the number of edits by eliminating operationally trivial
/// equalities: short equalities whose removal fuses the edits around them
/// into fewer operations.
pub fn cleanup_efficiency(diffs: &mut Vec<Diff>, edit_cost: usize) {
    let mut changes = false;
    // Indices of candidate equalities.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    let mut pointer: isize = 0;
    // Is there an insertion/deletion before/after the candidate?
    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;
    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            if diffs[idx].len() < edit_cost && (post_ins || post_del) {
                // Candidate found.
                equalities.push(idx);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[idx].text.clone());
            } else {
                // Not a candidate, and can never become one.
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[idx].op == Op::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }
            // Five types to be split:
            //   <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
            //   <ins>A</ins>X<ins>C</ins><del>D</del>
            //   <ins>A</ins><del>B</del>X<ins>C</ins>
            //   <ins>A</del>X<ins>C</ins><del>D</del>
            //   <ins>A</ins><del>B</del>X<del>C</del>
            let flanks =
                pre_ins as usize + pre_del as usize + post_ins as usize + post_del as usize;
            let eliminate = matches!(&last_equality, Some(last)
                if (pre_ins && pre_del && post_ins && post_del)
                || (last.len() < edit_cost / 2 && flanks == 3));
            if eliminate {
                if let (Some(last), Some(&pos)) = (last_equality.take(), equalities.last()) {
                    diffs[pos].op = Op::Insert;
                    diffs.insert(pos, Diff::from_chars(Op::Delete, last));
                    equalities.pop(); // the equality just eliminated
                    if pre_ins && pre_del {
                        // No changes made which could affect earlier entries.
                        post_ins = true;
                        post_del = true;
                        equalities.clear();
                    } else {
                        equalities.pop(); // the previous equality needs reevaluation
                        pointer = match equalities.last() {
                            Some(&p) => p as isize,
                            None => -1,
                        };
                        post_ins = false;
                        post_del = false;
                    }
                    changes = true;
                }
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_merge() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_merge(&mut diffs);
        assert_eq!(Vec::<Diff>::new(), diffs);

        // No change case.
        let mut diffs = vec![Diff::equal("a"), Diff::delete("b"), Diff::insert("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![Diff::equal("a"), Diff::delete("b"), Diff::insert("c")],
            diffs
        );

        // Merge equalities.
        let mut diffs = vec![Diff::equal("a"), Diff::equal("b"), Diff::equal("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::equal("abc")], diffs);

        // Merge deletions.
        let mut diffs = vec![Diff::delete("a"), Diff::delete("b"), Diff::delete("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::delete("abc")], diffs);

        // Merge insertions.
        let mut diffs = vec![Diff::insert("a"), Diff::insert("b"), Diff::insert("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::insert("abc")], diffs);

        // Merge interweave.
        let mut diffs = vec![
            Diff::delete("a"),
            Diff::insert("b"),
            Diff::delete("c"),
            Diff::insert("d"),
            Diff::equal("e"),
            Diff::equal("f"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![Diff::delete("ac"), Diff::insert("bd"), Diff::equal("ef")],
            diffs
        );

        // Prefix and suffix detection.
        let mut diffs = vec![Diff::delete("a"), Diff::insert("abc"), Diff::delete("dc")];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("a"),
                Diff::delete("d"),
                Diff::insert("b"),
                Diff::equal("c"),
            ],
            diffs
        );

        // Prefix and suffix detection with equalities.
        let mut diffs = vec![
            Diff::equal("x"),
            Diff::delete("a"),
            Diff::insert("abc"),
            Diff::delete("dc"),
            Diff::equal("y"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("xa"),
                Diff::delete("d"),
                Diff::insert("b"),
                Diff::equal("cy"),
            ],
            diffs
        );

        // Slide edit left.
        let mut diffs = vec![Diff::equal("a"), Diff::insert("ba"), Diff::equal("c")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::insert("ab"), Diff::equal("ac")], diffs);

        // Slide edit right.
        let mut diffs = vec![Diff::equal("c"), Diff::insert("ab"), Diff::equal("a")];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::equal("ca"), Diff::insert("ba")], diffs);

        // Slide edit left recursive.
        let mut diffs = vec![
            Diff::equal("a"),
            Diff::delete("b"),
            Diff::equal("c"),
            Diff::delete("ac"),
            Diff::equal("x"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::delete("abc"), Diff::equal("acx")], diffs);

        // Slide edit right recursive.
        let mut diffs = vec![
            Diff::equal("x"),
            Diff::delete("ca"),
            Diff::equal("c"),
            Diff::delete("b"),
            Diff::equal("a"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(vec![Diff::equal("xca"), Diff::delete("cba")], diffs);
    }

    #[test]
    fn test_cleanup_semantic_lossless() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(Vec::<Diff>::new(), diffs);

        // Blank lines.
        let mut diffs = vec![
            Diff::equal("AAA\r\n\r\nBBB"),
            Diff::insert("\r\nDDD\r\n\r\nBBB"),
            Diff::equal("\r\nEEE"),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("AAA\r\n\r\n"),
                Diff::insert("BBB\r\nDDD\r\n\r\n"),
                Diff::equal("BBB\r\nEEE"),
            ],
            diffs
        );

        // Line boundaries.
        let mut diffs = vec![
            Diff::equal("AAA\r\nBBB"),
            Diff::insert(" DDD\r\nBBB"),
            Diff::equal(" EEE"),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("AAA\r\n"),
                Diff::insert("BBB DDD\r\n"),
                Diff::equal("BBB EEE"),
            ],
            diffs
        );

        // Word boundaries.
        let mut diffs = vec![
            Diff::equal("The c"),
            Diff::insert("ow and the c"),
            Diff::equal("at."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The "),
                Diff::insert("cow and the "),
                Diff::equal("cat."),
            ],
            diffs
        );

        // Alphanumeric boundaries.
        let mut diffs = vec![
            Diff::equal("The-c"),
            Diff::insert("ow-and-the-c"),
            Diff::equal("at."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The-"),
                Diff::insert("cow-and-the-"),
                Diff::equal("cat."),
            ],
            diffs
        );

        // Hitting the start.
        let mut diffs = vec![Diff::equal("a"), Diff::delete("a"), Diff::equal("ax")];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(vec![Diff::delete("a"), Diff::equal("aax")], diffs);

        // Hitting the end.
        let mut diffs = vec![Diff::equal("xa"), Diff::delete("a"), Diff::equal("a")];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(vec![Diff::equal("xaa"), Diff::delete("a")], diffs);

        // Sentence boundaries.
        let mut diffs = vec![
            Diff::equal("The xxx. The "),
            Diff::insert("zzz. The "),
            Diff::equal("yyy."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The xxx."),
                Diff::insert(" The zzz."),
                Diff::equal(" The yyy."),
            ],
            diffs
        );
    }

    #[test]
    fn test_cleanup_semantic() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_semantic(&mut diffs);
        assert_eq!(Vec::<Diff>::new(), diffs);

        // No elimination #1.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("cd"),
            Diff::equal("12"),
            Diff::delete("e"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("ab"),
                Diff::insert("cd"),
                Diff::equal("12"),
                Diff::delete("e"),
            ],
            diffs
        );

        // No elimination #2.
        let mut diffs = vec![
            Diff::delete("abc"),
            Diff::insert("ABC"),
            Diff::equal("1234"),
            Diff::delete("wxyz"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("abc"),
                Diff::insert("ABC"),
                Diff::equal("1234"),
                Diff::delete("wxyz"),
            ],
            diffs
        );

        // Simple elimination.
        let mut diffs = vec![Diff::delete("a"), Diff::equal("b"), Diff::delete("c")];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("abc"), Diff::insert("b")], diffs);

        // Backpass elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::equal("cd"),
            Diff::delete("e"),
            Diff::equal("f"),
            Diff::insert("g"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("abcdef"), Diff::insert("cdfg")], diffs);

        // Multiple eliminations.
        let mut diffs = vec![
            Diff::insert("1"),
            Diff::equal("A"),
            Diff::delete("B"),
            Diff::insert("2"),
            Diff::equal("_"),
            Diff::insert("1"),
            Diff::equal("A"),
            Diff::delete("B"),
            Diff::insert("2"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("AB_AB"), Diff::insert("1A2_1A2")], diffs);

        // Word boundaries.
        let mut diffs = vec![
            Diff::equal("The c"),
            Diff::delete("ow and the c"),
            Diff::equal("at."),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::equal("The "),
                Diff::delete("cow and the "),
                Diff::equal("cat."),
            ],
            diffs
        );

        // No overlap elimination.
        let mut diffs = vec![Diff::delete("abcxx"), Diff::insert("xxdef")];
        cleanup_semantic(&mut diffs);
        assert_eq!(vec![Diff::delete("abcxx"), Diff::insert("xxdef")], diffs);

        // Overlap elimination.
        let mut diffs = vec![Diff::delete("abcxxx"), Diff::insert("xxxdef")];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![Diff::delete("abc"), Diff::equal("xxx"), Diff::insert("def")],
            diffs
        );

        // Reverse overlap elimination.
        let mut diffs = vec![Diff::delete("xxxabc"), Diff::insert("defxxx")];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![Diff::insert("def"), Diff::equal("xxx"), Diff::delete("abc")],
            diffs
        );

        // Two overlap eliminations.
        let mut diffs = vec![
            Diff::delete("abcd1212"),
            Diff::insert("1212efghi"),
            Diff::equal("----"),
            Diff::delete("A3"),
            Diff::insert("3BC"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            vec![
                Diff::delete("abcd"),
                Diff::equal("1212"),
                Diff::insert("efghi"),
                Diff::equal("----"),
                Diff::delete("A"),
                Diff::equal("3"),
                Diff::insert("BC"),
            ],
            diffs
        );
    }

    #[test]
    fn test_cleanup_efficiency() {
        // Null case.
        let mut diffs: Vec<Diff> = vec![];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(Vec::<Diff>::new(), diffs);

        // No elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("wxyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(
            vec![
                Diff::delete("ab"),
                Diff::insert("12"),
                Diff::equal("wxyz"),
                Diff::delete("cd"),
                Diff::insert("34"),
            ],
            diffs
        );

        // Four-edit elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("xyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(vec![Diff::delete("abxyzcd"), Diff::insert("12xyz34")], diffs);

        // Three-edit elimination.
        let mut diffs = vec![
            Diff::insert("12"),
            Diff::equal("x"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(vec![Diff::delete("xcd"), Diff::insert("12x34")], diffs);

        // Backpass elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("xy"),
            Diff::insert("34"),
            Diff::equal("z"),
            Diff::delete("cd"),
            Diff::insert("56"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(
            vec![Diff::delete("abxyzcd"), Diff::insert("12xy34z56")],
            diffs
        );

        // High cost elimination.
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("wxyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        cleanup_efficiency(&mut diffs, 5);
        assert_eq!(
            vec![Diff::delete("abwxyzcd"), Diff::insert("12wxyz34")],
            diffs
        );
    }

    #[test]
    fn test_cleanup_passes_are_idempotent() {
        let make = || {
            vec![
                Diff::delete("abcd1212"),
                Diff::insert("1212efghi"),
                Diff::equal("----"),
                Diff::delete("A3"),
                Diff::insert("3BC"),
            ]
        };
        let mut once = make();
        cleanup_semantic(&mut once);
        let mut twice = once.clone();
        cleanup_semantic(&mut twice);
        assert_eq!(once, twice);

        let mut once = make();
        cleanup_merge(&mut once);
        let mut twice = once.clone();
        cleanup_merge(&mut twice);
        assert_eq!(once, twice);

        let mut once = make();
        cleanup_efficiency(&mut once, 4);
        let mut twice = once.clone();
        cleanup_efficiency(&mut twice, 4);
        assert_eq!(once, twice);
    }
}
