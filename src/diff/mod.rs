//! Diff representation and derived queries.
//!
//! A diff is an ordered list of edit operations which transforms one text
//! into another. After canonicalization (see [`cleanup`]) no two adjacent
//! entries share an operation, no entry is empty, and a deletion always
//! precedes an adjacent insertion.

pub(crate) mod cleanup;
mod delta;
mod engine;

pub use cleanup::{
    cleanup_efficiency, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless,
};
pub use delta::{from_delta, to_delta};
pub(crate) use delta::{decode_text, encode_text};
pub use engine::Differ;

use std::fmt;

/// The kind of a single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Text present only in the first (pre-image) text.
    Delete,
    /// Text present only in the second (post-image) text.
    Insert,
    /// Text shared by both texts.
    Equal,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Delete => write!(f, "Delete"),
            Op::Insert => write!(f, "Insert"),
            Op::Equal => write!(f, "Equal"),
        }
    }
}

/// One edit operation and its text payload.
///
/// The payload is stored as Unicode scalars so that every length and offset
/// in the library counts scalars, never bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// The operation.
    pub op: Op,
    /// The payload.
    pub text: Vec<char>,
}

impl Diff {
    /// Creates a diff from an operation and a text payload.
    pub fn new(op: Op, text: &str) -> Self {
        Diff {
            op,
            text: text.chars().collect(),
        }
    }

    /// Creates an equality.
    pub fn equal(text: &str) -> Self {
        Diff::new(Op::Equal, text)
    }

    /// Creates an insertion.
    pub fn insert(text: &str) -> Self {
        Diff::new(Op::Insert, text)
    }

    /// Creates a deletion.
    pub fn delete(text: &str) -> Self {
        Diff::new(Op::Delete, text)
    }

    pub(crate) fn from_chars(op: Op, text: Vec<char>) -> Self {
        Diff { op, text }
    }

    /// Payload length in Unicode scalars.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The payload as an owned string.
    pub fn to_text(&self) -> String {
        self.text.iter().collect()
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Diff({},\"{}\")", self.op, self.to_text())
    }
}

/// Reconstructs the first text (pre-image) of a diff list.
pub fn text1(diffs: &[Diff]) -> String {
    text1_chars(diffs).iter().collect()
}

/// Reconstructs the second text (post-image) of a diff list.
pub fn text2(diffs: &[Diff]) -> String {
    text2_chars(diffs).iter().collect()
}

pub(crate) fn text1_chars(diffs: &[Diff]) -> Vec<char> {
    let mut text = Vec::new();
    for diff in diffs {
        if diff.op != Op::Insert {
            text.extend_from_slice(&diff.text);
        }
    }
    text
}

pub(crate) fn text2_chars(diffs: &[Diff]) -> Vec<char> {
    let mut text = Vec::new();
    for diff in diffs {
        if diff.op != Op::Delete {
            text.extend_from_slice(&diff.text);
        }
    }
    text
}

/// Levenshtein distance of a diff list: the number of inserted, deleted or
/// substituted characters.
pub fn levenshtein(diffs: &[Diff]) -> usize {
    let mut levenshtein = 0;
    let mut insertions = 0;
    let mut deletions = 0;
    for diff in diffs {
        match diff.op {
            Op::Insert => insertions += diff.len(),
            Op::Delete => deletions += diff.len(),
            Op::Equal => {
                // A deletion and an insertion are one substitution.
                levenshtein += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    levenshtein + insertions.max(deletions)
}

/// Translates an index in the pre-image to its position in the post-image.
/// Positions inside a deletion map to the start of the following segment.
pub fn x_index(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut hit = None;
    for diff in diffs {
        if diff.op != Op::Insert {
            chars1 += diff.len();
        }
        if diff.op != Op::Delete {
            chars2 += diff.len();
        }
        if chars1 > loc {
            hit = Some(diff);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }
    match hit {
        // The location was deleted.
        Some(diff) if diff.op == Op::Delete => last_chars2,
        _ => last_chars2 + (loc - last_chars1),
    }
}

/// Renders a diff list as an HTML fragment with inline styling.
pub fn pretty_html(diffs: &[Diff]) -> String {
    let mut html = String::new();
    for diff in diffs {
        let mut text = String::new();
        for &c in &diff.text {
            match c {
                '&' => text.push_str("&amp;"),
                '<' => text.push_str("&lt;"),
                '>' => text.push_str("&gt;"),
                '\n' => text.push_str("&para;<br>"),
                _ => text.push(c),
            }
        }
        match diff.op {
            Op::Insert => {
                html.push_str("<ins style=\"background:#e6ffe6;\">");
                html.push_str(&text);
                html.push_str("</ins>");
            }
            Op::Delete => {
                html.push_str("<del style=\"background:#ffe6e6;\">");
                html.push_str(&text);
                html.push_str("</del>");
            }
            Op::Equal => {
                html.push_str("<span>");
                html.push_str(&text);
                html.push_str("</span>");
            }
        }
    }
    html
}
