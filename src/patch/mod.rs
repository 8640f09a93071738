//! Patch records: hunks of change with context, their textual form, and
//! fuzzy application onto drifted targets.
//!
//! The textual format is the unidiff-like form of the diff-match-patch
//! family, and round-trips with other implementations:
//!
//! ```text
//! @@ -382,8 +481,9 @@
//!  preh
//! -ello
//! +owdy
//!  ever
//! ```

mod apply;
mod make;
mod parse;

pub use make::Patcher;
pub use parse::from_text;

use std::fmt;

use crate::diff::{self, Diff, Op};

/// One hunk: a contiguous run of edits with its equality context and its
/// positions in the pre- and post-image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    /// The edits, including leading and trailing equality context.
    pub diffs: Vec<Diff>,
    /// Start offset in the pre-image, 0-based.
    pub start1: usize,
    /// Start offset in the post-image, 0-based.
    pub start2: usize,
    /// Characters of pre-image covered by this hunk.
    pub length1: usize,
    /// Characters of post-image covered by this hunk.
    pub length2: usize,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Patch::default()
    }
}

fn coords(start: usize, length: usize) -> String {
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

impl fmt::Display for Patch {
    /// Emits the hunk in the GNU-diff-inspired textual format. Header
    /// indices are 1-based; payloads are percent-encoded like deltas.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "@@ -{} +{} @@",
            coords(self.start1, self.length1),
            coords(self.start2, self.length2)
        )?;
        for diff in &self.diffs {
            let sign = match diff.op {
                Op::Insert => '+',
                Op::Delete => '-',
                Op::Equal => ' ',
            };
            writeln!(f, "{}{}", sign, diff::encode_text(&diff.text))?;
        }
        Ok(())
    }
}

/// Serializes a list of patches to text.
pub fn to_text(patches: &[Patch]) -> String {
    let mut out = String::new();
    for patch in patches {
        out.push_str(&patch.to_string());
    }
    out
}
