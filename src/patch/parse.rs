//! Parsing of the textual patch format.
//!
//! The parser is strict: a malformed header, an unknown payload prefix, a
//! bad escape, or a hunk whose declared lengths disagree with its payload
//! all fail with [`Error::InvalidPatch`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diff::{self, Diff, Op};
use crate::error::{Error, Result};
use crate::patch::Patch;

static PATCH_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@$").expect("header pattern"));

/// Parses textual patches into a list of [`Patch`] records.
pub fn from_text(text: &str) -> Result<Vec<Patch>> {
    let mut patches = Vec::new();
    if text.is_empty() {
        return Ok(patches);
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let mut pointer = 0;
    while pointer < lines.len() {
        let line = lines[pointer];
        if line.is_empty() {
            // Trailing terminator or blank separator.
            pointer += 1;
            continue;
        }
        let captures = PATCH_HEADER
            .captures(line)
            .ok_or_else(|| Error::InvalidPatch(line.to_string()))?;
        let (start1, length1) = parse_range(&captures[1], &captures[2], line)?;
        let (start2, length2) = parse_range(&captures[3], &captures[4], line)?;
        let mut patch = Patch {
            start1,
            start2,
            length1,
            length2,
            diffs: Vec::new(),
        };
        pointer += 1;

        while pointer < lines.len() {
            let line = lines[pointer];
            let mut rest = line.chars();
            let sign = match rest.next() {
                // Blank line? Whitespace was stripped, skip.
                None => {
                    pointer += 1;
                    continue;
                }
                Some('@') => break, // start of the next patch
                Some(sign) => sign,
            };
            let payload = diff::decode_text(rest.as_str())
                .map_err(|_| Error::InvalidPatch(line.to_string()))?;
            let op = match sign {
                '+' => Op::Insert,
                '-' => Op::Delete,
                ' ' => Op::Equal,
                _ => return Err(Error::InvalidPatch(line.to_string())),
            };
            patch.diffs.push(Diff::new(op, &payload));
            pointer += 1;
        }

        validate_lengths(&patch)?;
        patches.push(patch);
    }
    Ok(patches)
}

fn parse_range(start: &str, length: &str, line: &str) -> Result<(usize, usize)> {
    let start: usize = start
        .parse()
        .map_err(|_| Error::InvalidPatch(line.to_string()))?;
    match length {
        // A bare start means one line at that (1-based) position.
        "" => Ok((
            start
                .checked_sub(1)
                .ok_or_else(|| Error::InvalidPatch(line.to_string()))?,
            1,
        )),
        "0" => Ok((start, 0)),
        _ => {
            let length: usize = length
                .parse()
                .map_err(|_| Error::InvalidPatch(line.to_string()))?;
            Ok((
                start
                    .checked_sub(1)
                    .ok_or_else(|| Error::InvalidPatch(line.to_string()))?,
                length,
            ))
        }
    }
}

/// A hunk's declared lengths must match its payload.
fn validate_lengths(patch: &Patch) -> Result<()> {
    let mut length1 = 0;
    let mut length2 = 0;
    for diff in &patch.diffs {
        if diff.op != Op::Insert {
            length1 += diff.len();
        }
        if diff.op != Op::Delete {
            length2 += diff.len();
        }
    }
    if length1 != patch.length1 || length2 != patch.length2 {
        return Err(Error::InvalidPatch(format!(
            "hunk lengths {},{} do not match header {},{}",
            length1, length2, patch.length1, patch.length2
        )));
    }
    Ok(())
}
