//! Compact delta encoding of a diff list.
//!
//! A delta is a tab-separated token stream replayed against the pre-image:
//! `=N` keeps N characters, `-N` deletes N characters, `+STR` inserts the
//! percent-decoded STR. The percent codec passes through the unreserved set
//! of the reference implementation and encodes everything else as uppercase
//! hex over UTF-8 bytes, so deltas interchange with other implementations.

use crate::diff::{Diff, Op};
use crate::error::{Error, Result};

/// Characters emitted without escaping, besides ASCII alphanumerics.
const UNRESERVED: &str = " -_.!~*'();/?:@&=+$,#";

/// Percent-encodes a payload for a delta or patch line.
pub(crate) fn encode_text(text: &[char]) -> String {
    let mut out = String::new();
    let mut utf8 = [0u8; 4];
    for &c in text {
        if c.is_ascii_alphanumeric() || UNRESERVED.contains(c) {
            out.push(c);
        } else {
            for byte in c.encode_utf8(&mut utf8).as_bytes() {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}

/// Reverses [`encode_text`]. Fails on truncated or non-hex escapes and on
/// escape sequences that do not decode as UTF-8.
pub(crate) fn decode_text(text: &str) -> std::result::Result<String, String> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut iter = text.chars();
    while let Some(c) = iter.next() {
        if c == '%' {
            let hi = iter.next().and_then(|d| d.to_digit(16));
            let lo = iter.next().and_then(|d| d.to_digit(16));
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes.push((hi * 16 + lo) as u8),
                _ => return Err(format!("bad escape in: {}", text)),
            }
        } else {
            let mut utf8 = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        }
    }
    String::from_utf8(bytes).map_err(|_| format!("invalid UTF-8 in: {}", text))
}

/// Encodes a diff list as a delta string relative to its pre-image.
pub fn to_delta(diffs: &[Diff]) -> String {
    let mut tokens = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match diff.op {
            Op::Insert => tokens.push(format!("+{}", encode_text(&diff.text))),
            Op::Delete => tokens.push(format!("-{}", diff.len())),
            Op::Equal => tokens.push(format!("={}", diff.len())),
        }
    }
    tokens.join("\t")
}

/// Replays a delta string against the pre-image `text1`, rebuilding the
/// full diff list.
pub fn from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>> {
    let chars: Vec<char> = text1.chars().collect();
    let mut diffs = Vec::new();
    let mut pointer = 0;
    for token in delta.split('\t') {
        if token.is_empty() {
            // Blank tokens are ok (from a trailing \t).
            continue;
        }
        // Each token begins with a one character sign which specifies the
        // operation of this token.
        let mut rest = token.chars();
        let sign = rest.next();
        let param = rest.as_str();
        match sign {
            Some('+') => {
                let decoded = decode_text(param).map_err(Error::InvalidDelta)?;
                diffs.push(Diff::new(Op::Insert, &decoded));
            }
            Some('-') | Some('=') => {
                let n: usize = param.parse().map_err(|_| {
                    Error::InvalidDelta(format!("invalid number in delta: {}", param))
                })?;
                if pointer + n > chars.len() {
                    return Err(Error::InvalidDelta(format!(
                        "Delta size ({}) larger than source text size ({})",
                        pointer + n,
                        chars.len()
                    )));
                }
                let text = chars[pointer..pointer + n].to_vec();
                pointer += n;
                let op = if sign == Some('=') { Op::Equal } else { Op::Delete };
                diffs.push(Diff::from_chars(op, text));
            }
            _ => {
                return Err(Error::InvalidDelta(format!(
                    "invalid diff operation in delta: {}",
                    token
                )));
            }
        }
    }
    if pointer != chars.len() {
        return Err(Error::InvalidDelta(format!(
            "Delta size ({}) smaller than source text size ({})",
            pointer,
            chars.len()
        )));
    }
    Ok(diffs)
}
