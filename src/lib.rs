//! text-patch: fuzzy text diffing, matching and patching.
//!
//! Three cooperating engines, configured through one [`Config`] bundle:
//!
//! - [`Differ`] computes a minimal edit script between two texts using a
//!   time-bounded Myers bisection, with cleanup passes that canonicalize
//!   the script for humans or for machines.
//! - [`Matcher`] locates a pattern in a text near an expected position,
//!   tolerating errors, using the Bitap bit-parallel algorithm.
//! - [`Patcher`] turns edit scripts into context-carrying hunks, moves them
//!   through a textual format compatible with the diff-match-patch family,
//!   and applies them onto targets that have drifted since the patch was
//!   made.
//!
//! All indices and lengths count Unicode scalar values, never bytes.
//!
//! # Example
//!
//! ```
//! use text_patch::{patch, Patcher};
//!
//! let patcher = Patcher::new();
//! let patches = patcher.make(
//!     "The quick brown fox jumps over the lazy dog.",
//!     "That quick brown fox jumped over a lazy dog.",
//! );
//!
//! // Serialize for transport, parse on the other side.
//! let wire = patch::to_text(&patches);
//! let patches = patch::from_text(&wire)?;
//!
//! // The target drifted, but the patch still lands.
//! let (result, applied) =
//!     patcher.apply(&patches, "The quick red rabbit jumps over the tired tiger.");
//! assert_eq!("That quick red rabbit jumped over a tired tiger.", result);
//! assert!(applied.iter().all(|&ok| ok));
//! # Ok::<(), text_patch::Error>(())
//! ```

pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod matching;
pub mod patch;
pub mod text;

// Re-export commonly used types.
pub use config::Config;
pub use diff::{Diff, Differ, Op};
pub use error::{Error, Result};
pub use matching::Matcher;
pub use patch::{Patch, Patcher};
