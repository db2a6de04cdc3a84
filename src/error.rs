//! Error kinds surfaced by the core (§7).
//!
//! Fatal kinds abort the build; non-fatal kinds are counted and reported
//! once per build, with the arenas left in a valid, inspectable state.
//! Mirrors the `thiserror` usage already declared (if previously unused)
//! in the teacher repo's `Cargo.toml`.

use thiserror::Error;

/// Fatal build failures.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BuildError {
    /// Zero linedefs, or all vertices coincident.
    #[error("degenerate level: {0}")]
    DegenerateLevel(String),

    /// Splitter search exhausted for a non-convex set. Should be
    /// unreachable if the chooser's fallback pass is correct; its
    /// presence indicates a corrupt map.
    #[error("splitter search exhausted for a non-convex set of {seg_count} segs")]
    SplitterOverflow { seg_count: usize },

    /// An intercept denominator underflowed below epsilon even after one
    /// retry with a widened `SIDE_EPSILON`.
    #[error("numeric abort classifying seg against splitter: {0}")]
    NumericAbort(String),
}

/// Non-fatal conditions, accumulated and returned alongside a successful
/// build rather than aborting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A subsector could not be closed into a polygon after the miniseg
    /// pass; the degenerate closure of §4.8 was applied instead.
    UnclosableSubsector { subsector_index: usize },
    /// A split would have produced a zero-length seg; it was dropped from
    /// both sides.
    DegenerateSplitDropped { seg_index: u32 },
    /// A miniseg pairing would have connected a vertex to itself; skipped.
    SelfPairedMinisegSkipped { vertex_index: u32 },
}

pub type BuildResult<T> = Result<T, BuildError>;
