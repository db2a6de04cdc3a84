//! Builder configuration: cost-heuristic weights, depth limits, and the
//! GL-nodes toggle. Shaped like the teacher's
//! `bsp_procedural::GeneratorConfig` (a plain, `serde`-derived value type
//! callers can load from JSON/RON) rather than scattering tunables as
//! free constants.

use serde::{Deserialize, Serialize};

/// Weight applied to the number of segs a candidate splitter would cut,
/// in the chooser's cost function (§4.5).
const DEFAULT_SPLIT_WEIGHT: f64 = 8.0;

/// Weight applied to `|front - back|`, the front/back imbalance, in the
/// chooser's cost function.
const DEFAULT_BALANCE_WEIGHT: f64 = 1.0;

/// Penalty added when a candidate would split a loop-marked (no-split)
/// seg during the `honor_no_split` pass.
const DEFAULT_NO_SPLIT_PENALTY: f64 = 100.0;

/// Recursion depth bound (§4.7): recursion depth is bounded by the
/// number of segs, but a hard ceiling catches corrupt input before it
/// exhausts the stack.
const DEFAULT_DEPTH_LIMIT: u32 = 1024;

/// Seg-count threshold below which the recursion skips the chooser and
/// treats the set as convex outright (a working set that small is
/// always a simple fan in practice, and the exhaustive pairwise convexity
/// check costs more than just recursing once more would).
const DEFAULT_TRIVIAL_LEAF_SEGS: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub split_weight: f64,
    pub balance_weight: f64,
    pub no_split_penalty: f64,
    pub depth_limit: u32,
    pub trivial_leaf_segs: usize,
    /// GL-nodes mode (§4.8): keep minisegs and close every subsector into
    /// a convex polygon. `false` produces classic nodes.
    pub make_gl_nodes: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            split_weight: DEFAULT_SPLIT_WEIGHT,
            balance_weight: DEFAULT_BALANCE_WEIGHT,
            no_split_penalty: DEFAULT_NO_SPLIT_PENALTY,
            depth_limit: DEFAULT_DEPTH_LIMIT,
            trivial_leaf_segs: DEFAULT_TRIVIAL_LEAF_SEGS,
            make_gl_nodes: false,
        }
    }
}

impl BuilderConfig {
    pub fn gl_nodes() -> Self {
        BuilderConfig {
            make_gl_nodes: true,
            ..Default::default()
        }
    }
}
