//! Splitter chooser (C6): picks the next partition line for a working set
//! using the cost heuristic of §4.5.
//!
//! Grounded on the teacher's `BspLevel::choose_partition`
//! (`bsp_level.rs`), generalized from "always split on the first seg"
//! into the full two-pass, plane-bucketed, cost-ranked search
//! `original_source/nodebuild.h` declares as `SelectSplitter`/`Heuristic`.

use crate::arena::{SegArena, SegId};
use crate::config::BuilderConfig;
use crate::geometry::{self, LineClass, NodeLine};

fn same_plane(a: &NodeLine, b: &NodeLine) -> bool {
    // Colinear: the cross product of the two direction vectors is zero,
    // and b's origin lies on a's line. Co-oriented: direction vectors
    // point the same way (no need to also accept anti-parallel — an
    // anti-parallel seg is the *other side* of the same line, a distinct
    // plane in this builder, matching `planefront`'s role).
    let cross = a.dx as f64 * b.dy as f64 - a.dy as f64 * b.dx as f64;
    if cross.abs() > f64::EPSILON {
        return false;
    }
    if geometry::side_of(a, b.x, b.y) != geometry::PointSide::On {
        return false;
    }
    let dot = a.dx as f64 * b.dx as f64 + a.dy as f64 * b.dy as f64;
    dot >= 0.0
}

/// Resolves a seg's underlying infinite line given both arenas.
pub fn resolve_seg_line(
    seg: SegId,
    segs: &SegArena,
    vertices: &crate::arena::VertexArena,
) -> NodeLine {
    let s = segs.get(seg);
    let v1 = vertices.get(s.v1);
    let v2 = vertices.get(s.v2);
    NodeLine::from_endpoints((v1.x, v1.y), (v2.x, v2.y))
}

/// Groups `set` into plane buckets using resolved vertex coordinates.
/// The entry point `bsp.rs` actually calls.
pub fn group_seg_planes_resolved(
    set: &[SegId],
    segs: &mut SegArena,
    vertices: &crate::arena::VertexArena,
) {
    let mut buckets: Vec<NodeLine> = Vec::new();
    for &id in set {
        let line = resolve_seg_line(id, segs, vertices);
        let plane = buckets.iter().position(|b| same_plane(b, &line));
        let plane = plane.unwrap_or_else(|| {
            buckets.push(line);
            buckets.len() - 1
        });
        segs.get_mut(id).planenum = Some(plane as u32);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitterChoice {
    Splitter(SegId),
    /// The working set is already convex; the caller should emit a
    /// subsector directly.
    Convex,
}

/// The fast pre-test from §4.5: a single plane bucket covering the whole
/// set, or a set small enough that it's always a simple fan.
pub fn is_trivially_convex(set: &[SegId], segs: &SegArena, cfg: &BuilderConfig) -> bool {
    if set.len() <= cfg.trivial_leaf_segs {
        return true;
    }
    let mut planes = set.iter().map(|&s| segs.get(s).planenum);
    match planes.next() {
        Some(first) => planes.all(|p| p == first),
        None => true,
    }
}

/// The exhaustive pairwise convexity check from §4.5: every pair of segs
/// mutually non-crossing and sharing a sector.
pub fn is_convex(set: &[SegId], segs: &SegArena, vertices: &crate::arena::VertexArena) -> bool {
    for (i, &a) in set.iter().enumerate() {
        let sa = segs.get(a);
        if sa.is_miniseg() {
            continue;
        }
        for &b in &set[i + 1..] {
            let sb = segs.get(b);
            if sa.front_sector != sb.front_sector {
                return false;
            }
            let line = resolve_seg_line(a, segs, vertices);
            let (v1, v2) = (vertices.get(sb.v1), vertices.get(sb.v2));
            let (class, _) = geometry::classify_line(&line, (v1.x, v1.y), (v2.x, v2.y));
            if class == LineClass::Crosses {
                return false;
            }
        }
    }
    true
}

struct Candidate {
    seg: SegId,
    planenum: u32,
    cost: f64,
}

/// `SelectSplitter` (§4.5): the two-pass search. `set` must already have
/// `planenum` assigned via [`group_seg_planes_resolved`].
pub fn choose(
    set: &[SegId],
    segs: &SegArena,
    vertices: &crate::arena::VertexArena,
    cfg: &BuilderConfig,
) -> SplitterChoice {
    if is_trivially_convex(set, segs, cfg) || is_convex(set, segs, vertices) {
        return SplitterChoice::Convex;
    }

    if let Some(seg) = select_splitter(set, segs, vertices, cfg, true) {
        return SplitterChoice::Splitter(seg);
    }
    // Pass 2: the set may be one closed no-split loop; ignore loop
    // membership so recursion can still make progress.
    match select_splitter(set, segs, vertices, cfg, false) {
        Some(seg) => SplitterChoice::Splitter(seg),
        None => {
            // Every candidate was degenerate (dx = dy = 0); fall back to
            // the first non-degenerate seg in the set, if any.
            set.iter()
                .copied()
                .find(|&s| {
                    let line = resolve_seg_line(s, segs, vertices);
                    !line.is_degenerate()
                })
                .map(SplitterChoice::Splitter)
                .unwrap_or(SplitterChoice::Convex)
        }
    }
}

fn select_splitter(
    set: &[SegId],
    segs: &SegArena,
    vertices: &crate::arena::VertexArena,
    cfg: &BuilderConfig,
    honor_no_split: bool,
) -> Option<SegId> {
    // One representative per distinct planenum, per §4.5.
    let mut seen_planes = std::collections::HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    for &rep in set {
        let plane = match segs.get(rep).planenum {
            Some(p) => p,
            None => continue,
        };
        if !seen_planes.insert(plane) {
            continue;
        }
        let line = resolve_seg_line(rep, segs, vertices);
        if line.is_degenerate() {
            continue;
        }
        let stats = evaluate_candidate(&line, set, segs, vertices, honor_no_split);
        let cost = stats.splits as f64 * cfg.split_weight
            + (stats.front as i64 - stats.back as i64).unsigned_abs() as f64 * cfg.balance_weight
            + stats.badness * cfg.no_split_penalty;
        candidates.push(Candidate {
            seg: rep,
            planenum: plane,
            cost,
        });
    }

    candidates
        .into_iter()
        .min_by(|a, b| {
            a.cost
                .partial_cmp(&b.cost)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.planenum.cmp(&b.planenum))
        })
        .map(|c| c.seg)
}

struct CandidateStats {
    splits: usize,
    front: usize,
    back: usize,
    badness: f64,
}

fn evaluate_candidate(
    line: &NodeLine,
    set: &[SegId],
    segs: &SegArena,
    vertices: &crate::arena::VertexArena,
    honor_no_split: bool,
) -> CandidateStats {
    let mut splits = 0;
    let mut front = 0;
    let mut back = 0;
    let mut badness = 0.0;

    for &s in set {
        let seg = segs.get(s);
        let v1 = vertices.get(seg.v1);
        let v2 = vertices.get(seg.v2);
        let (class, _) = geometry::classify_line(line, (v1.x, v1.y), (v2.x, v2.y));
        match class {
            LineClass::Front => front += 1,
            LineClass::Back => back += 1,
            LineClass::Crosses => {
                splits += 1;
                if honor_no_split && seg.loopnum != 0 {
                    badness += 1.0;
                }
            }
        }
    }
    CandidateStats {
        splits,
        front,
        back,
        badness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Seg, VertexArena};
    use crate::fixed::FRACUNIT;

    fn bare_seg(v1: crate::arena::VertexId, v2: crate::arena::VertexId) -> Seg {
        Seg {
            v1,
            v2,
            linedef: None,
            sidedef: None,
            front_sector: Some(crate::input::SectorId(0)),
            back_sector: None,
            partner: None,
            next: None,
            next_for_v1: None,
            next_for_v2: None,
            loopnum: 0,
            angle: 0,
            offset: 0,
            planenum: None,
            planefront: true,
        }
    }

    #[test]
    fn square_is_convex() {
        let mut verts = VertexArena::default();
        let v0 = verts.push(0, 0);
        let v1 = verts.push(FRACUNIT, 0);
        let v2 = verts.push(FRACUNIT, FRACUNIT);
        let v3 = verts.push(0, FRACUNIT);
        let mut segs = SegArena::default();
        let set = vec![
            segs.push(bare_seg(v0, v1)),
            segs.push(bare_seg(v1, v2)),
            segs.push(bare_seg(v2, v3)),
            segs.push(bare_seg(v3, v0)),
        ];
        group_seg_planes_resolved(&set, &mut segs, &verts);
        assert!(is_convex(&set, &segs, &verts));
    }

    #[test]
    fn degenerate_splitter_never_chosen() {
        let mut verts = VertexArena::default();
        let v0 = verts.push(0, 0);
        let v1 = verts.push(0, 0); // zero-length seg: dx = dy = 0
        let v2 = verts.push(FRACUNIT, FRACUNIT);
        let v3 = verts.push(0, FRACUNIT);
        let mut segs = SegArena::default();
        let set = vec![
            segs.push(bare_seg(v0, v1)),
            segs.push(bare_seg(v1, v2)),
            segs.push(bare_seg(v2, v3)),
            segs.push(bare_seg(v3, v0)),
        ];
        group_seg_planes_resolved(&set, &mut segs, &verts);
        let cfg = BuilderConfig {
            trivial_leaf_segs: 0,
            ..Default::default()
        };
        if let SplitterChoice::Splitter(chosen) = choose(&set, &segs, &verts, &cfg) {
            let line = resolve_seg_line(chosen, &segs, &verts);
            assert!(!line.is_degenerate());
        }
    }
}
