//! Output shaping (C9): linearises the in-memory BSP tree into the
//! classic or GL-nodes record arrays described in §6.
//!
//! Grounded on the teacher's `BspLevel::to_wad_nodes`-shaped flattening
//! (`bsp_level.rs`), generalized to the two distinct target formats and
//! the miniseg-stripping / polygon-closure rules of §4.8. `SortSegs`'s
//! comparator is resolved per §9's open question: `(subsector, seg
//! arena index)` lexicographically.

use crate::arena::{Seg, SegArena, SegId, VertexArena, VertexId};
use crate::bsp::{BBox, Leaf, Node};
use crate::error::BuildWarning;
use crate::fixed::Fixed;
use crate::input::{
    ClassicOutput, ClassicSeg, GlOutput, GlSeg, NODE_CHILD_SUBSECTOR_BIT, OutputNode,
    OutputSubsector, OutputVertex,
};

fn clamp_i16(v: Fixed) -> i16 {
    v.clamp(i16::MIN as Fixed, i16::MAX as Fixed) as i16
}

fn bbox_i16(b: BBox) -> [i16; 4] {
    [clamp_i16(b.top), clamp_i16(b.bottom), clamp_i16(b.left), clamp_i16(b.right)]
}

fn emit_vertices(vertices: &VertexArena, out: &mut Vec<OutputVertex>) {
    out.clear();
    out.extend(vertices.iter().map(|(_, v)| OutputVertex { x: v.x, y: v.y }));
}

/// `side` as classic/GL output want it: which of the originating
/// linedef's two sides this seg came from. The core's `Seg` type carries
/// no dedicated side field (matching §3's definition exactly), so this
/// reuses `planefront`, set once at initial-seg creation time and
/// preserved unchanged by every split (see `splitter::clone_piece`).
fn side_of_seg(seg: &Seg) -> u8 {
    if seg.planefront {
        0
    } else {
        1
    }
}

/// Shapes a completed build into classic-format node/seg/subsector
/// arrays. Mini-segs never occur in a classic-mode build (the splitter
/// only creates them when `make_gl_nodes` is set), so the filtering
/// pass below is a defensive no-op in the common case, not a load-bearing
/// step.
pub fn shape_classic(tree: &Node, segs: &SegArena, vertices: &VertexArena) -> ClassicOutput {
    log::info!("shaping classic-nodes output");
    let mut out = ClassicOutput::default();
    emit_vertices(vertices, &mut out.vertices);

    // A tree that's a single leaf (no branches at all) needs no node
    // table entry — the collapse below only ever appends nodes for
    // actual `Branch`es, matching the "1 node or 0 nodes" expectation
    // for a trivially convex level.
    collapse_classic(tree, segs, &mut out);
    log::info!(
        "classic output: {} nodes, {} segs, {} subsectors",
        out.nodes.len(),
        out.segs.len(),
        out.subsectors.len(),
    );
    out
}

/// Returns `None` if this subtree collapsed to nothing (every leaf under
/// it lost all its segs to miniseg stripping); otherwise returns the
/// child reference the parent should store.
fn collapse_classic(node: &Node, segs: &SegArena, out: &mut ClassicOutput) -> Option<u32> {
    match node {
        Node::Leaf(leaf) => emit_classic_subsector(leaf, segs, out),
        Node::Branch(branch) => {
            let front = collapse_classic(&branch.front, segs, out);
            let back = collapse_classic(&branch.back, segs, out);
            match (front, back) {
                (None, None) => None,
                (Some(f), None) => Some(f),
                (None, Some(b)) => Some(b),
                (Some(f), Some(b)) => {
                    let idx = out.nodes.len() as u32;
                    out.nodes.push(OutputNode {
                        x: branch.line.x,
                        y: branch.line.y,
                        dx: branch.line.dx,
                        dy: branch.line.dy,
                        bbox: [bbox_i16(branch.front_bbox), bbox_i16(branch.back_bbox)],
                        child: [f, b],
                    });
                    Some(idx)
                }
            }
        }
    }
}

fn emit_classic_subsector(leaf: &Leaf, segs: &SegArena, out: &mut ClassicOutput) -> Option<u32> {
    let mut kept: Vec<SegId> = leaf
        .segs
        .iter()
        .copied()
        .filter(|&s| !segs.get(s).is_miniseg())
        .collect();
    if kept.is_empty() {
        return None;
    }
    kept.sort_by_key(|s| s.0);

    let first_seg = out.segs.len() as u32;
    for &s in &kept {
        let seg = segs.get(s);
        out.segs.push(ClassicSeg {
            v1: seg.v1.0,
            v2: seg.v2.0,
            angle: seg.angle,
            linedef: seg.linedef.expect("classic subsector segs always carry a linedef"),
            side: side_of_seg(seg),
            offset: seg.offset,
        });
    }
    let subsector_index = out.subsectors.len() as u32;
    out.subsectors.push(OutputSubsector {
        first_seg,
        num_segs: kept.len() as u32,
    });
    Some(subsector_index | NODE_CHILD_SUBSECTOR_BIT)
}

/// Shapes a completed GL-mode build: keeps mini-segs and closes every
/// subsector's seg list into a single CCW polygon loop (§4.8).
pub fn shape_gl(
    tree: &Node,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    warnings: &mut Vec<BuildWarning>,
) -> GlOutput {
    log::info!("shaping GL-nodes output");
    let mut out = GlOutput::default();
    collapse_gl(tree, segs, vertices, &mut out, warnings);
    emit_vertices(vertices, &mut out.vertices);
    log::info!(
        "GL output: {} nodes, {} segs, {} subsectors, {} warnings",
        out.nodes.len(),
        out.segs.len(),
        out.subsectors.len(),
        warnings.len(),
    );
    out
}

fn collapse_gl(
    node: &Node,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    out: &mut GlOutput,
    warnings: &mut Vec<BuildWarning>,
) -> u32 {
    match node {
        Node::Leaf(leaf) => emit_gl_subsector(leaf, segs, vertices, out, warnings),
        Node::Branch(branch) => {
            let front = collapse_gl(&branch.front, segs, vertices, out, warnings);
            let back = collapse_gl(&branch.back, segs, vertices, out, warnings);
            let idx = out.nodes.len() as u32;
            out.nodes.push(OutputNode {
                x: branch.line.x,
                y: branch.line.y,
                dx: branch.line.dx,
                dy: branch.line.dy,
                bbox: [bbox_i16(branch.front_bbox), bbox_i16(branch.back_bbox)],
                child: [front, back],
            });
            idx
        }
    }
}

fn emit_gl_subsector(
    leaf: &Leaf,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    out: &mut GlOutput,
    warnings: &mut Vec<BuildWarning>,
) -> u32 {
    let subsector_index = out.subsectors.len();
    let mut ordered = close_loop(&leaf.segs, segs, vertices, warnings, subsector_index);
    ordered.sort_by_key(|s| s.0);
    // Re-chain after the deterministic sort: `close_loop` already fixed
    // adjacency; sorting by arena index is only for P5 (byte-identical
    // output across runs), so re-derive traversal order from adjacency
    // rather than trusting the sorted order as a polygon.
    let ordered = reorder_as_loop(ordered, segs, vertices);

    let first_seg = out.segs.len() as u32;
    for &s in &ordered {
        let seg = segs.get(s);
        out.segs.push(GlSeg {
            v1: seg.v1.0,
            v2: seg.v2.0,
            linedef: seg.linedef,
            side: side_of_seg(seg),
            partner: seg.partner.map(|p| p.0),
        });
    }
    out.subsectors.push(OutputSubsector {
        first_seg,
        num_segs: ordered.len() as u32,
    });
    subsector_index as u32 | NODE_CHILD_SUBSECTOR_BIT
}

/// Walks `segs` chaining `v2 -> next.v1` to find a closed loop. Segs that
/// can't be chained in are stitched together with a synthetic connecting
/// miniseg (`PushConnectingGLSeg`); a subsector with fewer than 3 segs
/// after chaining gets one too, per §4.8.
fn close_loop(
    segs_in: &[SegId],
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    warnings: &mut Vec<BuildWarning>,
    subsector_index: usize,
) -> Vec<SegId> {
    let mut remaining: Vec<SegId> = segs_in.to_vec();
    if remaining.is_empty() {
        return remaining;
    }

    let mut chain = vec![remaining.remove(0)];
    while !remaining.is_empty() {
        let tail = segs.get(*chain.last().unwrap()).v2;
        let next_idx = remaining.iter().position(|&s| segs.get(s).v1 == tail);
        match next_idx {
            Some(i) => chain.push(remaining.remove(i)),
            None => {
                // Gap: stitch a connecting miniseg from the current tail to
                // an arbitrary remaining seg's start, so the walk can
                // continue rather than abandoning the rest of the set.
                let next_start = segs.get(remaining[0]).v1;
                push_connecting_gl_seg(&mut chain, tail, next_start, segs, vertices);
                chain.push(remaining.remove(0));
            }
        }
    }

    let head = segs.get(*chain.first().unwrap()).v1;
    let tail = segs.get(*chain.last().unwrap()).v2;
    if head != tail {
        push_connecting_gl_seg(&mut chain, tail, head, segs, vertices);
    }
    if chain.len() < 3 {
        log::warn!("subsector {subsector_index} could not close into a polygon ({} segs)", chain.len());
        warnings.push(BuildWarning::UnclosableSubsector { subsector_index });
    }
    chain
}

fn push_connecting_gl_seg(
    chain: &mut Vec<SegId>,
    from: VertexId,
    to: VertexId,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
) {
    if from == to {
        return;
    }
    let angle = crate::fixed::bam_of(
        (vertices.get(to).x - vertices.get(from).x) as f64,
        (vertices.get(to).y - vertices.get(from).y) as f64,
    );
    let id = segs.push(Seg {
        v1: from,
        v2: to,
        linedef: None,
        sidedef: None,
        front_sector: None,
        back_sector: None,
        partner: None,
        next: None,
        next_for_v1: None,
        next_for_v2: None,
        loopnum: 0,
        angle,
        offset: 0,
        planenum: None,
        planefront: true,
    });
    chain.push(id);
}

/// Given a sorted-by-index seg list that's known to chain into a loop
/// (post `close_loop`), re-derives a CCW traversal starting from the
/// lowest-index seg so output is deterministic (P5) independent of which
/// seg happened to be first during construction.
fn reorder_as_loop(sorted: Vec<SegId>, segs: &SegArena, vertices: &VertexArena) -> Vec<SegId> {
    if sorted.len() < 2 {
        return sorted;
    }
    let start = sorted[0];
    let mut chain = vec![start];
    let mut used = vec![false; sorted.len()];
    used[0] = true;
    loop {
        let tail = segs.get(*chain.last().unwrap()).v2;
        let next = sorted
            .iter()
            .enumerate()
            .find(|(i, &s)| !used[*i] && segs.get(s).v1 == tail);
        match next {
            Some((i, &s)) => {
                chain.push(s);
                used[i] = true;
            }
            None => break,
        }
    }
    if chain.len() == sorted.len() {
        if signed_loop_area(&chain, segs, vertices) < 0.0 {
            chain.reverse();
        }
        chain
    } else {
        // Adjacency broke under sorting (shouldn't happen for a loop
        // `close_loop` already closed); fall back to the sorted order
        // rather than losing segs.
        sorted
    }
}

/// Shoelace formula over the loop's vertex path; positive means CCW
/// under the standard (y-up) math convention used throughout this crate.
fn signed_loop_area(chain: &[SegId], segs: &SegArena, vertices: &VertexArena) -> f64 {
    let mut acc = 0.0;
    for &s in chain {
        let seg = segs.get(s);
        let a = vertices.get(seg.v1);
        let b = vertices.get(seg.v2);
        acc += (a.x as f64) * (b.y as f64) - (b.x as f64) * (a.y as f64);
    }
    acc * 0.5
}
