//! Splitter (C7): partitions a working set against a chosen splitter seg,
//! splitting crossing segs, propagating partner linkage, healing
//! colinear-sharer T-junctions, and (GL mode) stitching minisegs.
//!
//! Grounded on `original_source/nodebuild.h`'s `FNodeBuilder::Node`/
//! `SplitSegs`/`AddMinisegs` (the `.cpp` bodies weren't in the retrieved
//! pack, so the event-ordering and parity rules below are derived from
//! §4.6's prose plus the teacher's `BspLevel::split_segs`, which this
//! generalizes from "always classify front/back" into the full six-step
//! algorithm).

use std::collections::HashMap;

use crate::arena::{Seg, SegArena, SegId, VertexArena, VertexId};
use crate::error::{BuildError, BuildWarning};
use crate::event_tree::EventTree;
use crate::fixed::{bam_of, Fixed};
use crate::geometry::{self, LineClass, NodeLine, PointSide, SIDE_EPSILON};
use crate::seg_graph;
use crate::vertex_map::VertexMap;

/// §7's one-shot retry epsilon for a crossing classification whose
/// intercept denominator underflowed: widened well past ordinary
/// numerical noise, so a second failure genuinely means the splitter is
/// parallel (or near enough that no reasonable epsilon resolves it).
const WIDENED_SIDE_EPSILON: f64 = SIDE_EPSILON * 16.0;

/// Output of one [`split`] call: the two child working sets plus any
/// non-fatal conditions hit along the way (§4.6 "Failure modes").
#[derive(Debug, Default)]
pub struct SplitResult {
    pub front: Vec<SegId>,
    pub back: Vec<SegId>,
    pub warnings: Vec<BuildWarning>,
}

/// Forces classification of a hack seg (and its partner, the "hack
/// mate") to the back side regardless of geometry, to break
/// self-referencing sector loops (§4.6 "Hack seg"). The trigger for
/// *when* to engage this is left to the recursion driver (§8.4's open
/// question on `HackSeg`/`HackMate`'s precise predicate); this module
/// only implements the documented effect.
#[derive(Debug, Clone, Copy)]
pub struct HackSeg {
    pub seg: SegId,
}

/// `split(P, W)` from §4.6.
pub fn split(
    splitter: SegId,
    set: &[SegId],
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    vertex_map: &mut VertexMap,
    events: &mut EventTree,
    hack: Option<HackSeg>,
    make_gl_nodes: bool,
) -> Result<SplitResult, BuildError> {
    let node = super::chooser::resolve_seg_line(splitter, segs, vertices);
    events.clear();

    let mut front = Vec::new();
    let mut back = Vec::new();
    let mut warnings = Vec::new();
    let mut sharers: Vec<SegId> = Vec::new();
    // Maps an original (pre-split) seg id to the `(front_piece, back_piece)`
    // it was replaced by, so a partner encountered later in `set` is
    // linked to the pieces already created rather than split twice.
    let mut split_of: HashMap<SegId, (SegId, SegId)> = HashMap::new();

    for &s in set {
        if s == splitter {
            front.push(s);
            continue;
        }
        if let Some(&(f, b)) = split_of.get(&s) {
            front.push(f);
            back.push(b);
            continue;
        }

        let (v1, v2, partner) = {
            let seg = segs.get(s);
            (seg.v1, seg.v2, seg.partner)
        };
        let p1 = (vertices.get(v1).x, vertices.get(v1).y);
        let p2 = (vertices.get(v2).x, vertices.get(v2).y);

        if let Some(h) = hack {
            if h.seg == s || partner == Some(h.seg) {
                back.push(s);
                continue;
            }
        }

        let (class, sides) = geometry::classify_line(&node, p1, p2);
        let colinear = sides[0] == PointSide::On && sides[1] == PointSide::On;

        match class {
            LineClass::Front => {
                front.push(s);
                if colinear {
                    sharers.push(s);
                }
            }
            LineClass::Back => {
                back.push(s);
                if colinear {
                    sharers.push(s);
                }
            }
            LineClass::Crosses => {
                let s1 = geometry::raw_signed_area(&node, p1.0, p1.1);
                let s2 = geometry::raw_signed_area(&node, p2.0, p2.1);
                let (ix, iy) = match geometry::intersect_point(&node, p1, p2, s1, s2) {
                    Ok(p) => p,
                    Err(_) => {
                        // Denominator underflow: `s1`/`s2` are nearly
                        // equal, so the splitter is nearly parallel to
                        // this seg. Retry the classification once with a
                        // widened epsilon (§7); if that still calls it a
                        // crossing, the ambiguity is real, not a rounding
                        // artifact, and the build aborts.
                        let (reclass, resides) =
                            geometry::classify_line_with_epsilon(&node, p1, p2, WIDENED_SIDE_EPSILON);
                        match reclass {
                            LineClass::Crosses => {
                                return Err(BuildError::NumericAbort(format!(
                                    "seg {} nearly parallel to splitter: intercept denominator underflowed even after widening SIDE_EPSILON to {WIDENED_SIDE_EPSILON}",
                                    s.0
                                )));
                            }
                            LineClass::Front => {
                                front.push(s);
                                if resides[0] == PointSide::On && resides[1] == PointSide::On {
                                    sharers.push(s);
                                }
                            }
                            LineClass::Back => {
                                back.push(s);
                                if resides[0] == PointSide::On && resides[1] == PointSide::On {
                                    sharers.push(s);
                                }
                            }
                        }
                        continue;
                    }
                };
                let new_vertex =
                    vertex_map.select_close(vertices, ix.round() as Fixed, iy.round() as Fixed);

                if new_vertex == v1 || new_vertex == v2 {
                    // Both endpoints collapsed under VERTEX_EPSILON: the
                    // split would produce a zero-length piece. Drop the
                    // seg from both sides per §4.6's failure mode.
                    warnings.push(BuildWarning::DegenerateSplitDropped { seg_index: s.0 });
                    continue;
                }

                let (f1, b1) = split_seg_at(s, new_vertex, &node, segs, vertices);
                split_of.insert(s, (f1, b1));
                front.push(f1);
                back.push(b1);

                let dist = geometry::intercept(&node, vertices.get(new_vertex).x, vertices.get(new_vertex).y);
                events.insert(dist, new_vertex, Some(f1));

                if let Some(p) = partner {
                    if !split_of.contains_key(&p) {
                        let (pv1, pv2) = {
                            let pseg = segs.get(p);
                            (pseg.v1, pseg.v2)
                        };
                        let pp1 = (vertices.get(pv1).x, vertices.get(pv1).y);
                        let pp2 = (vertices.get(pv2).x, vertices.get(pv2).y);
                        let (_, psides) = geometry::classify_line(&node, pp1, pp2);
                        if psides[0] != psides[1] {
                            let (pf, pb) = split_seg_at(p, new_vertex, &node, segs, vertices);
                            split_of.insert(p, (pf, pb));
                            // p faces s in reverse: p's front-side piece
                            // shares an endpoint with s's back-side piece.
                            segs.get_mut(f1).partner = Some(pb);
                            segs.get_mut(pb).partner = Some(f1);
                            segs.get_mut(b1).partner = Some(pf);
                            segs.get_mut(pf).partner = Some(b1);
                        }
                    }
                }
            }
        }
    }

    // Step 3: events at the splitter's own touching endpoints.
    let (sv1, sv2) = {
        let s = segs.get(splitter);
        (s.v1, s.v2)
    };
    for v in [sv1, sv2] {
        let vx = vertices.get(v).x;
        let vy = vertices.get(v).y;
        let dist = geometry::intercept(&node, vx, vy);
        if events.find(dist).is_none() {
            events.insert(dist, v, None);
        }
    }

    fix_split_sharers(
        &sharers, &node, segs, vertices, vertex_map, events, &mut front, &mut back,
    );

    if make_gl_nodes {
        add_minisegs(&node, segs, vertices, events, &mut front, &mut back, &mut warnings);
    }

    Ok(SplitResult {
        front,
        back,
        warnings,
    })
}

/// Splits `seg_id` at `new_vertex` (already known to lie on `node`),
/// returning `(front_piece, back_piece)`. Does not touch `partner`;
/// callers wire partner linkage themselves.
fn split_seg_at(
    seg_id: SegId,
    new_vertex: VertexId,
    node: &NodeLine,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
) -> (SegId, SegId) {
    let original = segs.get(seg_id).clone();
    let v1_side = geometry::side_of(node, vertices.get(original.v1).x, vertices.get(original.v1).y);

    let piece_a = clone_piece(&original, original.v1, new_vertex);
    let piece_b = clone_piece(&original, new_vertex, original.v2);
    let id_a = segs.push(piece_a);
    let id_b = segs.push(piece_b);
    seg_graph::link_seg(segs, vertices, id_a);
    seg_graph::link_seg(segs, vertices, id_b);

    if v1_side == PointSide::Front {
        (id_a, id_b)
    } else {
        (id_b, id_a)
    }
}

fn clone_piece(original: &Seg, v1: VertexId, v2: VertexId) -> Seg {
    Seg {
        v1,
        v2,
        linedef: original.linedef,
        sidedef: original.sidedef,
        front_sector: original.front_sector,
        back_sector: original.back_sector,
        partner: None,
        next: None,
        next_for_v1: None,
        next_for_v2: None,
        loopnum: original.loopnum,
        angle: original.angle,
        offset: original.offset,
        planenum: None,
        planefront: original.planefront,
    }
}

/// Step 4: colinear sharers that partially overlap a freshly split
/// region get subdivided at the same points, so no subsector downstream
/// inherits a seg that only partly matches its neighbours (T-junction
/// healing).
fn fix_split_sharers(
    sharers: &[SegId],
    node: &NodeLine,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    vertex_map: &mut VertexMap,
    events: &EventTree,
    front: &mut Vec<SegId>,
    back: &mut Vec<SegId>,
) {
    if sharers.is_empty() {
        return;
    }
    let mut interior: Vec<f64> = events
        .ordered_events()
        .iter()
        .map(|e| e.distance)
        .collect();
    interior.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);

    for &q in sharers {
        let (qv1, qv2) = {
            let seg = segs.get(q);
            (seg.v1, seg.v2)
        };
        let d1 = geometry::intercept(node, vertices.get(qv1).x, vertices.get(qv1).y);
        let d2 = geometry::intercept(node, vertices.get(qv2).x, vertices.get(qv2).y);
        let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };

        let mut cut_points: Vec<f64> = interior
            .iter()
            .copied()
            .filter(|&d| d > lo + f64::EPSILON && d < hi - f64::EPSILON)
            .collect();
        if cut_points.is_empty() {
            continue;
        }
        cut_points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        if d1 > d2 {
            cut_points.reverse();
        }

        let on_front = front.iter().position(|&s| s == q);
        let on_back = back.iter().position(|&s| s == q);

        let mut current = q;
        let mut pieces = Vec::new();
        for &dist in &cut_points {
            // Recover the world coordinate of this interior event by
            // walking the tree; the event list is the authority for
            // "what vertex sits at this distance".
            if let Some(vertex) = events
                .ordered_events()
                .into_iter()
                .find(|e| (e.distance - dist).abs() < f64::EPSILON)
                .map(|e| e.vertex)
            {
                let (piece_front, piece_back) =
                    split_seg_at(current, vertex, node, segs, vertices);
                // Both halves of a colinear sharer land on the same side
                // as the whole seg did; `split_seg_at`'s front/back
                // distinction only matters for genuine crossings.
                let keep = if on_front.is_some() { piece_front } else { piece_back };
                let continue_with = if on_front.is_some() { piece_back } else { piece_front };
                pieces.push(keep);
                current = continue_with;
                let _ = vertex_map; // vertices already merged via select_close upstream
            }
        }
        pieces.push(current);

        if let Some(idx) = on_front {
            front.splice(idx..idx + 1, pieces.iter().copied());
        } else if let Some(idx) = on_back {
            back.splice(idx..idx + 1, pieces.iter().copied());
        }
    }
}

/// Step 5 (GL-nodes only): walks the ordered event list and stitches a
/// miniseg pair across every interval that lies inside the level
/// (odd front-seg parity).
fn add_minisegs(
    node: &NodeLine,
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    events: &EventTree,
    front: &mut Vec<SegId>,
    back: &mut Vec<SegId>,
    warnings: &mut Vec<BuildWarning>,
) {
    let ordered = events.ordered_events();
    if ordered.len() < 2 {
        return;
    }

    let mut parity: u32 = 0;
    let mut enclosing: Option<SegId> = None;
    for i in 0..ordered.len() - 1 {
        let e0 = ordered[i];
        let e1 = ordered[i + 1];
        if let Some(fs) = e0.front_seg {
            parity += 1;
            enclosing = Some(fs);
        }

        if parity % 2 == 1 {
            if e0.vertex == e1.vertex {
                warnings.push(BuildWarning::SelfPairedMinisegSkipped {
                    vertex_index: vertices.get(e0.vertex).index,
                });
                continue;
            }
            let sector = enclosing.and_then(|fs| segs.get(fs).front_sector);
            let angle = {
                let a = vertices.get(e0.vertex);
                let b = vertices.get(e1.vertex);
                bam_of((b.x - a.x) as f64, (b.y - a.y) as f64)
            };
            let seg_a = segs.push(Seg {
                v1: e0.vertex,
                v2: e1.vertex,
                linedef: None,
                sidedef: None,
                front_sector: sector,
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
            let seg_b = segs.push(Seg {
                v1: e1.vertex,
                v2: e0.vertex,
                linedef: None,
                sidedef: None,
                front_sector: sector,
                back_sector: None,
                partner: Some(seg_a),
                next: None,
                next_for_v1: None,
                next_for_v2: None,
                loopnum: 0,
                angle: angle.wrapping_add(0x8000_0000),
                offset: 0,
                planenum: None,
                planefront: false,
            });
            segs.get_mut(seg_a).partner = Some(seg_b);
            seg_graph::link_seg(segs, vertices, seg_a);
            seg_graph::link_seg(segs, vertices, seg_b);

            let a_side = geometry::side_of(node, vertices.get(e0.vertex).x, vertices.get(e0.vertex).y);
            let _ = a_side; // minisegs straddle the splitter by construction
            front.push(seg_a);
            back.push(seg_b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser;
    use crate::fixed::FRACUNIT;
    use crate::input::SectorId;

    fn bare_seg(v1: VertexId, v2: VertexId, sector: SectorId) -> Seg {
        Seg {
            v1,
            v2,
            linedef: None,
            sidedef: None,
            front_sector: Some(sector),
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
    fn crossing_seg_splits_into_front_and_back() {
        let mut verts = VertexArena::default();
        let mut segs = SegArena::default();
        let mut map = VertexMap::new(-10 * FRACUNIT, -10 * FRACUNIT, 10 * FRACUNIT, 10 * FRACUNIT);
        let mut events = EventTree::new();

        // Splitter: the x-axis, running from (-1,0) to (1,0).
        let sv1 = verts.push(-FRACUNIT, 0);
        let sv2 = verts.push(FRACUNIT, 0);
        let splitter = segs.push(bare_seg(sv1, sv2, SectorId(0)));
        seg_graph::link_seg(&mut segs, &mut verts, splitter);

        // A seg crossing the x-axis vertically at x=0.
        let cv1 = verts.push(0, FRACUNIT);
        let cv2 = verts.push(0, -FRACUNIT);
        let crosser = segs.push(bare_seg(cv1, cv2, SectorId(1)));
        seg_graph::link_seg(&mut segs, &mut verts, crosser);

        map.seed(&verts);

        let set = vec![splitter, crosser];
        let result = split(
            splitter, &set, &mut segs, &mut verts, &mut map, &mut events, None, false,
        )
        .expect("crossing classification succeeds");

        assert_eq!(result.front.len(), 1);
        assert_eq!(result.back.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn colinear_sharer_keeps_its_side() {
        let mut verts = VertexArena::default();
        let mut segs = SegArena::default();
        let mut map = VertexMap::new(-10 * FRACUNIT, -10 * FRACUNIT, 10 * FRACUNIT, 10 * FRACUNIT);
        let mut events = EventTree::new();

        let sv1 = verts.push(0, 0);
        let sv2 = verts.push(FRACUNIT, 0);
        let splitter = segs.push(bare_seg(sv1, sv2, SectorId(0)));
        seg_graph::link_seg(&mut segs, &mut verts, splitter);

        // Same line, same direction: classifies Front (dot >= 0).
        let qv1 = verts.push(0, 0);
        let qv2 = verts.push(FRACUNIT, 0);
        let q = segs.push(bare_seg(qv1, qv2, SectorId(2)));
        seg_graph::link_seg(&mut segs, &mut verts, q);

        map.seed(&verts);
        let set = vec![splitter, q];
        let result = split(
            splitter, &set, &mut segs, &mut verts, &mut map, &mut events, None, false,
        )
        .expect("colinear classification succeeds");
        assert!(result.front.contains(&q));
        assert!(!result.back.contains(&q));
    }

    #[test]
    fn hack_seg_forces_back_classification() {
        let mut verts = VertexArena::default();
        let mut segs = SegArena::default();
        let mut map = VertexMap::new(-10 * FRACUNIT, -10 * FRACUNIT, 10 * FRACUNIT, 10 * FRACUNIT);
        let mut events = EventTree::new();

        let sv1 = verts.push(-FRACUNIT, 0);
        let sv2 = verts.push(FRACUNIT, 0);
        let splitter = segs.push(bare_seg(sv1, sv2, SectorId(0)));
        seg_graph::link_seg(&mut segs, &mut verts, splitter);

        // Geometrically in front, but hacked to the back.
        let hv1 = verts.push(0, FRACUNIT);
        let hv2 = verts.push(FRACUNIT, FRACUNIT);
        let hacked = segs.push(bare_seg(hv1, hv2, SectorId(3)));
        seg_graph::link_seg(&mut segs, &mut verts, hacked);

        map.seed(&verts);
        let set = vec![splitter, hacked];
        let result = split(
            splitter,
            &set,
            &mut segs,
            &mut verts,
            &mut map,
            &mut events,
            Some(HackSeg { seg: hacked }),
            false,
        )
        .expect("hack-seg classification succeeds");
        assert!(result.back.contains(&hacked));
        assert!(!result.front.contains(&hacked));
    }

    #[test]
    fn gl_mode_inserts_miniseg_pair_across_crossing() {
        let mut verts = VertexArena::default();
        let mut segs = SegArena::default();
        let mut map = VertexMap::new(-10 * FRACUNIT, -10 * FRACUNIT, 10 * FRACUNIT, 10 * FRACUNIT);
        let mut events = EventTree::new();

        let sv1 = verts.push(-FRACUNIT, 0);
        let sv2 = verts.push(FRACUNIT, 0);
        let splitter = segs.push(bare_seg(sv1, sv2, SectorId(0)));
        seg_graph::link_seg(&mut segs, &mut verts, splitter);

        let cv1 = verts.push(0, FRACUNIT);
        let cv2 = verts.push(0, -FRACUNIT);
        let crosser = segs.push(bare_seg(cv1, cv2, SectorId(1)));
        seg_graph::link_seg(&mut segs, &mut verts, crosser);

        map.seed(&verts);
        let set = vec![splitter, crosser];
        let before = segs.len();
        let result = split(
            splitter, &set, &mut segs, &mut verts, &mut map, &mut events, None, true,
        )
        .expect("gl-mode classification succeeds");
        // Splitting the crosser plus at least one miniseg pair must have
        // created new seg handles beyond the two split pieces.
        assert!(segs.len() > before);
        assert!(!result.front.is_empty());
        assert!(!result.back.is_empty());
        let _ = chooser::SplitterChoice::Convex; // chooser module reachable from here
    }
}
