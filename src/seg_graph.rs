//! Seg graph (C5): per-vertex outgoing/incoming seg lists, partner
//! linkage, and loop marking for split avoidance.
//!
//! Grounded on `original_source/nodebuild.h`'s `FPrivVert::segs`/`segs2`
//! (heads of the per-vertex lists) and `FPrivSeg::nextforvert` /
//! `nextforvert2`, plus the teacher's `link_partner_segs` in
//! `bsp_level.rs` (generalized here to use stable handles instead of
//! re-cloning `Arc<Seg>`s).

use crate::arena::{SegArena, SegId, VertexArena, VertexId};

/// Links `seg` into `v1`'s outgoing list and `v2`'s incoming list. Called
/// once per freshly created seg (initial creation or a split product).
pub fn link_seg(arena: &mut SegArena, vertices: &mut VertexArena, seg: SegId) {
    let (v1, v2) = {
        let s = arena.get(seg);
        (s.v1, s.v2)
    };
    let old_out = vertices.get(v1).segs_out;
    arena.get_mut(seg).next_for_v1 = old_out;
    vertices.get_mut(v1).segs_out = Some(seg);

    let old_in = vertices.get(v2).segs_in;
    arena.get_mut(seg).next_for_v2 = old_in;
    vertices.get_mut(v2).segs_in = Some(seg);
}

/// Removes `seg` from `v1`'s outgoing list (O(list length), per §4.4:
/// acceptable given a handful of segs per vertex in practice).
pub fn unlink_from_v1(arena: &mut SegArena, vertices: &mut VertexArena, vertex: VertexId, seg: SegId) {
    let head = vertices.get(vertex).segs_out;
    match head {
        Some(h) if h == seg => {
            vertices.get_mut(vertex).segs_out = arena.get(seg).next_for_v1;
        }
        Some(mut cur) => loop {
            let next = arena.get(cur).next_for_v1;
            match next {
                Some(n) if n == seg => {
                    let after = arena.get(seg).next_for_v1;
                    arena.get_mut(cur).next_for_v1 = after;
                    break;
                }
                Some(n) => cur = n,
                None => break,
            }
        },
        None => {}
    }
}

/// Removes `seg` from `v2`'s incoming list.
pub fn unlink_from_v2(arena: &mut SegArena, vertices: &mut VertexArena, vertex: VertexId, seg: SegId) {
    let head = vertices.get(vertex).segs_in;
    match head {
        Some(h) if h == seg => {
            vertices.get_mut(vertex).segs_in = arena.get(seg).next_for_v2;
        }
        Some(mut cur) => loop {
            let next = arena.get(cur).next_for_v2;
            match next {
                Some(n) if n == seg => {
                    let after = arena.get(seg).next_for_v2;
                    arena.get_mut(cur).next_for_v2 = after;
                    break;
                }
                Some(n) => cur = n,
                None => break,
            }
        },
        None => {}
    }
}

/// Iterates the segs leaving `vertex` (outgoing list).
pub fn segs_from(arena: &SegArena, vertices: &VertexArena, vertex: VertexId) -> Vec<SegId> {
    let mut out = Vec::new();
    let mut cur = vertices.get(vertex).segs_out;
    while let Some(s) = cur {
        out.push(s);
        cur = arena.get(s).next_for_v1;
    }
    out
}

/// Iterates the segs arriving at `vertex` (incoming list).
pub fn segs_into(arena: &SegArena, vertices: &VertexArena, vertex: VertexId) -> Vec<SegId> {
    let mut out = Vec::new();
    let mut cur = vertices.get(vertex).segs_in;
    while let Some(s) = cur {
        out.push(s);
        cur = arena.get(s).next_for_v2;
    }
    out
}

/// `markLoop(firstSeg, loopnum)` (§4.4): walks the ring of segs sharing a
/// sidedef chain around a sector (via `partner` + next-at-vertex) and
/// tags them with `loopnum`. Segs already tagged are left alone (a ring
/// is only walked once); returns the number of segs tagged.
pub fn mark_loop(arena: &mut SegArena, vertices: &VertexArena, first: SegId, loopnum: u32) -> usize {
    let mut tagged = 0;
    let mut current = first;
    loop {
        if arena.get(current).loopnum != 0 {
            break;
        }
        arena.get_mut(current).loopnum = loopnum;
        tagged += 1;

        let v2 = arena.get(current).v2;
        // Continue around the loop via the next seg leaving this seg's
        // far endpoint — a closed sector boundary is a fan of one
        // outgoing seg per vertex in the non-degenerate case.
        let next = segs_from(arena, vertices, v2)
            .into_iter()
            .find(|&s| s != current);
        match next {
            Some(n) if n != first => current = n,
            _ => break,
        }
    }
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;

    fn square_loop() -> (SegArena, VertexArena, Vec<SegId>) {
        let mut verts = VertexArena::default();
        let v0 = verts.push(0, 0);
        let v1 = verts.push(FRACUNIT, 0);
        let v2 = verts.push(FRACUNIT, FRACUNIT);
        let v3 = verts.push(0, FRACUNIT);

        let mut arena = SegArena::default();
        let mk = |v1: VertexId, v2: VertexId| crate::arena::Seg {
            v1,
            v2,
            linedef: None,
            sidedef: None,
            front_sector: None,
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
        };
        let s0 = arena.push(mk(v0, v1));
        let s1 = arena.push(mk(v1, v2));
        let s2 = arena.push(mk(v2, v3));
        let s3 = arena.push(mk(v3, v0));
        for &s in &[s0, s1, s2, s3] {
            link_seg(&mut arena, &mut verts, s);
        }
        (arena, verts, vec![s0, s1, s2, s3])
    }

    #[test]
    fn segs_from_and_into_round_trip() {
        let (arena, verts, segs) = square_loop();
        let v1 = arena.get(segs[0]).v2;
        assert_eq!(segs_from(&arena, &verts, v1), vec![segs[1]]);
        assert_eq!(segs_into(&arena, &verts, v1), vec![segs[0]]);
    }

    #[test]
    fn mark_loop_tags_entire_ring() {
        let (mut arena, verts, segs) = square_loop();
        let tagged = mark_loop(&mut arena, &verts, segs[0], 1);
        assert_eq!(tagged, 4);
        for &s in &segs {
            assert_eq!(arena.get(s).loopnum, 1);
        }
    }

    #[test]
    fn unlink_removes_from_v1_list() {
        let (mut arena, mut verts, segs) = square_loop();
        let v0 = arena.get(segs[0]).v1;
        unlink_from_v1(&mut arena, &mut verts, v0, segs[0]);
        assert!(segs_from(&arena, &verts, v0).is_empty());
    }
}
