//! BSP recursion (C8): drives the chooser (C6) and splitter (C7) to turn
//! a flat line set into a binary tree of convex subsectors.
//!
//! Grounded on the teacher's `BspLevel::build_tree` in `bsp_level.rs`
//! (the overall recurse-choose-split-recurse shape survives), generalized
//! from its naive "first seg is always the splitter" rule to the full
//! two-pass chooser and seg-splitting pipeline this crate implements.

use crate::arena::{Seg, SegArena, SegId, VertexArena, VertexId};
use crate::chooser::{self, SplitterChoice};
use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult, BuildWarning};
use crate::event_tree::EventTree;
use crate::fixed::{bam_of, Fixed};
use crate::geometry::NodeLine;
use crate::input::{RawLevel, SectorId};
use crate::seg_graph;
use crate::splitter::{self, HackSeg};
use crate::vertex_map::VertexMap;

/// Axis-aligned bounding box, fixed-point, `top >= bottom`/`right >= left`
/// in world-coordinate sense (not yet clamped to i16 — that's C9's job).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub top: Fixed,
    pub bottom: Fixed,
    pub left: Fixed,
    pub right: Fixed,
}

impl BBox {
    fn from_segs(set: &[SegId], segs: &SegArena, vertices: &VertexArena) -> BBox {
        let mut top = Fixed::MIN;
        let mut bottom = Fixed::MAX;
        let mut left = Fixed::MAX;
        let mut right = Fixed::MIN;
        for &s in set {
            let seg = segs.get(s);
            for v in [seg.v1, seg.v2] {
                let vert = vertices.get(v);
                top = top.max(vert.y);
                bottom = bottom.min(vert.y);
                left = left.min(vert.x);
                right = right.max(vert.x);
            }
        }
        if set.is_empty() {
            BBox { top: 0, bottom: 0, left: 0, right: 0 }
        } else {
            BBox { top, bottom, left, right }
        }
    }
}

/// A built BSP node, before output shaping (C9) linearises it.
#[derive(Debug)]
pub enum Node {
    Leaf(Leaf),
    Branch(Box<Branch>),
}

#[derive(Debug)]
pub struct Leaf {
    pub segs: Vec<SegId>,
    pub bbox: BBox,
}

#[derive(Debug)]
pub struct Branch {
    pub line: NodeLine,
    pub front: Node,
    pub front_bbox: BBox,
    pub back: Node,
    pub back_bbox: BBox,
}

/// Everything a completed build hands back: the tree plus the arenas it
/// indexes into (output shaping needs both).
pub struct BuildOutput {
    pub tree: Node,
    pub segs: SegArena,
    pub vertices: VertexArena,
    pub warnings: Vec<BuildWarning>,
}

/// Owns the arenas for one build (§5: single-threaded, exclusive
/// ownership for the builder's lifetime).
pub struct NodeBuilder {
    segs: SegArena,
    vertices: VertexArena,
    vertex_map: VertexMap,
    events: EventTree,
    cfg: BuilderConfig,
    warnings: Vec<BuildWarning>,
}

impl NodeBuilder {
    /// Runs one complete build from raw level geometry. §7:
    /// `DegenerateLevel` is the only error that can occur before any
    /// recursion starts.
    pub fn build(raw: &RawLevel, cfg: BuilderConfig) -> BuildResult<BuildOutput> {
        log::info!(
            "building nodes: {} vertices, {} linedefs, gl_nodes={}",
            raw.vertices.len(),
            raw.linedefs.len(),
            cfg.make_gl_nodes,
        );
        if raw.is_degenerate() {
            log::warn!("rejecting degenerate level");
            return Err(BuildError::DegenerateLevel(
                "zero linedefs or all vertices coincident".to_string(),
            ));
        }

        let mut vertices = VertexArena::default();
        let mut raw_to_arena: Vec<VertexId> = Vec::with_capacity(raw.vertices.len());
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (Fixed::MAX, Fixed::MAX, Fixed::MIN, Fixed::MIN);
        for rv in &raw.vertices {
            raw_to_arena.push(vertices.push(rv.x, rv.y));
            min_x = min_x.min(rv.x);
            min_y = min_y.min(rv.y);
            max_x = max_x.max(rv.x);
            max_y = max_y.max(rv.y);
        }

        let mut vertex_map = VertexMap::new(min_x, min_y, max_x, max_y);
        vertex_map.seed(&vertices);

        let mut segs = SegArena::default();
        let mut initial: Vec<SegId> = Vec::new();

        for (idx, linedef) in raw.linedefs.iter().enumerate() {
            let linedef_id = crate::input::RawLineDefId(idx as u32);
            let v1 = raw_to_arena[linedef.v1.0 as usize];
            let v2 = raw_to_arena[linedef.v2.0 as usize];

            let right_sector = linedef
                .right
                .map(|sd| raw.sidedefs[sd.0 as usize].sector);
            let left_sector = linedef.left.map(|sd| raw.sidedefs[sd.0 as usize].sector);

            let front = make_initial_seg(
                &mut segs, &mut vertices, v1, v2, right_sector, left_sector, linedef_id, linedef.right, 0,
            );
            seg_graph::link_seg(&mut segs, &mut vertices, front);
            initial.push(front);

            if let Some(left) = linedef.left {
                let back = make_initial_seg(
                    &mut segs, &mut vertices, v2, v1, left_sector, right_sector, linedef_id, Some(left), 1,
                );
                seg_graph::link_seg(&mut segs, &mut vertices, back);
                segs.get_mut(front).partner = Some(back);
                segs.get_mut(back).partner = Some(front);
                initial.push(back);
            }
        }

        mark_sector_loops(&mut segs, &vertices, &initial);

        let mut builder = NodeBuilder {
            segs,
            vertices,
            vertex_map,
            events: EventTree::new(),
            cfg,
            warnings: Vec::new(),
        };

        let (tree, bbox) = builder.build_node(initial, 0)?;
        log::info!(
            "build complete: bbox ({},{})-({},{}), {} warnings",
            bbox.left,
            bbox.bottom,
            bbox.right,
            bbox.top,
            builder.warnings.len(),
        );

        Ok(BuildOutput {
            tree,
            segs: builder.segs,
            vertices: builder.vertices,
            warnings: builder.warnings,
        })
    }

    fn build_node(&mut self, set: Vec<SegId>, depth: u32) -> BuildResult<(Node, BBox)> {
        if depth > self.cfg.depth_limit {
            return Err(BuildError::SplitterOverflow { seg_count: set.len() });
        }

        chooser::group_seg_planes_resolved(&set, &mut self.segs, &self.vertices);

        match chooser::choose(&set, &self.segs, &self.vertices, &self.cfg) {
            SplitterChoice::Convex => {
                let bbox = BBox::from_segs(&set, &self.segs, &self.vertices);
                log::debug!("depth {depth}: {} segs converged to a subsector", set.len());
                Ok((Node::Leaf(Leaf { segs: set, bbox }), bbox))
            }
            SplitterChoice::Splitter(p) => {
                let line = chooser::resolve_seg_line(p, &self.segs, &self.vertices);
                let total = set.len();
                log::debug!(
                    "depth {depth}: splitting {total} segs on line ({},{})+({},{})",
                    line.x, line.y, line.dx, line.dy,
                );
                let mut result = splitter::split(
                    p,
                    &set,
                    &mut self.segs,
                    &mut self.vertices,
                    &mut self.vertex_map,
                    &mut self.events,
                    None,
                    self.cfg.make_gl_nodes,
                )?;

                // If the splitter somehow left every seg on one side, the
                // set is almost certainly a self-referencing sector ring
                // (a linedef whose two sides name the same sector); force
                // the hack-seg path so recursion still makes progress.
                if (result.front.len() == total && result.back.is_empty())
                    || (result.back.len() == total && result.front.is_empty())
                {
                    if let Some(seg) = find_self_referencing(&set, &self.segs) {
                        log::debug!(
                            "depth {depth}: forcing hack-seg {} behind splitter (self-referencing sector)",
                            seg.0,
                        );
                        result = splitter::split(
                            p,
                            &set,
                            &mut self.segs,
                            &mut self.vertices,
                            &mut self.vertex_map,
                            &mut self.events,
                            Some(HackSeg { seg }),
                            self.cfg.make_gl_nodes,
                        )?;
                    }
                }

                self.warnings.extend(result.warnings);

                if result.front.is_empty() || result.back.is_empty() {
                    return Err(BuildError::SplitterOverflow { seg_count: total });
                }

                let (front_node, front_bbox) = self.build_node(result.front, depth + 1)?;
                let (back_node, back_bbox) = self.build_node(result.back, depth + 1)?;
                let bbox = BBox {
                    top: front_bbox.top.max(back_bbox.top),
                    bottom: front_bbox.bottom.min(back_bbox.bottom),
                    left: front_bbox.left.min(back_bbox.left),
                    right: front_bbox.right.max(back_bbox.right),
                };
                Ok((
                    Node::Branch(Box::new(Branch {
                        line,
                        front: front_node,
                        front_bbox,
                        back: back_node,
                        back_bbox,
                    })),
                    bbox,
                ))
            }
        }
    }
}

fn find_self_referencing(set: &[SegId], segs: &SegArena) -> Option<SegId> {
    set.iter()
        .copied()
        .find(|&s| {
            let seg = segs.get(s);
            seg.front_sector.is_some() && seg.front_sector == seg.back_sector
        })
}

#[allow(clippy::too_many_arguments)]
fn make_initial_seg(
    segs: &mut SegArena,
    vertices: &mut VertexArena,
    v1: VertexId,
    v2: VertexId,
    front_sector: Option<SectorId>,
    back_sector: Option<SectorId>,
    linedef: crate::input::RawLineDefId,
    sidedef: Option<crate::input::RawSideDefId>,
    side: u8,
) -> SegId {
    let (x1, y1) = (vertices.get(v1).x, vertices.get(v1).y);
    let (x2, y2) = (vertices.get(v2).x, vertices.get(v2).y);
    let angle = bam_of((x2 - x1) as f64, (y2 - y1) as f64);
    segs.push(Seg {
        v1,
        v2,
        linedef: Some(linedef),
        sidedef,
        front_sector,
        back_sector,
        partner: None,
        next: None,
        next_for_v1: None,
        next_for_v2: None,
        loopnum: 0,
        angle,
        offset: 0,
        planenum: None,
        planefront: side == 0,
    })
}

/// Tags every seg that belongs to a closed sector boundary loop with a
/// nonzero `loopnum`, so the chooser's `honorNoSplit` pass (§4.5)
/// prefers not to cut through them.
fn mark_sector_loops(segs: &mut SegArena, vertices: &VertexArena, initial: &[SegId]) {
    let mut loopnum = 0u32;
    for &s in initial {
        if segs.get(s).loopnum != 0 {
            continue;
        }
        loopnum += 1;
        seg_graph::mark_loop(segs, vertices, s, loopnum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;
    use crate::input::{LineFlags, RawLineDef, RawSideDef, RawVertex, RawVertexId};

    fn square_room() -> RawLevel {
        let fu = FRACUNIT;
        RawLevel {
            vertices: vec![
                RawVertex { x: 0, y: 0 },
                RawVertex { x: fu, y: 0 },
                RawVertex { x: fu, y: fu },
                RawVertex { x: 0, y: fu },
            ],
            linedefs: vec![
                RawLineDef { v1: RawVertexId(0), v2: RawVertexId(1), flags: LineFlags::empty(), right: Some(crate::input::RawSideDefId(0)), left: None },
                RawLineDef { v1: RawVertexId(1), v2: RawVertexId(2), flags: LineFlags::empty(), right: Some(crate::input::RawSideDefId(1)), left: None },
                RawLineDef { v1: RawVertexId(2), v2: RawVertexId(3), flags: LineFlags::empty(), right: Some(crate::input::RawSideDefId(2)), left: None },
                RawLineDef { v1: RawVertexId(3), v2: RawVertexId(0), flags: LineFlags::empty(), right: Some(crate::input::RawSideDefId(3)), left: None },
            ],
            sidedefs: vec![
                RawSideDef { sector: SectorId(0) },
                RawSideDef { sector: SectorId(0) },
                RawSideDef { sector: SectorId(0) },
                RawSideDef { sector: SectorId(0) },
            ],
            sector_count: 1,
            polyspots: Vec::new(),
            anchors: Vec::new(),
        }
    }

    #[test]
    fn square_room_builds_a_single_leaf() {
        let level = square_room();
        let out = NodeBuilder::build(&level, BuilderConfig::default()).unwrap();
        match out.tree {
            Node::Leaf(leaf) => assert_eq!(leaf.segs.len(), 4),
            Node::Branch(_) => panic!("a single convex square should not need a splitter"),
        }
    }

    #[test]
    fn degenerate_level_is_rejected() {
        let level = RawLevel::default();
        let result = NodeBuilder::build(&level, BuilderConfig::default());
        assert!(matches!(result, Err(BuildError::DegenerateLevel(_))));
    }
}
