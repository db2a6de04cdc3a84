//! End-to-end fixture builds covering §8's scenarios: small, literal level
//! geometries exercising the recursion, splitter, and output-shaping
//! pipeline together rather than one component in isolation.

use doombsp::arena::SegId;
use doombsp::bsp::{Node, NodeBuilder};
use doombsp::config::BuilderConfig;
use doombsp::fixed::FRACUNIT;
use doombsp::input::{
    LineFlags, RawLevel, RawLineDef, RawSideDef, RawSideDefId, RawVertex, RawVertexId, SectorId,
};
use doombsp::output;

fn init() {
    let _ = env_logger::try_init();
}

fn side(i: u32) -> Option<RawSideDefId> {
    Some(RawSideDefId(i))
}

fn v(x: i32, y: i32) -> RawVertex {
    RawVertex { x: x * FRACUNIT, y: y * FRACUNIT }
}

fn one_sided(v1: u32, v2: u32, sidedef: u32) -> RawLineDef {
    RawLineDef {
        v1: RawVertexId(v1),
        v2: RawVertexId(v2),
        flags: LineFlags::empty(),
        right: side(sidedef),
        left: None,
    }
}

fn two_sided(v1: u32, v2: u32, right: u32, left: u32) -> RawLineDef {
    RawLineDef {
        v1: RawVertexId(v1),
        v2: RawVertexId(v2),
        flags: LineFlags::TWO_SIDED,
        right: side(right),
        left: side(left),
    }
}

/// Counts BSP leaves (subsectors) in the built tree.
fn count_leaves(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 1,
        Node::Branch(b) => count_leaves(&b.front) + count_leaves(&b.back),
    }
}

/// Counts BSP branches (interior nodes) in the built tree.
fn count_branches(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 0,
        Node::Branch(b) => 1 + count_branches(&b.front) + count_branches(&b.back),
    }
}

fn every_leaf_segs(node: &Node, out: &mut Vec<Vec<SegId>>) {
    match node {
        Node::Leaf(leaf) => out.push(leaf.segs.clone()),
        Node::Branch(b) => {
            every_leaf_segs(&b.front, out);
            every_leaf_segs(&b.back, out);
        }
    }
}

/// Scenario 1: square room. A single convex quad needs no splitter at all.
#[test]
fn square_room_needs_no_splitter() {
    init();
    let level = RawLevel {
        vertices: vec![v(0, 0), v(1, 0), v(1, 1), v(0, 1)],
        linedefs: vec![
            one_sided(0, 1, 0),
            one_sided(1, 2, 1),
            one_sided(2, 3, 2),
            one_sided(3, 0, 3),
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
    };

    let out = NodeBuilder::build(&level, BuilderConfig::default()).expect("build succeeds");
    assert_eq!(count_branches(&out.tree), 0, "a single convex quad needs no splitter");
    assert_eq!(count_leaves(&out.tree), 1);

    let classic = output::shape_classic(&out.tree, &out.segs, &out.vertices);
    assert_eq!(classic.nodes.len(), 0);
    assert_eq!(classic.subsectors.len(), 1);
    assert_eq!(classic.segs.len(), 4);
}

/// Scenario 2: two rooms sharing a wall. The shared line is two-sided, so
/// the raw seg count is 8 (two per two-sided line, one per one-sided line);
/// the build must land every seg in exactly one of two subsectors, with
/// each subsector's segs drawn from a single sector and partner links
/// symmetric end to end (P2, P3).
#[test]
fn two_rooms_share_a_wall() {
    init();
    let fu = 1;
    let level = RawLevel {
        vertices: vec![
            v(0, 0), v(fu, 0), v(fu, fu), v(0, fu), v(2 * fu, 0), v(2 * fu, fu),
        ],
        linedefs: vec![
            one_sided(0, 1, 0),          // bottom of room A
            two_sided(1, 2, 1, 2),       // shared wall: A right, B left
            one_sided(2, 3, 3),          // top of room A
            one_sided(3, 0, 4),          // left of room A
            one_sided(1, 4, 5),          // bottom of room B
            one_sided(4, 5, 6),          // right of room B
            one_sided(5, 2, 7),          // top of room B
        ],
        sidedefs: vec![
            RawSideDef { sector: SectorId(0) }, // 0: room A
            RawSideDef { sector: SectorId(0) }, // 1: shared, room A side
            RawSideDef { sector: SectorId(1) }, // 2: shared, room B side
            RawSideDef { sector: SectorId(0) }, // 3
            RawSideDef { sector: SectorId(0) }, // 4
            RawSideDef { sector: SectorId(1) }, // 5
            RawSideDef { sector: SectorId(1) }, // 6
            RawSideDef { sector: SectorId(1) }, // 7
        ],
        sector_count: 2,
        polyspots: Vec::new(),
        anchors: Vec::new(),
    };

    let out = NodeBuilder::build(&level, BuilderConfig::default()).expect("build succeeds");
    assert_eq!(count_leaves(&out.tree), 2, "two distinct sectors need exactly one split");

    // P3: partner symmetry.
    for (id, seg) in out.segs.iter() {
        if let Some(p) = seg.partner {
            assert_eq!(out.segs.get(p).partner, Some(id), "partner must be mutual");
        }
    }

    // P2: every leaf's non-miniseg segs share one sector.
    let mut leaves = Vec::new();
    every_leaf_segs(&out.tree, &mut leaves);
    for leaf in &leaves {
        let mut sectors: Vec<_> = leaf
            .iter()
            .filter(|&&s| !out.segs.get(s).is_miniseg())
            .map(|&s| out.segs.get(s).front_sector)
            .collect();
        sectors.dedup();
        assert_eq!(sectors.len(), 1, "a subsector must not mix sectors");
    }

    let classic = output::shape_classic(&out.tree, &out.segs, &out.vertices);
    assert_eq!(classic.subsectors.len(), 2);
    assert_eq!(classic.segs.len(), 8, "two per two-sided line, one per one-sided line");
}

/// Scenario 3: an L-shaped (non-convex) sector. Building must split at the
/// concave corner and land in exactly two convex subsectors.
#[test]
fn l_shape_splits_at_concave_corner() {
    init();
    // (0,0) (2,0) (2,1) (1,1) (1,2) (0,2), one sector throughout.
    let level = RawLevel {
        vertices: vec![v(0, 0), v(2, 0), v(2, 1), v(1, 1), v(1, 2), v(0, 2)],
        linedefs: vec![
            one_sided(0, 1, 0),
            one_sided(1, 2, 1),
            one_sided(2, 3, 2),
            one_sided(3, 4, 3),
            one_sided(4, 5, 4),
            one_sided(5, 0, 5),
        ],
        sidedefs: (0..6).map(|_| RawSideDef { sector: SectorId(0) }).collect(),
        sector_count: 1,
        polyspots: Vec::new(),
        anchors: Vec::new(),
    };

    let out = NodeBuilder::build(&level, BuilderConfig::default()).expect("build succeeds");
    assert_eq!(count_leaves(&out.tree), 2, "concave L needs exactly one split into two convex pieces");
    assert!(count_branches(&out.tree) >= 1);

    let classic = output::shape_classic(&out.tree, &out.segs, &out.vertices);
    assert_eq!(classic.subsectors.len(), 2);
    // No area is lost: all 6 original segs (plus any split products) are
    // accounted for across the two subsectors.
    let total: u32 = classic.subsectors.iter().map(|s| s.num_segs).sum();
    assert!(total >= 6);
}

/// Scenario 4: a self-referencing sector (a linedef whose both sides name
/// the same sector) enclosing an island. The build must terminate (no
/// infinite recursion) via the hack-seg path and produce a small, finite
/// subsector count.
#[test]
fn self_referencing_sector_does_not_recurse_forever() {
    init();
    let level = RawLevel {
        vertices: vec![
            // Outer boundary.
            v(0, 0), v(4, 0), v(4, 4), v(0, 4),
            // Inner self-referencing ring.
            v(1, 1), v(3, 1), v(3, 3), v(1, 3),
        ],
        linedefs: vec![
            one_sided(0, 1, 0),
            one_sided(1, 2, 1),
            one_sided(2, 3, 2),
            one_sided(3, 0, 3),
            two_sided(4, 5, 4, 5),
            two_sided(5, 6, 6, 7),
            two_sided(6, 7, 8, 9),
            two_sided(7, 4, 10, 11),
        ],
        sidedefs: {
            let mut sd: Vec<RawSideDef> = (0..4).map(|_| RawSideDef { sector: SectorId(0) }).collect();
            // Inner ring: every side (front and back) names sector 0.
            sd.extend((0..8).map(|_| RawSideDef { sector: SectorId(0) }));
            sd
        },
        sector_count: 1,
        polyspots: Vec::new(),
        anchors: Vec::new(),
    };

    let out = NodeBuilder::build(&level, BuilderConfig::default()).expect("build terminates");
    let leaves = count_leaves(&out.tree);
    assert!(leaves >= 1 && leaves < 32, "self-referencing ring must not explode the tree: {leaves}");

    for (id, seg) in out.segs.iter() {
        if let Some(p) = seg.partner {
            assert_eq!(out.segs.get(p).partner, Some(id));
        }
    }
}

/// Scenario 6 (abridged): GL-nodes mode must close every subsector's seg
/// list into a loop, inserting minisegs as needed, for a simple pentagon.
#[test]
fn gl_mode_closes_pentagon_into_one_loop() {
    init();
    let level = RawLevel {
        vertices: vec![v(0, 0), v(2, 0), v(3, 1), v(1, 3), v(-1, 1)],
        linedefs: vec![
            one_sided(0, 1, 0),
            one_sided(1, 2, 1),
            one_sided(2, 3, 2),
            one_sided(3, 4, 3),
            one_sided(4, 0, 4),
        ],
        sidedefs: (0..5).map(|_| RawSideDef { sector: SectorId(0) }).collect(),
        sector_count: 1,
        polyspots: Vec::new(),
        anchors: Vec::new(),
    };

    let cfg = BuilderConfig::gl_nodes();
    let mut out = NodeBuilder::build(&level, cfg).expect("build succeeds");
    let mut warnings = out.warnings.clone();
    let gl = output::shape_gl(&out.tree, &mut out.segs, &mut out.vertices, &mut warnings);

    assert_eq!(gl.subsectors.len(), 1, "single convex pentagon is one subsector");
    let sub = gl.subsectors[0];
    assert!(sub.num_segs >= 5, "closed loop must cover at least the five boundary segs");

    // The subsector's segs must chain v2 -> next v1 into a single closed
    // loop (P4): walk from the first seg and confirm we return to start
    // after exactly `num_segs` steps.
    let segs = &gl.segs[sub.first_seg as usize..(sub.first_seg + sub.num_segs) as usize];
    let start = segs[0].v1;
    let mut cur = segs[0].v2;
    let mut steps = 1;
    'walk: while cur != start {
        for s in segs {
            if s.v1 == cur {
                cur = s.v2;
                steps += 1;
                continue 'walk;
            }
        }
        panic!("loop did not close after {steps} steps, stuck at vertex {cur}");
    }
    assert_eq!(steps, sub.num_segs as usize);
}
