//! Polyobject placement (§6 contract only): maps each polyobject spawn
//! spot/anchor onto the subsector that contains it.
//!
//! Non-goal per the distilled spec: the original's container-search
//! algorithm itself (how `original_source` walks sidedef chains to
//! enclose a polyobject's starting sector) is out of scope here — only
//! its external contract, "which subsector does this point land in",
//! which is a plain point-in-polygon test against the already-built
//! tree. Grounded on the teacher's `BspLevel::point_in_subsector`-style
//! bbox/tree descent in `bsp_level.rs`, generalized to walk node
//! half-planes instead of leaf bboxes.

use crate::arena::{SegArena, VertexArena};
use crate::bsp::Node;
use crate::fixed::Fixed;
use crate::geometry::{self, PointSide};
use crate::input::{PolyAnchor, PolySpot};

/// Descends the tree via `sideOf` tests against each branch's splitter,
/// returning the index of the `Leaf` (subsector, in build order) that
/// contains `(x, y)`.
pub fn locate_subsector(tree: &Node, x: Fixed, y: Fixed) -> usize {
    let mut node = tree;
    let mut index = 0usize;
    loop {
        match node {
            Node::Leaf(_) => return index,
            Node::Branch(branch) => {
                let side = geometry::side_of(&branch.line, x, y);
                if side == PointSide::Back {
                    index += count_leaves(&branch.front);
                    node = &branch.back;
                } else {
                    node = &branch.front;
                }
            }
        }
    }
}

fn count_leaves(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 1,
        Node::Branch(branch) => count_leaves(&branch.front) + count_leaves(&branch.back),
    }
}

/// Resolves every polyobject spot and anchor in one pass, returning
/// `(polynum, subsector_index)` pairs in input order (I6: deterministic).
pub fn locate_all(
    tree: &Node,
    spots: &[PolySpot],
    anchors: &[PolyAnchor],
    _segs: &SegArena,
    _vertices: &VertexArena,
) -> Vec<(i32, usize)> {
    spots
        .iter()
        .chain(anchors.iter())
        .map(|p| (p.polynum, locate_subsector(tree, p.x, p.y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{BBox, Leaf};

    fn dummy_bbox() -> BBox {
        BBox { top: 0, bottom: 0, left: 0, right: 0 }
    }

    #[test]
    fn single_leaf_tree_locates_everything_at_zero() {
        let tree = Node::Leaf(Leaf { segs: Vec::new(), bbox: dummy_bbox() });
        assert_eq!(locate_subsector(&tree, 0, 0), 0);
        assert_eq!(locate_subsector(&tree, 12345, -987), 0);
    }

    #[test]
    fn branch_routes_front_and_back_to_distinct_leaves() {
        let line = crate::geometry::NodeLine::new(0, 0, crate::fixed::FRACUNIT, 0);
        let tree = Node::Branch(Box::new(crate::bsp::Branch {
            line,
            front: Node::Leaf(Leaf { segs: Vec::new(), bbox: dummy_bbox() }),
            front_bbox: dummy_bbox(),
            back: Node::Leaf(Leaf { segs: Vec::new(), bbox: dummy_bbox() }),
            back_bbox: dummy_bbox(),
        }));
        let front_leaf = locate_subsector(&tree, 0, -crate::fixed::FRACUNIT);
        let back_leaf = locate_subsector(&tree, 0, crate::fixed::FRACUNIT);
        assert_ne!(front_leaf, back_leaf);
    }
}
