//! Vertex map (C2): a uniform grid over the level AABB for exact/near
//! vertex lookup, avoiding microscopic duplicates at T-junctions.
//!
//! Grounded on `original_source/nodebuild.h`'s `FVertexMap`: block size
//! `1 << (8 + FRACBITS)` (256 world units), `SelectVertexExact` /
//! `SelectVertexClose`. The C++ stores a flat `TArray<int> *` per block;
//! here each cell is a `Vec<VertexId>` behind a flat `Vec`, same shape.

use crate::arena::{VertexArena, VertexId};
use crate::fixed::Fixed;
use crate::geometry::VERTEX_EPSILON;

pub const BLOCK_SHIFT: u32 = 8 + crate::fixed::FRACBITS;
pub const BLOCK_SIZE: i64 = 1 << BLOCK_SHIFT;

pub struct VertexMap {
    min_x: Fixed,
    min_y: Fixed,
    blocks_wide: i32,
    blocks_tall: i32,
    cells: Vec<Vec<VertexId>>,
}

impl VertexMap {
    pub fn new(min_x: Fixed, min_y: Fixed, max_x: Fixed, max_y: Fixed) -> Self {
        let blocks_wide = block_span(min_x, max_x);
        let blocks_tall = block_span(min_y, max_y);
        VertexMap {
            min_x,
            min_y,
            blocks_wide,
            blocks_tall,
            cells: vec![Vec::new(); (blocks_wide.max(1) * blocks_tall.max(1)) as usize],
        }
    }

    /// Inserts every pre-existing vertex into the grid. Called once after
    /// the initial segs are created so later `select_close` lookups see
    /// the full set of linedef-connected vertices.
    pub fn seed(&mut self, arena: &VertexArena) {
        for (id, v) in arena.iter() {
            self.insert(id, v.x, v.y);
        }
    }

    fn block_index(&self, x: Fixed, y: Fixed) -> usize {
        let bx = ((x as i64 - self.min_x as i64) >> BLOCK_SHIFT).clamp(0, (self.blocks_wide - 1).max(0) as i64);
        let by = ((y as i64 - self.min_y as i64) >> BLOCK_SHIFT).clamp(0, (self.blocks_tall - 1).max(0) as i64);
        (by * self.blocks_wide.max(1) as i64 + bx) as usize
    }

    fn insert(&mut self, id: VertexId, x: Fixed, y: Fixed) {
        let idx = self.block_index(x, y);
        self.cells[idx].push(id);
    }

    /// `selectExact(x, y)`: an existing vertex iff coordinates match
    /// bit-exactly.
    pub fn select_exact(&self, arena: &VertexArena, x: Fixed, y: Fixed) -> Option<VertexId> {
        let idx = self.block_index(x, y);
        self.cells[idx]
            .iter()
            .copied()
            .find(|&id| {
                let v = arena.get(id);
                v.x == x && v.y == y
            })
    }

    /// `selectClose(x, y)`: an existing vertex within `VERTEX_EPSILON`
    /// (searching the owning cell and its 8 neighbours), or a freshly
    /// appended one.
    pub fn select_close(&mut self, arena: &mut VertexArena, x: Fixed, y: Fixed) -> VertexId {
        let bx = ((x as i64 - self.min_x as i64) >> BLOCK_SHIFT) as i32;
        let by = ((y as i64 - self.min_y as i64) >> BLOCK_SHIFT) as i32;
        let eps2 = (VERTEX_EPSILON as i64) * (VERTEX_EPSILON as i64);

        for dy in -1..=1 {
            for dx in -1..=1 {
                let nx = bx + dx;
                let ny = by + dy;
                if nx < 0 || ny < 0 || nx >= self.blocks_wide.max(1) || ny >= self.blocks_tall.max(1) {
                    continue;
                }
                let idx = (ny * self.blocks_wide.max(1) + nx) as usize;
                for &id in &self.cells[idx] {
                    let v = arena.get(id);
                    let ddx = (v.x as i64 - x as i64).abs();
                    let ddy = (v.y as i64 - y as i64).abs();
                    if ddx * ddx + ddy * ddy <= eps2 {
                        // Union toward the first representative: segs
                        // already linked to `id` keep the endpoint they
                        // were given, so a later query within epsilon
                        // never perturbs geometry that's already in use.
                        return id;
                    }
                }
            }
        }

        let id = arena.push(x, y);
        self.insert(id, x, y);
        id
    }
}

fn block_span(min: Fixed, max: Fixed) -> i32 {
    (((max as i64 - min as i64) >> BLOCK_SHIFT) + 1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_hits_same_vertex() {
        let mut arena = VertexArena::default();
        let mut map = VertexMap::new(0, 0, 10 * crate::fixed::FRACUNIT, 10 * crate::fixed::FRACUNIT);
        let v0 = map.select_close(&mut arena, 1000, 2000);
        let v1 = map.select_close(&mut arena, 1000, 2000);
        assert_eq!(v0, v1);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn close_match_merges_within_epsilon() {
        let mut arena = VertexArena::default();
        let mut map = VertexMap::new(0, 0, 10 * crate::fixed::FRACUNIT, 10 * crate::fixed::FRACUNIT);
        let v0 = map.select_close(&mut arena, 1000, 2000);
        let v1 = map.select_close(&mut arena, 1003, 2000);
        assert_eq!(v0, v1);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn transitive_chain_within_epsilon_merges() {
        // Every later query stays within epsilon of the first (unmoved)
        // representative, so each one unions into v0 in turn without ever
        // mutating v0's own coordinates.
        let mut arena = VertexArena::default();
        let mut map = VertexMap::new(0, 0, 10 * crate::fixed::FRACUNIT, 10 * crate::fixed::FRACUNIT);
        let v0 = map.select_close(&mut arena, 1000, 2000);
        let v1 = map.select_close(&mut arena, 1003, 2000);
        let v2 = map.select_close(&mut arena, 1006, 2000);
        assert_eq!(v0, v1);
        assert_eq!(v1, v2);
        assert_eq!(arena.get(v0).x, 1000, "the representative's own coordinates never move");
    }

    #[test]
    fn far_match_appends_new_vertex() {
        let mut arena = VertexArena::default();
        let mut map = VertexMap::new(0, 0, 10 * crate::fixed::FRACUNIT, 10 * crate::fixed::FRACUNIT);
        let v0 = map.select_close(&mut arena, 1000, 2000);
        let v1 = map.select_close(&mut arena, 1000, 50_000);
        assert_ne!(v0, v1);
        assert_eq!(arena.len(), 2);
    }
}
