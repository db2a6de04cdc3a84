//! Seg/vertex arenas (C3): append-only stores with stable integer handles.
//!
//! Per §3's Lifecycles invariant, vertices and segs are append-only during
//! a build — splitting a seg creates new handles rather than mutating an
//! endpoint in place. This is the Rust idiom for the cyclic
//! pointer-graph-as-arena-of-handles pattern called out in Design Notes §9:
//! every "pointer" in the original (`next`, `nextforvert`, `partner`, ...)
//! becomes an `Option<SegId>`/`Option<VertexId>` index into a `Vec`.

use crate::fixed::{Bam, Fixed};
use crate::input::{RawLineDefId, RawSideDefId, SectorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegId(pub u32);

/// `V` from §3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: Fixed,
    pub y: Fixed,
    /// Head of the list of segs using this vertex as `v1`.
    pub segs_out: Option<SegId>,
    /// Head of the list of segs using this vertex as `v2`.
    pub segs_in: Option<SegId>,
    /// Stable index for output (I6: dense and deterministic).
    pub index: u32,
}

impl Vertex {
    pub fn new(x: Fixed, y: Fixed, index: u32) -> Self {
        Vertex {
            x,
            y,
            segs_out: None,
            segs_in: None,
            index,
        }
    }
}

/// `S` from §3. A `sidedef = None` marks a miniseg (no underlying
/// linedef side); `linedef = None` likewise. Both are always `None`
/// together for minisegs.
#[derive(Debug, Clone)]
pub struct Seg {
    pub v1: VertexId,
    pub v2: VertexId,
    pub linedef: Option<RawLineDefId>,
    pub sidedef: Option<RawSideDefId>,
    pub front_sector: Option<SectorId>,
    pub back_sector: Option<SectorId>,
    /// The opposite-facing seg across the same geometric segment.
    pub partner: Option<SegId>,
    /// Next seg in whatever scratch ring this seg currently belongs to
    /// (miniseg pairing walks, loop marking); not a working-set link —
    /// working sets are plain `Vec<SegId>` (see `bsp.rs`), which is the
    /// idiomatic Rust rendition of "linked list threaded through `next`"
    /// for a collection that's rebuilt wholesale every split anyway.
    pub next: Option<SegId>,
    pub next_for_v1: Option<SegId>,
    pub next_for_v2: Option<SegId>,
    /// 0 = splitting freely allowed; > 0 = member of a no-split sector
    /// loop (§4.4).
    pub loopnum: u32,
    pub angle: Bam,
    pub offset: Fixed,
    /// Index of this seg's plane bucket, assigned by the pre-pass in
    /// `chooser::group_seg_planes` (§3 "Plane bucket").
    pub planenum: Option<u32>,
    pub planefront: bool,
}

impl Seg {
    pub fn is_miniseg(&self) -> bool {
        self.linedef.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VertexArena {
    vertices: Vec<Vertex>,
}

impl VertexArena {
    pub fn push(&mut self, x: Fixed, y: Fixed) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex::new(x, y, id.0));
        id
    }

    pub fn get(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SegArena {
    segs: Vec<Seg>,
}

impl SegArena {
    pub fn push(&mut self, seg: Seg) -> SegId {
        let id = SegId(self.segs.len() as u32);
        self.segs.push(seg);
        id
    }

    pub fn get(&self, id: SegId) -> &Seg {
        &self.segs[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SegId) -> &mut Seg {
        &mut self.segs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegId, &Seg)> {
        self.segs
            .iter()
            .enumerate()
            .map(|(i, s)| (SegId(i as u32), s))
    }
}
