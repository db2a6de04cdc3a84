//! External interfaces (§6): the shapes the level-loader collaborator
//! hands to the core, and the shapes the core hands back. Nothing here
//! knows about WAD lump layout — that's `crate::map`'s concern.

use crate::fixed::Fixed;

/// Opaque sector identifier. The core only ever needs equality on this
/// (§3: "opaque identifiers; equality is all the core needs").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorId(pub u32);

/// Index into `RawLevel::vertices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawVertexId(pub u32);

/// Index into `RawLevel::linedefs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawLineDefId(pub u32);

/// Index into `RawLevel::sidedefs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawSideDefId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawVertex {
    pub x: Fixed,
    pub y: Fixed,
}

bitflags::bitflags! {
    #[derive(Default)]
    pub struct LineFlags: u32 {
        const TWO_SIDED = 0x0004;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawLineDef {
    pub v1: RawVertexId,
    pub v2: RawVertexId,
    pub flags: LineFlags,
    /// Right (front) sidedef, or `None` for a one-sided line missing it
    /// (never valid in practice, but the loader's problem, not ours).
    pub right: Option<RawSideDefId>,
    /// Left (back) sidedef, or `None` for a one-sided line.
    pub left: Option<RawSideDefId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSideDef {
    pub sector: SectorId,
}

/// A polyobject spawn spot: `(polynum, x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolySpot {
    pub polynum: i32,
    pub x: Fixed,
    pub y: Fixed,
}

/// A polyobject anchor point, same shape as a spot but semantically the
/// "this is where the polyobject's origin sits" marker (§6).
pub type PolyAnchor = PolySpot;

/// Everything the core needs from the level-loader collaborator.
#[derive(Debug, Clone, Default)]
pub struct RawLevel {
    pub vertices: Vec<RawVertex>,
    pub linedefs: Vec<RawLineDef>,
    pub sidedefs: Vec<RawSideDef>,
    /// Only the count and identity of sectors matter to the core; no
    /// sector fields are read.
    pub sector_count: usize,
    pub polyspots: Vec<PolySpot>,
    pub anchors: Vec<PolyAnchor>,
}

impl RawLevel {
    pub fn is_degenerate(&self) -> bool {
        if self.linedefs.is_empty() {
            return true;
        }
        let first = self.vertices.first();
        match first {
            None => true,
            Some(v0) => self.vertices.iter().all(|v| v == v0),
        }
    }
}

/// Classic-format node record (§6): bbox clamped to 16-bit signed ints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputNode {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    /// `[front, back]`, each `[top, bottom, left, right]` clamped to i16.
    pub bbox: [[i16; 4]; 2],
    /// High bit set means the low bits index `subsectors`, not `nodes`.
    pub child: [u32; 2],
}

pub const NODE_CHILD_SUBSECTOR_BIT: u32 = 0x8000_0000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputVertex {
    pub x: Fixed,
    pub y: Fixed,
}

/// Classic seg record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicSeg {
    pub v1: u32,
    pub v2: u32,
    pub angle: crate::fixed::Bam,
    pub linedef: RawLineDefId,
    pub side: u8,
    pub offset: Fixed,
}

/// GL-nodes seg record. `linedef = None` marks a miniseg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlSeg {
    pub v1: u32,
    pub v2: u32,
    pub linedef: Option<RawLineDefId>,
    pub side: u8,
    /// Index of the partner seg in the same output list, or `None`.
    pub partner: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSubsector {
    pub first_seg: u32,
    pub num_segs: u32,
}

/// A fully shaped classic-nodes build result.
#[derive(Debug, Clone, Default)]
pub struct ClassicOutput {
    pub vertices: Vec<OutputVertex>,
    pub nodes: Vec<OutputNode>,
    pub segs: Vec<ClassicSeg>,
    pub subsectors: Vec<OutputSubsector>,
}

/// A fully shaped GL-nodes build result.
#[derive(Debug, Clone, Default)]
pub struct GlOutput {
    pub vertices: Vec<OutputVertex>,
    pub nodes: Vec<OutputNode>,
    pub segs: Vec<GlSeg>,
    pub subsectors: Vec<OutputSubsector>,
}
