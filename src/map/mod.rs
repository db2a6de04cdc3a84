// src/map/mod.rs
pub mod vertex;
pub mod linedef;
pub mod sidedef;
pub mod sector;
pub mod thing;

pub use vertex::Vertex;
pub use linedef::LineDef;
pub use sidedef::SideDef;
pub use sector::Sector;
pub use thing::Thing;

use crate::fixed::map_units_to_fixed;
use crate::input::{
    LineFlags, PolySpot, RawLevel, RawLineDef, RawSideDef, RawSideDefId, RawVertex, RawVertexId,
    SectorId,
};

/// Converts a loaded classic-format level (16-bit map units, `-1`
/// sentinels for absent sides) into the core's fixed-point, `Option`-
/// sentinel `RawLevel` (§6's input contract). Polyobject spots/anchors
/// aren't part of the classic lump set this teacher module reads, so
/// callers that need them populate `RawLevel::polyspots`/`anchors`
/// separately after this call.
pub fn to_raw_level(
    vertices: &[Vertex],
    linedefs: &[LineDef],
    sidedefs: &[SideDef],
    sectors: &[Sector],
) -> RawLevel {
    let raw_vertices = vertices
        .iter()
        .map(|v| RawVertex {
            x: map_units_to_fixed(v.x),
            y: map_units_to_fixed(v.y),
        })
        .collect();

    let raw_sidedefs = sidedefs
        .iter()
        .map(|sd| RawSideDef {
            sector: SectorId(sd.sector.max(0) as u32),
        })
        .collect();

    let raw_linedefs = linedefs
        .iter()
        .map(|ld| RawLineDef {
            v1: RawVertexId(ld.start as u32),
            v2: RawVertexId(ld.end as u32),
            flags: if ld.is_two_sided() {
                LineFlags::TWO_SIDED
            } else {
                LineFlags::empty()
            },
            right: side_id(ld.right),
            left: side_id(ld.left),
        })
        .collect();

    RawLevel {
        vertices: raw_vertices,
        linedefs: raw_linedefs,
        sidedefs: raw_sidedefs,
        sector_count: sectors.len(),
        polyspots: Vec::new(),
        anchors: Vec::new(),
    }
}

fn side_id(index: i32) -> Option<RawSideDefId> {
    if index < 0 {
        None
    } else {
        Some(RawSideDefId(index as u32))
    }
}

/// Wraps a polyobject spawn-spot thing into the core's `PolySpot` shape.
/// `polynum` and classification of which `Thing`s are spots/anchors is
/// the loader's concern (thing type numbers aren't modeled here); this
/// just does the unit conversion.
pub fn thing_to_polyspot(polynum: i32, thing: &Thing) -> PolySpot {
    PolySpot {
        polynum,
        x: map_units_to_fixed(thing.x),
        y: map_units_to_fixed(thing.y),
    }
}
