use crate::coords::Vec2;
use crate::paint::PackedColor;

/// Tag selecting the distance function the fragment shader evaluates.
///
/// Circles and boats have fixed tags. Generic shapes carry whatever tag the
/// producer assigns; the renderer never interprets it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShapeKind(pub u8);

impl ShapeKind {
    pub const CIRCLE: ShapeKind = ShapeKind(0);
    pub const BOAT: ShapeKind = ShapeKind(2);
}

/// One shape corner, before packing.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SdfVertex {
    /// Final screen-space position.
    pub position: Vec2,
    /// Coordinate the shader evaluates the distance field at.
    pub uv: Vec2,
    pub kind: ShapeKind,
    /// The three bytes packed after `kind`. Zero for circles and boats.
    pub extra: [u8; 3],
    pub color: PackedColor,
    pub params_a: [f32; 4],
    pub params_b: [f32; 4],
}
