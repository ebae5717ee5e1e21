//! Signed-distance-field shape geometry.
//!
//! Responsibilities:
//! - describe SDF shapes by their logical parameters (`shape`)
//! - regenerate one screen-space quad per shape every frame (`Shape::generate`)
//! - concatenate a container's shapes into one packed vertex/index pair (`container`)
//! - define the fixed 56-byte vertex record shared with the shader (`layout`)
//!
//! Every shape kind writes the same record layout, which is what allows
//! heterogeneous shapes to share one buffer and one draw call.

mod container;
mod geometry;
mod layout;
mod shape;
mod vertex;

pub use container::{SdfContainer, ShapeId};
pub use geometry::PackedGeometry;
pub use layout::{
    pack_vertices, pack_vertices_into, read_vertex, PackedVertex, MAX_INDEXED_VERTICES,
    OFFSET_COLOR, OFFSET_KIND, OFFSET_PARAMS_A, OFFSET_PARAMS_B, OFFSET_POSITION, OFFSET_UV,
    VERTEX_STRIDE, WORDS_PER_VERTEX,
};
pub use shape::{
    Boat, Circle, GenericShape, Shape, ShapeGeo, ShapeParams, BOAT_MARGIN, CIRCLE_MARGIN,
    GENERIC_MARGIN, QUAD_INDICES, QUAD_VERTEX_COUNT,
};
pub use vertex::{SdfVertex, ShapeKind};
