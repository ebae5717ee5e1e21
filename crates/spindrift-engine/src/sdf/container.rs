use crate::coords::{Affine2, Transform};
use crate::paint::PackedColor;
use crate::render::BatchError;

use super::layout::MAX_INDEXED_VERTICES;
use super::shape::QUAD_VERTEX_COUNT;
use super::{Circle, PackedGeometry, SdfVertex, Shape};

/// Stable handle to a shape inside one [`SdfContainer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u32);

/// Ordered set of SDF shapes sharing one transform.
///
/// Insertion order is paint order: later shapes draw over earlier ones. There is
/// no depth sorting.
///
/// Geometry is rebuilt from scratch by [`collect_geometry`](Self::collect_geometry)
/// every frame, since both the transform and the shapes may have changed. Only
/// the scratch allocations persist.
#[derive(Debug, Default)]
pub struct SdfContainer {
    transform: Transform,
    parent: Affine2,

    shapes: Vec<(ShapeId, Shape)>,
    next_id: u32,

    vertices: Vec<SdfVertex>,
    indices: Vec<u16>,
    geometry: PackedGeometry,
}

impl SdfContainer {
    pub fn new(x: f32, y: f32) -> Self {
        Self::with_transform(Transform::at(x, y))
    }

    pub fn with_transform(transform: Transform) -> Self {
        Self { transform, ..Self::default() }
    }

    // ── transform ──────────────────────────────────────────────────────────

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    #[inline]
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.transform.position.x = x;
        self.transform.position.y = y;
    }

    #[inline]
    pub fn set_rotation(&mut self, radians: f32) {
        self.transform.rotation = radians;
    }

    /// Sets the accumulated world matrix of the enclosing node.
    ///
    /// Nested containers (a sail on a hull) pass their parent's
    /// [`world_transform`](Self::world_transform) here each frame.
    #[inline]
    pub fn set_parent(&mut self, parent: Affine2) {
        self.parent = parent;
    }

    #[inline]
    pub fn world_transform(&self) -> Affine2 {
        self.parent.then(&self.transform.to_affine())
    }

    // ── shapes ─────────────────────────────────────────────────────────────

    /// Appends a shape on top of the existing ones.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.shapes.push((id, shape.into()));
        id
    }

    #[inline]
    pub fn add_circle(&mut self, x: f32, y: f32, radius: f32, color: PackedColor) -> ShapeId {
        self.add_shape(Circle::new(x, y, radius, color))
    }

    /// Removes a shape, preserving the order of the others.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let pos = self.shapes.iter().position(|(sid, _)| *sid == id)?;
        Some(self.shapes.remove(pos).1)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Shapes in paint order.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, s)| (*id, s))
    }

    /// Keeps only the shapes for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(ShapeId, &mut Shape) -> bool) {
        self.shapes.retain_mut(|(id, s)| keep(*id, s));
    }

    #[inline]
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    // ── geometry ───────────────────────────────────────────────────────────

    /// Regenerates every shape against the current world transform and packs
    /// the result.
    ///
    /// Indices are rewritten so they address this container's vertex array:
    /// shape `k` contributes `local + 4k`. Fails if the container holds more
    /// vertices than a `u16` index can reach.
    pub fn collect_geometry(&mut self) -> Result<&PackedGeometry, BatchError> {
        let vertex_count = self.shapes.len() * QUAD_VERTEX_COUNT;
        if vertex_count > MAX_INDEXED_VERTICES {
            return Err(BatchError::CapacityExceeded {
                vertices: vertex_count,
                limit: MAX_INDEXED_VERTICES,
            });
        }

        let world = self.world_transform();
        self.vertices.clear();
        self.indices.clear();

        for (_, shape) in &self.shapes {
            let geo = shape.generate(&world);
            // Bounded by the check above.
            let base = self.vertices.len() as u16;
            self.vertices.extend_from_slice(&geo.vertices);
            self.indices.extend(geo.indices.iter().map(|&i| base + i));
        }

        self.geometry.set_buffers(&self.vertices, &self.indices)?;
        Ok(&self.geometry)
    }

    /// Geometry from the last [`collect_geometry`](Self::collect_geometry) call.
    #[inline]
    pub fn geometry(&self) -> &PackedGeometry {
        &self.geometry
    }
}
