use crate::coords::{Affine2, Vec2};
use crate::paint::PackedColor;

use super::{SdfVertex, ShapeKind};

/// Circle quads extend past the radius so the antialiased edge is never clipped.
pub const CIRCLE_MARGIN: f32 = 1.1;
/// Boat quads span this fraction of the full hull size from the center, per axis.
pub const BOAT_MARGIN: f32 = 0.55;
/// Generic quads span exactly their half-size.
pub const GENERIC_MARGIN: f32 = 0.5;

pub const QUAD_VERTEX_COUNT: usize = 4;
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Geometry of one shape: a quad with shape-local indices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeGeo {
    pub vertices: [SdfVertex; QUAD_VERTEX_COUNT],
    pub indices: [u16; 6],
}

/// Filled circle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: PackedColor,
}

impl Circle {
    #[inline]
    pub fn new(x: f32, y: f32, radius: f32, color: PackedColor) -> Self {
        Self { center: Vec2::new(x, y), radius, color }
    }
}

/// Hull-shaped box; the shader tapers the bow toward +x from the half extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Boat {
    pub center: Vec2,
    pub size: Vec2,
    pub color: PackedColor,
}

impl Boat {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: PackedColor) -> Self {
        Self { center: Vec2::new(x, y), size: Vec2::new(width, height), color }
    }
}

/// Per-vertex payload of a generic shape, opaque to the renderer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ShapeParams {
    pub extra: [u8; 3],
    pub params_a: [f32; 4],
    pub params_b: [f32; 4],
}

impl ShapeParams {
    #[inline]
    pub fn a(params_a: [f32; 4]) -> Self {
        Self { params_a, ..Self::default() }
    }

    #[inline]
    pub fn ab(params_a: [f32; 4], params_b: [f32; 4]) -> Self {
        Self { params_a, params_b, ..Self::default() }
    }
}

/// Axis-aligned quad with a caller-chosen kind tag and parameters.
///
/// Used for anything whose distance function lives entirely in the shader:
/// backgrounds, sails, wind gusts, markers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GenericShape {
    pub kind: ShapeKind,
    pub center: Vec2,
    pub size: Vec2,
    pub color: PackedColor,
    pub params: ShapeParams,
}

impl GenericShape {
    #[inline]
    pub fn new(kind: ShapeKind, x: f32, y: f32, width: f32, height: f32, color: PackedColor) -> Self {
        Self {
            kind,
            center: Vec2::new(x, y),
            size: Vec2::new(width, height),
            color,
            params: ShapeParams::default(),
        }
    }

    #[inline]
    pub fn with_params(mut self, params: ShapeParams) -> Self {
        self.params = params;
        self
    }
}

/// Any shape a container can hold.
///
/// Parameters are not validated: non-finite or negative sizes produce
/// degenerate geometry confined to this shape's own four vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Boat(Boat),
    Generic(GenericShape),
}

impl Shape {
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::CIRCLE,
            Shape::Boat(_) => ShapeKind::BOAT,
            Shape::Generic(g) => g.kind,
        }
    }

    #[inline]
    pub fn color(&self) -> PackedColor {
        match self {
            Shape::Circle(c) => c.color,
            Shape::Boat(b) => b.color,
            Shape::Generic(g) => g.color,
        }
    }

    pub fn set_color(&mut self, color: PackedColor) {
        match self {
            Shape::Circle(c) => c.color = color,
            Shape::Boat(b) => b.color = color,
            Shape::Generic(g) => g.color = color,
        }
    }

    /// Builds this shape's quad under the container's world matrix.
    pub fn generate(&self, world: &Affine2) -> ShapeGeo {
        let vertices = match self {
            Shape::Circle(c) => circle_quad(c, world),
            Shape::Boat(b) => boat_quad(b, world),
            Shape::Generic(g) => generic_quad(g, world),
        };
        ShapeGeo { vertices, indices: QUAD_INDICES }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Boat> for Shape {
    fn from(b: Boat) -> Self {
        Shape::Boat(b)
    }
}

impl From<GenericShape> for Shape {
    fn from(g: GenericShape) -> Self {
        Shape::Generic(g)
    }
}

/// Corners in quad order: top-left, top-right, bottom-right, bottom-left.
#[inline]
fn corners(center: Vec2, half: Vec2) -> [Vec2; QUAD_VERTEX_COUNT] {
    [
        Vec2::new(center.x - half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
    ]
}

fn circle_quad(c: &Circle, world: &Affine2) -> [SdfVertex; QUAD_VERTEX_COUNT] {
    let center = world.apply(c.center);
    let params_a = [center.x, center.y, c.radius * world.uniform_scale(), 0.0];

    // The circle is evaluated in screen space, so uv is the transformed corner.
    corners(c.center, Vec2::splat(c.radius * CIRCLE_MARGIN)).map(|p| {
        let p = world.apply(p);
        SdfVertex {
            position: p,
            uv: p,
            kind: ShapeKind::CIRCLE,
            color: c.color,
            params_a,
            ..SdfVertex::default()
        }
    })
}

fn boat_quad(b: &Boat, world: &Affine2) -> [SdfVertex; QUAD_VERTEX_COUNT] {
    let half = b.size * 0.5;
    let params_a = [b.center.x, b.center.y, half.x, half.y];

    corners(b.center, b.size * BOAT_MARGIN).map(|p| SdfVertex {
        position: world.apply(p),
        uv: p,
        kind: ShapeKind::BOAT,
        color: b.color,
        params_a,
        ..SdfVertex::default()
    })
}

fn generic_quad(g: &GenericShape, world: &Affine2) -> [SdfVertex; QUAD_VERTEX_COUNT] {
    corners(g.center, g.size * GENERIC_MARGIN).map(|p| SdfVertex {
        position: world.apply(p),
        uv: p,
        kind: g.kind,
        extra: g.params.extra,
        color: g.color,
        params_a: g.params.params_a,
        params_b: g.params.params_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Transform;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    // ── circle ────────────────────────────────────────────────────────────

    #[test]
    fn circle_identity_quad_has_margin() {
        let geo = Shape::from(Circle::new(0.0, 0.0, 10.0, PackedColor::WHITE))
            .generate(&Affine2::IDENTITY);

        let expected = [
            Vec2::new(-11.0, -11.0),
            Vec2::new(11.0, -11.0),
            Vec2::new(11.0, 11.0),
            Vec2::new(-11.0, 11.0),
        ];
        for (v, e) in geo.vertices.iter().zip(expected) {
            assert!(close(v.position, e), "{:?} != {:?}", v.position, e);
            assert_eq!(v.uv, v.position);
            assert_eq!(v.params_a, [0.0, 0.0, 10.0, 0.0]);
            assert_eq!(v.params_b, [0.0; 4]);
            assert_eq!(v.kind, ShapeKind::CIRCLE);
        }
        assert_eq!(geo.indices, [0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn circle_radius_follows_world_scale() {
        let world = Transform::at(100.0, 50.0)
            .with_rotation(0.9)
            .with_scale(3.0, 3.0)
            .to_affine();
        let geo = Shape::from(Circle::new(2.0, 0.0, 4.0, PackedColor::WHITE)).generate(&world);
        let v = geo.vertices[0];

        let center = world.apply(Vec2::new(2.0, 0.0));
        assert!(close(Vec2::new(v.params_a[0], v.params_a[1]), center));
        assert!((v.params_a[2] - 12.0).abs() < 1e-4);
    }

    // ── boat ──────────────────────────────────────────────────────────────

    #[test]
    fn boat_uv_stays_local() {
        let world = Transform::at(300.0, 200.0).with_rotation(0.5).to_affine();
        let geo = Shape::from(Boat::new(0.0, 0.0, 64.0, 32.0, PackedColor::WHITE)).generate(&world);

        let tl = geo.vertices[0];
        assert!(close(tl.uv, Vec2::new(-35.2, -17.6)));
        assert!(close(tl.position, world.apply(tl.uv)));
        assert_eq!(tl.params_a, [0.0, 0.0, 32.0, 16.0]);
        assert_eq!(tl.kind, ShapeKind::BOAT);
    }

    // ── generic ───────────────────────────────────────────────────────────

    #[test]
    fn generic_carries_caller_params() {
        let params = ShapeParams {
            extra: [9, 8, 7],
            params_a: [8.0, 0.0, -8.0, 0.0],
            params_b: [1.5, 0.0, 0.0, 0.0],
        };
        let shape = GenericShape::new(ShapeKind(6), 0.0, 0.0, 34.0, 34.0, PackedColor::WHITE)
            .with_params(params);
        let geo = Shape::from(shape).generate(&Affine2::translation(5.0, 5.0));

        for v in geo.vertices {
            assert_eq!(v.kind, ShapeKind(6));
            assert_eq!(v.extra, [9, 8, 7]);
            assert_eq!(v.params_a, params.params_a);
            assert_eq!(v.params_b, params.params_b);
        }
        assert_eq!(geo.vertices[2].uv, Vec2::new(17.0, 17.0));
        assert_eq!(geo.vertices[2].position, Vec2::new(22.0, 22.0));
    }

    #[test]
    fn degenerate_params_stay_within_the_quad() {
        let geo = Shape::from(Circle::new(0.0, 0.0, f32::NAN, PackedColor::WHITE))
            .generate(&Affine2::IDENTITY);
        assert_eq!(geo.vertices.len(), QUAD_VERTEX_COUNT);
        assert!(geo.vertices.iter().all(|v| v.position.x.is_nan()));
        assert_eq!(geo.indices, QUAD_INDICES);
    }

    #[test]
    fn set_color_updates_every_variant() {
        let mut shapes = [
            Shape::from(Circle::new(0.0, 0.0, 1.0, PackedColor::WHITE)),
            Shape::from(Boat::new(0.0, 0.0, 1.0, 1.0, PackedColor::WHITE)),
            Shape::from(GenericShape::new(ShapeKind(4), 0.0, 0.0, 1.0, 1.0, PackedColor::WHITE)),
        ];
        for s in &mut shapes {
            s.set_color(PackedColor::BLACK);
            assert_eq!(s.color(), PackedColor::BLACK);
        }
    }
}
