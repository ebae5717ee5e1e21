use super::{Affine2, Vec2};

/// Local transform of a shape container.
///
/// Matches the usual 2D scene-node convention: the `pivot` (in local space) is
/// placed at `position`, then rotation and scale happen around it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub pivot: Vec2,
    pub scale: Vec2,
    /// Radians, clockwise in +Y-down screen space.
    pub rotation: f32,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            position: Vec2::zero(),
            pivot: Vec2::zero(),
            scale: Vec2::splat(1.0),
            rotation: 0.0,
        }
    }

    #[inline]
    pub const fn at(x: f32, y: f32) -> Self {
        let mut t = Self::identity();
        t.position = Vec2::new(x, y);
        t
    }

    #[inline]
    pub fn with_pivot(mut self, x: f32, y: f32) -> Self {
        self.pivot = Vec2::new(x, y);
        self
    }

    #[inline]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    #[inline]
    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    /// Builds the local matrix for this transform.
    pub fn to_affine(&self) -> Affine2 {
        let (sin, cos) = self.rotation.sin_cos();
        let a = cos * self.scale.x;
        let b = sin * self.scale.x;
        let c = -sin * self.scale.y;
        let d = cos * self.scale.y;

        Affine2 {
            a,
            b,
            c,
            d,
            tx: self.position.x - (self.pivot.x * a + self.pivot.y * c),
            ty: self.position.y - (self.pivot.x * b + self.pivot.y * d),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_is_identity_matrix() {
        assert_eq!(Transform::identity().to_affine(), Affine2::IDENTITY);
    }

    #[test]
    fn position_translates() {
        let m = Transform::at(10.0, 20.0).to_affine();
        assert_eq!(m.apply(Vec2::new(1.0, 2.0)), Vec2::new(11.0, 22.0));
    }

    #[test]
    fn pivot_maps_to_position() {
        let m = Transform::at(50.0, 50.0)
            .with_pivot(24.0, 0.0)
            .with_rotation(1.3)
            .with_scale(2.0, 2.0)
            .to_affine();
        assert!(close(m.apply(Vec2::new(24.0, 0.0)), Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn quarter_turn_rotates_x_onto_y() {
        let m = Transform::identity()
            .with_rotation(core::f32::consts::FRAC_PI_2)
            .to_affine();
        assert!(close(m.apply(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn scale_is_applied_per_axis() {
        let m = Transform::identity().with_scale(2.0, 3.0).to_affine();
        assert_eq!(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(2.0, 3.0));
    }
}
