use core::ops::Mul;

use super::Vec2;

/// 2x3 affine matrix mapping container-local points to screen space.
///
/// Column layout (same as a 2D canvas matrix):
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx, ty }
    }

    /// Maps a local point through this matrix.
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Returns `self * child`: `child` is applied first, then `self`.
    ///
    /// Used to accumulate a parent container's world matrix into a child's.
    #[inline]
    pub fn then(&self, child: &Affine2) -> Affine2 {
        Affine2 {
            a: self.a * child.a + self.c * child.b,
            b: self.b * child.a + self.d * child.b,
            c: self.a * child.c + self.c * child.d,
            d: self.b * child.c + self.d * child.d,
            tx: self.a * child.tx + self.c * child.ty + self.tx,
            ty: self.b * child.tx + self.d * child.ty + self.ty,
        }
    }

    /// Length of the transformed x basis vector.
    ///
    /// Exact for uniform scale under any rotation; for non-uniform scale this is
    /// the x-axis factor.
    #[inline]
    pub fn uniform_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
            && self.tx.is_finite()
            && self.ty.is_finite()
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Affine2 {
    type Output = Affine2;
    #[inline]
    fn mul(self, rhs: Affine2) -> Affine2 {
        self.then(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Vec2::new(3.5, -7.25);
        assert_eq!(Affine2::IDENTITY.apply(p), p);
    }

    #[test]
    fn then_applies_child_first() {
        let parent = Affine2::translation(100.0, 0.0);
        // 90° rotation: (1, 0) -> (0, 1)
        let child = Affine2::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        let world = parent.then(&child);
        assert!(close(world.apply(Vec2::new(1.0, 0.0)), Vec2::new(100.0, 1.0)));
        assert_eq!(parent * child, world);
    }

    #[test]
    fn uniform_scale_ignores_rotation() {
        let (s, c) = 0.7f32.sin_cos();
        let m = Affine2::new(c * 2.0, s * 2.0, -s * 2.0, c * 2.0, 5.0, 5.0);
        assert!((m.uniform_scale() - 2.0).abs() < 1e-5);
    }
}
