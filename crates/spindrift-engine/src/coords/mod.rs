//! Coordinate and transform types shared by shape generators and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shapes are authored in container-local space and mapped to screen space with
//! an [`Affine2`] built from the container's [`Transform`] chain.

mod affine;
mod transform;
mod vec2;
mod viewport;

pub use affine::Affine2;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
