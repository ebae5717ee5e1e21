//! Spindrift engine crate.
//!
//! A batched SDF shape renderer on wgpu: shapes generate quads into packed
//! 56-byte vertex records, containers merge them into one geometry, and the
//! batch renderer concatenates containers into as few draw calls as possible.
//! The platform pieces (device, window runtime, frame clock, logging) host it.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod sdf;
pub mod render;
