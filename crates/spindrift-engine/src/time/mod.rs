//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per presented frame. The
//! elapsed counter drives the SDF shader's `time` uniform.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
