//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and a single window with its GPU context. The
//! window is released on suspend and reopened on resume.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
