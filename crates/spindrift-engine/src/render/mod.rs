//! GPU rendering subsystem.
//!
//! Split in two layers:
//! - `batch`: CPU-side batching. Accumulates packed container geometry, repacks it
//!   into pooled scratch buffers and hands finished batches to a [`DrawBackend`].
//!   Has no GPU dependency, so it is tested against a capturing stub.
//! - `sdf`: the wgpu backend. Owns the pipeline and per-flush geometry buffers and
//!   turns each flush into one indexed draw.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod common;
mod ctx;

pub mod batch;
pub mod sdf;

pub use batch::{
    BatchConfig, BatchError, BatchPass, BatchRenderer, BatchState, BufferPool, DrawBackend,
    FrameStats,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use sdf::{SdfRenderer, WgpuBackend};
