//! Geometry batching.
//!
//! A [`BatchRenderer`] lives for the whole program and owns the scratch buffer
//! pools. Each frame it hands out a [`BatchPass`] bound to one [`DrawBackend`]:
//!
//! ```ignore
//! let mut pass = batch.begin(&mut backend);
//! for container in &mut containers {
//!     pass.render_container(container)?;
//! }
//! let stats = pass.finish();
//! ```
//!
//! Geometry is buffered until the next object would push the batch past its
//! vertex capacity, or until the pass finishes. Each flush repacks everything
//! buffered into one attribute buffer and one index buffer and issues exactly
//! one draw call. Objects are always drawn in the order they were rendered.

mod backend;
mod config;
mod error;
mod pool;
mod renderer;

pub use backend::DrawBackend;
pub use config::{BatchConfig, DEFAULT_SPRITE_BATCH_SIZE, VERTICES_PER_SPRITE};
pub use error::BatchError;
pub use pool::BufferPool;
pub use renderer::{BatchPass, BatchRenderer, BatchState, FrameStats};
