//! Contracts between the window runtime and the application.
//!
//! The runtime owns windows and GPU contexts; the application only sees a
//! per-frame [`FrameCtx`] and answers with an [`AppControl`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
