//! Color types.
//!
//! Shapes carry a [`PackedColor`] (`0xRRGGBBAA`) which is written verbatim into
//! the vertex record as four `unorm8` channels. [`Color`] is the float form
//! used for surface clears.

mod color;

pub use color::{Color, PackedColor};
