/// Destination for finished batches.
///
/// The batch renderer decides *what* to upload and *which* geometry slot to use;
/// the backend owns the GPU-side buffers behind each slot.
///
/// Calls always come in pairs: `upload(slot, ..)` followed by `draw(slot, ..)`
/// for the same slot.
pub trait DrawBackend {
    /// Replaces the contents of geometry slot `slot`.
    ///
    /// `attributes` is a whole number of packed vertex records; `indices`
    /// address those records.
    fn upload(&mut self, slot: usize, attributes: &[u8], indices: &[u16]);

    /// Draws the first `index_count` indices of slot `slot` as a triangle list.
    fn draw(&mut self, slot: usize, index_count: u32);
}
