use crate::render::BatchError;

use super::layout::{pack_vertices_into, VERTEX_STRIDE};
use super::SdfVertex;

/// Packed attribute bytes plus `u16` indices for one batchable object.
///
/// This is what the batch renderer consumes. Indices are local: they address
/// this geometry's own vertices, `[0, vertex_count)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedGeometry {
    attributes: Vec<u8>,
    indices: Vec<u16>,
}

impl PackedGeometry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: &[SdfVertex], indices: &[u16]) -> Result<Self, BatchError> {
        let mut geometry = Self::new();
        geometry.set_buffers(vertices, indices)?;
        Ok(geometry)
    }

    /// Repacks both buffers. Existing allocations are reused.
    ///
    /// Every index must address one of `vertices`; otherwise nothing is
    /// written and the previous contents stay in place.
    pub fn set_buffers(&mut self, vertices: &[SdfVertex], indices: &[u16]) -> Result<(), BatchError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(BatchError::IndexOutOfRange {
                index,
                vertices: vertices.len(),
            });
        }

        pack_vertices_into(vertices, &mut self.attributes);
        self.indices.clear();
        self.indices.extend_from_slice(indices);
        Ok(())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.attributes.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.attributes.len() / VERTEX_STRIDE
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    #[inline]
    pub fn attributes(&self) -> &[u8] {
        &self.attributes
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_buffers() {
        let g = PackedGeometry::from_vertices(&[SdfVertex::default(); 3], &[0, 1, 2]).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.index_count(), 3);
        assert_eq!(g.attributes().len(), 3 * VERTEX_STRIDE);
        assert!(!g.is_empty());
    }

    #[test]
    fn set_buffers_replaces_previous_contents() {
        let mut g =
            PackedGeometry::from_vertices(&[SdfVertex::default(); 8], &[0, 1, 2, 5, 6, 7]).unwrap();
        g.set_buffers(&[SdfVertex::default(); 4], &[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.indices(), &[0, 1, 2, 0, 2, 3]);

        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.index_count(), 0);
    }

    // ── index validation ──────────────────────────────────────────────────

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = PackedGeometry::from_vertices(&[SdfVertex::default(); 3], &[0, 1, u16::MAX]);
        assert_eq!(
            err,
            Err(BatchError::IndexOutOfRange { index: u16::MAX, vertices: 3 })
        );

        let err = PackedGeometry::from_vertices(&[SdfVertex::default(); 3], &[0, 1, 3]);
        assert_eq!(err, Err(BatchError::IndexOutOfRange { index: 3, vertices: 3 }));
    }

    #[test]
    fn rejected_buffers_keep_previous_contents() {
        let mut g = PackedGeometry::from_vertices(&[SdfVertex::default(); 4], &[0, 1, 2, 0, 2, 3]).unwrap();
        assert!(g.set_buffers(&[SdfVertex::default(); 2], &[0, 1, 2]).is_err());
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn indices_without_vertices_are_rejected() {
        assert_eq!(
            PackedGeometry::from_vertices(&[], &[0]),
            Err(BatchError::IndexOutOfRange { index: 0, vertices: 0 })
        );
        assert!(PackedGeometry::from_vertices(&[], &[]).is_ok_and(|g| g.is_empty()));
    }
}
