use crate::sdf::MAX_INDEXED_VERTICES;

use super::BatchError;

/// Base batch size, in quads.
pub const DEFAULT_SPRITE_BATCH_SIZE: usize = 4096;
/// Every shape is one quad.
pub const VERTICES_PER_SPRITE: usize = 4;

/// Batch renderer configuration.
///
/// Decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Quads per batch. The vertex capacity is four times this.
    pub sprite_batch_size: usize,

    /// Whether the backend tolerates re-uploading the same buffer several times
    /// within one frame.
    ///
    /// When `true` every flush reuses geometry slot 0. When `false` each flush in
    /// a frame gets its own slot, and the slot pool grows by one whenever a frame
    /// needs more flushes than any frame before it.
    pub can_upload_same_buffer: bool,
}

impl BatchConfig {
    /// Maximum vertices per flush.
    #[inline]
    pub fn max_vertices(&self) -> usize {
        self.sprite_batch_size.saturating_mul(VERTICES_PER_SPRITE)
    }

    /// Checks that the capacity is non-zero and addressable by `u16` indices.
    pub fn validate(&self) -> Result<usize, BatchError> {
        let vertices = self.max_vertices();
        if vertices == 0 || vertices > MAX_INDEXED_VERTICES {
            return Err(BatchError::InvalidCapacity { vertices });
        }
        Ok(vertices)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            sprite_batch_size: DEFAULT_SPRITE_BATCH_SIZE,
            can_upload_same_buffer: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_four_vertices_per_sprite() {
        let cfg = BatchConfig::default();
        assert_eq!(cfg.max_vertices(), 16384);
        assert_eq!(cfg.validate(), Ok(16384));
    }

    #[test]
    fn capacity_must_fit_u16_indices() {
        let ok = BatchConfig { sprite_batch_size: 16384, ..BatchConfig::default() };
        assert_eq!(ok.validate(), Ok(MAX_INDEXED_VERTICES));

        let too_big = BatchConfig { sprite_batch_size: 16385, ..BatchConfig::default() };
        assert_eq!(
            too_big.validate(),
            Err(BatchError::InvalidCapacity { vertices: 65540 })
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = BatchConfig { sprite_batch_size: 0, ..BatchConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
