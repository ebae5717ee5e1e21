use crate::sdf::{PackedGeometry, SdfContainer, MAX_INDEXED_VERTICES, WORDS_PER_VERTEX};

use super::{BatchConfig, BatchError, BufferPool, DrawBackend};

/// Where a pass is in its flush cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BatchState {
    /// Nothing buffered.
    Idle,
    /// At least one object is buffered.
    Accumulating,
    /// Packing and drawing; only observable from inside a flush.
    Flushing,
}

/// Counters for one pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Draw calls issued.
    pub flushes: u32,
    /// Flushes forced because the next object did not fit.
    pub capacity_flushes: u32,
    pub vertices: usize,
    pub indices: usize,
}

/// Long-lived batching state: scratch pools and geometry slot bookkeeping.
///
/// See the [module docs](super) for the per-frame flow.
#[derive(Debug)]
pub struct BatchRenderer {
    config: BatchConfig,
    capacity: usize,

    /// Packed attribute scratch, in 4-byte words.
    attribute_pool: BufferPool<u32>,
    index_pool: BufferPool<u16>,

    /// Flushes issued so far in the current frame.
    flush_id: usize,
    /// Geometry slots the backend has been asked to hold.
    geometry_slots: usize,

    last_stats: FrameStats,
}

impl BatchRenderer {
    pub fn new(config: BatchConfig) -> Result<Self, BatchError> {
        let capacity = config.validate()?;
        log::debug!(
            "sdf batch renderer: capacity {capacity} vertices, same-buffer uploads {}",
            if config.can_upload_same_buffer { "allowed" } else { "cycled" }
        );

        Ok(Self {
            config,
            capacity,
            attribute_pool: BufferPool::new(),
            index_pool: BufferPool::new(),
            flush_id: 0,
            geometry_slots: 1,
            last_stats: FrameStats::default(),
        })
    }

    /// Starts a frame's draw pass against `backend`.
    pub fn begin<'r, 'c, B: DrawBackend>(&'r mut self, backend: &'r mut B) -> BatchPass<'r, 'c, B> {
        self.flush_id = 0;
        BatchPass {
            renderer: self,
            backend,
            buffered: Vec::new(),
            vertex_count: 0,
            index_count: 0,
            state: BatchState::Idle,
            stats: FrameStats::default(),
            finished: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Maximum vertices per flush.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn geometry_slots(&self) -> usize {
        self.geometry_slots
    }

    #[inline]
    pub fn attribute_pool(&self) -> &BufferPool<u32> {
        &self.attribute_pool
    }

    #[inline]
    pub fn index_pool(&self) -> &BufferPool<u16> {
        &self.index_pool
    }

    /// Stats of the most recently finished pass.
    #[inline]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    fn next_slot(&mut self) -> usize {
        if self.config.can_upload_same_buffer {
            return 0;
        }

        let slot = self.flush_id;
        if self.geometry_slots <= slot {
            self.geometry_slots += 1;
            log::debug!("sdf batch: geometry slot pool grown to {}", self.geometry_slots);
        }
        self.flush_id += 1;
        slot
    }
}

/// One frame's batch.
///
/// Borrows every object it buffers until the next flush, so buffered geometry
/// cannot change underneath it. Finishing (or dropping) the pass flushes
/// whatever is left; batches never span frames.
pub struct BatchPass<'r, 'c, B: DrawBackend> {
    renderer: &'r mut BatchRenderer,
    backend: &'r mut B,

    buffered: Vec<&'c PackedGeometry>,
    vertex_count: usize,
    index_count: usize,

    state: BatchState,
    stats: FrameStats,
    finished: bool,
}

impl<'r, 'c, B: DrawBackend> BatchPass<'r, 'c, B> {
    /// Regenerates `container`'s geometry and buffers it.
    pub fn render_container(&mut self, container: &'c mut SdfContainer) -> Result<(), BatchError> {
        let geometry = container.collect_geometry()?;
        self.render(geometry)
    }

    /// Buffers `geometry`, flushing first if it would not fit in the current batch.
    ///
    /// Empty geometry is accepted and ignored. Geometry larger than the batch
    /// capacity but still addressable by `u16` indices is drawn in a batch of its
    /// own.
    pub fn render(&mut self, geometry: &'c PackedGeometry) -> Result<(), BatchError> {
        let vertices = geometry.vertex_count();
        if vertices == 0 {
            return Ok(());
        }
        if vertices > MAX_INDEXED_VERTICES {
            return Err(BatchError::CapacityExceeded {
                vertices,
                limit: MAX_INDEXED_VERTICES,
            });
        }

        let capacity = self.renderer.capacity;
        if self.vertex_count + vertices > capacity {
            if self.vertex_count > 0 {
                log::debug!(
                    "sdf batch: flushing {} vertices, {vertices} more would exceed {capacity}",
                    self.vertex_count
                );
                self.stats.capacity_flushes += 1;
                self.flush();
            }
            if vertices > capacity {
                log::warn!(
                    "sdf batch: geometry with {vertices} vertices exceeds batch capacity {capacity}; drawing it alone"
                );
            }
        }

        self.vertex_count += vertices;
        self.index_count += geometry.index_count();
        self.buffered.push(geometry);
        self.state = BatchState::Accumulating;
        Ok(())
    }

    /// Packs everything buffered, uploads it and issues one draw call.
    ///
    /// No-op when nothing is buffered.
    pub fn flush(&mut self) {
        if self.vertex_count == 0 {
            return;
        }
        self.state = BatchState::Flushing;

        let renderer = &mut *self.renderer;
        let slot = renderer.next_slot();

        let words = renderer
            .attribute_pool
            .acquire(self.vertex_count * WORDS_PER_VERTEX);
        let attributes: &mut [u8] = bytemuck::cast_slice_mut(words);
        let indices = renderer.index_pool.acquire(self.index_count);

        let mut attribute_offset = 0;
        let mut index_offset = 0;
        let mut packed_vertices = 0u32;

        for geometry in self.buffered.drain(..) {
            let src = geometry.attributes();
            attributes[attribute_offset..attribute_offset + src.len()].copy_from_slice(src);
            attribute_offset += src.len();

            // Second-level remap: indices were local to `geometry`, now they
            // address the shared buffer. `PackedGeometry` only holds indices
            // below its own vertex count and the batch holds at most 65536
            // vertices, so the sum stays in u16 range.
            let dst = &mut indices[index_offset..index_offset + geometry.index_count()];
            for (d, &i) in dst.iter_mut().zip(geometry.indices()) {
                let remapped = packed_vertices + i as u32;
                debug_assert!(remapped <= u16::MAX as u32);
                *d = remapped as u16;
            }
            index_offset += geometry.index_count();
            packed_vertices += geometry.vertex_count() as u32;
        }

        self.backend
            .upload(slot, &attributes[..attribute_offset], &indices[..index_offset]);
        self.backend.draw(slot, index_offset as u32);

        log::trace!(
            "sdf batch: flush {} -> slot {slot}: {} vertices, {index_offset} indices",
            self.stats.flushes,
            self.vertex_count
        );

        self.stats.flushes += 1;
        self.stats.vertices += self.vertex_count;
        self.stats.indices += self.index_count;

        self.vertex_count = 0;
        self.index_count = 0;
        self.state = BatchState::Idle;
    }

    /// Flushes the remainder and ends the pass.
    pub fn finish(mut self) -> FrameStats {
        self.end();
        self.stats
    }

    #[inline]
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Vertices buffered since the last flush.
    #[inline]
    pub fn buffered_vertices(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn end(&mut self) {
        if self.finished {
            return;
        }
        self.flush();
        self.renderer.last_stats = self.stats;
        self.finished = true;
    }
}

impl<B: DrawBackend> Drop for BatchPass<'_, '_, B> {
    fn drop(&mut self) {
        self.end();
    }
}
