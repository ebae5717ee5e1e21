use bytemuck::Zeroable;

/// Scratch buffers bucketed by power-of-two size class.
///
/// A request for `units` elements maps to class
/// `log2(next_pow2(ceil(units / 8)))`, whose buffer holds `8 << class` elements.
/// Each class is allocated the first time it is requested and kept until the
/// pool is dropped or cleared, so a frame that shrinks reuses an existing
/// buffer and a frame that grows allocates once per class it crosses into.
///
/// Buffers are overwritten, never appended to: callers only read back what they
/// wrote during the same acquisition.
#[derive(Debug)]
pub struct BufferPool<T> {
    classes: Vec<Option<Box<[T]>>>,
    allocations: usize,
}

impl<T> Default for BufferPool<T> {
    fn default() -> Self {
        Self { classes: Vec::new(), allocations: 0 }
    }
}

impl<T: Zeroable + Copy> BufferPool<T> {
    /// Elements per size-class step.
    pub const GRANULE: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(class, len)` for a request of `units` elements.
    #[inline]
    pub fn size_class(units: usize) -> (usize, usize) {
        let rounded = units.div_ceil(Self::GRANULE).next_power_of_two();
        (rounded.trailing_zeros() as usize, rounded * Self::GRANULE)
    }

    /// Returns the buffer for the size class covering `units` elements.
    ///
    /// The returned slice is the whole class buffer (at least `units` long).
    /// Its contents are whatever the previous user left behind.
    pub fn acquire(&mut self, units: usize) -> &mut [T] {
        let (class, len) = Self::size_class(units);
        if self.classes.len() <= class {
            self.classes.resize_with(class + 1, || None);
        }

        let allocations = &mut self.allocations;
        self.classes[class].get_or_insert_with(|| {
            *allocations += 1;
            log::trace!("buffer pool: allocating class {class} ({len} elements)");
            vec![T::zeroed(); len].into_boxed_slice()
        })
    }

    /// Number of buffers allocated over the pool's lifetime.
    #[inline]
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Length of the buffer held for `class`, if it has been allocated.
    #[inline]
    pub fn capacity_of(&self, class: usize) -> Option<usize> {
        self.classes.get(class)?.as_ref().map(|b| b.len())
    }

    /// Releases every buffer.
    pub fn clear(&mut self) {
        self.classes.clear();
    }
}
