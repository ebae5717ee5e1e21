use crate::sdf::MAX_INDEXED_VERTICES;

/// Errors raised while collecting or batching geometry.
///
/// All are input errors: the offending geometry is not drawn, and the
/// pools and any previously buffered geometry stay intact.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchError {
    #[error("geometry has {vertices} vertices but u16 indices address at most {limit}")]
    CapacityExceeded { vertices: usize, limit: usize },
    #[error("batch capacity of {vertices} vertices is outside 1..={max}", max = MAX_INDEXED_VERTICES)]
    InvalidCapacity { vertices: usize },
    #[error("index {index} is out of range for geometry with {vertices} vertices")]
    IndexOutOfRange { index: u16, vertices: usize },
}
