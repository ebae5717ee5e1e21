//! Small wgpu helpers shared by renderers.

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── uniform binding size ──────────────────────────────────────────────────

/// Minimum binding size for a uniform block of type `T`.
///
/// Returns `None` for zero-sized types, which wgpu treats as "unchecked".
pub(super) fn uniform_binding_size<T>() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

// ── buffer sizing ─────────────────────────────────────────────────────────

/// Rounds a byte length up to wgpu's copy alignment.
#[inline]
pub(super) fn align_to_copy(len: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    len.div_ceil(align) * align
}

/// Capacity for a GPU buffer that must hold `required` bytes: next power of two,
/// never below `min`.
#[inline]
pub(super) fn grown_capacity(required: u64, min: u64) -> u64 {
    align_to_copy(required).next_power_of_two().max(min)
}
