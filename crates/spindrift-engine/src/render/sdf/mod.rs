use bytemuck::{Pod, Zeroable};

use crate::render::{BatchConfig, DrawBackend, RenderCtx, RenderTarget};
use crate::sdf::{PackedVertex, VERTEX_STRIDE};

use super::common::{grown_capacity, premul_alpha_blend, uniform_binding_size};

const MIN_VERTEX_BYTES: u64 = 64 * VERTEX_STRIDE as u64;
const MIN_INDEX_BYTES: u64 = 256;

/// wgpu resources for drawing packed SDF batches.
///
/// Holds the single shared pipeline plus one vertex/index buffer pair per
/// geometry slot. Slot buffers grow to the next power of two and never shrink.
///
/// `queue.write_buffer` is staged until submit, so two flushes writing the same
/// slot in one frame would both draw the last upload. Use
/// [`batch_config`](Self::batch_config), which cycles slots.
#[derive(Default)]
pub struct SdfRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,

    slots: Vec<GeometrySlot>,
    index_scratch: Vec<u16>,

    /// Antialiasing band width in pixels.
    aa_width: Option<f32>,
}

struct GeometrySlot {
    vbo: wgpu::Buffer,
    vbo_capacity: u64,
    ibo: wgpu::Buffer,
    ibo_capacity: u64,
}

impl SdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch configuration this backend requires.
    pub fn batch_config() -> BatchConfig {
        BatchConfig {
            can_upload_same_buffer: false,
            ..BatchConfig::default()
        }
    }

    pub fn set_aa_width(&mut self, px: f32) {
        self.aa_width = Some(px.max(0.0));
    }

    /// Number of geometry slots currently backed by GPU buffers.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Prepares the pipeline and uniforms for this frame and returns a backend
    /// recording into `target`.
    pub fn backend<'b, 't>(
        &'b mut self,
        ctx: &'b RenderCtx<'b>,
        target: &'b mut RenderTarget<'t>,
    ) -> WgpuBackend<'b, 't> {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.write_uniform(ctx);

        WgpuBackend { renderer: self, ctx, target }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("sdf renderer: building pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spindrift sdf shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sdf.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("spindrift sdf bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_binding_size::<SdfUniform>(),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("spindrift sdf pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("spindrift sdf pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PackedVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.uniform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spindrift sdf uniform ubo"),
            size: std::mem::size_of::<SdfUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spindrift sdf bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        self.uniform_ubo = Some(uniform_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        ctx.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&SdfUniform {
                viewport: ctx.viewport.to_uniform(),
                time: ctx.time,
                aa_width: self.aa_width.unwrap_or(1.0),
            }),
        );
    }
}

/// Grows `slots` to include `slot` and reallocates its buffers when the
/// upload does not fit.
fn ensure_slot_capacity(
    slots: &mut Vec<GeometrySlot>,
    ctx: &RenderCtx<'_>,
    slot: usize,
    vertex_bytes: u64,
    index_bytes: u64,
) {
    while slots.len() <= slot {
        let n = slots.len();
        slots.push(GeometrySlot {
            vbo: create_vbo(ctx, n, MIN_VERTEX_BYTES),
            vbo_capacity: MIN_VERTEX_BYTES,
            ibo: create_ibo(ctx, n, MIN_INDEX_BYTES),
            ibo_capacity: MIN_INDEX_BYTES,
        });
    }

    let s = &mut slots[slot];
    if vertex_bytes > s.vbo_capacity {
        s.vbo_capacity = grown_capacity(vertex_bytes, MIN_VERTEX_BYTES);
        s.vbo = create_vbo(ctx, slot, s.vbo_capacity);
        log::trace!("sdf renderer: slot {slot} vbo grown to {} bytes", s.vbo_capacity);
    }
    if index_bytes > s.ibo_capacity {
        s.ibo_capacity = grown_capacity(index_bytes, MIN_INDEX_BYTES);
        s.ibo = create_ibo(ctx, slot, s.ibo_capacity);
        log::trace!("sdf renderer: slot {slot} ibo grown to {} bytes", s.ibo_capacity);
    }
}

fn create_vbo(ctx: &RenderCtx<'_>, slot: usize, size: u64) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("spindrift sdf vbo #{slot}")),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_ibo(ctx: &RenderCtx<'_>, slot: usize, size: u64) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("spindrift sdf ibo #{slot}")),
        size,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Returns `indices` padded to a whole number of 4-byte words.
///
/// `write_buffer` needs 4-byte multiples, so an odd count gets a trailing zero
/// copied through `scratch`. The padding is never drawn.
fn padded_indices<'a>(indices: &'a [u16], scratch: &'a mut Vec<u16>) -> &'a [u16] {
    if indices.len() % 2 == 0 {
        return indices;
    }
    scratch.clear();
    scratch.extend_from_slice(indices);
    scratch.push(0);
    scratch
}

/// [`DrawBackend`] recording into one frame's command encoder.
pub struct WgpuBackend<'b, 't> {
    renderer: &'b mut SdfRenderer,
    ctx: &'b RenderCtx<'b>,
    target: &'b mut RenderTarget<'t>,
}

impl DrawBackend for WgpuBackend<'_, '_> {
    fn upload(&mut self, slot: usize, attributes: &[u8], indices: &[u16]) {
        let renderer = &mut *self.renderer;

        let index_data = padded_indices(indices, &mut renderer.index_scratch);

        let vertex_bytes = attributes.len() as u64;
        let index_bytes = std::mem::size_of_val(index_data) as u64;
        let ctx = self.ctx;

        // `index_data` may borrow `index_scratch`; only touch `slots` below.
        let slots = &mut renderer.slots;
        ensure_slot_capacity(slots, ctx, slot, vertex_bytes, index_bytes);

        let s = &slots[slot];
        ctx.queue.write_buffer(&s.vbo, 0, attributes);
        ctx.queue.write_buffer(&s.ibo, 0, bytemuck::cast_slice(index_data));
    }

    fn draw(&mut self, slot: usize, index_count: u32) {
        let Some(pipeline) = self.renderer.pipeline.as_ref() else { return };
        let Some(bind_group) = self.renderer.bind_group.as_ref() else { return };
        let Some(s) = self.renderer.slots.get(slot) else { return };

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("spindrift sdf pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, s.vbo.slice(..));
        rpass.set_index_buffer(s.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..index_count, 0, 0..1);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform block (16 bytes):
///
///  offset  0  viewport  [f32; 2]
///  offset  8  time      f32
///  offset 12  aa_width  f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SdfUniform {
    viewport: [f32; 2],
    time: f32,
    aa_width: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<SdfUniform>(), 16);
    }

    #[test]
    fn batch_config_cycles_slots() {
        let config = SdfRenderer::batch_config();
        assert!(!config.can_upload_same_buffer);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn min_buffers_are_copy_aligned() {
        assert_eq!(MIN_VERTEX_BYTES % wgpu::COPY_BUFFER_ALIGNMENT, 0);
        assert_eq!(MIN_INDEX_BYTES % wgpu::COPY_BUFFER_ALIGNMENT, 0);
    }

    #[test]
    fn even_index_counts_pass_through() {
        let mut scratch = vec![9, 9];
        let indices = [0u16, 1, 2, 0, 2, 3];
        let out = padded_indices(&indices, &mut scratch);
        assert_eq!(out, &indices);
        assert_eq!(out.as_ptr(), indices.as_ptr());
        assert_eq!(scratch, vec![9, 9]);
    }

    #[test]
    fn odd_index_counts_gain_one_zero() {
        let mut scratch = vec![7; 16];
        let out = padded_indices(&[4, 5, 6], &mut scratch);
        assert_eq!(out, &[4, 5, 6, 0]);
        assert_eq!(std::mem::size_of_val(out) as u64 % wgpu::COPY_BUFFER_ALIGNMENT, 0);
    }

    #[test]
    fn empty_indices_need_no_padding() {
        let mut scratch = Vec::new();
        assert!(padded_indices(&[], &mut scratch).is_empty());
    }

    #[test]
    fn aa_width_is_clamped() {
        let mut r = SdfRenderer::new();
        r.set_aa_width(-2.0);
        assert_eq!(r.aa_width, Some(0.0));
        assert_eq!(r.slot_count(), 0);
    }
}
