//! Packed vertex layout shared with `sdf.wgsl`.
//!
//! Record layout (56 bytes, 14 four-byte slots, little-endian):
//!
//!  offset  0  position   [f32; 2]   loc 0
//!  offset  8  uv         [f32; 2]   loc 1
//!  offset 16  kind+extra [u8; 4]    loc 2  (.x = shape kind, .yzw = extra)
//!  offset 20  color      [u8; 4]    loc 3  (unorm, R G B A)
//!  offset 24  params_a   [f32; 4]   loc 4
//!  offset 40  params_b   [f32; 4]   loc 5

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::PackedColor;

use super::{SdfVertex, ShapeKind};

pub const VERTEX_STRIDE: usize = 56;
pub const WORDS_PER_VERTEX: usize = VERTEX_STRIDE / 4;

pub const OFFSET_POSITION: usize = 0;
pub const OFFSET_UV: usize = 8;
pub const OFFSET_KIND: usize = 16;
pub const OFFSET_COLOR: usize = 20;
pub const OFFSET_PARAMS_A: usize = 24;
pub const OFFSET_PARAMS_B: usize = 40;

/// Largest vertex count addressable by one `u16` index buffer.
pub const MAX_INDEXED_VERTICES: usize = u16::MAX as usize + 1;

const _: () = assert!(core::mem::size_of::<PackedVertex>() == VERTEX_STRIDE);
const _: () = assert!(
    cfg!(target_endian = "little"),
    "packed SDF vertices are uploaded as little-endian bytes"
);

/// GPU-visible vertex record.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub kind: [u8; 4],
    pub color: [u8; 4],
    pub params_a: [f32; 4],
    pub params_b: [f32; 4],
}

impl PackedVertex {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Uint8x4,   // kind + extra
        3 => Unorm8x4,  // color
        4 => Float32x4, // params_a
        5 => Float32x4  // params_b
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<&SdfVertex> for PackedVertex {
    #[inline]
    fn from(v: &SdfVertex) -> Self {
        let [e0, e1, e2] = v.extra;
        PackedVertex {
            position: v.position.to_array(),
            uv: v.uv.to_array(),
            kind: [v.kind.0, e0, e1, e2],
            color: v.color.to_bytes(),
            params_a: v.params_a,
            params_b: v.params_b,
        }
    }
}

impl From<PackedVertex> for SdfVertex {
    #[inline]
    fn from(p: PackedVertex) -> Self {
        SdfVertex {
            position: Vec2::from(p.position),
            uv: Vec2::from(p.uv),
            kind: ShapeKind(p.kind[0]),
            extra: [p.kind[1], p.kind[2], p.kind[3]],
            color: PackedColor(u32::from_be_bytes(p.color)),
            params_a: p.params_a,
            params_b: p.params_b,
        }
    }
}

/// Packs `vertices` into a fresh byte buffer of `vertices.len() * VERTEX_STRIDE` bytes.
pub fn pack_vertices(vertices: &[SdfVertex]) -> Vec<u8> {
    let mut out = Vec::new();
    pack_vertices_into(vertices, &mut out);
    out
}

/// Packs `vertices` into `out`, replacing its contents and keeping its capacity.
///
/// Each record depends only on its own vertex.
pub fn pack_vertices_into(vertices: &[SdfVertex], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(vertices.len() * VERTEX_STRIDE);
    for v in vertices {
        out.extend_from_slice(bytemuck::bytes_of(&PackedVertex::from(v)));
    }
}

/// Decodes the record starting at `bytes[0]`.
///
/// Returns `None` if fewer than `VERTEX_STRIDE` bytes are available.
pub fn read_vertex(bytes: &[u8]) -> Option<SdfVertex> {
    let record = bytes.get(..VERTEX_STRIDE)?;
    bytemuck::try_pod_read_unaligned::<PackedVertex>(record)
        .ok()
        .map(SdfVertex::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SdfVertex {
        SdfVertex {
            position: Vec2::new(-11.0, 11.5),
            uv: Vec2::new(0.25, -3.0),
            kind: ShapeKind(7),
            extra: [1, 2, 3],
            color: PackedColor(0x1122_3344),
            params_a: [1.0, f32::MIN_POSITIVE, -0.0, 1.0e30],
            params_b: [-4.0, 5.5, 6.25, f32::MAX],
        }
    }

    fn f32_at(bytes: &[u8], offset: usize) -> f32 {
        let mut b = [0u8; 4];
        b.copy_from_slice(&bytes[offset..offset + 4]);
        f32::from_le_bytes(b)
    }

    // ── stride / offsets ──────────────────────────────────────────────────

    #[test]
    fn packed_length_is_stride_per_vertex() {
        let verts = vec![sample(); 5];
        assert_eq!(pack_vertices(&verts).len(), 5 * VERTEX_STRIDE);
        assert_eq!(WORDS_PER_VERTEX, 14);
    }

    #[test]
    fn attribute_offsets_match_record_layout() {
        let layout = PackedVertex::layout();
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(
            offsets,
            vec![
                OFFSET_POSITION as u64,
                OFFSET_UV as u64,
                OFFSET_KIND as u64,
                OFFSET_COLOR as u64,
                OFFSET_PARAMS_A as u64,
                OFFSET_PARAMS_B as u64,
            ]
        );
        assert_eq!(layout.array_stride, VERTEX_STRIDE as u64);
    }

    #[test]
    fn fields_land_at_declared_offsets() {
        let v = sample();
        let bytes = pack_vertices(&[v]);

        assert_eq!(f32_at(&bytes, OFFSET_POSITION), -11.0);
        assert_eq!(f32_at(&bytes, OFFSET_POSITION + 4), 11.5);
        assert_eq!(f32_at(&bytes, OFFSET_UV), 0.25);
        assert_eq!(f32_at(&bytes, OFFSET_UV + 4), -3.0);
        assert_eq!(&bytes[OFFSET_KIND..OFFSET_KIND + 4], &[7, 1, 2, 3]);
        assert_eq!(&bytes[OFFSET_COLOR..OFFSET_COLOR + 4], &[0x11, 0x22, 0x33, 0x44]);
        for i in 0..4 {
            assert_eq!(
                f32_at(&bytes, OFFSET_PARAMS_A + 4 * i).to_bits(),
                v.params_a[i].to_bits()
            );
            assert_eq!(
                f32_at(&bytes, OFFSET_PARAMS_B + 4 * i).to_bits(),
                v.params_b[i].to_bits()
            );
        }
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn read_back_is_bit_exact() {
        let v = sample();
        let bytes = pack_vertices(&[v]);
        let back = read_vertex(&bytes).unwrap();
        assert_eq!(back.params_a.map(f32::to_bits), v.params_a.map(f32::to_bits));
        assert_eq!(back, v);
    }

    #[test]
    fn records_are_independent() {
        let a = sample();
        let mut b = sample();
        b.position = Vec2::new(99.0, 98.0);
        b.kind = ShapeKind::BOAT;

        let both = pack_vertices(&[a, b]);
        let alone = pack_vertices(&[b]);
        assert_eq!(&both[VERTEX_STRIDE..], &alone[..]);
        assert_eq!(read_vertex(&both[VERTEX_STRIDE..]), Some(b));
    }

    #[test]
    fn short_slice_is_rejected() {
        let bytes = pack_vertices(&[sample()]);
        assert!(read_vertex(&bytes[..VERTEX_STRIDE - 1]).is_none());
    }

    #[test]
    fn pack_into_reuses_buffer() {
        let mut out = pack_vertices(&[sample(); 8]);
        let cap = out.capacity();
        pack_vertices_into(&[sample(); 2], &mut out);
        assert_eq!(out.len(), 2 * VERTEX_STRIDE);
        assert_eq!(out.capacity(), cap);
    }
}
