//! Packed scene output.
//!
//! [`PackedScene`] is what survives finalization: every canonical mesh
//! concatenated into one shared vertex/index buffer pair, every instance
//! packed into parallel transform/attribute buffers, and one
//! [`DrawDescriptor`] per canonical shape for issuing instanced draws.

use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Vec3};
use crate::mesh::Vertex;

use super::registry::CanonicalRegistry;

/// Compact affine instance transform: the top three rows of a 4x4 matrix
/// whose last row is always `[0, 0, 0, 1]`.
///
/// Rows are stored row-major, so a GPU can fetch one transform as three
/// consecutive vec4 texels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub data: [f32; 12],
}

impl InstanceTransform {
    /// Size of one packed transform in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// The identity placement.
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0,
        ],
    };

    /// Pack the top three rows of an affine 4x4 matrix.
    pub fn from_matrix4(m: &Mat4) -> Self {
        let mut data = [0.0; 12];
        for row in 0..3 {
            for col in 0..4 {
                data[row * 4 + col] = m[(row, col)];
            }
        }
        Self { data }
    }

    /// Expand back to a 4x4 matrix with the implicit `[0, 0, 0, 1]` row.
    pub fn to_matrix4(&self) -> Mat4 {
        let d = &self.data;
        #[rustfmt::skip]
        let m = Mat4::new(
            d[0], d[1], d[2],  d[3],
            d[4], d[5], d[6],  d[7],
            d[8], d[9], d[10], d[11],
            0.0,  0.0,  0.0,   1.0,
        );
        m
    }

    /// Transform a position (w assumed 1).
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        let d = &self.data;
        Vec3::new(
            d[0] * p.x + d[1] * p.y + d[2] * p.z + d[3],
            d[4] * p.x + d[5] * p.y + d[6] * p.z + d[7],
            d[8] * p.x + d[9] * p.y + d[10] * p.z + d[11],
        )
    }
}

/// Where one canonical shape's geometry and instances live in the shared
/// buffers.
///
/// Consumed by issuing one instanced draw per descriptor: draw
/// `index_count` indices starting `index_byte_offset` bytes into the
/// shared index buffer, for `instance_count` instances whose transforms
/// and attributes start at element `instance_offset`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct DrawDescriptor {
    /// Number of indices to draw.
    pub index_count: u32,
    /// Byte offset of the first index in the shared index buffer.
    pub index_byte_offset: u32,
    /// Element offset of the first instance in the shared instance buffers.
    pub instance_offset: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
}

impl DrawDescriptor {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a descriptor with zero offsets.
    pub fn new(index_count: u32, instance_count: u32) -> Self {
        Self {
            index_count,
            index_byte_offset: 0,
            instance_offset: 0,
            instance_count,
        }
    }

    /// Set the byte offset of the first index.
    pub fn with_index_byte_offset(mut self, offset: u32) -> Self {
        self.index_byte_offset = offset;
        self
    }

    /// Set the element offset of the first instance.
    pub fn with_instance_offset(mut self, offset: u32) -> Self {
        self.instance_offset = offset;
        self
    }
}

/// Summary counters reported after packing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackedStats {
    /// Canonical shapes packed.
    pub unique_shapes: usize,
    /// Instances across all shapes.
    pub total_instances: usize,
    /// Triangles drawn when every descriptor is issued once (per-shape
    /// triangles weighted by instance count).
    pub drawn_triangles: usize,
    /// Bytes in the shared vertex buffer.
    pub vertex_data_bytes: usize,
    /// Bytes in the shared index buffer.
    pub index_data_bytes: usize,
    /// Bytes of per-instance transform and attribute data.
    pub instance_data_bytes: usize,
}

/// Render-ready buffers and draw metadata for a deduplicated scene.
///
/// Buffers are laid out for direct upload: interleaved position+normal
/// vertices, 32-bit indices, 12-float transforms and one attribute byte
/// per instance. The `*_bytes` accessors expose each buffer as a plain
/// byte slice.
#[derive(Debug, Clone, Default)]
pub struct PackedScene {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    transforms: Vec<InstanceTransform>,
    attributes: Vec<u8>,
    descriptors: Vec<DrawDescriptor>,
    stats: PackedStats,
}

impl PackedScene {
    /// Get the shared vertex buffer.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get the shared index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Get the shared instance-transform buffer.
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Get the shared instance-attribute buffer, parallel to the
    /// transform buffer.
    pub fn attributes(&self) -> &[u8] {
        &self.attributes
    }

    /// Get the draw descriptors, one per canonical shape in
    /// registration order.
    pub fn descriptors(&self) -> &[DrawDescriptor] {
        &self.descriptors
    }

    /// Get the packing summary.
    pub fn stats(&self) -> PackedStats {
        self.stats
    }

    /// Whether the scene contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Get vertex data as bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Get instance-transform data as bytes.
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// Get instance-attribute data as bytes.
    pub fn attribute_bytes(&self) -> &[u8] {
        &self.attributes
    }

    /// Get descriptor data as bytes, e.g. for an indirect-draw buffer.
    pub fn descriptor_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.descriptors)
    }
}

/// Walk the registry once, emitting packed buffers and descriptors.
///
/// Consumes the registry; each entry's mesh, statistics and record list
/// drop as soon as they are packed.
pub(crate) fn pack_registry(registry: CanonicalRegistry) -> PackedScene {
    let entries = registry.into_entries();

    let mut vertex_total = 0;
    let mut index_total = 0;
    let mut instance_total = 0;
    for entry in &entries {
        vertex_total += entry.mesh().vertex_count();
        index_total += entry.mesh().index_count();
        instance_total += entry.instance_count();
    }

    let mut scene = PackedScene {
        vertices: Vec::with_capacity(vertex_total),
        indices: Vec::with_capacity(index_total),
        transforms: Vec::with_capacity(instance_total),
        attributes: Vec::with_capacity(instance_total),
        descriptors: Vec::with_capacity(entries.len()),
        stats: PackedStats::default(),
    };

    for entry in entries {
        let (mesh, records) = entry.into_parts();

        scene.descriptors.push(
            DrawDescriptor::new(mesh.index_count() as u32, records.len() as u32)
                .with_index_byte_offset(
                    (scene.indices.len() * std::mem::size_of::<u32>()) as u32,
                )
                .with_instance_offset(scene.transforms.len() as u32),
        );

        let base_vertex = scene.vertices.len() as u32;
        scene.vertices.extend_from_slice(&mesh.vertices);
        scene.indices.extend(mesh.indices.iter().map(|i| base_vertex + i));

        scene.stats.drawn_triangles += mesh.triangle_count() * records.len();

        for record in records {
            scene.transforms.push(record.transform);
            scene.attributes.push(record.attribute);
        }
        // mesh and records drop here; nothing per-entry survives packing
    }

    scene.stats.unique_shapes = scene.descriptors.len();
    scene.stats.total_instances = scene.transforms.len();
    scene.stats.vertex_data_bytes = scene.vertices.len() * Vertex::SIZE;
    scene.stats.index_data_bytes = scene.indices.len() * std::mem::size_of::<u32>();
    scene.stats.instance_data_bytes =
        scene.transforms.len() * InstanceTransform::SIZE + scene.attributes.len();

    scene
}
