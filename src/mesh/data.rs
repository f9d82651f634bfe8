//! Triangle mesh data structures.

use bytemuck::{Pod, Zeroable};

use crate::error::InstancingError;
use crate::math::Vec3;

/// Interleaved mesh vertex: position followed by normal.
///
/// The layout matches the shared vertex buffer produced by packing, so
/// vertex data can be uploaded with a plain byte copy.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Size of one vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }

    /// Get the position as a vector.
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Get the normal as a vector.
    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// An indexed triangle list with per-vertex normals.
///
/// Meshes are submitted to the engine in local space together with a
/// placement transform. The engine never mutates a mesh after it has
/// been registered as canonical.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub label: Option<String>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            label: None,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex data as bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Total size of vertex and index data in bytes.
    pub fn data_size(&self) -> usize {
        self.vertices.len() * Vertex::SIZE + self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Check that the mesh describes a well-formed triangle list.
    pub fn validate(&self) -> Result<(), InstancingError> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(InstancingError::InvalidMesh(
                "mesh has no geometry".to_string(),
            ));
        }
        if self.indices.len() % 3 != 0 {
            return Err(InstancingError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let vertex_count = self.vertices.len() as u32;
        if let Some(&max) = self.indices.iter().max() {
            if max >= vertex_count {
                return Err(InstancingError::InvalidMesh(format!(
                    "index {max} out of bounds for {vertex_count} vertices"
                )));
            }
        }
        Ok(())
    }
}
