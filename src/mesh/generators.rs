//! Mesh generators for common plant-model primitives.
//!
//! These generators produce [`TriangleMesh`] values ready for engine
//! submission. Each call with the same parameters produces identical
//! vertex and index data, so repeated primitives collapse onto a single
//! canonical shape once the engine aligns their placements.

use std::f32::consts::PI;

use super::data::{TriangleMesh, Vertex};
use crate::math::Vec3;

/// Generate an axis-aligned box centered at the origin.
///
/// Each face carries its own four vertices so normals stay flat.
///
/// # Arguments
///
/// * `extents` - Full side lengths along X, Y and Z
pub fn generate_box(extents: Vec3) -> TriangleMesh {
    let h = extents * 0.5;

    let corners = [
        // Front face (+Z)
        (Vec3::new(-h.x, -h.y, h.z), Vec3::z()),
        (Vec3::new(h.x, -h.y, h.z), Vec3::z()),
        (Vec3::new(h.x, h.y, h.z), Vec3::z()),
        (Vec3::new(-h.x, h.y, h.z), Vec3::z()),
        // Back face (-Z)
        (Vec3::new(h.x, -h.y, -h.z), -Vec3::z()),
        (Vec3::new(-h.x, -h.y, -h.z), -Vec3::z()),
        (Vec3::new(-h.x, h.y, -h.z), -Vec3::z()),
        (Vec3::new(h.x, h.y, -h.z), -Vec3::z()),
        // Right face (+X)
        (Vec3::new(h.x, -h.y, h.z), Vec3::x()),
        (Vec3::new(h.x, -h.y, -h.z), Vec3::x()),
        (Vec3::new(h.x, h.y, -h.z), Vec3::x()),
        (Vec3::new(h.x, h.y, h.z), Vec3::x()),
        // Left face (-X)
        (Vec3::new(-h.x, -h.y, -h.z), -Vec3::x()),
        (Vec3::new(-h.x, -h.y, h.z), -Vec3::x()),
        (Vec3::new(-h.x, h.y, h.z), -Vec3::x()),
        (Vec3::new(-h.x, h.y, -h.z), -Vec3::x()),
        // Top face (+Y)
        (Vec3::new(-h.x, h.y, h.z), Vec3::y()),
        (Vec3::new(h.x, h.y, h.z), Vec3::y()),
        (Vec3::new(h.x, h.y, -h.z), Vec3::y()),
        (Vec3::new(-h.x, h.y, -h.z), Vec3::y()),
        // Bottom face (-Y)
        (Vec3::new(-h.x, -h.y, -h.z), -Vec3::y()),
        (Vec3::new(h.x, -h.y, -h.z), -Vec3::y()),
        (Vec3::new(h.x, -h.y, h.z), -Vec3::y()),
        (Vec3::new(-h.x, -h.y, h.z), -Vec3::y()),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (position, normal) in corners {
        vertices.push(Vertex::new(position, normal));
    }

    // Two triangles per face
    for face in 0..6 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    TriangleMesh::new(vertices, indices).with_label("box")
}

/// Generate a capped cylinder along the Y axis, centered at the origin.
///
/// # Arguments
///
/// * `radius` - Cylinder radius
/// * `height` - Full height along the Y axis
/// * `segments` - Number of segments around the circumference
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> TriangleMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let half_height = height / 2.0;
    let angle_step = 2.0 * PI / segments as f32;

    // Side vertices (bottom/top pairs)
    for i in 0..=segments {
        let angle = i as f32 * angle_step;
        let x = angle.cos() * radius;
        let z = angle.sin() * radius;
        let normal = Vec3::new(angle.cos(), 0.0, angle.sin());

        vertices.push(Vertex::new(Vec3::new(x, -half_height, z), normal));
        vertices.push(Vertex::new(Vec3::new(x, half_height, z), normal));
    }

    // Side indices
    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    // Cap centers
    let top_center = vertices.len() as u32;
    vertices.push(Vertex::new(Vec3::new(0.0, half_height, 0.0), Vec3::y()));
    let bottom_center = vertices.len() as u32;
    vertices.push(Vertex::new(Vec3::new(0.0, -half_height, 0.0), -Vec3::y()));

    // Cap rings
    for i in 0..=segments {
        let angle = i as f32 * angle_step;
        let x = angle.cos() * radius;
        let z = angle.sin() * radius;

        let top = vertices.len() as u32;
        vertices.push(Vertex::new(Vec3::new(x, half_height, z), Vec3::y()));
        let bottom = vertices.len() as u32;
        vertices.push(Vertex::new(Vec3::new(x, -half_height, z), -Vec3::y()));

        if i > 0 {
            indices.extend_from_slice(&[top_center, top - 2, top]);
            indices.extend_from_slice(&[bottom_center, bottom, bottom - 2]);
        }
    }

    TriangleMesh::new(vertices, indices).with_label("cylinder")
}

/// Generate a UV sphere centered at the origin.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (around the equator)
/// * `rings` - Number of latitudinal rings (from pole to pole)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> TriangleMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            vertices.push(Vertex::new(
                Vec3::new(x * radius, y * radius, z * radius),
                Vec3::new(x, y, z),
            ));
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    TriangleMesh::new(vertices, indices).with_label("sphere")
}

/// Generate a dish (spherical cap) with its rim on the XZ plane and the
/// apex on the positive Y axis.
///
/// The cap is cut from the sphere through the rim circle and the apex,
/// so `height` may exceed `radius` for bulbous heads.
///
/// # Arguments
///
/// * `radius` - Rim radius in the XZ plane
/// * `height` - Apex height above the rim plane (must be positive)
/// * `segments` - Number of segments around the rim
/// * `rings` - Number of rings from apex to rim
pub fn generate_dish(radius: f32, height: f32, segments: u32, rings: u32) -> TriangleMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let sphere_radius = (radius * radius + height * height) / (2.0 * height);
    let center_y = height - sphere_radius;
    let max_phi = ((sphere_radius - height) / sphere_radius).acos();

    // Rings from apex (phi = 0) down to the rim (phi = max_phi).
    for ring in 0..=rings {
        let phi = max_phi * ring as f32 / rings as f32;
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let ring_radius = sphere_radius * sin_phi;
        let y = center_y + sphere_radius * cos_phi;

        for segment in 0..=segments {
            let theta = segment as f32 * 2.0 * PI / segments as f32;

            vertices.push(Vertex::new(
                Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin()),
                Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin()),
            ));
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    TriangleMesh::new(vertices, indices).with_label("dish")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_box() {
        let mesh = generate_box(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate().is_ok());

        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 1.0);
    }

    #[test]
    fn test_generate_cylinder() {
        let mesh = generate_cylinder(1.0, 2.0, 16);
        // Sides: 2 * (16+1), caps: 2 + 2 * (16+1)
        assert_eq!(mesh.vertex_count(), 4 * 16 + 6);
        // Sides: 6 * 16, caps: 2 * 3 * 16
        assert_eq!(mesh.index_count(), 12 * 16);
        assert!(mesh.validate().is_ok());

        let max_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.0);
    }

    #[test]
    fn test_generate_sphere() {
        let mesh = generate_sphere(1.0, 8, 4);
        // (rings+1) * (segments+1) = 5 * 9 = 45 vertices
        assert_eq!(mesh.vertex_count(), 45);
        // rings * segments * 6 = 4 * 8 * 6 = 192 indices
        assert_eq!(mesh.index_count(), 192);
        assert!(mesh.validate().is_ok());

        for v in &mesh.vertices {
            assert!((v.position().norm() - 1.0).abs() < 1e-5);
            assert!((v.normal().norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_generate_dish() {
        let mesh = generate_dish(2.0, 1.0, 12, 4);
        assert_eq!(mesh.vertex_count(), 5 * 13);
        assert_eq!(mesh.index_count(), 4 * 12 * 6);
        assert!(mesh.validate().is_ok());

        let max_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        let min_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MAX, f32::min);
        // Apex sits at `height`, the rim on the XZ plane.
        assert!((max_y - 1.0).abs() < 1e-5);
        assert!(min_y.abs() < 1e-5);

        for v in &mesh.vertices {
            assert!((v.normal().norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_dish_rim_radius() {
        let mesh = generate_dish(3.0, 1.5, 8, 2);
        let rim_radius = mesh
            .vertices
            .iter()
            .filter(|v| v.position[1].abs() < 1e-5)
            .map(|v| (v.position[0].powi(2) + v.position[2].powi(2)).sqrt())
            .fold(f32::MIN, f32::max);
        assert!((rim_radius - 3.0).abs() < 1e-4);
    }
}
