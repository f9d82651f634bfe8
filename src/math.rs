//! Math type aliases and helper functions.
//!
//! Provides f32 mesh types (vertex data, input transforms) and f64
//! matching types used by the alignment estimator. Matching always runs
//! in f64 so residuals stay meaningful near the acceptance threshold.

pub use nalgebra;

// ===== Mesh math (always f32) =====

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

// ===== Matching math (always f64) =====

/// Matching scalar type.
pub type Real = f64;

/// 3D matching vector.
pub type Vector3 = nalgebra::Vector3<Real>;

/// 3x3 matching matrix.
pub type Matrix3 = nalgebra::Matrix3<Real>;

/// 4x4 matching matrix.
pub type Matrix4 = nalgebra::Matrix4<Real>;

// ===== Helper functions =====

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a 4x4 matrix rotating around the X axis.
pub fn mat4_from_rotation_x(angle: f32) -> Mat4 {
    nalgebra::Rotation3::from_axis_angle(&Vec3::x_axis(), angle).to_homogeneous()
}

/// Build a 4x4 matrix rotating around the Y axis.
pub fn mat4_from_rotation_y(angle: f32) -> Mat4 {
    nalgebra::Rotation3::from_axis_angle(&Vec3::y_axis(), angle).to_homogeneous()
}

/// Build a 4x4 matrix rotating around the Z axis.
pub fn mat4_from_rotation_z(angle: f32) -> Mat4 {
    nalgebra::Rotation3::from_axis_angle(&Vec3::z_axis(), angle).to_homogeneous()
}

/// Build a uniform-scale 4x4 matrix.
pub fn mat4_from_scale(scale: f32) -> Mat4 {
    Mat4::new_scaling(scale)
}

/// Transform a position by an affine 4x4 matrix (w assumed 1).
pub fn transform_point3(m: &Mat4, p: &Vec3) -> Vec3 {
    (m * p.push(1.0)).xyz()
}

/// Transform a position by an affine 4x4 matching matrix (w assumed 1).
pub fn transform_point(m: &Matrix4, p: &Vector3) -> Vector3 {
    (m * p.push(1.0)).xyz()
}

/// Matrix for transforming normals under `m`: inverse-transpose of the
/// linear part. Falls back to the linear part itself when `m` is singular.
pub fn normal_matrix(m: &Mat4) -> Mat3 {
    let linear = m.fixed_view::<3, 3>(0, 0).clone_owned();
    match linear.try_inverse() {
        Some(inverse) => inverse.transpose(),
        None => linear,
    }
}
