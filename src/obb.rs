//! PCA-fitted oriented bounding boxes.
//!
//! Fits a box to a point cloud by diagonalizing its covariance matrix and
//! measuring extents along the eigenvectors. Useful for culling volumes
//! and diagnostics around canonical shapes; the matching path itself does
//! not depend on it.

use crate::math::{Matrix3, Real, Vector3};

/// An oriented bounding box.
#[derive(Debug, Clone)]
pub struct Obb {
    /// Box center in world space.
    pub center: Vector3,
    /// Half extent along each box axis.
    pub half_extents: Vector3,
    /// Orthonormal box axes, one per column.
    pub basis: Matrix3,
}

impl Obb {
    /// Fit a box to the given points.
    ///
    /// Returns `None` for an empty set or when the eigendecomposition
    /// fails to converge. Degenerate clouds (a line, a plane) still yield
    /// a box, with near-zero extents along the missing dimensions.
    pub fn from_points(points: &[Vector3]) -> Option<Obb> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as Real;
        let centroid = points.iter().fold(Vector3::zeros(), |acc, p| acc + p) / n;

        let mut cov = Matrix3::zeros();
        for p in points {
            let c = p - centroid;
            cov += c * c.transpose();
        }
        cov /= n;

        let eigen = nalgebra::SymmetricEigen::try_new(cov, Real::EPSILON, 250)?;
        let basis = eigen.eigenvectors;

        let mut min = Vector3::repeat(Real::MAX);
        let mut max = Vector3::repeat(Real::MIN);
        for p in points {
            let local = basis.transpose() * (p - centroid);
            min = min.inf(&local);
            max = max.sup(&local);
        }

        let local_center = (min + max) * 0.5;
        Some(Obb {
            center: centroid + basis * local_center,
            half_extents: (max - min) * 0.5,
            basis,
        })
    }

    /// Get a box axis (column `i` of the basis).
    pub fn axis(&self, i: usize) -> Vector3 {
        self.basis.column(i).clone_owned()
    }

    /// Box volume.
    pub fn volume(&self) -> Real {
        8.0 * self.half_extents.x * self.half_extents.y * self.half_extents.z
    }

    /// Check whether a point lies inside the box, padded by `tolerance`.
    pub fn contains(&self, point: &Vector3, tolerance: Real) -> bool {
        let local = self.basis.transpose() * (point - self.center);
        local.x.abs() <= self.half_extents.x + tolerance
            && local.y.abs() <= self.half_extents.y + tolerance
            && local.z.abs() <= self.half_extents.z + tolerance
    }
}
