//! Least-squares point-set alignment.
//!
//! Estimates the affine transform mapping one point set onto another,
//! assuming the sets correspond index by index. No correspondence search
//! is performed: submitting the same geometry twice yields identically
//! ordered point sets, which is exactly the case the deduplication engine
//! cares about.
//!
//! Source-side moments are precomputed once per canonical shape in
//! [`PointSetStats`], so evaluating a candidate against many shapes costs
//! one pass over the destination points per candidate.

use crate::math::{transform_point, Matrix3, Matrix4, Real, Vector3};

/// Precomputed alignment statistics for one point set.
///
/// Holds the points themselves, their centroid, the centered copies and
/// the inverse of the second-moment matrix `sum(c * c^T)`. The inverse is
/// `None` when the matrix is singular, which happens for sets that do not
/// span all three dimensions (a single point, a line, a plane).
#[derive(Debug, Clone)]
pub struct PointSetStats {
    points: Vec<Vector3>,
    centroid: Vector3,
    centered: Vec<Vector3>,
    norm_sq: Real,
    inv_shape: Option<Matrix3>,
}

impl PointSetStats {
    pub fn new(points: Vec<Vector3>) -> Self {
        if points.is_empty() {
            return Self {
                points,
                centroid: Vector3::zeros(),
                centered: Vec::new(),
                norm_sq: 0.0,
                inv_shape: None,
            };
        }

        let centroid =
            points.iter().fold(Vector3::zeros(), |acc, p| acc + p) / points.len() as Real;
        let centered: Vec<Vector3> = points.iter().map(|p| p - centroid).collect();
        let norm_sq: Real = centered.iter().map(|c| c.norm_squared()).sum();

        let mut shape = Matrix3::zeros();
        for c in &centered {
            shape += c * c.transpose();
        }

        Self {
            points,
            centroid,
            centered,
            norm_sq,
            inv_shape: shape.try_inverse(),
        }
    }

    /// Get the points this set was built from.
    pub fn points(&self) -> &[Vector3] {
        &self.points
    }

    /// Get the centroid.
    pub fn centroid(&self) -> Vector3 {
        self.centroid
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the set is unusable as an alignment source.
    ///
    /// Degenerate sets can still be stored and instanced once, but no
    /// transform can be estimated from them.
    pub fn is_degenerate(&self) -> bool {
        self.inv_shape.is_none() || self.norm_sq <= Real::EPSILON
    }
}

/// Result of an alignment estimate.
#[derive(Debug, Clone, Copy)]
pub struct Alignment {
    /// Affine transform mapping source points onto destination points.
    pub transform: Matrix4,
    /// Sum of squared distances `|transform * src[i] - dst[i]|^2`.
    pub residual: Real,
}

/// Estimate the affine transform minimizing the squared distance between
/// `transform * src[i]` and `dst[i]`.
///
/// The linear part solves `A = Apq * Aqq^-1` over the centered points,
/// with the translation recovered from the centroids. Returns `None` when
/// the sets differ in length, the source is degenerate, or the solution
/// is not finite.
pub fn estimate_affine(src: &PointSetStats, dst: &PointSetStats) -> Option<Alignment> {
    if src.len() != dst.len() || src.is_empty() {
        return None;
    }
    let aqq = src.inv_shape?;

    let mut apq = Matrix3::zeros();
    for (d, s) in dst.centered.iter().zip(&src.centered) {
        apq += d * s.transpose();
    }

    let a = apq * aqq;
    let transform = Matrix4::new_translation(&dst.centroid)
        * a.to_homogeneous()
        * Matrix4::new_translation(&(-src.centroid));

    let residual = alignment_residual(&transform, &src.points, &dst.points);
    if !residual.is_finite() {
        return None;
    }
    Some(Alignment { transform, residual })
}

/// Estimate the similarity transform (rotation, translation and uniform
/// scale) mapping `src` onto `dst`.
///
/// Unlike [`estimate_affine`] this never produces shear or nonuniform
/// scale, so geometry differing by those keeps a large residual. The
/// rotation comes from the SVD of the cross-covariance with the usual
/// sign fix to exclude reflections.
pub fn estimate_similarity(src: &PointSetStats, dst: &PointSetStats) -> Option<Alignment> {
    if src.len() != dst.len() || src.is_empty() {
        return None;
    }
    let n = src.len() as Real;
    let sigma_sq = src.norm_sq / n;
    if sigma_sq <= Real::EPSILON {
        return None;
    }

    let mut cov = Matrix3::zeros();
    for (d, s) in dst.centered.iter().zip(&src.centered) {
        cov += d * s.transpose();
    }
    cov /= n;

    let svd = cov.try_svd(true, true, Real::EPSILON, 250)?;
    let u = svd.u?;
    let v_t = svd.v_t?;

    let mut sign = Vector3::new(1.0, 1.0, 1.0);
    if u.determinant() * v_t.determinant() < 0.0 {
        sign.z = -1.0;
    }

    let rotation = u * Matrix3::from_diagonal(&sign) * v_t;
    let scale = svd.singular_values.dot(&sign) / sigma_sq;
    let linear = rotation * scale;
    let translation = dst.centroid - linear * src.centroid;

    let mut transform = linear.to_homogeneous();
    transform.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);

    let residual = alignment_residual(&transform, &src.points, &dst.points);
    if !residual.is_finite() {
        return None;
    }
    Some(Alignment { transform, residual })
}

/// Sum of squared distances between transformed source points and
/// destination points.
pub fn alignment_residual(transform: &Matrix4, src: &[Vector3], dst: &[Vector3]) -> Real {
    src.iter()
        .zip(dst)
        .map(|(s, d)| (transform_point(transform, s) - d).norm_squared())
        .sum()
}
