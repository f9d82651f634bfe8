//! Coincident-position collapse and the fingerprint index.
//!
//! The fingerprint of a mesh is the number of distinct vertex positions
//! it contains. Upstream tessellation splits vertices freely (per-face
//! normals, seam duplication), so positions are collapsed first; the
//! count that remains is a cheap necessary condition for congruence used
//! to shortlist match candidates. Equal counts say nothing about
//! topology, so every shortlisted candidate still goes through the
//! alignment residual check.

use std::collections::{HashMap, HashSet};

use crate::math::{Real, Vector3};

use super::registry::EntryHandle;

/// Quantize a position to the collapse grid.
///
/// Two positions whose coordinates each differ by at most the grid step
/// usually land in the same cell; points straddling a cell boundary may
/// survive as distinct, which only perturbs the (already heuristic)
/// fingerprint.
fn grid_key(p: &Vector3, inv_step: Real) -> (i64, i64, i64) {
    (
        (p.x * inv_step).round() as i64,
        (p.y * inv_step).round() as i64,
        (p.z * inv_step).round() as i64,
    )
}

/// Drop positions that coincide with an earlier one, keeping the
/// first-occurrence order of the survivors.
///
/// Matching correspondence depends on that order being deterministic:
/// two identical vertex streams must collapse to identically ordered
/// point lists.
pub(crate) fn collapse_positions(points: &[Vector3], epsilon: Real) -> Vec<Vector3> {
    let inv_step = 1.0 / epsilon;
    let mut seen = HashSet::with_capacity(points.len());
    let mut unique = Vec::with_capacity(points.len());
    for p in points {
        if seen.insert(grid_key(p, inv_step)) {
            unique.push(*p);
        }
    }
    unique
}

/// Multi-valued map from fingerprint to the canonical entries sharing it.
///
/// Buckets hold handles in no guaranteed order; the engine resolves ties
/// by lowest alignment residual, never by insertion order.
#[derive(Debug, Default)]
pub(crate) struct FingerprintIndex {
    buckets: HashMap<u32, Vec<EntryHandle>>,
}

impl FingerprintIndex {
    pub fn insert(&mut self, fingerprint: u32, handle: EntryHandle) {
        self.buckets.entry(fingerprint).or_default().push(handle);
    }

    /// Get the candidates sharing `fingerprint`.
    pub fn query(&self, fingerprint: u32) -> &[EntryHandle] {
        self.buckets.get(&fingerprint).map_or(&[], Vec::as_slice)
    }

    /// Get the number of distinct fingerprints.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Get the size of the largest bucket.
    ///
    /// A large bucket means many distinct shapes share a point count and
    /// every add pays one alignment test per member.
    pub fn largest_bucket(&self) -> usize {
        self.buckets.values().map(Vec::len).max().unwrap_or(0)
    }
}
