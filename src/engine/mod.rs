//! Geometric instance deduplication engine.
//!
//! Plant models contain millions of primitives, most of them congruent
//! to one another up to a rigid pose. The engine ingests world-placed
//! triangle meshes one at a time, recognizes meshes congruent to an
//! already-registered canonical shape, and stores only a compact
//! transform plus attribute per occurrence. Finalization packs the
//! result into shared buffers sized for GPU-instanced drawing.
//!
//! # Matching
//!
//! A submitted mesh is shortlisted by deduplicated point count (the
//! fingerprint), then evaluated against each shortlisted candidate with
//! the least-squares alignment estimator. The candidate with the lowest
//! residual under [`InstancerConfig::match_tolerance`] absorbs the
//! instance; if none qualifies the mesh becomes a new canonical shape.
//! The default estimator is affine, so anything linear (rotation,
//! scale, shear) plus translation can be factored out; restricting
//! matches to rotation+uniform-scale is available via
//! [`InstancerConfig::allow_uniform_scale`].
//!
//! # Example
//!
//! ```
//! use instancing_engine::engine::InstancingEngine;
//! use instancing_engine::math::{mat4_from_translation, Mat4, Vec3};
//! use instancing_engine::mesh::generators::generate_box;
//!
//! let mut engine = InstancingEngine::new();
//! let mesh = generate_box(Vec3::new(1.0, 2.0, 0.5));
//!
//! engine.add(&mesh, &Mat4::identity(), 0).unwrap();
//! engine
//!     .add(&mesh, &mat4_from_translation(Vec3::new(4.0, 0.0, 0.0)), 1)
//!     .unwrap();
//! assert_eq!(engine.unique_shape_count(), 1);
//!
//! let scene = engine.finalize();
//! assert_eq!(scene.descriptors().len(), 1);
//! assert_eq!(scene.transforms().len(), 2);
//! ```

mod fingerprint;
mod pack;
mod registry;
#[cfg(test)]
mod tests;

pub use pack::{DrawDescriptor, InstanceTransform, PackedScene, PackedStats};
pub use registry::{CanonicalEntry, EntryHandle, InstanceRecord};

use crate::align::{estimate_affine, estimate_similarity, Alignment, PointSetStats};
use crate::error::{InstancingError, InstancingResult};
use crate::math::{normal_matrix, transform_point3, Mat4, Vector3};
use crate::mesh::{TriangleMesh, Vertex};

use fingerprint::FingerprintIndex;
use registry::CanonicalRegistry;

/// Configuration for the deduplication engine.
#[derive(Debug, Clone)]
pub struct InstancerConfig {
    /// Largest summed squared residual accepted as a congruence match.
    pub match_tolerance: f64,
    /// Coordinate tolerance for collapsing coincident vertex positions.
    pub position_epsilon: f64,
    /// Collapse coincident positions before fingerprinting. Raises the
    /// odds of matching meshes that differ only in vertex splitting.
    pub collapse_positions: bool,
    /// Match with the similarity estimator (rotation, translation and
    /// uniform scale) instead of the general affine one.
    pub allow_uniform_scale: bool,
}

impl Default for InstancerConfig {
    fn default() -> Self {
        Self {
            match_tolerance: 1e-3,
            position_epsilon: 1e-3,
            collapse_positions: true,
            allow_uniform_scale: false,
        }
    }
}

/// What happened to one submitted mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddOutcome {
    /// The mesh matched an existing canonical shape.
    Matched {
        /// The absorbing entry.
        entry: EntryHandle,
        /// Residual of the accepted alignment.
        residual: f64,
    },
    /// The mesh became a new canonical shape.
    Registered {
        /// The newly created entry.
        entry: EntryHandle,
    },
}

impl AddOutcome {
    /// Get the entry that received the instance.
    pub fn entry(&self) -> EntryHandle {
        match self {
            Self::Matched { entry, .. } | Self::Registered { entry } => *entry,
        }
    }

    /// Whether the mesh was absorbed by an existing shape.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Running ingestion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Canonical shapes registered so far.
    pub unique_shapes: usize,
    /// Successful add calls.
    pub total_instances: usize,
    /// Triangles across all instances; every add contributes its mesh's
    /// triangle count whether it matched or not.
    pub total_triangles: usize,
    /// Bytes of canonical mesh data retained for packing.
    pub mesh_data_bytes: usize,
    /// Canonical shapes whose alignment statistics came out singular.
    pub degenerate_shapes: usize,
}

/// The instance deduplication engine.
///
/// Owns all mutable matching state. The producer submits every
/// primitive through [`add`](Self::add) in stream order, then calls
/// [`finalize`](Self::finalize) exactly once; `finalize` takes the
/// engine by value, so a second call is a compile error rather than a
/// runtime hazard.
#[derive(Debug, Default)]
pub struct InstancingEngine {
    config: InstancerConfig,
    registry: CanonicalRegistry,
    index: FingerprintIndex,
    stats: EngineStats,
}

impl InstancingEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(InstancerConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(config: InstancerConfig) -> Self {
        Self {
            config,
            registry: CanonicalRegistry::default(),
            index: FingerprintIndex::default(),
            stats: EngineStats::default(),
        }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &InstancerConfig {
        &self.config
    }

    /// Get the running counters.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Get the number of canonical shapes registered so far.
    pub fn unique_shape_count(&self) -> usize {
        self.registry.len()
    }

    /// Get the number of instances accepted so far.
    pub fn instance_count(&self) -> usize {
        self.stats.total_instances
    }

    /// Get a canonical entry by handle.
    pub fn entry(&self, handle: EntryHandle) -> Option<&CanonicalEntry> {
        self.registry.get(handle)
    }

    /// Iterate over the canonical entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &CanonicalEntry> {
        self.registry.iter()
    }

    /// Submit one mesh occurrence.
    ///
    /// `transform` places the mesh in world space; `attribute` is the
    /// color/material id packed per instance, valid range `0..=255`.
    /// Returns whether the occurrence was absorbed by an existing
    /// canonical shape or registered a new one; a non-match is the
    /// expected outcome whenever a genuinely new shape appears, not an
    /// error.
    ///
    /// # Errors
    ///
    /// [`InstancingError::AttributeOutOfRange`] if `attribute > 255`,
    /// [`InstancingError::InvalidMesh`] if the mesh has no geometry or
    /// indexes past its vertex array. A rejected submission leaves the
    /// engine unchanged.
    pub fn add(
        &mut self,
        mesh: &TriangleMesh,
        transform: &Mat4,
        attribute: u32,
    ) -> InstancingResult<AddOutcome> {
        let attribute =
            u8::try_from(attribute).map_err(|_| InstancingError::AttributeOutOfRange(attribute))?;
        mesh.validate()?;

        let world_mesh = mesh_to_world(mesh, transform);
        let all_points = matching_points(&world_mesh);
        let points = if self.config.collapse_positions {
            fingerprint::collapse_positions(&all_points, self.config.position_epsilon)
        } else {
            all_points
        };
        let fingerprint = points.len() as u32;
        let dst = PointSetStats::new(points);

        let best = self.best_candidate(fingerprint, &dst);
        let outcome = match best {
            Some((handle, alignment)) => {
                let record = InstanceRecord {
                    transform: InstanceTransform::from_matrix4(&alignment.transform.cast::<f32>()),
                    attribute,
                };
                if let Some(entry) = self.registry.get_mut(handle) {
                    entry.push_record(record);
                }
                AddOutcome::Matched {
                    entry: handle,
                    residual: alignment.residual,
                }
            }
            None => {
                let entry = CanonicalEntry::new(world_mesh, fingerprint, dst, attribute);
                if entry.is_degenerate() {
                    self.stats.degenerate_shapes += 1;
                    log::warn!(
                        "canonical shape {} ({}) has singular alignment statistics; \
                         it will be drawn but never matched",
                        self.registry.len(),
                        entry.mesh().label().unwrap_or("unlabeled"),
                    );
                }
                self.stats.unique_shapes += 1;
                self.stats.mesh_data_bytes += entry.mesh().data_size();
                let handle = self.registry.insert(entry);
                self.index.insert(fingerprint, handle);
                log::debug!(
                    "registered canonical shape {} with fingerprint {fingerprint}; {} unique",
                    handle.index(),
                    self.registry.len(),
                );
                AddOutcome::Registered { entry: handle }
            }
        };

        self.stats.total_instances += 1;
        self.stats.total_triangles += mesh.triangle_count();
        Ok(outcome)
    }

    /// Pack the registry into render-ready buffers, consuming the engine.
    ///
    /// Every canonical mesh lands in the shared vertex/index buffers and
    /// every instance in the shared transform/attribute buffers, with
    /// one [`DrawDescriptor`] per shape. Per-entry working memory is
    /// released as entries are packed; only the returned scene survives.
    pub fn finalize(self) -> PackedScene {
        let scene = pack::pack_registry(self.registry);
        let stats = scene.stats();
        log::info!(
            "instancing finalized: {} unique shapes, {} instances, {} triangles, \
             {:.2} MiB instance data",
            stats.unique_shapes,
            stats.total_instances,
            stats.drawn_triangles,
            stats.instance_data_bytes as f64 / (1024.0 * 1024.0),
        );
        scene
    }

    /// Evaluate every candidate sharing `fingerprint` and keep the one
    /// with the lowest residual under the tolerance.
    fn best_candidate(
        &self,
        fingerprint: u32,
        dst: &PointSetStats,
    ) -> Option<(EntryHandle, Alignment)> {
        let mut best: Option<(EntryHandle, Alignment)> = None;
        for &handle in self.index.query(fingerprint) {
            let Some(entry) = self.registry.get(handle) else {
                continue;
            };
            if entry.is_degenerate() {
                continue;
            }
            let estimate = if self.config.allow_uniform_scale {
                estimate_similarity(entry.stats(), dst)
            } else {
                estimate_affine(entry.stats(), dst)
            };
            let Some(alignment) = estimate else {
                continue;
            };
            if alignment.residual >= self.config.match_tolerance {
                continue;
            }
            if best
                .as_ref()
                .map_or(true, |(_, b)| alignment.residual < b.residual)
            {
                best = Some((handle, alignment));
            }
        }
        best
    }
}

/// World-space copy of a submitted mesh: positions through `transform`,
/// normals through its inverse-transpose.
fn mesh_to_world(mesh: &TriangleMesh, transform: &Mat4) -> TriangleMesh {
    let normal_m = normal_matrix(transform);
    let vertices = mesh
        .vertices
        .iter()
        .map(|v| Vertex::new(transform_point3(transform, &v.position()), normal_m * v.normal()))
        .collect();
    TriangleMesh {
        vertices,
        indices: mesh.indices.clone(),
        label: mesh.label.clone(),
    }
}

/// Mesh positions lifted to the f64 matching types.
fn matching_points(mesh: &TriangleMesh) -> Vec<Vector3> {
    mesh.vertices
        .iter()
        .map(|v| v.position().cast::<f64>())
        .collect()
}
