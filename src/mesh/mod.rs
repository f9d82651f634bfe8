//! CPU-side triangle mesh types and generators.
//!
//! This module provides the geometry the engine consumes:
//!
//! - [`Vertex`] - Interleaved position + normal vertex (GPU-ready layout)
//! - [`TriangleMesh`] - Indexed triangle list in local space
//! - Generators for common plant-model primitives (box, cylinder, dish, sphere)

mod data;
pub mod generators;

pub use data::{TriangleMesh, Vertex};
