//! # Instancing Engine
//!
//! Geometric instance deduplication and GPU-ready packing for massive
//! plant models: congruent meshes collapse onto canonical shapes, each
//! occurrence kept as a compact transform plus attribute.

pub mod align;
pub mod engine;
pub mod error;
pub mod math;
pub mod mesh;
pub mod obb;

pub use engine::{AddOutcome, InstancerConfig, InstancingEngine, PackedScene};
pub use error::{InstancingError, InstancingResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
