use super::{init_logging, unit_box};
use crate::engine::{
    AddOutcome, EngineStats, EntryHandle, InstanceTransform, InstancerConfig, InstancingEngine,
};
use crate::error::InstancingError;
use crate::math::{mat4_from_translation, Mat4, Vec3};
use crate::mesh::generators::{generate_box, generate_cylinder};
use crate::mesh::TriangleMesh;

#[test]
fn test_default_config() {
    let config = InstancerConfig::default();
    assert_eq!(config.match_tolerance, 1e-3);
    assert_eq!(config.position_epsilon, 1e-3);
    assert!(config.collapse_positions);
    assert!(!config.allow_uniform_scale);
}

#[test]
fn test_new_engine_is_empty() {
    let engine = InstancingEngine::new();
    assert_eq!(engine.unique_shape_count(), 0);
    assert_eq!(engine.instance_count(), 0);
    assert_eq!(engine.stats(), EngineStats::default());
    assert_eq!(engine.entries().count(), 0);
}

#[test]
fn test_first_add_registers_with_identity_seed() {
    init_logging();
    let mut engine = InstancingEngine::new();
    let mesh = unit_box();

    let outcome = engine.add(&mesh, &Mat4::identity(), 5).unwrap();
    assert!(!outcome.is_matched());

    let entry = engine.entry(outcome.entry()).unwrap();
    assert_eq!(entry.instance_count(), 1);
    assert_eq!(entry.records()[0].transform, InstanceTransform::IDENTITY);
    assert_eq!(entry.records()[0].attribute, 5);
    // A box keeps 8 corner positions after the collapse.
    assert_eq!(entry.fingerprint(), 8);
}

#[test]
fn test_matched_outcome_reports_residual() {
    let mut engine = InstancingEngine::new();
    let mesh = generate_box(Vec3::new(2.0, 1.0, 1.0));

    engine.add(&mesh, &Mat4::identity(), 0).unwrap();
    let outcome = engine
        .add(&mesh, &mat4_from_translation(Vec3::new(3.0, 0.0, 0.0)), 0)
        .unwrap();

    match outcome {
        AddOutcome::Matched { residual, .. } => assert!(residual < 1e-3),
        AddOutcome::Registered { .. } => panic!("translated copy must match"),
    }
}

#[test]
fn test_attribute_out_of_range_leaves_engine_untouched() {
    let mut engine = InstancingEngine::new();
    let mesh = unit_box();
    engine.add(&mesh, &Mat4::identity(), 255).unwrap();

    let err = engine.add(&mesh, &Mat4::identity(), 256).unwrap_err();
    assert_eq!(err, InstancingError::AttributeOutOfRange(256));
    assert_eq!(engine.instance_count(), 1);
    assert_eq!(engine.unique_shape_count(), 1);
}

#[test]
fn test_invalid_mesh_rejected() {
    let mut engine = InstancingEngine::new();
    let err = engine
        .add(&TriangleMesh::default(), &Mat4::identity(), 0)
        .unwrap_err();
    assert!(matches!(err, InstancingError::InvalidMesh(_)));
    assert_eq!(engine.instance_count(), 0);
}

#[test]
fn test_collapse_disabled_uses_raw_vertex_count() {
    let mut engine = InstancingEngine::with_config(InstancerConfig {
        collapse_positions: false,
        ..InstancerConfig::default()
    });
    let mesh = unit_box();
    let outcome = engine.add(&mesh, &Mat4::identity(), 0).unwrap();

    // 24 split vertices, none collapsed.
    assert_eq!(engine.entry(outcome.entry()).unwrap().fingerprint(), 24);
}

#[test]
fn test_stats_track_ingestion() {
    let mut engine = InstancingEngine::new();
    let box_mesh = unit_box();
    let cylinder = generate_cylinder(0.5, 2.0, 8);

    engine.add(&box_mesh, &Mat4::identity(), 0).unwrap();
    engine
        .add(&box_mesh, &mat4_from_translation(Vec3::new(2.0, 0.0, 0.0)), 0)
        .unwrap();
    engine
        .add(&box_mesh, &mat4_from_translation(Vec3::new(4.0, 0.0, 0.0)), 0)
        .unwrap();
    engine.add(&cylinder, &Mat4::identity(), 0).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.unique_shapes, 2);
    assert_eq!(stats.total_instances, 4);
    assert_eq!(
        stats.total_triangles,
        3 * box_mesh.triangle_count() + cylinder.triangle_count()
    );
    // Only canonical meshes are retained, matched copies are not.
    assert_eq!(
        stats.mesh_data_bytes,
        box_mesh.data_size() + cylinder.data_size()
    );
    assert_eq!(stats.degenerate_shapes, 0);
}

#[test]
fn test_entries_iterate_in_registration_order() {
    let mut engine = InstancingEngine::new();
    engine.add(&unit_box(), &Mat4::identity(), 0).unwrap();
    engine
        .add(&generate_cylinder(0.5, 2.0, 8), &Mat4::identity(), 0)
        .unwrap();

    let labels: Vec<_> = engine.entries().map(|e| e.mesh().label()).collect();
    assert_eq!(labels, vec![Some("box"), Some("cylinder")]);
}

#[test]
fn test_outcome_accessors() {
    let matched = AddOutcome::Matched {
        entry: EntryHandle(4),
        residual: 1e-7,
    };
    assert!(matched.is_matched());
    assert_eq!(matched.entry(), EntryHandle(4));

    let registered = AddOutcome::Registered {
        entry: EntryHandle(2),
    };
    assert!(!registered.is_matched());
    assert_eq!(registered.entry(), EntryHandle(2));
}
