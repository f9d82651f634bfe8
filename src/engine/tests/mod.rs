use crate::math::{transform_point3, Mat4, Vec3};
use crate::mesh::generators::generate_box;
use crate::mesh::TriangleMesh;

mod engine_test;

/// Install the test logger. Safe to call from every test.
fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .is_test(true)
        .try_init();
}

/// Unit cube used as the baseline shape across the engine tests.
fn unit_box() -> TriangleMesh {
    generate_box(Vec3::new(1.0, 1.0, 1.0))
}

/// World-space vertex positions of `mesh` placed by `transform`.
fn world_positions(mesh: &TriangleMesh, transform: &Mat4) -> Vec<Vec3> {
    mesh.vertices
        .iter()
        .map(|v| transform_point3(transform, &v.position()))
        .collect()
}
