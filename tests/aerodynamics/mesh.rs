use approx::assert_abs_diff_eq;
use nyx::aerodynamics::local_inclination::{
    default_local_inclination_mach_points, LocalInclinationConfig, MachRegime,
};
use nyx::aerodynamics::{
    total_surface_area, vehicle_mesh, AeroError, HypersonicLocalInclinationAnalysis, MeshGrid,
    VehiclePart,
};
use nyx::linalg::{Vector3, Vector6};
use rstest::*;

/// Grid whose points encode their own (part, row, column) indices
fn indexed_grid(part: usize, rows: usize, cols: usize) -> MeshGrid {
    MeshGrid::from_fn(rows, cols, |r, c| Vector3::new(part as f64, r as f64, c as f64))
}

fn indexed_part(part: usize, rows: usize, cols: usize, area: f64) -> VehiclePart {
    let normals = MeshGrid::from_fn(rows, cols, |r, c| {
        -Vector3::new(part as f64, r as f64, c as f64)
    });
    VehiclePart::new(indexed_grid(part, rows, cols), normals, area)
}

#[fixture]
fn two_patches() -> Vec<VehiclePart> {
    let _ = pretty_env_logger::try_init();
    vec![indexed_part(0, 3, 3, 2.5), indexed_part(1, 2, 2, -1.5)]
}

#[rstest]
fn mesh_of_two_patches(two_patches: Vec<VehiclePart>) {
    let (points, normals) = vehicle_mesh(&two_patches).unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(normals.len(), 5);

    let expected = [
        (0.0, 0.0, 0.0),
        (0.0, 0.0, 1.0),
        (0.0, 1.0, 0.0),
        (0.0, 1.0, 1.0),
        (1.0, 0.0, 0.0),
    ];
    for ((point, normal), (part, row, col)) in points.iter().zip(normals.iter()).zip(expected) {
        assert_eq!(*point, Vector3::new(part, row, col));
        assert_eq!(*normal, -*point);
    }
}

#[rstest]
#[case(1, 5, 0)]
#[case(5, 1, 0)]
#[case(0, 0, 0)]
#[case(2, 2, 1)]
#[case(4, 7, 18)]
fn flattened_length(#[case] rows: usize, #[case] cols: usize, #[case] expected: usize) {
    let parts = vec![indexed_part(0, rows, cols, 1.0)];
    let (points, normals) = vehicle_mesh(&parts).unwrap();
    assert_eq!(points.len(), expected);
    assert_eq!(normals.len(), expected);
}

#[rstest]
fn total_area_of_parts(two_patches: Vec<VehiclePart>) {
    assert_abs_diff_eq!(total_surface_area(&two_patches), 4.0, epsilon = 1e-15);

    let mut reversed = two_patches.clone();
    reversed.reverse();
    assert_eq!(total_surface_area(&reversed), total_surface_area(&two_patches));

    let empty: Vec<VehiclePart> = Vec::new();
    assert_eq!(total_surface_area(&empty), 0.0);
}

#[rstest]
fn repeated_calls_agree(two_patches: Vec<VehiclePart>) {
    assert_eq!(total_surface_area(&two_patches), total_surface_area(&two_patches));
    assert_eq!(
        vehicle_mesh(&two_patches).unwrap(),
        vehicle_mesh(&two_patches).unwrap()
    );
}

#[test]
fn mismatched_normals() {
    let parts = vec![VehiclePart::new(
        indexed_grid(0, 4, 4),
        indexed_grid(0, 2, 2),
        1.0,
    )];
    assert_eq!(
        vehicle_mesh(&parts),
        Err(AeroError::MeshShapeMismatch {
            part: 0,
            point_rows: 4,
            point_cols: 4,
            normal_rows: 2,
            normal_cols: 2
        })
    );
}

#[test]
fn analysis_from_flat_plate() {
    // Unit square plate split in 2x2 panels
    let plate = MeshGrid::from_fn(3, 3, |r, c| Vector3::new(0.0, r as f64 * 0.5, c as f64 * 0.5));

    let mach = default_local_inclination_mach_points(MachRegime::High);
    let alpha = vec![0.0, 0.1];
    let beta = vec![0.0];
    let nodes = mach.len() * alpha.len() * beta.len();

    let config = LocalInclinationConfig::builder()
        .independent_variable_points(vec![mach, alpha, beta])
        .invert_orders(vec![false])
        .selected_methods(vec![vec![1, 1]])
        .reference_area(1.0)
        .reference_length(1.0)
        .moment_reference_point(Vector3::zeros())
        .build();

    let analysis = HypersonicLocalInclinationAnalysis::from_mesh_points(
        config,
        vec![plate],
        vec![Vector6::new(1.0, 0.0, 0.1, 0.0, 0.0, 0.0); nodes],
    )
    .unwrap();

    assert_abs_diff_eq!(total_surface_area(&analysis), 1.0, epsilon = 1e-12);
    let (points, normals) = vehicle_mesh(&analysis).unwrap();
    assert_eq!(points.len(), 4);
    for normal in normals {
        assert_abs_diff_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normal.x.abs(), 1.0, epsilon = 1e-12);
    }
}
