use hati::geometry::{
    all_pairs_distances, double_areas, double_areas_intrinsic, edge_lengths, inradius,
    signed_tet_volumes, squared_edge_lengths,
};
use hati::Error;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::DMatrix;
use proptest::collection::vec;
use proptest::prelude::*;

fn triangle_3_4_5() -> (DMatrix<f64>, DMatrix<usize>) {
    let v = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 3.0, 0.0, 3.0, 4.0]);
    let f = DMatrix::from_row_slice(1, 3, &[0, 1, 2]);
    (v, f)
}

#[test]
fn triangle_edges_are_numbered_opposite_their_vertices() {
    let (v, f) = triangle_3_4_5();
    let l = edge_lengths(&v, &f).unwrap();

    // Edge 0 is [1,2], edge 1 is [2,0], edge 2 is [0,1]
    let expected = DMatrix::from_row_slice(1, 3, &[4.0, 5.0, 3.0]);
    assert_matrix_eq!(l, expected, comp = abs, tol = 1e-14);
}

#[test]
fn tet_edge_columns_follow_fixed_order() {
    let v = DMatrix::from_row_slice(
        4,
        3,
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ],
    );
    let f = DMatrix::from_row_slice(1, 4, &[0, 1, 2, 3]);

    let l2 = squared_edge_lengths(&v, &f).unwrap();

    // [3,0], [3,1], [3,2], [1,2], [2,0], [0,1]
    let expected = DMatrix::from_row_slice(1, 6, &[1.0, 2.0, 2.0, 2.0, 1.0, 1.0]);
    assert_matrix_eq!(l2, expected, comp = abs, tol = 1e-14);
}

#[test]
fn single_edge_simplices_have_one_length_column() {
    let v = DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 2.0, 3.0, 6.0]);
    let f = DMatrix::from_row_slice(1, 2, &[0, 1]);

    let l = edge_lengths(&v, &f).unwrap();
    assert_eq!(l.shape(), (1, 1));
    assert_scalar_eq!(l[(0, 0)], 7.0, comp = abs, tol = 1e-14);
}

#[test]
fn unsupported_simplex_size_is_rejected() {
    let v = DMatrix::from_element(6, 3, 0.0);
    let f = DMatrix::from_fn(1, 5, |_, c| c);
    assert!(matches!(
        squared_edge_lengths(&v, &f),
        Err(Error::UnsupportedSimplexSize { simplex_size: 5 })
    ));
}

#[test]
fn planar_areas_are_signed_by_orientation() {
    let v = DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    // First triangle counter-clockwise, second clockwise
    let f = DMatrix::from_row_slice(2, 3, &[0, 1, 2, 0, 2, 1]);

    let double_area = double_areas(&v, &f).unwrap();
    assert_scalar_eq!(double_area[0], 1.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(double_area[1], -1.0, comp = abs, tol = 1e-14);
}

#[test]
fn embedded_areas_agree_with_planar_magnitudes() {
    // The 3-4-5 triangle, lifted into 3D with a zero z-coordinate
    let v = DMatrix::from_row_slice(3, 3, &[0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 3.0, 4.0, 0.0]);
    let f = DMatrix::from_row_slice(1, 3, &[0, 1, 2]);

    let double_area = double_areas(&v, &f).unwrap();
    assert_scalar_eq!(double_area[0], 12.0, comp = abs, tol = 1e-12);
}

#[test]
fn intrinsic_areas_from_lengths() {
    let l = DMatrix::from_row_slice(2, 3, &[3.0, 4.0, 5.0, 1.0, 1.0, 1.0]);
    let double_area = double_areas_intrinsic(&l);

    assert_scalar_eq!(double_area[0], 12.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(double_area[1], 3.0f64.sqrt() / 2.0, comp = abs, tol = 1e-12);
}

#[test]
fn collinear_triangle_has_zero_area() {
    let l = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);
    let double_area = double_areas_intrinsic(&l);
    assert_scalar_eq!(double_area[0], 0.0, comp = abs, tol = 1e-12);
}

#[test]
fn needle_triangle_area_is_stable() {
    // Kahan's example shape: two long edges, one tiny edge
    let eps = 1e-9;
    let l = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, eps]);
    let double_area = double_areas_intrinsic(&l);

    // Half-base times height, with height ~ sqrt(1 - eps^2/4) ~ 1
    assert_scalar_eq!(double_area[0], eps, comp = abs, tol = 1e-18);
}

#[test]
fn tet_volume_sign_follows_orientation() {
    let v = DMatrix::from_row_slice(
        4,
        3,
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ],
    );
    let positive = DMatrix::from_row_slice(1, 4, &[0, 1, 2, 3]);
    let negative = DMatrix::from_row_slice(1, 4, &[1, 0, 2, 3]);

    let vol_pos = signed_tet_volumes(&v, &positive).unwrap();
    let vol_neg = signed_tet_volumes(&v, &negative).unwrap();

    assert_scalar_eq!(vol_pos[0], 1.0 / 6.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(vol_neg[0], -1.0 / 6.0, comp = abs, tol = 1e-14);
}

#[test]
fn tet_volumes_require_3d_vertices() {
    let v = DMatrix::from_element(4, 2, 0.0);
    let f = DMatrix::from_row_slice(1, 4, &[0, 1, 2, 3]);
    assert!(matches!(
        signed_tet_volumes(&v, &f),
        Err(Error::DimensionMismatch {
            expected: 3,
            actual: 2,
            ..
        })
    ));
}

#[test]
fn inradius_of_3_4_5_triangle_is_one() {
    let (v, f) = triangle_3_4_5();
    let r = inradius(&v, &f).unwrap();
    assert_scalar_eq!(r[0], 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn pairwise_distances_against_known_points() {
    let p = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 1.0, 0.0]);
    let q = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 0.0, 1.0, 4.0, 4.0]);

    let d = all_pairs_distances(&p, &q, false);
    let expected = DMatrix::from_row_slice(2, 3, &[0.0, 1.0, 32.0f64.sqrt(), 1.0, 2.0f64.sqrt(), 5.0]);
    assert_matrix_eq!(d, expected, comp = abs, tol = 1e-12);

    let d2 = all_pairs_distances(&p, &q, true);
    assert_matrix_eq!(d2, expected.map(|x| x * x), comp = abs, tol = 1e-12);
}

fn triangle_lengths() -> impl Strategy<Value = [f64; 3]> {
    // Points in general position, converted to edge lengths, so the triangle
    // inequality holds by construction
    vec(-5.0..5.0f64, 6).prop_map(|p| {
        let d = |i: usize, j: usize| {
            let (dx, dy) = (p[2 * i] - p[2 * j], p[2 * i + 1] - p[2 * j + 1]);
            (dx * dx + dy * dy).sqrt()
        };
        [d(1, 2), d(2, 0), d(0, 1)]
    })
}

proptest! {
    #[test]
    fn intrinsic_area_is_permutation_invariant(l in triangle_lengths()) {
        let base = double_areas_intrinsic(&DMatrix::from_row_slice(1, 3, &l))[0];
        let rotated = double_areas_intrinsic(&DMatrix::from_row_slice(1, 3, &[l[1], l[2], l[0]]))[0];
        let swapped = double_areas_intrinsic(&DMatrix::from_row_slice(1, 3, &[l[0], l[2], l[1]]))[0];

        prop_assert!((base - rotated).abs() <= 1e-12 * (1.0 + base.abs()));
        prop_assert!((base - swapped).abs() <= 1e-12 * (1.0 + base.abs()));
    }

    #[test]
    fn intrinsic_area_matches_shoelace(p in vec(-5.0..5.0f64, 6)) {
        let v = DMatrix::from_row_slice(3, 2, &p);
        let f = DMatrix::from_row_slice(1, 3, &[0, 1, 2]);

        let signed = double_areas(&v, &f).unwrap()[0];
        let l = edge_lengths(&v, &f).unwrap();
        let intrinsic = double_areas_intrinsic(&l)[0];

        prop_assert!((signed.abs() - intrinsic).abs() <= 1e-9 * (1.0 + signed.abs()));
    }
}
