//! Assembly of finite-element mass matrices for triangle and tetrahedral meshes.

use crate::error::{Error, Result};
use crate::geometry::{double_areas_intrinsic, edge_lengths, signed_tet_volumes};
use nalgebra::{convert, DMatrix, RealField};
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Discretization policy for the mass matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassMatrixType {
    /// Resolves to [`MassMatrixType::Voronoi`] for triangles and
    /// [`MassMatrixType::Barycentric`] for tetrahedra.
    Default,
    /// Lump the measure of each simplex equally onto its vertices
    /// (diagonal-only contributions).
    Barycentric,
    /// Lump the measure onto vertices according to their (hybrid) Voronoi
    /// region. Only available for triangle meshes.
    Voronoi,
    /// Keep the full local mass matrix, including off-diagonal coupling terms
    /// between the vertices of each simplex.
    Full,
}

/// Local entry emission order for the full tetrahedral mass matrix: the 12
/// off-diagonal pairs (both orientations) followed by the 4 diagonal pairs.
const FULL_TET_LOCAL_PAIRS: [(usize, usize); 16] = [
    (1, 0),
    (2, 0),
    (3, 0),
    (2, 1),
    (3, 1),
    (0, 1),
    (3, 2),
    (0, 2),
    (1, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (0, 0),
    (1, 1),
    (2, 2),
    (3, 3),
];

/// Assembles the mass matrix of the mesh `(v, f)` under the given policy.
///
/// The output is a sparse `n x n` matrix, where `n` is the number of vertex
/// rows in `v`. Triangle meshes (`f` with three columns) support all policies;
/// tetrahedral meshes (four columns) support barycentric and full lumping only.
/// Degenerate simplices (zero area or volume) contribute no mass, which may
/// leave the result singular; no attempt is made to detect this.
///
/// # Errors
///
/// - [`Error::UnsupportedSimplexSize`] if `f` has neither three nor four columns.
/// - [`Error::UnsupportedMassMatrixType`] when Voronoi lumping is requested for
///   a tetrahedral mesh.
/// - [`Error::IndexOutOfBounds`] if `f` refers to a vertex row outside `v`.
/// - [`Error::DimensionMismatch`] if tetrahedral vertices are not three-dimensional.
pub fn mass_matrix<T: RealField>(
    v: &DMatrix<T>,
    f: &DMatrix<usize>,
    mass_type: MassMatrixType,
) -> Result<CscMatrix<T>> {
    let n = v.nrows();

    match f.ncols() {
        3 => {
            check_indices(f, n)?;
            let l = edge_lengths(v, f)?;
            Ok(assemble_triangle_mass(&l, f, n, mass_type))
        }
        4 => {
            check_indices(f, n)?;
            let eff_type = match mass_type {
                MassMatrixType::Default => MassMatrixType::Barycentric,
                MassMatrixType::Voronoi => {
                    return Err(Error::UnsupportedMassMatrixType {
                        mass_type,
                        simplex_size: 4,
                    })
                }
                other => other,
            };

            let volumes = signed_tet_volumes(v, f)?.map(|vol| vol.abs());

            let quarter: T = convert(0.25);
            let tenth: T = convert(0.1);
            let twentieth: T = convert(0.05);

            let mut triplets = CooMatrix::new(n, n);
            match eff_type {
                MassMatrixType::Barycentric => {
                    for t in 0..f.nrows() {
                        let share = volumes[t].clone() * quarter.clone();
                        for c in 0..4 {
                            triplets.push(f[(t, c)], f[(t, c)], share.clone());
                        }
                    }
                }
                MassMatrixType::Full => {
                    for t in 0..f.nrows() {
                        let off_diagonal = volumes[t].clone() * twentieth.clone();
                        let diagonal = volumes[t].clone() * tenth.clone();
                        for (rank, (li, lj)) in FULL_TET_LOCAL_PAIRS.iter().enumerate() {
                            let value = if rank < 12 {
                                off_diagonal.clone()
                            } else {
                                diagonal.clone()
                            };
                            triplets.push(f[(t, *li)], f[(t, *lj)], value);
                        }
                    }
                }
                // Default was resolved and Voronoi rejected above
                MassMatrixType::Default | MassMatrixType::Voronoi => unreachable!(),
            }
            Ok(CscMatrix::from(&triplets))
        }
        simplex_size => Err(Error::UnsupportedSimplexSize { simplex_size }),
    }
}

/// Assembles the mass matrix of a triangle mesh from edge lengths alone.
///
/// `l` holds one row of edge lengths per triangle, with edges numbered like
/// their opposite vertices (the convention of
/// [`edge_lengths`](crate::geometry::edge_lengths)). `num_vertices` fixes the
/// dimension of the output; it must exceed every index in `f`.
/// [`MassMatrixType::Default`] resolves to Voronoi lumping.
///
/// The Voronoi policy implements the hybrid Voronoi area of Meyer et al.,
/// "Discrete differential-geometry operators for triangulated 2-manifolds":
/// for non-obtuse triangles each vertex receives the area of its circumcentric
/// quadrilateral; an obtuse triangle is split half to the obtuse corner and a
/// quarter to each of the other two.
///
/// # Errors
///
/// - [`Error::UnsupportedSimplexSize`] if `f` does not have three columns.
/// - [`Error::IndexOutOfBounds`] if `f` refers to a vertex at or beyond
///   `num_vertices`.
///
/// # Panics
///
/// Panics if `l` does not have three columns or disagrees with `f` in the
/// number of rows.
pub fn mass_matrix_intrinsic<T: RealField>(
    l: &DMatrix<T>,
    f: &DMatrix<usize>,
    num_vertices: usize,
    mass_type: MassMatrixType,
) -> Result<CscMatrix<T>> {
    if f.ncols() != 3 {
        return Err(Error::UnsupportedSimplexSize {
            simplex_size: f.ncols(),
        });
    }
    assert_eq!(l.ncols(), 3, "one edge length per triangle corner is required");
    assert_eq!(l.nrows(), f.nrows(), "edge lengths and triangles must correspond row by row");
    check_indices(f, num_vertices)?;
    Ok(assemble_triangle_mass(l, f, num_vertices, mass_type))
}

/// Shared triangle assembly. Callers have already validated `f` against
/// `num_vertices`.
fn assemble_triangle_mass<T: RealField>(
    l: &DMatrix<T>,
    f: &DMatrix<usize>,
    num_vertices: usize,
    mass_type: MassMatrixType,
) -> CscMatrix<T> {
    let eff_type = match mass_type {
        MassMatrixType::Default => MassMatrixType::Voronoi,
        other => other,
    };

    let m = f.nrows();
    let double_area = double_areas_intrinsic(l);

    let half: T = convert(0.5);
    let sixth: T = convert(1.0 / 6.0);
    let twelfth: T = convert(1.0 / 12.0);
    let twenty_fourth: T = convert(1.0 / 24.0);

    let mut triplets = CooMatrix::new(num_vertices, num_vertices);
    match eff_type {
        MassMatrixType::Barycentric => {
            for t in 0..m {
                let share = double_area[t].clone() * sixth.clone();
                for c in 0..3 {
                    triplets.push(f[(t, c)], f[(t, c)], share.clone());
                }
            }
        }
        MassMatrixType::Voronoi => {
            for t in 0..m {
                let quads = voronoi_corner_areas(
                    &double_area[t],
                    &l[(t, 0)],
                    &l[(t, 1)],
                    &l[(t, 2)],
                    &half,
                );
                for (c, quad) in quads.into_iter().enumerate() {
                    triplets.push(f[(t, c)], f[(t, c)], quad);
                }
            }
        }
        MassMatrixType::Full => {
            const OFF_DIAGONAL_PAIRS: [(usize, usize); 6] =
                [(0, 1), (1, 0), (1, 2), (2, 1), (2, 0), (0, 2)];
            for t in 0..m {
                let off_diagonal = double_area[t].clone() * twenty_fourth.clone();
                let diagonal = double_area[t].clone() * twelfth.clone();
                for (li, lj) in OFF_DIAGONAL_PAIRS {
                    triplets.push(f[(t, li)], f[(t, lj)], off_diagonal.clone());
                }
                for c in 0..3 {
                    triplets.push(f[(t, c)], f[(t, c)], diagonal.clone());
                }
            }
        }
        MassMatrixType::Default => unreachable!(),
    }

    CscMatrix::from(&triplets)
}

/// Hybrid Voronoi area shares of one triangle's three corners.
fn voronoi_corner_areas<T: RealField>(
    double_area: &T,
    l0: &T,
    l1: &T,
    l2: &T,
    half: &T,
) -> [T; 3] {
    let sq = |x: &T| x.clone() * x.clone();
    let two: T = convert(2.0);

    // Cosine at each corner from the law of cosines; the edge numbered c is
    // opposite corner c.
    let cos0 = (sq(l2) + sq(l1) - sq(l0)) / (l1.clone() * l2.clone() * two.clone());
    let cos1 = (sq(l0) + sq(l2) - sq(l1)) / (l2.clone() * l0.clone() * two.clone());
    let cos2 = (sq(l1) + sq(l0) - sq(l2)) / (l0.clone() * l1.clone() * two);

    // Barycentric coordinates of the circumcenter, normalized to sum to one.
    let bary0 = cos0.clone() * sq(l0);
    let bary1 = cos1.clone() * sq(l1);
    let bary2 = cos2.clone() * sq(l2);
    let bary_sum = bary0.clone() + bary1.clone() + bary2.clone();

    let area = double_area.clone() * half.clone();
    let partial0 = bary0 * area.clone() / bary_sum.clone();
    let partial1 = bary1 * area.clone() / bary_sum.clone();
    let partial2 = bary2 * area.clone() / bary_sum;

    // Circumcentric quadrilateral at each corner; only valid when the
    // circumcenter lies inside the triangle.
    let quads = [
        (partial1.clone() + partial2.clone()) * half.clone(),
        (partial2 + partial0.clone()) * half.clone(),
        (partial0 + partial1) * half.clone(),
    ];

    // Obtuse triangles get the fixed 1/2, 1/4, 1/4 split instead. At most one
    // corner can be obtuse.
    let obtuse_share = area * half.clone();
    let acute_share = obtuse_share.clone() * half.clone();
    if cos0 < T::zero() {
        [obtuse_share, acute_share.clone(), acute_share]
    } else if cos1 < T::zero() {
        [acute_share.clone(), obtuse_share, acute_share]
    } else if cos2 < T::zero() {
        [acute_share.clone(), acute_share, obtuse_share]
    } else {
        quads
    }
}

fn check_indices(f: &DMatrix<usize>, num_vertices: usize) -> Result<()> {
    for t in 0..f.nrows() {
        for c in 0..f.ncols() {
            let index = f[(t, c)];
            if index >= num_vertices {
                return Err(Error::IndexOutOfBounds {
                    quantity: "vertex",
                    index,
                    bound: num_vertices,
                });
            }
        }
    }
    Ok(())
}
