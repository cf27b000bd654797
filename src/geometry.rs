//! Per-simplex geometric measures: edge lengths, areas, volumes.

use crate::error::{Error, Result};
use nalgebra::{convert, DMatrix, DVector, RealField, Vector3};

/// Computes squared edge lengths for each simplex of the mesh `(v, f)`.
///
/// The output has one row per simplex. Column conventions follow the simplex size:
///
/// - `k = 2` (edges): one column, the squared length of the edge.
/// - `k = 3` (triangles): three columns, each edge numbered like its opposite
///   vertex, i.e. `[1,2]`, `[2,0]`, `[0,1]`.
/// - `k = 4` (tetrahedra): six columns for the edges
///   `[3,0]`, `[3,1]`, `[3,2]`, `[1,2]`, `[2,0]`, `[0,1]`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSimplexSize`] for any other number of columns in `f`.
///
/// # Panics
///
/// Panics if `f` refers to a vertex index outside `v`.
pub fn squared_edge_lengths<T: RealField>(v: &DMatrix<T>, f: &DMatrix<usize>) -> Result<DMatrix<T>> {
    let m = f.nrows();
    let sq = |a: usize, b: usize| (v.row(a) - v.row(b)).norm_squared();

    let l = match f.ncols() {
        2 => DMatrix::from_fn(m, 1, |t, _| sq(f[(t, 0)], f[(t, 1)])),
        3 => {
            // Edges numbered opposite their vertices
            const EDGES: [(usize, usize); 3] = [(1, 2), (2, 0), (0, 1)];
            DMatrix::from_fn(m, 3, |t, e| {
                let (a, b) = EDGES[e];
                sq(f[(t, a)], f[(t, b)])
            })
        }
        4 => {
            const EDGES: [(usize, usize); 6] = [(3, 0), (3, 1), (3, 2), (1, 2), (2, 0), (0, 1)];
            DMatrix::from_fn(m, 6, |t, e| {
                let (a, b) = EDGES[e];
                sq(f[(t, a)], f[(t, b)])
            })
        }
        simplex_size => return Err(Error::UnsupportedSimplexSize { simplex_size }),
    };
    Ok(l)
}

/// Computes edge lengths for each simplex of the mesh `(v, f)`.
///
/// See [`squared_edge_lengths`] for the column conventions and error behavior.
pub fn edge_lengths<T: RealField>(v: &DMatrix<T>, f: &DMatrix<usize>) -> Result<DMatrix<T>> {
    Ok(squared_edge_lengths(v, f)?.map(|x| x.sqrt()))
}

/// Computes twice the area of each triangle from its edge lengths alone.
///
/// Uses Kahan's numerically stable variant of Heron's formula, which requires
/// sorting the edge lengths of each triangle. Edge lengths that violate the
/// triangle inequality produce a NaN for that triangle; degenerate (collinear)
/// triangles produce zero.
///
/// # Panics
///
/// Panics if `l` does not have exactly three columns.
pub fn double_areas_intrinsic<T: RealField>(l: &DMatrix<T>) -> DVector<T> {
    assert_eq!(l.ncols(), 3, "intrinsic triangle areas require three edge lengths per row");
    let half: T = convert(0.5);
    DVector::from_fn(l.nrows(), |t, _| {
        let mut a = l[(t, 0)].clone();
        let mut b = l[(t, 1)].clone();
        let mut c = l[(t, 2)].clone();
        // Sort descending: a >= b >= c
        if a < b {
            std::mem::swap(&mut a, &mut b);
        }
        if a < c {
            std::mem::swap(&mut a, &mut c);
        }
        if b < c {
            std::mem::swap(&mut b, &mut c);
        }
        let arg = (a.clone() + (b.clone() + c.clone()))
            * (c.clone() - (a.clone() - b.clone()))
            * (c.clone() + (a.clone() - b.clone()))
            * (a + (b - c));
        half.clone() * arg.sqrt()
    })
}

/// Computes twice the area of each triangle of the mesh `(v, f)`.
///
/// For 2D vertex positions the result is *signed* (positive for
/// counter-clockwise triangles). For any other embedding dimension areas are
/// computed intrinsically from edge lengths and are unsigned.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSimplexSize`] if `f` does not have three columns.
pub fn double_areas<T: RealField>(v: &DMatrix<T>, f: &DMatrix<usize>) -> Result<DVector<T>> {
    if f.ncols() != 3 {
        return Err(Error::UnsupportedSimplexSize {
            simplex_size: f.ncols(),
        });
    }
    if v.ncols() == 2 {
        Ok(DVector::from_fn(f.nrows(), |t, _| {
            let (a, b, c) = (f[(t, 0)], f[(t, 1)], f[(t, 2)]);
            let ux = v[(b, 0)].clone() - v[(a, 0)].clone();
            let uy = v[(b, 1)].clone() - v[(a, 1)].clone();
            let wx = v[(c, 0)].clone() - v[(a, 0)].clone();
            let wy = v[(c, 1)].clone() - v[(a, 1)].clone();
            ux * wy - uy * wx
        }))
    } else {
        let l = edge_lengths(v, f)?;
        Ok(double_areas_intrinsic(&l))
    }
}

/// Computes the signed volume of each tetrahedron of the mesh `(v, f)`.
///
/// The sign convention is `-(a - d) · ((b - d) × (c - d)) / 6` for a tetrahedron
/// with vertices `a, b, c, d`, so that positively oriented tetrahedra have
/// positive volume.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSimplexSize`] if `f` does not have four columns,
/// and [`Error::DimensionMismatch`] if the vertices are not three-dimensional.
pub fn signed_tet_volumes<T: RealField>(v: &DMatrix<T>, f: &DMatrix<usize>) -> Result<DVector<T>> {
    if f.ncols() != 4 {
        return Err(Error::UnsupportedSimplexSize {
            simplex_size: f.ncols(),
        });
    }
    if v.ncols() != 3 {
        return Err(Error::DimensionMismatch {
            quantity: "vertex dimension for tetrahedra",
            expected: 3,
            actual: v.ncols(),
        });
    }
    let sixth: T = convert(1.0 / 6.0);
    let vertex = |i: usize| Vector3::new(v[(i, 0)].clone(), v[(i, 1)].clone(), v[(i, 2)].clone());
    Ok(DVector::from_fn(f.nrows(), |t, _| {
        let a = vertex(f[(t, 0)]);
        let b = vertex(f[(t, 1)]);
        let c = vertex(f[(t, 2)]);
        let d = vertex(f[(t, 3)]);
        -(a - d.clone()).dot(&(b - d.clone()).cross(&(c - d))) * sixth.clone()
    }))
}

/// Computes the inradius of each triangle of the mesh `(v, f)`.
///
/// The inradius equals the (double) area divided by the perimeter.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSimplexSize`] if `f` does not have three columns.
pub fn inradius<T: RealField>(v: &DMatrix<T>, f: &DMatrix<usize>) -> Result<DVector<T>> {
    let l = edge_lengths(v, f)?;
    let double_area = double_areas_intrinsic(&l);
    Ok(DVector::from_fn(f.nrows(), |t, _| {
        let perimeter = l[(t, 0)].clone() + l[(t, 1)].clone() + l[(t, 2)].clone();
        double_area[t].clone() / perimeter
    }))
}

/// Computes the dense matrix of pairwise distances between the rows of `p` and
/// the rows of `q`, squared if `squared` is true.
///
/// # Panics
///
/// Panics if `p` and `q` do not have the same number of columns.
pub fn all_pairs_distances<T: RealField>(p: &DMatrix<T>, q: &DMatrix<T>, squared: bool) -> DMatrix<T> {
    assert_eq!(p.ncols(), q.ncols(), "point sets must have the same dimension");
    DMatrix::from_fn(p.nrows(), q.nrows(), |i, j| {
        let d2 = (p.row(i) - q.row(j)).norm_squared();
        if squared {
            d2
        } else {
            d2.sqrt()
        }
    })
}
