//! Interpolation of per-vertex data at barycentric query points.

use crate::error::{Error, Result};
use nalgebra::{DMatrix, RealField};
use rayon::prelude::*;

/// Interpolates per-vertex data at query points given in barycentric coordinates.
///
/// `data` holds one row of values per mesh vertex, `f` the simplex list of the
/// mesh. Each query `q` is described by a simplex index `simplex_indices[q]`
/// and one barycentric coordinate per simplex corner in row `q` of
/// `barycentric`; its interpolated value is the coordinate-weighted sum of the
/// data rows at the simplex corners. Rows are independent and are processed in
/// parallel.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the number of barycentric rows disagrees
///   with the number of simplex indices, or the number of barycentric columns
///   with the simplex size.
/// - [`Error::IndexOutOfBounds`] if a simplex index is out of range, or `f`
///   refers to a vertex row outside `data`.
pub fn barycentric_interpolation<T>(
    data: &DMatrix<T>,
    f: &DMatrix<usize>,
    barycentric: &DMatrix<T>,
    simplex_indices: &[usize],
) -> Result<DMatrix<T>>
where
    T: RealField + Send + Sync,
{
    if barycentric.nrows() != simplex_indices.len() {
        return Err(Error::DimensionMismatch {
            quantity: "number of barycentric coordinate rows",
            expected: simplex_indices.len(),
            actual: barycentric.nrows(),
        });
    }
    if barycentric.ncols() != f.ncols() {
        return Err(Error::DimensionMismatch {
            quantity: "barycentric coordinates per query",
            expected: f.ncols(),
            actual: barycentric.ncols(),
        });
    }
    for &simplex in simplex_indices {
        if simplex >= f.nrows() {
            return Err(Error::IndexOutOfBounds {
                quantity: "simplex",
                index: simplex,
                bound: f.nrows(),
            });
        }
    }
    for t in 0..f.nrows() {
        for c in 0..f.ncols() {
            if f[(t, c)] >= data.nrows() {
                return Err(Error::IndexOutOfBounds {
                    quantity: "vertex",
                    index: f[(t, c)],
                    bound: data.nrows(),
                });
            }
        }
    }

    let num_queries = barycentric.nrows();
    let dim = data.ncols();
    if num_queries == 0 || dim == 0 {
        return Ok(DMatrix::zeros(num_queries, dim));
    }

    // Row-major scratch buffer so each query owns a contiguous chunk
    let mut values = vec![T::zero(); num_queries * dim];
    values
        .par_chunks_mut(dim)
        .enumerate()
        .for_each(|(q, row)| {
            let simplex = simplex_indices[q];
            for c in 0..f.ncols() {
                let vertex = f[(simplex, c)];
                let weight = barycentric[(q, c)].clone();
                for (x, value) in row.iter_mut().enumerate() {
                    *value += weight.clone() * data[(vertex, x)].clone();
                }
            }
        });

    Ok(DMatrix::from_row_slice(num_queries, dim, &values))
}
