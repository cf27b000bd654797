//! Vertex-to-simplex incidence lists.

use crate::error::{Error, Result};
use nalgebra::DMatrix;

/// For every vertex, the list of simplices incident on it, together with the
/// local corner the vertex occupies in each.
///
/// The lists are stored flat: `offsets[v] .. offsets[v + 1]` delimits the slice
/// of incident simplices of vertex `v`, so building the structure needs exactly
/// two passes over `f` and no per-vertex allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexSimplexAdjacency {
    offsets: Vec<usize>,
    simplex_indices: Vec<usize>,
    local_indices: Vec<usize>,
}

impl VertexSimplexAdjacency {
    /// Builds the incidence lists for the simplices in `f` over `num_vertices`
    /// vertices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `f` refers to a vertex at or
    /// beyond `num_vertices`.
    pub fn from_simplices(f: &DMatrix<usize>, num_vertices: usize) -> Result<Self> {
        let mut degrees = vec![0usize; num_vertices];
        for t in 0..f.nrows() {
            for c in 0..f.ncols() {
                let vertex = f[(t, c)];
                if vertex >= num_vertices {
                    return Err(Error::IndexOutOfBounds {
                        quantity: "vertex",
                        index: vertex,
                        bound: num_vertices,
                    });
                }
                degrees[vertex] += 1;
            }
        }

        let mut offsets = Vec::with_capacity(num_vertices + 1);
        offsets.push(0);
        for degree in &degrees {
            offsets.push(offsets.last().unwrap() + degree);
        }

        // Per-vertex write cursors, starting at each vertex's offset
        let total = f.nrows() * f.ncols();
        let mut cursors = offsets.clone();
        let mut simplex_indices = vec![0; total];
        let mut local_indices = vec![0; total];
        for t in 0..f.nrows() {
            for c in 0..f.ncols() {
                let vertex = f[(t, c)];
                simplex_indices[cursors[vertex]] = t;
                local_indices[cursors[vertex]] = c;
                cursors[vertex] += 1;
            }
        }

        Ok(Self {
            offsets,
            simplex_indices,
            local_indices,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of simplices incident on the given vertex.
    pub fn degree(&self, vertex: usize) -> usize {
        self.offsets[vertex + 1] - self.offsets[vertex]
    }

    /// Indices of the simplices incident on the given vertex, in the order the
    /// simplices appear in `f`.
    pub fn simplices_adjacent_to(&self, vertex: usize) -> &[usize] {
        &self.simplex_indices[self.offsets[vertex]..self.offsets[vertex + 1]]
    }

    /// For each incident simplex (in the same order as
    /// [`simplices_adjacent_to`](Self::simplices_adjacent_to)), the local corner
    /// the vertex occupies in that simplex.
    pub fn corners_adjacent_to(&self, vertex: usize) -> &[usize] {
        &self.local_indices[self.offsets[vertex]..self.offsets[vertex + 1]]
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}
