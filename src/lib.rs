//! Discrete geometry processing routines for triangle and tetrahedral meshes.
//!
//! Meshes are represented by plain matrices: an `n x d` matrix of vertex positions
//! and an `m x k` matrix of vertex indices, one simplex per row (`k = 3` for
//! triangles, `k = 4` for tetrahedra). Every routine is a pure function from
//! matrix inputs to matrix outputs; there is no mesh data structure and no
//! hidden state.
//!
//! The two central pieces are:
//!
//! - [`mass::mass_matrix`], which assembles the finite-element mass matrix of a
//!   mesh under a choice of lumping policy, and
//! - [`ata::AtaCache`], which precomputes the sparsity structure of the product
//!   AᵀWA of a sparse matrix so that repeated numeric evaluations with changing
//!   values and weights only pay for the summation, not the structure analysis.
//!
//! Sparse matrices use the CSC types from [`nalgebra-sparse`](nalgebra_sparse),
//! dense matrices the types from [`nalgebra`].

pub mod adjacency;
pub mod ata;
pub mod error;
pub mod geometry;
pub mod interpolate;
pub mod mass;
pub mod plane;

pub use error::{Error, Result};

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
