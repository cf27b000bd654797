//! Library-wide error type.

use crate::mass::MassMatrixType;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Convenience alias for results with the library-wide [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The simplex size (number of columns of the index matrix) is not supported
    /// by the requested operation.
    UnsupportedSimplexSize {
        /// The offending simplex size.
        simplex_size: usize,
    },
    /// The requested mass matrix policy is not available for the given simplex size.
    ///
    /// In particular, Voronoi lumping is not implemented for tetrahedral meshes.
    UnsupportedMassMatrixType {
        /// The requested policy.
        mass_type: MassMatrixType,
        /// The simplex size for which it was requested.
        simplex_size: usize,
    },
    /// Two inputs that must agree in size do not.
    DimensionMismatch {
        /// Description of the quantity whose size is wrong.
        quantity: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An index matrix refers to a vertex outside the valid range.
    IndexOutOfBounds {
        /// Description of the offending index.
        quantity: &'static str,
        index: usize,
        bound: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSimplexSize { simplex_size } => {
                write!(
                    f,
                    "unsupported simplex size {simplex_size} (expected 3 for triangles or 4 for tetrahedra)"
                )
            }
            Self::UnsupportedMassMatrixType {
                mass_type,
                simplex_size,
            } => {
                write!(
                    f,
                    "mass matrix type {mass_type:?} is not supported for simplex size {simplex_size}"
                )
            }
            Self::DimensionMismatch {
                quantity,
                expected,
                actual,
            } => {
                write!(f, "dimension mismatch for {quantity}: expected {expected}, got {actual}")
            }
            Self::IndexOutOfBounds {
                quantity,
                index,
                bound,
            } => {
                write!(f, "{quantity} index {index} is out of bounds (must be below {bound})")
            }
        }
    }
}

impl std::error::Error for Error {}
