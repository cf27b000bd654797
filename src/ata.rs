//! Cached evaluation of the product AᵀWA for sparse A and diagonal W.
//!
//! Computing AᵀWA from scratch is dominated by the symbolic work of determining
//! the nonzero structure of the product. In applications that repeatedly evaluate
//! the product for a matrix with a *fixed* sparsity pattern but changing values
//! (e.g. reweighted least squares, where only W and the entries of A move between
//! iterations), that symbolic work can be paid once and amortized across all
//! subsequent evaluations.
//!
//! [`AtaCache::precompute`] walks the structure of A once and records, for every
//! nonzero output entry, the list of *composition rules* that produce it: which
//! pair of stored values of A is multiplied, and which weight scales the product.
//! [`AtaCache::evaluate_into`] then reduces those rules numerically, which is a
//! single linear pass over flat arrays.

use crate::error::{Error, Result};
use itertools::izip;
use log::debug;
use nalgebra::{DVector, RealField};
use nalgebra_sparse::CscMatrix;
use std::collections::BTreeSet;

/// Precomputed sparsity structure of AᵀWA for a sparse matrix A and diagonal weights W.
///
/// The cache is tied to the sparsity pattern of the matrix it was built from:
/// it may be reused for any matrix with the *identical* pattern (values are free
/// to change), and must be discarded and rebuilt when the pattern changes.
/// The weights may be replaced between evaluations with [`AtaCache::set_weights`].
///
/// Composition rules are stored as three flat index arrays delimited per output
/// entry by an offset array, so a numeric evaluation is cache-friendly and does
/// no allocation.
///
/// # Example
///
/// ```
/// use hati::ata::AtaCache;
/// use nalgebra_sparse::{CooMatrix, CscMatrix};
///
/// let mut coo = CooMatrix::new(3, 2);
/// coo.push(0, 0, 2.0);
/// coo.push(1, 0, 1.0);
/// coo.push(1, 1, -1.0);
/// coo.push(2, 1, 3.0);
/// let a = CscMatrix::from(&coo);
///
/// let (cache, mut ata) = AtaCache::precompute(&a, None).unwrap();
/// // ... change the values of `a`, then re-evaluate into the same buffer:
/// cache.evaluate_into(&a, &mut ata).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AtaCache<T> {
    weights: DVector<T>,

    // Flattened composition rules. Rule t multiplies the stored A-values at
    // positions rule_lhs[t] and rule_rhs[t], scaled by weights[rule_weight[t]].
    rule_lhs: Vec<usize>,
    rule_rhs: Vec<usize>,
    rule_weight: Vec<usize>,

    // entry_offsets[k] .. entry_offsets[k + 1] delimits the rules that sum into
    // the k-th stored entry of the output matrix (in its CSC storage order).
    entry_offsets: Vec<usize>,

    // Shape and nonzero count of the matrix the cache was built from, used to
    // reject obviously incompatible inputs at the evaluate boundary.
    a_nrows: usize,
    a_ncols: usize,
    a_nnz: usize,
}

impl<T: RealField> AtaCache<T> {
    /// Analyzes the sparsity structure of `a` and builds the cache together with
    /// the fully evaluated product AᵀWA.
    ///
    /// If `weights` is `None`, the identity weighting is used. The returned matrix
    /// owns the sparsity pattern all later evaluations write into; callers keep it
    /// (or a clone) around as the reusable output buffer.
    ///
    /// A matrix with no rows or no nonzeros produces an empty (but well-formed)
    /// product; this is a degenerate input, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the weight vector length does not
    /// match the number of rows of `a`.
    pub fn precompute(a: &CscMatrix<T>, weights: Option<DVector<T>>) -> Result<(Self, CscMatrix<T>)> {
        let m = a.nrows();
        let n = a.ncols();

        let weights = match weights {
            Some(w) => {
                if w.len() != m {
                    return Err(Error::DimensionMismatch {
                        quantity: "weight vector length",
                        expected: m,
                        actual: w.len(),
                    });
                }
                w
            }
            None => DVector::from_element(m, T::one()),
        };

        let (col_offsets, row_indices, _) = a.csc_data();

        // Transposed structure: the columns of A with a nonzero in each row.
        // Columns are visited in ascending order, so each list ends up sorted.
        let mut columns_in_row = vec![Vec::new(); m];
        for j in 0..n {
            for &r in &row_indices[col_offsets[j]..col_offsets[j + 1]] {
                columns_in_row[r].push(j);
            }
        }

        let mut rule_lhs = Vec::new();
        let mut rule_rhs = Vec::new();
        let mut rule_weight = Vec::new();
        let mut entry_offsets = vec![0];

        let mut out_col_offsets = Vec::with_capacity(n + 1);
        let mut out_row_indices = Vec::new();
        out_col_offsets.push(0);

        let mut candidates = BTreeSet::new();
        for j in 0..n {
            // The output entry (i, j) is structurally nonzero if and only if
            // columns i and j of A share at least one row. Candidates are
            // gathered through the transposed structure and visited in sorted
            // order, so the output pattern is emitted directly in valid CSC order.
            candidates.clear();
            for &r in &row_indices[col_offsets[j]..col_offsets[j + 1]] {
                candidates.extend(columns_in_row[r].iter().copied());
            }

            for &i in &candidates {
                let i_begin = col_offsets[i];
                let j_begin = col_offsets[j];
                let rows_i = &row_indices[i_begin..col_offsets[i + 1]];
                let rows_j = &row_indices[j_begin..col_offsets[j + 1]];

                // Two-pointer merge over the sorted row indices of both columns:
                // every shared row contributes one composition rule.
                let (mut p, mut q) = (0, 0);
                while p < rows_i.len() && q < rows_j.len() {
                    if rows_i[p] == rows_j[q] {
                        rule_lhs.push(i_begin + p);
                        rule_rhs.push(j_begin + q);
                        rule_weight.push(rows_i[p]);
                        p += 1;
                        q += 1;
                    } else if rows_i[p] < rows_j[q] {
                        p += 1;
                    } else {
                        q += 1;
                    }
                }

                // A candidate column shares a row with column j by construction
                debug_assert!(rule_lhs.len() > *entry_offsets.last().unwrap());

                out_row_indices.push(i);
                entry_offsets.push(rule_lhs.len());
            }
            out_col_offsets.push(out_row_indices.len());
        }

        debug!(
            "AtA precompute: {}x{} output pattern with {} entries and {} composition rules",
            n,
            n,
            out_row_indices.len(),
            rule_lhs.len()
        );

        let cache = Self {
            weights,
            rule_lhs,
            rule_rhs,
            rule_weight,
            entry_offsets,
            a_nrows: m,
            a_ncols: n,
            a_nnz: a.nnz(),
        };

        let mut values = vec![T::zero(); out_row_indices.len()];
        cache.accumulate_into(a.values(), &mut values);
        let ata = CscMatrix::try_from_csc_data(n, n, out_col_offsets, out_row_indices, values)
            .expect("CSC data assembled in column order is always valid");

        Ok((cache, ata))
    }

    /// Re-evaluates AᵀWA into `ata`, recomputing values only.
    ///
    /// `a` must have the same sparsity pattern as the matrix the cache was built
    /// from, and `ata` must carry the pattern returned by [`AtaCache::precompute`].
    /// Only cheap shape and nonzero-count guards are performed here; the pattern
    /// itself is not re-validated. Values are written in the exact storage order
    /// established at precompute time, so the same output buffer can be reused
    /// across calls without reallocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the shape or nonzero count of
    /// either matrix disagrees with the cached structure.
    pub fn evaluate_into(&self, a: &CscMatrix<T>, ata: &mut CscMatrix<T>) -> Result<()> {
        if a.nrows() != self.a_nrows {
            return Err(Error::DimensionMismatch {
                quantity: "number of rows of A",
                expected: self.a_nrows,
                actual: a.nrows(),
            });
        }
        if a.nnz() != self.a_nnz {
            return Err(Error::DimensionMismatch {
                quantity: "number of nonzeros of A",
                expected: self.a_nnz,
                actual: a.nnz(),
            });
        }
        if ata.nrows() != self.a_ncols || ata.ncols() != self.a_ncols {
            return Err(Error::DimensionMismatch {
                quantity: "output matrix dimension",
                expected: self.a_ncols,
                actual: ata.nrows(),
            });
        }
        let num_entries = self.entry_offsets.len() - 1;
        if ata.nnz() != num_entries {
            return Err(Error::DimensionMismatch {
                quantity: "number of nonzeros of the output matrix",
                expected: num_entries,
                actual: ata.nnz(),
            });
        }

        self.accumulate_into(a.values(), ata.values_mut());
        Ok(())
    }

    /// Replaces the diagonal weights without invalidating the cached pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the length does not match the
    /// number of rows of the matrix the cache was built from.
    pub fn set_weights(&mut self, weights: DVector<T>) -> Result<()> {
        if weights.len() != self.a_nrows {
            return Err(Error::DimensionMismatch {
                quantity: "weight vector length",
                expected: self.a_nrows,
                actual: weights.len(),
            });
        }
        self.weights = weights;
        Ok(())
    }

    /// The current diagonal weights.
    pub fn weights(&self) -> &DVector<T> {
        &self.weights
    }

    /// Number of structurally nonzero entries of the cached product.
    pub fn num_output_entries(&self) -> usize {
        self.entry_offsets.len() - 1
    }

    /// Total number of composition rules over all output entries.
    pub fn num_rules(&self) -> usize {
        self.rule_lhs.len()
    }

    /// The offset array delimiting, for each output entry, its slice of
    /// composition rules. Monotonically non-decreasing, with the last element
    /// equal to [`AtaCache::num_rules`].
    pub fn entry_offsets(&self) -> &[usize] {
        &self.entry_offsets
    }

    /// The flattened composition rule arrays `(lhs, rhs, weight)`: rule `t`
    /// multiplies the stored values of A at positions `lhs[t]` and `rhs[t]`,
    /// scaled by the weight at row `weight[t]`.
    pub fn composition_rules(&self) -> (&[usize], &[usize], &[usize]) {
        (&self.rule_lhs, &self.rule_rhs, &self.rule_weight)
    }

    fn accumulate_into(&self, a_values: &[T], out: &mut [T]) {
        for (entry, out_value) in out.iter_mut().enumerate() {
            let begin = self.entry_offsets[entry];
            let end = self.entry_offsets[entry + 1];
            let mut sum = T::zero();
            for (lhs, rhs, w) in izip!(
                &self.rule_lhs[begin..end],
                &self.rule_rhs[begin..end],
                &self.rule_weight[begin..end]
            ) {
                sum += a_values[*lhs].clone() * self.weights[*w].clone() * a_values[*rhs].clone();
            }
            *out_value = sum;
        }
    }
}
