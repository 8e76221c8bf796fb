//! Dense linear system solvers.
//!
//! Gaussian elimination with partial pivoting, in real and complex variants.
//! Columns whose best pivot falls below [`PIVOT_TOLERANCE`] are treated as
//! degenerate: elimination skips them and back-substitution leaves the
//! corresponding unknown at zero. Circuits with floating subnets therefore
//! produce partial solutions instead of failing; only a system in which
//! every pivot collapses reports [`Error::SingularMatrix`].

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

use crate::error::{Error, Result};

/// Below this magnitude a pivot counts as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

fn check_dimensions(rows: usize, cols: usize, rhs_len: usize) -> Result<()> {
    if rows != cols {
        return Err(Error::DimensionMismatch {
            expected: rows,
            actual: cols,
        });
    }
    if rows != rhs_len {
        return Err(Error::DimensionMismatch {
            expected: rows,
            actual: rhs_len,
        });
    }
    Ok(())
}

/// Solve Ax = b on a working copy of (A, b).
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    check_dimensions(a.nrows(), a.ncols(), b.len())?;

    let n = a.nrows();
    let mut m = a.clone();
    let mut rhs = b.clone();
    let mut degenerate = 0usize;

    for col in 0..n {
        // Partial pivoting: bring the largest remaining entry up.
        let mut pivot_row = col;
        let mut best = m[(col, col)].abs();
        for row in col + 1..n {
            let candidate = m[(row, col)].abs();
            if candidate > best {
                best = candidate;
                pivot_row = row;
            }
        }
        if pivot_row != col {
            m.swap_rows(col, pivot_row);
            rhs.swap_rows(col, pivot_row);
        }

        if best < PIVOT_TOLERANCE {
            degenerate += 1;
            continue;
        }

        let pivot = m[(col, col)];
        for row in col + 1..n {
            let factor = m[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                let head = m[(col, k)];
                m[(row, k)] -= factor * head;
            }
            let head = rhs[col];
            rhs[row] -= factor * head;
        }
    }

    if n > 0 && degenerate == n {
        return Err(Error::SingularMatrix);
    }

    let mut x = DVector::zeros(n);
    for row in (0..n).rev() {
        let pivot = m[(row, row)];
        if pivot.abs() < PIVOT_TOLERANCE {
            // Degenerate unknowns stay at zero.
            continue;
        }
        let mut sum = rhs[row];
        for k in row + 1..n {
            sum -= m[(row, k)] * x[k];
        }
        x[row] = sum / pivot;
    }

    Ok(x)
}

/// Solve a complex Ax = b on a working copy of (A, b).
pub fn solve_complex(
    a: &DMatrix<Complex<f64>>,
    b: &DVector<Complex<f64>>,
) -> Result<DVector<Complex<f64>>> {
    check_dimensions(a.nrows(), a.ncols(), b.len())?;

    let n = a.nrows();
    let mut m = a.clone();
    let mut rhs = b.clone();
    let mut degenerate = 0usize;

    for col in 0..n {
        let mut pivot_row = col;
        let mut best = m[(col, col)].norm();
        for row in col + 1..n {
            let candidate = m[(row, col)].norm();
            if candidate > best {
                best = candidate;
                pivot_row = row;
            }
        }
        if pivot_row != col {
            m.swap_rows(col, pivot_row);
            rhs.swap_rows(col, pivot_row);
        }

        if best < PIVOT_TOLERANCE {
            degenerate += 1;
            continue;
        }

        let pivot = m[(col, col)];
        for row in col + 1..n {
            let factor = m[(row, col)] / pivot;
            if factor.norm() == 0.0 {
                continue;
            }
            for k in col..n {
                let head = m[(col, k)];
                m[(row, k)] -= factor * head;
            }
            let head = rhs[col];
            rhs[row] -= factor * head;
        }
    }

    if n > 0 && degenerate == n {
        return Err(Error::SingularMatrix);
    }

    let mut x = DVector::from_element(n, Complex::new(0.0, 0.0));
    for row in (0..n).rev() {
        let pivot = m[(row, row)];
        if pivot.norm() < PIVOT_TOLERANCE {
            continue;
        }
        let mut sum = rhs[row];
        for k in row + 1..n {
            sum -= m[(row, k)] * x[k];
        }
        x[row] = sum / pivot;
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_solve_simple() {
        // 2x + y = 5
        // x + 3y = 6
        // Solution: x = 1.8, y = 1.4
        let a = dmatrix![2.0, 1.0; 1.0, 3.0];
        let b = dvector![5.0, 6.0];

        let x = solve_dense(&a, &b).unwrap();

        assert!((x[0] - 1.8).abs() < 1e-10);
        assert!((x[1] - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_pivoting_required() {
        // Zero on the leading diagonal forces a row swap.
        let a = dmatrix![0.0, 1.0; 1.0, 0.0];
        let b = dvector![3.0, 7.0];

        let x = solve_dense(&a, &b).unwrap();

        assert!((x[0] - 7.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_residual_is_small() {
        let a = dmatrix![
            4.0, -2.0, 1.0;
            -2.0, 4.0, -2.0;
            1.0, -2.0, 4.0
        ];
        let b = dvector![1.0, 2.0, 3.0];

        let x = solve_dense(&a, &b).unwrap();
        let residual = (&a * &x - &b).norm();

        assert!(residual < 1e-9 * b.norm());
    }

    #[test]
    fn test_floating_subnet_yields_partial_solution() {
        // Second unknown is decoupled and unconstrained: its column is
        // numerically empty, so it comes back as zero while the first
        // unknown still solves.
        let a = dmatrix![2.0, 0.0; 0.0, 0.0];
        let b = dvector![4.0, 0.0];

        let x = solve_dense(&a, &b).unwrap();

        assert!((x[0] - 2.0).abs() < 1e-12);
        assert_eq!(x[1], 0.0);
    }

    #[test]
    fn test_fully_singular_matrix() {
        let a = DMatrix::zeros(2, 2);
        let b = dvector![1.0, 2.0];

        assert!(matches!(solve_dense(&a, &b), Err(Error::SingularMatrix)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = dmatrix![1.0, 2.0; 3.0, 4.0];
        let b = dvector![1.0, 2.0, 3.0];

        assert!(matches!(
            solve_dense(&a, &b),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_solve_complex_rc() {
        // (1 + j)x = 2 -> x = 1 - j
        let a = DMatrix::from_element(1, 1, Complex::new(1.0, 1.0));
        let b = DVector::from_element(1, Complex::new(2.0, 0.0));

        let x = solve_complex(&a, &b).unwrap();

        assert!((x[0].re - 1.0).abs() < 1e-12);
        assert!((x[0].im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_complex_system() {
        let a = DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex::new(2.0, 0.0),
                Complex::new(0.0, -1.0),
                Complex::new(0.0, 1.0),
                Complex::new(3.0, 0.0),
            ],
        );
        let b = DVector::from_vec(vec![Complex::new(1.0, 0.0), Complex::new(0.0, 2.0)]);

        let x = solve_complex(&a, &b).unwrap();
        let residual = (&a * &x - &b).norm();

        assert!(residual < 1e-10);
    }
}
