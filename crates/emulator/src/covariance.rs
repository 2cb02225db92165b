//! Block-structured covariance assembly.
//!
//! The observation covariance `Var_D` and the query cross-covariance row
//! `Cov(f(x), D)` are filled block by block following the design layout,
//! picking the kernel form matching each (row block, column block) pair.
//! Inactive derivative directions have no block at all: the matrix size is
//! exactly n + sum of the active direction counts.

use crate::design::{BlockKind, Design};
use crate::kernels::CovarianceKernel;
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Zip, s};

/// Covariance of a single observation pair given the kinds of their blocks
fn paired_cov<F: Float, K: CovarianceKernel<F>>(
    kernel: &K,
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
    row_kind: BlockKind,
    col_kind: BlockKind,
    theta: F,
    sigma2: F,
) -> F {
    match (row_kind, col_kind) {
        (BlockKind::Value, BlockKind::Value) => kernel.value(x, xdash, theta, sigma2),
        (BlockKind::Value, BlockKind::Deriv(l)) => kernel.value_deriv(x, xdash, l, theta, sigma2),
        (BlockKind::Deriv(k), BlockKind::Value) => kernel.deriv_value(x, xdash, k, theta, sigma2),
        (BlockKind::Deriv(k), BlockKind::Deriv(l)) if k == l => {
            kernel.deriv_deriv(x, xdash, k, theta, sigma2)
        }
        (BlockKind::Deriv(k), BlockKind::Deriv(l)) => {
            kernel.deriv_deriv_mixed(x, xdash, k, l, theta, sigma2)
        }
    }
}

/// Assemble the full observation covariance matrix `Var_D` (N, N).
///
/// Symmetry holds exactly: the value/derivative blocks transpose onto the
/// derivative/value kernel, and the mixed second-derivative kernel is
/// invariant under swapping both the point pair and the direction pair.
pub(crate) fn observation_covariance<F: Float, K: CovarianceKernel<F>>(
    kernel: &K,
    design: &Design<F>,
    theta: F,
    sigma2: F,
) -> Array2<F> {
    let n = design.len();
    let points = design.points();
    let mut cov = Array2::zeros((n, n));
    for row_block in design.blocks() {
        for col_block in design.blocks() {
            let mut sub = cov.slice_mut(s![row_block.range(), col_block.range()]);
            Zip::indexed(&mut sub).for_each(|(i, j), c| {
                let xi = points.row(row_block.start() + i);
                let xj = points.row(col_block.start() + j);
                *c = paired_cov(
                    kernel,
                    &xi,
                    &xj,
                    row_block.kind(),
                    col_block.kind(),
                    theta,
                    sigma2,
                );
            });
        }
    }
    cov
}

/// Assemble the cross-covariance row `Cov(f(x), D)` (N,) for a query point.
///
/// Follows the block order of `Var_D`; on derivative blocks the derivative
/// is taken at the design point, not at the query point.
pub(crate) fn cross_covariance<F: Float, K: CovarianceKernel<F>>(
    kernel: &K,
    design: &Design<F>,
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    theta: F,
    sigma2: F,
) -> Array1<F> {
    let points = design.points();
    let mut cov = Array1::zeros(design.len());
    for block in design.blocks() {
        let mut sub = cov.slice_mut(s![block.range()]);
        Zip::indexed(&mut sub).for_each(|j, c| {
            let xj = points.row(block.start() + j);
            *c = match block.kind() {
                BlockKind::Value => kernel.value(x, &xj, theta, sigma2),
                BlockKind::Deriv(k) => kernel.value_deriv(x, &xj, k, theta, sigma2),
            };
        });
    }
    cov
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignBuilder;
    use crate::kernels::SquaredExponential;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array2, array};

    const THETA: f64 = 0.2;
    const SIGMA2: f64 = 170. * 170.;

    fn grid16() -> Array2<f64> {
        let levels = [0.08, 0.36, 0.64, 0.92];
        let mut pts = Array2::zeros((16, 2));
        for i in 0..4 {
            for j in 0..4 {
                pts[[4 * i + j, 0]] = levels[i];
                pts[[4 * i + j, 1]] = levels[j];
            }
        }
        pts
    }

    fn design_with_axes(axes: &[usize]) -> crate::design::Design<f64> {
        let pts = grid16();
        let obs = Array1::zeros(16);
        let mut builder = DesignBuilder::new(2).values(&pts, &obs);
        for &axis in axes {
            builder = builder.derivatives(axis, &pts, &obs);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_variant_matrix_dimensions() {
        let kernel = SquaredExponential::default();
        for (axes, expected) in [
            (vec![], 16),
            (vec![0], 32),
            (vec![1], 32),
            (vec![0, 1], 48),
        ] {
            let design = design_with_axes(&axes);
            let cov = observation_covariance(&kernel, &design, THETA, SIGMA2);
            assert_eq!(cov.shape(), [expected, expected]);
            let cross = cross_covariance(&kernel, &design, &array![0.5, 0.5], THETA, SIGMA2);
            assert_eq!(cross.len(), expected);
        }
    }

    #[test]
    fn test_exact_symmetry() {
        let kernel = SquaredExponential::default();
        let design = design_with_axes(&[0, 1]);
        let cov = observation_covariance(&kernel, &design, THETA, SIGMA2);
        for i in 0..cov.nrows() {
            for j in 0..i {
                assert_abs_diff_eq!(cov[[i, j]], cov[[j, i]], epsilon = 0.);
            }
        }
    }

    #[test]
    fn test_diagonal_blocks() {
        let kernel = SquaredExponential::default();
        let design = design_with_axes(&[0, 1]);
        let cov = observation_covariance(&kernel, &design, THETA, SIGMA2);
        // value/value diagonal is sigma2, same-direction derivative diagonal is 2 sigma2 / theta^2
        assert_abs_diff_eq!(cov[[0, 0]], SIGMA2, epsilon = 1e-9);
        assert_abs_diff_eq!(cov[[16, 16]], 2. * SIGMA2 / (THETA * THETA), epsilon = 1e-9);
        assert_abs_diff_eq!(cov[[32, 32]], 2. * SIGMA2 / (THETA * THETA), epsilon = 1e-9);
    }

    #[test]
    fn test_cross_row_matches_matrix_column() {
        // querying at a design point must reproduce the corresponding Var_D column
        let kernel = SquaredExponential::default();
        let design = design_with_axes(&[0, 1]);
        let cov = observation_covariance(&kernel, &design, THETA, SIGMA2);
        let q = design.points().row(5).to_owned();
        let cross = cross_covariance(&kernel, &design, &q, THETA, SIGMA2);
        assert_abs_diff_eq!(cross, cov.column(5), epsilon = 1e-12);
    }
}
