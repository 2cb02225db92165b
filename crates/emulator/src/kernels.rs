//! A module for covariance kernels defining the prior second-order structure
//! of the emulated function and, where available, of its partial derivatives.
//!
//! Five covariance forms are needed to mix function-value and derivative
//! observations in one joint structure:
//! * value/value,
//! * value/derivative and derivative/value,
//! * derivative/derivative along the same direction,
//! * derivative/derivative along two distinct directions.
//!
//! All forms are closed-form derivatives of the base kernel, which therefore
//! has to be smooth; the squared exponential kernel is infinitely
//! differentiable and is the one implemented here.

use linfa::Float;
use ndarray::{ArrayBase, Data, Ix1, Zip};
use std::fmt;

/// A trait for covariance kernels differentiable in both arguments.
///
/// All functions are pure: they depend only on the two points `x`, `xdash`
/// and on the hyperparameters `theta` (correlation length) and `sigma2`
/// (process variance). Callers must enforce `theta > 0`.
pub trait CovarianceKernel<F: Float>: Clone + Copy + Default + fmt::Display + Sync {
    /// Covariance between the function values at `x` and `xdash`.
    /// Symmetric in its arguments and equal to `sigma2` at zero distance.
    fn value(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        theta: F,
        sigma2: F,
    ) -> F;

    /// Covariance between the function value at `x` and the partial
    /// derivative along dimension `axis` at `xdash`.
    fn value_deriv(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        theta: F,
        sigma2: F,
    ) -> F;

    /// Covariance between the partial derivative along dimension `axis` at
    /// `x` and the function value at `xdash`.
    /// Equals `value_deriv(xdash, x, axis)` by covariance symmetry.
    fn deriv_value(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        theta: F,
        sigma2: F,
    ) -> F;

    /// Covariance between the partial derivatives along the same dimension
    /// `axis` at `x` and at `xdash`.
    fn deriv_deriv(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        theta: F,
        sigma2: F,
    ) -> F;

    /// Covariance between the partial derivative along `axis` at `x` and the
    /// partial derivative along `other_axis` at `xdash`, with
    /// `axis != other_axis`.
    fn deriv_deriv_mixed(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        other_axis: usize,
        theta: F,
        sigma2: F,
    ) -> F;
}

/// Squared distance between two points of the same dimension
fn sq_dist<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    Zip::from(x)
        .and(xdash)
        .fold(F::zero(), |acc, &a, &b| acc + (a - b) * (a - b))
}

/// Squared exponential (Gaussian) covariance kernel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SquaredExponential();

impl<F: Float> CovarianceKernel<F> for SquaredExponential {
    /// sigma2 * exp( - ||x - xdash||^2 / theta^2 )
    fn value(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        theta: F,
        sigma2: F,
    ) -> F {
        sigma2 * F::exp(-sq_dist(x, xdash) / (theta * theta))
    }

    /// 2 (x_k - xdash_k) / theta^2 * value(x, xdash)
    fn value_deriv(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        theta: F,
        sigma2: F,
    ) -> F {
        let dk = x[axis] - xdash[axis];
        F::cast(2.) * dk / (theta * theta) * self.value(x, xdash, theta, sigma2)
    }

    /// -2 (x_k - xdash_k) / theta^2 * value(x, xdash)
    fn deriv_value(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        theta: F,
        sigma2: F,
    ) -> F {
        let dk = x[axis] - xdash[axis];
        -F::cast(2.) * dk / (theta * theta) * self.value(x, xdash, theta, sigma2)
    }

    /// ( 2 / theta^2 - 4 (x_k - xdash_k)^2 / theta^4 ) * value(x, xdash)
    fn deriv_deriv(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        theta: F,
        sigma2: F,
    ) -> F {
        let t2 = theta * theta;
        let dk = x[axis] - xdash[axis];
        (F::cast(2.) / t2 - F::cast(4.) * dk * dk / (t2 * t2))
            * self.value(x, xdash, theta, sigma2)
    }

    /// -4 (x_k - xdash_k)(x_l - xdash_l) / theta^4 * value(x, xdash)
    fn deriv_deriv_mixed(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        xdash: &ArrayBase<impl Data<Elem = F>, Ix1>,
        axis: usize,
        other_axis: usize,
        theta: F,
        sigma2: F,
    ) -> F {
        debug_assert!(axis != other_axis);
        let t2 = theta * theta;
        let dk = x[axis] - xdash[axis];
        let dl = x[other_axis] - xdash[other_axis];
        -F::cast(4.) * dk * dl / (t2 * t2) * self.value(x, xdash, theta, sigma2)
    }
}

impl fmt::Display for SquaredExponential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SquaredExponential")
    }
}
