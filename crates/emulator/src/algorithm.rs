use crate::covariance::{cross_covariance, observation_covariance};
use crate::design::Design;
use crate::errors::{EmulatorError, Result};
use crate::kernels::{CovarianceKernel, SquaredExponential};
use crate::parameters::{EmulatorParams, EmulatorValidParams};

use linfa::{Float, ParamGuard};
use linfa_linalg::{cholesky::*, triangular::*};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use rayon::prelude::*;
use std::fmt;
use std::time::Instant;

/// Internal data computed once at adjustment time and reused by every query
#[derive(Clone, Debug)]
pub(crate) struct EmulatorInnerParams<F: Float> {
    /// Lower Cholesky factor of the observation covariance `Var_D`
    r_chol: Array2<F>,
    /// Solution of `Var_D gamma = D - E_D`
    gamma: Array2<F>,
}

/// A Bayes Linear emulator of a deterministic simulator.
///
/// The emulator treats the simulator as an uncertain function with a constant
/// prior mean and a stationary covariance kernel, and adjusts these prior
/// beliefs by a collection of observed runs: function values and, optionally,
/// partial derivatives along chosen input dimensions. Derivative observations
/// enter the adjustment through the closed-form derivatives of the kernel;
/// they sharpen predictions without any extra machinery at query time.
///
/// Built from hyperparameters via [`EmulatorParams::fit`]; querying never
/// refactorizes the observation covariance.
#[derive(Clone, Debug)]
pub struct Emulator<F: Float, K: CovarianceKernel<F>> {
    params: EmulatorValidParams<F, K>,
    design: Design<F>,
    inner_params: EmulatorInnerParams<F>,
}

/// Bayes Linear emulator with the squared exponential kernel
pub type BayesLinear<F> = EmulatorParams<F, SquaredExponential>;

impl<F: Float> BayesLinear<F> {
    /// Constructor of squared exponential emulator parameters
    pub fn params() -> BayesLinear<F> {
        EmulatorParams::new(SquaredExponential())
    }
}

impl<F: Float, K: CovarianceKernel<F>> EmulatorParams<F, K> {
    /// Adjust the prior beliefs by the observations of `design`.
    ///
    /// Assembles the block-structured observation covariance, factorizes it
    /// once and precomputes the adjustment weights. Fails when the parameters
    /// are invalid or when the covariance cannot be Cholesky-factored.
    pub fn fit(self, design: Design<F>) -> Result<Emulator<F, K>> {
        let params = self.check()?;
        let sigma2 = params.sigma() * params.sigma();

        let now = Instant::now();
        let mut var_d = observation_covariance(&params.kernel, &design, params.theta, sigma2);
        // nugget on the diagonal to keep the factorization well conditioned
        let nugget = params.nugget;
        var_d
            .diag_mut()
            .mapv_inplace(|v| v * (F::one() + nugget));
        let r_chol = var_d.cholesky()?;

        let residual = (design.observations() - &design.prior_mean(params.prior_mean))
            .insert_axis(Axis(1));
        let rho = r_chol.solve_triangular(&residual, UPLO::Lower)?;
        let gamma = r_chol.t().solve_triangular_into(rho, UPLO::Upper)?;
        debug!(
            "Adjustment by {} observations in {:?}",
            design.len(),
            now.elapsed()
        );

        Ok(Emulator {
            params,
            design,
            inner_params: EmulatorInnerParams { r_chol, gamma },
        })
    }
}

impl<F: Float, K: CovarianceKernel<F>> Emulator<F, K> {
    /// Adjusted expectation and adjusted variance of the simulator output at
    /// the query point `x`.
    ///
    /// The variance is clamped at zero: round-off in the triangular solves
    /// can leave a small negative remainder at or near design points.
    pub fn predict(&self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<(F, F)> {
        if x.len() != self.design.dim() {
            return Err(EmulatorError::DimensionMismatch(format!(
                "query point has {} components, input space has dimension {}",
                x.len(),
                self.design.dim()
            )));
        }
        let sigma2 = self.sigma2();
        let cross = cross_covariance(
            &self.params.kernel,
            &self.design,
            x,
            self.params.theta,
            sigma2,
        );

        let expectation = self.params.prior_mean + cross.dot(&self.inner_params.gamma.column(0));

        let rt = self
            .inner_params
            .r_chol
            .solve_triangular(&cross.insert_axis(Axis(1)), UPLO::Lower)?;
        let explained = rt.mapv(|v| v * v).sum();
        let variance = F::max(sigma2 - explained, F::zero());

        Ok((expectation, variance))
    }

    /// Adjusted expectation and adjusted variance at each row of `x`.
    ///
    /// Queries are independent and run in parallel.
    pub fn predict_set(
        &self,
        x: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    ) -> Result<(Array1<F>, Array1<F>)> {
        let results = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| self.predict(&row))
            .collect::<Result<Vec<_>>>()?;
        let expectations = results.iter().map(|&(e, _)| e).collect();
        let variances = results.iter().map(|&(_, v)| v).collect();
        Ok((expectations, variances))
    }

    /// The correlation length of the kernel
    pub fn theta(&self) -> F {
        self.params.theta()
    }

    /// The prior standard deviation
    pub fn sigma(&self) -> F {
        self.params.sigma()
    }

    /// The prior process variance `sigma^2`
    pub fn sigma2(&self) -> F {
        self.params.sigma() * self.params.sigma()
    }

    /// The prior mean of the emulated function
    pub fn prior_mean(&self) -> F {
        self.params.prior_mean()
    }

    /// Dimension of the input space
    pub fn dim(&self) -> usize {
        self.design.dim()
    }

    /// The adjusted design
    pub fn design(&self) -> &Design<F> {
        &self.design
    }

    /// The covariance kernel
    pub fn kernel(&self) -> &K {
        self.params.kernel()
    }
}

impl<F: Float, K: CovarianceKernel<F>> fmt::Display for Emulator<F, K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Emulator(kernel={}, theta={}, sigma={}, mean={}, n={})",
            self.params.kernel(),
            self.params.theta(),
            self.params.sigma(),
            self.params.prior_mean(),
            self.design.len()
        )
    }
}
