use crate::errors::{EmulatorError, Result};
use crate::kernels::CovarianceKernel;
use linfa::{Float, ParamGuard};

/// A set of validated emulator parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EmulatorValidParams<F: Float, K: CovarianceKernel<F>> {
    /// Correlation length of the covariance kernel
    pub(crate) theta: F,
    /// Prior standard deviation of the emulated function
    pub(crate) sigma: F,
    /// Prior mean of the emulated function
    pub(crate) prior_mean: F,
    /// Diagonal scaling factor to improve numerical stability
    pub(crate) nugget: F,
    /// Covariance kernel
    pub(crate) kernel: K,
}

impl<F: Float, K: CovarianceKernel<F>> Default for EmulatorValidParams<F, K> {
    fn default() -> Self {
        EmulatorValidParams {
            theta: F::one(),
            sigma: F::one(),
            prior_mean: F::zero(),
            nugget: F::cast(100.0) * F::epsilon(),
            kernel: K::default(),
        }
    }
}

impl<F: Float, K: CovarianceKernel<F>> EmulatorValidParams<F, K> {
    /// Get the correlation length
    pub fn theta(&self) -> F {
        self.theta
    }

    /// Get the prior standard deviation
    pub fn sigma(&self) -> F {
        self.sigma
    }

    /// Get the prior mean
    pub fn prior_mean(&self) -> F {
        self.prior_mean
    }

    /// Get the stability nugget
    pub fn nugget(&self) -> F {
        self.nugget
    }

    /// Get the covariance kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

/// The set of hyperparameters that can be specified for the construction of
/// an [Emulator](crate::Emulator).
///
/// Defaults: `theta = 1`, `sigma = 1`, `prior_mean = 0`.
#[derive(Clone, Debug)]
pub struct EmulatorParams<F: Float, K: CovarianceKernel<F>>(pub(crate) EmulatorValidParams<F, K>);

impl<F: Float, K: CovarianceKernel<F>> EmulatorParams<F, K> {
    /// A constructor for emulator parameters given a covariance kernel
    pub fn new(kernel: K) -> EmulatorParams<F, K> {
        Self(EmulatorValidParams {
            kernel,
            ..Default::default()
        })
    }

    /// Set the correlation length (must be strictly positive)
    pub fn theta(mut self, theta: F) -> Self {
        self.0.theta = theta;
        self
    }

    /// Set the prior standard deviation (must be strictly positive)
    pub fn sigma(mut self, sigma: F) -> Self {
        self.0.sigma = sigma;
        self
    }

    /// Set the prior mean of the emulated function
    pub fn prior_mean(mut self, prior_mean: F) -> Self {
        self.0.prior_mean = prior_mean;
        self
    }

    /// Set the nugget.
    ///
    /// The nugget scales the diagonal of the observation covariance before
    /// factorization to improve numerical stability.
    pub fn nugget(mut self, nugget: F) -> Self {
        self.0.nugget = nugget;
        self
    }
}

impl<F: Float, K: CovarianceKernel<F>> ParamGuard for EmulatorParams<F, K> {
    type Checked = EmulatorValidParams<F, K>;
    type Error = EmulatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.theta <= F::zero() {
            return Err(EmulatorError::Configuration(format!(
                "correlation length theta must be strictly positive, got {}",
                self.0.theta
            )));
        }
        if self.0.sigma <= F::zero() {
            return Err(EmulatorError::Configuration(format!(
                "prior standard deviation sigma must be strictly positive, got {}",
                self.0.sigma
            )));
        }
        if self.0.nugget < F::zero() {
            return Err(EmulatorError::Configuration(format!(
                "nugget cannot be negative, got {}",
                self.0.nugget
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::SquaredExponential;

    #[test]
    fn test_defaults() {
        let params: EmulatorParams<f64, SquaredExponential> =
            EmulatorParams::new(SquaredExponential());
        let checked = params.check().unwrap();
        assert_eq!(checked.theta(), 1.);
        assert_eq!(checked.sigma(), 1.);
        assert_eq!(checked.prior_mean(), 0.);
    }

    #[test]
    fn test_nonpositive_theta_rejected() {
        let params: EmulatorParams<f64, SquaredExponential> =
            EmulatorParams::new(SquaredExponential()).theta(0.);
        assert!(matches!(
            params.check().unwrap_err(),
            EmulatorError::Configuration(_)
        ));
    }

    #[test]
    fn test_nonpositive_sigma_rejected() {
        let params: EmulatorParams<f64, SquaredExponential> =
            EmulatorParams::new(SquaredExponential()).sigma(-1.);
        assert!(matches!(
            params.check().unwrap_err(),
            EmulatorError::Configuration(_)
        ));
    }
}
