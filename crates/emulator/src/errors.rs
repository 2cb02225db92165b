use thiserror::Error;

/// A result type for emulator construction and adjustment
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// An error when assembling a design or running a Bayes Linear adjustment
#[derive(Error, Debug)]
pub enum EmulatorError {
    /// When supplied configuration data are inconsistent with each other
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// When a point, design or derivative direction does not match the declared input dimension
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// When the observation covariance matrix cannot be factored,
    /// i.e. it is numerically singular or not positive-definite
    #[error("Singular observation covariance: {0}")]
    SingularMatrix(#[from] linfa_linalg::LinalgError),
}
