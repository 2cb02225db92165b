//! This library implements Bayes Linear emulation of expensive computer
//! simulators, with support for partial derivative observations.
//!
//! An emulator is a cheap statistical surrogate: the simulator output is
//! treated as an uncertain function with a constant prior mean and a
//! stationary covariance kernel, and the prior beliefs are adjusted by a
//! set of observed runs. When the simulator can also report partial
//! derivatives of its output, those enter the adjustment as additional
//! observation blocks through the closed-form derivatives of the kernel,
//! and sharpen the predictions at no extra cost per query.
//!
//! The adjustment is the standard Bayes Linear update,
//!
//! `E_D(f(x)) = E(f(x)) + Cov(f(x), D) Var(D)^-1 (D - E(D))`
//!
//! `Var_D(f(x)) = Var(f(x)) - Cov(f(x), D) Var(D)^-1 Cov(D, f(x))`
//!
//! computed through a single Cholesky factorization of the observation
//! covariance; no matrix is ever inverted explicitly.
//!
//! # Features
//!
//! * function-value observations, plus derivative observations along any
//!   subset of the input dimensions, each at its own set of points;
//! * squared exponential covariance kernel with its four derivative forms,
//!   behind the [`CovarianceKernel`] trait;
//! * adjusted expectation and adjusted variance at single points or over
//!   whole query sets, the latter evaluated in parallel.
//!
//! # Implementation
//!
//! ```
//! use baylin_emulator::{BayesLinear, DesignBuilder};
//! use ndarray::array;
//!
//! // four runs of a 1d simulator, values and first derivatives
//! let points = array![[0.0], [0.3], [0.7], [1.0]];
//! let values = array![0.0, 0.29552, 0.64422, 0.84147];
//! let slopes = array![1.0, 0.95534, 0.76484, 0.54030];
//!
//! let design = DesignBuilder::new(1)
//!     .values(&points, &values)
//!     .derivatives(0, &points, &slopes)
//!     .build()
//!     .unwrap();
//!
//! let emulator = BayesLinear::params()
//!     .theta(0.8)
//!     .sigma(1.0)
//!     .fit(design)
//!     .expect("emulator adjustment");
//!
//! let (expectation, variance): (f64, f64) = emulator.predict(&array![0.5]).expect("prediction");
//! assert!((expectation - 0.47943).abs() < 1e-3);
//! assert!(variance >= 0.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod algorithm;
mod covariance;
mod design;
mod errors;
pub mod kernels;
mod parameters;

pub use algorithm::{BayesLinear, Emulator};
pub use design::{Block, BlockKind, Design, DesignBuilder};
pub use errors::{EmulatorError, Result};
pub use kernels::{CovarianceKernel, SquaredExponential};
pub use parameters::{EmulatorParams, EmulatorValidParams};
