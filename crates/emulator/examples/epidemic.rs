//! Emulate the final size of an SIR epidemic as a function of the contact
//! rate and the recovery rate, comparing the four emulator variants: no
//! derivative information, derivatives along either input, and both.
//!
//! The simulator integrates the SIR equations with a fixed-step RK4 scheme;
//! derivative observations come from central finite differences around each
//! design run.

use baylin_doe::{FullFactorial, SamplingMethod};
use baylin_emulator::{BayesLinear, Design, DesignBuilder, Emulator, SquaredExponential};
use ndarray::{array, Array1, Array2, Axis};

/// Fraction of the population ever infected, for a contact rate `beta`
/// and a recovery rate `gamma`, both mapped from [0, 1] design coordinates.
fn simulate(x: &[f64]) -> f64 {
    let beta = 0.5 + 2.5 * x[0];
    let gamma = 0.2 + 0.8 * x[1];

    // SIR with a single initial case in a closed population of 1
    let mut s = 0.999;
    let mut i = 0.001;
    let dt = 0.05;
    let deriv = |s: f64, i: f64| (-beta * s * i, beta * s * i - gamma * i);
    for _ in 0..4000 {
        let (ks1, ki1) = deriv(s, i);
        let (ks2, ki2) = deriv(s + 0.5 * dt * ks1, i + 0.5 * dt * ki1);
        let (ks3, ki3) = deriv(s + 0.5 * dt * ks2, i + 0.5 * dt * ki2);
        let (ks4, ki4) = deriv(s + dt * ks3, i + dt * ki3);
        s += dt / 6. * (ks1 + 2. * ks2 + 2. * ks3 + ks4);
        i += dt / 6. * (ki1 + 2. * ki2 + 2. * ki3 + ki4);
    }
    1. - s
}

fn central_difference(x: &[f64], axis: usize) -> f64 {
    let e = 1e-4;
    let mut hi = x.to_vec();
    let mut lo = x.to_vec();
    hi[axis] += e;
    lo[axis] -= e;
    (simulate(&hi) - simulate(&lo)) / (2. * e)
}

fn evaluate(points: &Array2<f64>, f: impl Fn(&[f64]) -> f64) -> Array1<f64> {
    points.map_axis(Axis(1), |p| f(p.as_slice().unwrap()))
}

fn build_design(points: &Array2<f64>, axes: &[usize]) -> Design<f64> {
    let mut builder = DesignBuilder::new(2).values(points, &evaluate(points, simulate));
    for &axis in axes {
        let grads = evaluate(points, |p| central_difference(p, axis));
        builder = builder.derivatives(axis, points, &grads);
    }
    builder.build().expect("design assembly")
}

fn fit(points: &Array2<f64>, axes: &[usize]) -> Emulator<f64, SquaredExponential> {
    BayesLinear::params()
        .theta(0.5)
        .sigma(0.4)
        .prior_mean(0.7)
        .fit(build_design(points, axes))
        .expect("emulator adjustment")
}

fn main() {
    env_logger::init();

    let xlimits = array![[0.08, 0.92], [0.08, 0.92]];
    let points = FullFactorial::new(&xlimits).sample(16);
    println!("Design: 16 full factorial runs over {xlimits}");

    // dense grid of unseen queries, with the true simulator response
    let queries = FullFactorial::new(&array![[0., 1.], [0., 1.]]).sample(400);
    let truth = evaluate(&queries, simulate);

    for (label, axes) in [
        ("values only", vec![]),
        ("values + d/dx1", vec![0]),
        ("values + d/dx2", vec![1]),
        ("values + both derivatives", vec![0, 1]),
    ] {
        let emulator = fit(&points, &axes);
        let (expectations, variances) = emulator
            .predict_set(&queries)
            .expect("emulator prediction");
        let rmse = ((&expectations - &truth).mapv(|d| d * d).mean().unwrap()).sqrt();
        let max_sd = variances.iter().cloned().fold(0_f64, f64::max).sqrt();
        println!("{emulator}");
        println!("  {label:<26} rmse = {rmse:.2e}, max sd = {max_sd:.2e}");
    }
}
