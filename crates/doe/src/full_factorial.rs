use crate::SamplingMethod;
use crate::grid::cartesian_product;
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2, s};
use ndarray_stats::QuantileExt;

/// The FullFactorial design consists of all possible combinations
/// of evenly spaced levels for all components within the design space.
#[derive(Clone, Debug)]
pub struct FullFactorial<F: Float> {
    /// Design space definition:
    /// the ith row is the [lower_bound, upper_bound] of xi, the ith component of a sample x
    xlimits: Array2<F>,
}

impl<F: Float> FullFactorial<F> {
    /// Constructor given a design space as a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use baylin_doe::FullFactorial;
    /// use ndarray::arr2;
    ///
    /// let doe = FullFactorial::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        FullFactorial {
            xlimits: xlimits.to_owned(),
        }
    }
}

impl<F: Float> SamplingMethod<F> for FullFactorial<F> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<F> {
        //! the number of levels per component is chosen as evenly as possible
        let nx = self.xlimits.nrows();
        let weights: Array1<F> = Array1::ones(nx) / F::cast(nx);
        let mut num_levels: Array1<usize> = Array1::ones(nx);

        // add levels one at a time to the axis lagging most behind its weight
        while num_levels.fold(1, |acc, n| acc * n) < ns {
            let w: Array1<F> = &num_levels.mapv(|v| F::cast(v)) / F::cast(num_levels.sum());
            let ind = (&weights - &w).argmax().unwrap();
            num_levels[ind] += 1;
        }

        let levels = num_levels
            .iter()
            .map(|&n| Array1::linspace(F::zero(), F::one(), n))
            .collect::<Vec<_>>();
        let doe = cartesian_product(&levels);
        doe.slice(s![0..ns, ..]).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, array};

    #[test]
    fn test_ffact() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let expected = array![
            [5., 0.],
            [5., 0.5],
            [5., 1.],
            [7.5, 0.],
            [7.5, 0.5],
            [7.5, 1.],
            [10., 0.],
            [10., 0.5],
            [10., 1.],
        ];
        let actual = FullFactorial::new(&xlimits).sample(9);
        assert_abs_diff_eq!(expected, actual, epsilon = 1e-6);
    }

    #[test]
    fn test_ffact_design_grid() {
        // 4x4 design over [0.08, 0.92]^2 used as emulator training design
        let xlimits = arr2(&[[0.08, 0.92], [0.08, 0.92]]);
        let actual = FullFactorial::new(&xlimits).sample(16);
        assert_eq!(actual.nrows(), 16);
        let levels = array![0.08, 0.36, 0.64, 0.92];
        for (i, row) in actual.rows().into_iter().enumerate() {
            assert_abs_diff_eq!(row[0], levels[i / 4], epsilon = 1e-12);
            assert_abs_diff_eq!(row[1], levels[i % 4], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ffact_truncates() {
        let xlimits = arr2(&[[0., 1.], [0., 1.], [0., 1.]]);
        let actual = FullFactorial::new(&xlimits).sample(5);
        assert_eq!(actual.nrows(), 5);
        assert_eq!(actual.ncols(), 3);
    }
}
