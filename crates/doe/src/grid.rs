use linfa::Float;
use ndarray::{Array1, Array2};

/// Computes the Cartesian product of per-axis coordinate values.
///
/// Rows are ordered with the first axis varying slowest and the last axis
/// fastest, matching the layout produced by [`FullFactorial`](crate::FullFactorial).
///
/// *Panics* if `levels` is empty or if any axis has no coordinate values.
pub fn cartesian_product<F: Float>(levels: &[Array1<F>]) -> Array2<F> {
    if levels.is_empty() {
        panic!("cartesian_product requires at least one axis");
    }
    let nx = levels.len();
    let nrows = levels.iter().fold(1, |acc, l| {
        if l.is_empty() {
            panic!("cartesian_product requires at least one value per axis");
        }
        acc * l.len()
    });

    // stride of axis j = product of the level counts of the axes after j
    let mut strides = vec![1; nx];
    for j in (0..nx - 1).rev() {
        strides[j] = strides[j + 1] * levels[j + 1].len();
    }

    let mut points = Array2::zeros((nrows, nx));
    for r in 0..nrows {
        for j in 0..nx {
            points[[r, j]] = levels[j][(r / strides[j]) % levels[j].len()];
        }
    }
    points
}

/// A deterministic grid given as explicit coordinate values per axis.
///
/// Used both for design runs taken at chosen coordinate values and for the
/// prediction grids over which an emulator is evaluated.
#[derive(Clone, Debug)]
pub struct Grid<F: Float> {
    levels: Vec<Array1<F>>,
}

impl<F: Float> Grid<F> {
    /// Constructor given the coordinate values of each axis.
    ///
    /// *Panics* if no axis is given or if an axis has no coordinate values.
    pub fn new(levels: &[Array1<F>]) -> Self {
        if levels.is_empty() || levels.iter().any(|l| l.is_empty()) {
            panic!("Grid requires at least one value per axis");
        }
        Grid {
            levels: levels.to_vec(),
        }
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.levels.iter().map(|l| l.len()).product()
    }

    /// Whether the grid is empty (never true for a constructed grid)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the grid points
    pub fn n_axes(&self) -> usize {
        self.levels.len()
    }

    /// All grid points as a (len, n_axes) matrix, first axis varying slowest
    pub fn points(&self) -> Array2<F> {
        cartesian_product(&self.levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_cartesian_product() {
        let actual = cartesian_product(&[array![0., 1.], array![10., 20., 30.]]);
        let expected = array![
            [0., 10.],
            [0., 20.],
            [0., 30.],
            [1., 10.],
            [1., 20.],
            [1., 30.]
        ];
        assert_abs_diff_eq!(expected, actual, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_points() {
        let grid = Grid::new(&[array![0.08, 0.36, 0.64, 0.92], array![0.08, 0.92]]);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.n_axes(), 2);
        let pts = grid.points();
        assert_eq!(pts.nrows(), 8);
        assert_abs_diff_eq!(pts.row(0)[0], 0.08);
        assert_abs_diff_eq!(pts.row(7)[1], 0.92);
    }

    #[test]
    #[should_panic]
    fn test_empty_axis_panics() {
        let _ = cartesian_product::<f64>(&[array![0., 1.], array![]]);
    }
}
