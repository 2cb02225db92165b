//! A module for assembling the combined observation vector of an emulator:
//! function values at design runs and, optionally, partial derivatives of
//! the simulator observed at further (possibly repeated) points.
//!
//! Observations are stacked in blocks, function values first and then one
//! block per derivative direction, in the order the caller supplied them.
//! The tagging is positional: covariance assembly relies on the block
//! metadata recorded here, not on anything embedded in the data.

use crate::errors::{EmulatorError, Result};
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2, concatenate};
use std::ops::Range;

/// The observation type of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Function value observations
    Value,
    /// Partial derivative observations along the given input dimension
    Deriv(usize),
}

/// A contiguous run of observations of one kind within the stacked vectors
#[derive(Clone, Debug)]
pub struct Block {
    kind: BlockKind,
    start: usize,
    len: usize,
}

impl Block {
    /// Observation type of the block
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Number of observations in the block
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index range of the block within the stacked observation vector
    pub(crate) fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Index of the first observation of the block
    pub(crate) fn start(&self) -> usize {
        self.start
    }
}

/// An assembled design: observation points, observed data and block layout.
///
/// Built with a [`DesignBuilder`]; immutable afterwards. The same physical
/// point may appear in several blocks when both the value and one or more
/// derivatives were observed there.
#[derive(Clone, Debug)]
pub struct Design<F: Float> {
    dim: usize,
    points: Array2<F>,
    observations: Array1<F>,
    blocks: Vec<Block>,
}

impl<F: Float> Design<F> {
    /// Dimension of the input space
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of observations, all blocks included
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the design holds no observation
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// All observation points stacked in block order as a (len, dim) matrix
    pub fn points(&self) -> &Array2<F> {
        &self.points
    }

    /// The observation vector `D`, aligned with `points`
    pub fn observations(&self) -> &Array1<F> {
        &self.observations
    }

    /// Block layout of the stacked vectors
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Input dimensions along which derivative observations are present,
    /// in block order
    pub fn active_axes(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .filter_map(|b| match b.kind {
                BlockKind::Deriv(axis) => Some(axis),
                BlockKind::Value => None,
            })
            .collect()
    }

    /// The prior mean vector `E_D` for a prior value mean `mean`.
    ///
    /// Derivative entries are exactly zero: the process has a constant prior
    /// mean, so its derivative has zero expectation. This is structural, not
    /// configurable.
    pub fn prior_mean(&self, mean: F) -> Array1<F> {
        let mut e_d = Array1::zeros(self.len());
        for block in &self.blocks {
            if block.kind == BlockKind::Value {
                e_d.slice_mut(ndarray::s![block.range()]).fill(mean);
            }
        }
        e_d
    }
}

/// A builder collecting the observation blocks of a [`Design`].
///
/// The function-value block is mandatory; derivative blocks are optional and
/// select the emulator variant (no derivatives, one direction, several).
pub struct DesignBuilder<F: Float> {
    dim: usize,
    values: Option<(Array2<F>, Array1<F>)>,
    derivatives: Vec<(usize, Array2<F>, Array1<F>)>,
}

impl<F: Float> DesignBuilder<F> {
    /// Constructor given the input space dimension
    pub fn new(dim: usize) -> Self {
        DesignBuilder {
            dim,
            values: None,
            derivatives: Vec::new(),
        }
    }

    /// Set the function-value observations: simulator outputs `observations`
    /// evaluated at the design runs `points` given as a (n, dim) matrix.
    pub fn values(
        mut self,
        points: &ArrayBase<impl Data<Elem = F>, Ix2>,
        observations: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Self {
        self.values = Some((points.to_owned(), observations.to_owned()));
        self
    }

    /// Append a block of partial derivative observations along input
    /// dimension `axis`, observed at `points` given as a (n_k, dim) matrix.
    ///
    /// `points` may repeat the value-block points; this is the usual case
    /// when derivatives were measured at the design runs themselves.
    pub fn derivatives(
        mut self,
        axis: usize,
        points: &ArrayBase<impl Data<Elem = F>, Ix2>,
        observations: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Self {
        self.derivatives
            .push((axis, points.to_owned(), observations.to_owned()));
        self
    }

    /// Validate the collected blocks and assemble the design.
    pub fn build(self) -> Result<Design<F>> {
        if self.dim == 0 {
            return Err(EmulatorError::Configuration(
                "input space dimension must be at least 1".to_string(),
            ));
        }
        let (value_points, value_obs) = self.values.ok_or_else(|| {
            EmulatorError::Configuration(
                "a design requires a function-value observation block".to_string(),
            )
        })?;

        Self::check_block(self.dim, "value", &value_points, &value_obs)?;

        let mut seen_axes: Vec<usize> = Vec::new();
        for (axis, points, obs) in &self.derivatives {
            if *axis >= self.dim {
                return Err(EmulatorError::DimensionMismatch(format!(
                    "derivative direction {} out of range for input dimension {}",
                    axis, self.dim
                )));
            }
            if seen_axes.contains(axis) {
                return Err(EmulatorError::Configuration(format!(
                    "duplicate derivative block for direction {axis}"
                )));
            }
            seen_axes.push(*axis);
            Self::check_block(self.dim, &format!("derivative (direction {axis})"), points, obs)?;
        }

        let mut blocks = vec![Block {
            kind: BlockKind::Value,
            start: 0,
            len: value_obs.len(),
        }];
        let mut point_views = vec![value_points.view()];
        let mut obs_views = vec![value_obs.view()];
        let mut offset = value_obs.len();
        for (axis, points, obs) in &self.derivatives {
            blocks.push(Block {
                kind: BlockKind::Deriv(*axis),
                start: offset,
                len: obs.len(),
            });
            offset += obs.len();
            point_views.push(points.view());
            obs_views.push(obs.view());
        }

        Ok(Design {
            dim: self.dim,
            points: concatenate(Axis(0), &point_views)
                .map_err(|e| EmulatorError::Configuration(e.to_string()))?,
            observations: concatenate(Axis(0), &obs_views)
                .map_err(|e| EmulatorError::Configuration(e.to_string()))?,
            blocks,
        })
    }

    fn check_block(
        dim: usize,
        what: &str,
        points: &Array2<F>,
        obs: &Array1<F>,
    ) -> Result<()> {
        if points.ncols() != dim {
            return Err(EmulatorError::DimensionMismatch(format!(
                "{} block points have {} components, input space has dimension {}",
                what,
                points.ncols(),
                dim
            )));
        }
        if points.nrows() != obs.len() {
            return Err(EmulatorError::Configuration(format!(
                "{} block has {} points but {} observations",
                what,
                points.nrows(),
                obs.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn sample_points() -> Array2<f64> {
        array![[0.1, 0.2], [0.5, 0.4], [0.9, 0.8]]
    }

    #[test]
    fn test_value_only_layout() {
        let design = DesignBuilder::new(2)
            .values(&sample_points(), &array![1., 2., 3.])
            .build()
            .unwrap();
        assert_eq!(design.len(), 3);
        assert_eq!(design.blocks().len(), 1);
        assert_eq!(design.blocks()[0].kind(), BlockKind::Value);
        assert!(design.active_axes().is_empty());
    }

    #[test]
    fn test_block_stacking_and_prior_mean() {
        let pts = sample_points();
        let design = DesignBuilder::new(2)
            .values(&pts, &array![1., 2., 3.])
            .derivatives(0, &pts, &array![10., 20., 30.])
            .derivatives(1, &pts, &array![-1., -2., -3.])
            .build()
            .unwrap();
        assert_eq!(design.len(), 9);
        assert_eq!(design.blocks().len(), 3);
        assert_eq!(design.blocks()[1].kind(), BlockKind::Deriv(0));
        assert_eq!(design.blocks()[2].kind(), BlockKind::Deriv(1));
        assert_eq!(design.active_axes(), vec![0, 1]);
        // repeated physical points appear once per block
        assert_abs_diff_eq!(design.points().row(0), design.points().row(3));
        assert_abs_diff_eq!(design.observations()[3], 10.);

        // E_D: prior value mean on the value block, structural zero elsewhere
        let e_d = design.prior_mean(500.);
        assert_abs_diff_eq!(e_d, array![500., 500., 500., 0., 0., 0., 0., 0., 0.]);
    }

    #[test]
    fn test_missing_value_block() {
        let err = DesignBuilder::new(2)
            .derivatives(0, &sample_points(), &array![1., 2., 3.])
            .build()
            .unwrap_err();
        assert!(matches!(err, EmulatorError::Configuration(_)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = DesignBuilder::new(2)
            .values(&sample_points(), &array![1., 2.])
            .build()
            .unwrap_err();
        assert!(matches!(err, EmulatorError::Configuration(_)));
    }

    #[test]
    fn test_point_dimension_mismatch() {
        let err = DesignBuilder::new(3)
            .values(&sample_points(), &array![1., 2., 3.])
            .build()
            .unwrap_err();
        assert!(matches!(err, EmulatorError::DimensionMismatch(_)));
    }

    #[test]
    fn test_axis_out_of_range() {
        let err = DesignBuilder::new(2)
            .values(&sample_points(), &array![1., 2., 3.])
            .derivatives(2, &sample_points(), &array![1., 2., 3.])
            .build()
            .unwrap_err();
        assert!(matches!(err, EmulatorError::DimensionMismatch(_)));
    }

    #[test]
    fn test_duplicate_axis() {
        let err = DesignBuilder::new(2)
            .values(&sample_points(), &array![1., 2., 3.])
            .derivatives(1, &sample_points(), &array![1., 2., 3.])
            .derivatives(1, &sample_points(), &array![1., 2., 3.])
            .build()
            .unwrap_err();
        assert!(matches!(err, EmulatorError::Configuration(_)));
    }
}
