/*!
This library generates the deterministic point sets consumed by the
`baylin-emulator` crate: design runs (the inputs at which an expensive
simulator is evaluated) and prediction grids (the inputs at which the
trained emulator is queried).

A sampling method generates points within a design space `xlimits`,
defined as a `(nx, 2)` matrix giving the lower and upper bound of each of
the `nx` components of a sample `x`.

Example:
```
use baylin_doe::{FullFactorial, Grid, SamplingMethod};
use ndarray::{arr2, array};

// Design space is [0.08, 0.92] x [0.08, 0.92], samples are 2-dimensional.
let xlimits = arr2(&[[0.08, 0.92], [0.08, 0.92]]);
// 16 design runs on a 4x4 full factorial design.
let designs = FullFactorial::new(&xlimits).sample(16);
// or the same points from explicit coordinate values
let grid = Grid::new(&[array![0.08, 0.36, 0.64, 0.92], array![0.08, 0.36, 0.64, 0.92]]);
approx::assert_abs_diff_eq!(designs, grid.points(), epsilon = 1e-12);
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod full_factorial;
mod grid;
mod traits;

pub use full_factorial::*;
pub use grid::*;
pub use traits::*;
