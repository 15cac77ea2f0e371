/// Curve sampling and plotting.
/// Example#
/// ```
/// use RustedCalcLab::plotting::board::GraphBoard;
/// use RustedCalcLab::plotting::sampler::{GraphKind, sample, strokes};
/// let mut board = GraphBoard::new();
/// board.add_equation("1/x", GraphKind::Cartesian).unwrap();
/// // sample the hyperbola: two strokes, broken at the asymptote
/// let eq = board.equations.last().unwrap();
/// let path = sample(eq, &board.viewport, &board.parameter_range, &board.custom_parameters).unwrap();
/// let segments = strokes(path);
/// assert!(segments.len() >= 2);
/// ```
pub mod board;
pub mod presets;
pub mod sampler;
pub mod shapes;
pub mod viewport;
