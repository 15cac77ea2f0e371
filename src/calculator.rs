/// Calculator shell and matrix workbench.
/// Example#
/// ```
/// use RustedCalcLab::calculator::state::{CalculatorState, press};
/// let state = CalculatorState::default();
/// let state = ["2", "×", "π", "="]
///     .iter()
///     .fold(state, |state, button| press(&state, button));
/// assert_eq!(state.display, "6.28318531");
/// ```
pub mod matrix;
pub mod state;
