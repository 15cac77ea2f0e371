#![allow(non_snake_case)]
/// Single nonlinear equation solver with a full step trace.
/// Example#
/// ```
/// use RustedCalcLab::numerical::equation_solver::{EquationSolver, SolverMethod};
/// let mut solver = EquationSolver::new();
/// solver.set_equation("x^2 - 4 = 0", "x", SolverMethod::Newton, 1.0, 1e-4, 100);
/// let root = solver.solver().unwrap();
/// println!("root = {}, trace:\n{}", root, solver.step_table());
/// ```
pub mod equation_solver;
