#![allow(non_snake_case)]
use RustedCalcLab::Utils::csv_out::{save_strokes_to_csv, save_trace_to_csv};
use RustedCalcLab::calculator::matrix::{MatrixOp, MatrixOutcome, MatrixWorkbench};
use RustedCalcLab::calculator::state::{CalculatorState, press};
use RustedCalcLab::numerical::equation_solver::{EquationSolver, SolverMethod};
use RustedCalcLab::plotting::board::GraphBoard;
use RustedCalcLab::plotting::sampler::{GraphKind, sample, strokes};

fn main() {
    let example = 0;
    match example {
        0 => {
            // SOLVE AN EQUATION WITH EVERY METHOD AND PRINT THE TRACES
            let mut solver = EquationSolver::new();
            for method in [
                SolverMethod::Newton,
                SolverMethod::Bisection,
                SolverMethod::Quadratic,
            ] {
                solver.set_equation("x^2 - 4 = 0", "x", method, 1.0, 1e-4, 100);
                match solver.solve() {
                    Ok(root) => {
                        println!("{} root = {}", method, root);
                        println!("{}", solver.step_table());
                    }
                    Err(e) => println!("{} failed: {}", method, e),
                }
            }
            solver.set_equation("x^3 - 1", "x", SolverMethod::Cubic, 1.0, 1e-4, 100);
            let root = solver.solve().unwrap();
            println!("cubic root = {}", root);
            println!("{}", solver.step_table());
            save_trace_to_csv(&solver.steps, "cubic_trace.csv").unwrap();
        }
        1 => {
            // SAMPLE A HYPERBOLA AND EXPORT THE STROKES
            let board = GraphBoard::new();
            let eq = RustedCalcLab::plotting::sampler::Equation {
                id: 1,
                expression: "1/x".to_string(),
                color: "#55ffff".to_string(),
                kind: GraphKind::Cartesian,
                visible: true,
                parameter: None,
            };
            let path = sample(
                &eq,
                &board.viewport,
                &board.parameter_range,
                &board.custom_parameters,
            )
            .unwrap();
            let segments = strokes(path);
            println!("hyperbola sampled into {} strokes", segments.len());
            let path = sample(
                &eq,
                &board.viewport,
                &board.parameter_range,
                &board.custom_parameters,
            )
            .unwrap();
            save_strokes_to_csv(path, "hyperbola.csv").unwrap();
        }
        2 => {
            // RENDER A SMALL GALLERY TO PNG
            let mut board = GraphBoard::new();
            board.add_preset("circleParametric").unwrap();
            board.add_preset("polarRose").unwrap();
            board.add_equation("star", GraphKind::Shape).unwrap();
            board.render("gallery.png").unwrap();
            println!("gallery.png written");
        }
        3 => {
            // DRIVE THE CALCULATOR SHELL THROUGH A BUTTON SEQUENCE
            let buttons = ["2", "×", "π", "=", "M+", "C", "MR", "x²", "="];
            let mut state = CalculatorState::default();
            for button in buttons {
                state = press(&state, button);
                println!("[{}] display = {}", button, state.display);
            }
            println!("history: {:?}", state.history);
        }
        4 => {
            // MATRIX WORKBENCH
            let mut bench = MatrixWorkbench::new();
            bench.set_dimensions(2, 2).unwrap();
            bench.matrix_a[(0, 0)] = 2.0;
            for op in [MatrixOp::Multiply, MatrixOp::DeterminantA, MatrixOp::TransposeB] {
                match bench.calculate(op) {
                    Ok(MatrixOutcome::Matrix(m)) => println!("{}:\n{}", op, m),
                    Ok(MatrixOutcome::Scalar {
                        label, explanation, ..
                    }) => println!("{}\n{}", label, explanation),
                    Err(e) => println!("{} failed: {}", op, e),
                }
            }
        }
        _ => {
            println!("no such example");
        }
    }
}
