//! CSV export for sampled strokes and solver traces.

use crate::numerical::equation_solver::SolverStep;
use crate::plotting::sampler::PathCommand;
use csv::Writer;
use std::fs::File;
use std::io;

/// Writes a sampled command sequence as `stroke, x, y` rows; the stroke
/// column numbers the segments so breaks survive the export.
pub fn save_strokes_to_csv(
    commands: impl Iterator<Item = PathCommand>,
    filename: &str,
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["stroke", "x", "y"])?;

    let mut stroke = 0usize;
    for command in commands {
        if let PathCommand::MoveTo(..) = command {
            stroke += 1;
        }
        let (x, y) = command.point();
        writer.write_record(&[stroke.to_string(), x.to_string(), y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a solver trace; the column set follows the step variant of the
/// first record, as a trace never mixes variants.
pub fn save_trace_to_csv(steps: &[SolverStep], filename: &str) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    match steps.first() {
        Some(SolverStep::Iterative { .. }) => {
            writer.write_record(["iteration", "x", "f_x", "f_prime_x", "next_x"])?;
            for step in steps {
                if let SolverStep::Iterative {
                    iteration,
                    x,
                    f_x,
                    f_prime_x,
                    next_x,
                } = step
                {
                    writer.write_record(&[
                        iteration.to_string(),
                        x.to_string(),
                        f_x.to_string(),
                        f_prime_x.to_string(),
                        next_x.to_string(),
                    ])?;
                }
            }
        }
        Some(SolverStep::Bracketing { .. }) => {
            writer.write_record(["iteration", "a", "b", "c", "f_a", "f_b", "f_c"])?;
            for step in steps {
                if let SolverStep::Bracketing {
                    iteration,
                    a,
                    b,
                    c,
                    f_a,
                    f_b,
                    f_c,
                } = step
                {
                    writer.write_record(&[
                        iteration.to_string(),
                        a.to_string(),
                        b.to_string(),
                        c.to_string(),
                        f_a.to_string(),
                        f_b.to_string(),
                        f_c.to_string(),
                    ])?;
                }
            }
        }
        Some(SolverStep::QuadraticFit {
            a,
            b,
            c,
            discriminant,
            root1,
            root2,
        }) => {
            writer.write_record(["a", "b", "c", "discriminant", "root1", "root2"])?;
            writer.write_record(&[
                a.to_string(),
                b.to_string(),
                c.to_string(),
                discriminant.to_string(),
                root1.to_string(),
                root2.to_string(),
            ])?;
        }
        Some(SolverStep::CubicFit { a, b, c, d, root }) => {
            writer.write_record(["a", "b", "c", "d", "root"])?;
            writer.write_record(&[
                a.to_string(),
                b.to_string(),
                c.to_string(),
                d.to_string(),
                root.to_string(),
            ])?;
        }
        None => {}
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::equation_solver::{EquationSolver, SolverMethod};
    use crate::plotting::sampler::{Equation, GraphKind, ParamRange, sample};
    use crate::plotting::viewport::Viewport;
    use crate::symbolic::symbolic_engine::ParamScope;

    #[test]
    fn test_save_strokes_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hyperbola.csv");
        let eq = Equation {
            id: 1,
            expression: "1/x".to_string(),
            color: "#ff5555".to_string(),
            kind: GraphKind::Cartesian,
            visible: true,
            parameter: None,
        };
        let commands = sample(
            &eq,
            &Viewport::default(),
            &ParamRange::default(),
            &ParamScope::new(),
        )
        .unwrap();
        save_strokes_to_csv(commands, path.to_str().unwrap()).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("stroke,x,y"));
        // the asymptote break shows up as a second stroke index
        assert!(contents.lines().any(|line| line.starts_with("2,")));
    }

    #[test]
    fn test_save_trace_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let mut solver = EquationSolver::new();
        solver.set_equation("x^2 - 4 = 0", "x", SolverMethod::Newton, 1.0, 1e-4, 100);
        solver.loglevel = Some("off".to_string());
        solver.solve().unwrap();
        save_trace_to_csv(&solver.steps, path.to_str().unwrap()).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("iteration,x,f_x,f_prime_x,next_x"));
        assert_eq!(contents.lines().count(), solver.steps.len() + 1);
    }
}
