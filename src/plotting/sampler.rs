//! # Curve Sampler Module
//!
//! Turns an equation into a lazy, finite, restartable sequence of canvas
//! draw commands. A stroke is a maximal `MoveTo, LineTo*` run; a `MoveTo`
//! after the first command is the break sentinel.
//!
//! The expression is compiled exactly once per sweep; after that every
//! sample is a plain closure call. A stroke breaks when a value comes out
//! non-finite, when a cartesian sweep jumps vertically by more than a
//! quarter of the canvas height between neighbouring columns, or when the
//! mapped point lands further than 1000 px outside the canvas.
//!
//! Sampling is pure: the same equation, viewport, parameter range and scope
//! always produce the same command sequence.

use crate::plotting::shapes;
use crate::plotting::viewport::Viewport;
use crate::symbolic::symbolic_engine::{Expr, ParamScope};
use itertools::iterate;
use std::fmt;
use strum_macros::{Display as StrumDisplay, EnumString};

/// how far outside the canvas a point may land before the stroke breaks
const CANVAS_MARGIN: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum GraphKind {
    Cartesian,
    Parametric,
    Polar,
    Shape,
}

/// sweep domain for parametric and polar equations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ParamRange {
    fn default() -> Self {
        ParamRange {
            min: 0.0,
            max: 2.0 * std::f64::consts::PI,
            step: 0.01,
        }
    }
}

/// One plotted equation. Created on user submission, toggled or removed by
/// user action; lives as long as the owning board.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub id: usize,
    pub expression: String,
    pub color: String,
    pub kind: GraphKind,
    pub visible: bool,
    pub parameter: Option<ParamRange>,
}

/// Canvas draw command in pixels, mirroring the 2D path API the strokes are
/// ultimately rendered with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
}

impl PathCommand {
    pub fn point(&self) -> (f64, f64) {
        match *self {
            PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => (x, y),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SampleError {
    /// the expression failed to parse or references an unknown symbol
    Expression(String),
    /// a parametric expression that is not exactly [x(t), y(t)]
    InvalidParametricShape,
    UnknownShape(String),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleError::Expression(msg) => write!(f, "{}", msg),
            SampleError::InvalidParametricShape => {
                write!(f, "Parametric equation must return [x, y]")
            }
            SampleError::UnknownShape(name) => write!(f, "Unknown shape: {}", name),
        }
    }
}

impl std::error::Error for SampleError {}

/// Lazy sweep over a sample domain. Holds the compiled evaluator and the
/// pen state; each `next()` advances the domain until it can emit a command
/// or the domain is exhausted.
pub struct StrokeSweep {
    domain: Box<dyn Iterator<Item = f64>>,
    /// sample parameter -> canvas point
    eval: Box<dyn Fn(f64) -> (f64, f64)>,
    width: f64,
    height: f64,
    /// vertical jump that breaks a cartesian stroke; None for parametric
    /// and polar sweeps
    jump_threshold: Option<f64>,
    last_y: Option<f64>,
    pen_down: bool,
}

impl Iterator for StrokeSweep {
    type Item = PathCommand;

    fn next(&mut self) -> Option<PathCommand> {
        loop {
            let s = self.domain.next()?;
            let (cx, cy) = (self.eval)(s);
            if !cx.is_finite() || !cy.is_finite() {
                self.pen_down = false;
                continue;
            }
            if let (Some(threshold), Some(last_y)) = (self.jump_threshold, self.last_y) {
                // discontinuity heuristic; the point itself is still drawn
                if (cy - last_y).abs() > threshold {
                    self.pen_down = false;
                }
            }
            if cx < -CANVAS_MARGIN
                || cx > self.width + CANVAS_MARGIN
                || cy < -CANVAS_MARGIN
                || cy > self.height + CANVAS_MARGIN
            {
                self.pen_down = false;
                continue;
            }
            let command = if self.pen_down {
                PathCommand::LineTo(cx, cy)
            } else {
                PathCommand::MoveTo(cx, cy)
            };
            self.pen_down = true;
            self.last_y = Some(cy);
            return Some(command);
        }
    }
}

/// The lazy command sequence for one equation.
pub enum CurvePath {
    Sweep(StrokeSweep),
    Shape(std::vec::IntoIter<PathCommand>),
}

impl fmt::Debug for CurvePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurvePath::Sweep(_) => write!(f, "CurvePath::Sweep(..)"),
            CurvePath::Shape(_) => write!(f, "CurvePath::Shape(..)"),
        }
    }
}

impl Iterator for CurvePath {
    type Item = PathCommand;

    fn next(&mut self) -> Option<PathCommand> {
        match self {
            CurvePath::Sweep(sweep) => sweep.next(),
            CurvePath::Shape(commands) => commands.next(),
        }
    }
}

/// stepped domain min, min+step, ... up to and including max
fn stepped_domain(range: ParamRange) -> Box<dyn Iterator<Item = f64>> {
    let ParamRange { min, max, step } = range;
    Box::new(iterate(min, move |t| t + step).take_while(move |t| *t <= max))
}

fn cartesian_sweep(
    expression: &str,
    viewport: Viewport,
    scope: &ParamScope,
) -> Result<StrokeSweep, SampleError> {
    let parsed = Expr::parse_expression(expression).map_err(SampleError::Expression)?;
    let f = parsed
        .lambdify1D_with_scope("x", scope)
        .map_err(SampleError::Expression)?;
    let columns = (viewport.width as usize) + 1;
    let eval = move |i: f64| {
        let (x, _) = viewport.canvas_to_graph(i, 0.0);
        let y = f(x);
        let (_, canvas_y) = viewport.graph_to_canvas(x, y);
        // one sample per pixel column; the emitted x is the column itself
        (i, canvas_y)
    };
    Ok(StrokeSweep {
        domain: Box::new((0..columns).map(|i| i as f64)),
        eval: Box::new(eval),
        width: viewport.width,
        height: viewport.height,
        jump_threshold: Some(viewport.height / 4.0),
        last_y: None,
        pen_down: false,
    })
}

fn parametric_sweep(
    expression: &str,
    viewport: Viewport,
    range: ParamRange,
    scope: &ParamScope,
) -> Result<StrokeSweep, SampleError> {
    let parts = Expr::parse_vector_expression(expression).map_err(SampleError::Expression)?;
    if parts.len() != 2 {
        return Err(SampleError::InvalidParametricShape);
    }
    let fx = parts[0]
        .lambdify1D_with_scope("t", scope)
        .map_err(SampleError::Expression)?;
    let fy = parts[1]
        .lambdify1D_with_scope("t", scope)
        .map_err(SampleError::Expression)?;
    let eval = move |t: f64| viewport.graph_to_canvas(fx(t), fy(t));
    Ok(StrokeSweep {
        domain: stepped_domain(range),
        eval: Box::new(eval),
        width: viewport.width,
        height: viewport.height,
        jump_threshold: None,
        last_y: None,
        pen_down: false,
    })
}

fn polar_sweep(
    expression: &str,
    viewport: Viewport,
    range: ParamRange,
    scope: &ParamScope,
) -> Result<StrokeSweep, SampleError> {
    let parsed = Expr::parse_expression(expression).map_err(SampleError::Expression)?;
    let f = parsed
        .lambdify1D_with_scope("theta", scope)
        .map_err(SampleError::Expression)?;
    let eval = move |theta: f64| {
        let r = f(theta);
        let x = r * theta.cos();
        let y = r * theta.sin();
        viewport.graph_to_canvas(x, y)
    };
    Ok(StrokeSweep {
        domain: stepped_domain(range),
        eval: Box::new(eval),
        width: viewport.width,
        height: viewport.height,
        jump_threshold: None,
        last_y: None,
        pen_down: false,
    })
}

/// Samples one equation into its lazy command sequence.
///
/// `fallback_range` is used when the equation carries no parameter range of
/// its own; `scope` supplies the custom parameters (r, a, b, n, ...). The
/// sweep variable (x, t or theta) is bound per sample and shadows nothing
/// in the scope.
pub fn sample(
    equation: &Equation,
    viewport: &Viewport,
    fallback_range: &ParamRange,
    scope: &ParamScope,
) -> Result<CurvePath, SampleError> {
    let range = equation.parameter.unwrap_or(*fallback_range);
    match equation.kind {
        GraphKind::Cartesian => Ok(CurvePath::Sweep(cartesian_sweep(
            &equation.expression,
            *viewport,
            scope,
        )?)),
        GraphKind::Parametric => Ok(CurvePath::Sweep(parametric_sweep(
            &equation.expression,
            *viewport,
            range,
            scope,
        )?)),
        GraphKind::Polar => Ok(CurvePath::Sweep(polar_sweep(
            &equation.expression,
            *viewport,
            range,
            scope,
        )?)),
        GraphKind::Shape => Ok(CurvePath::Shape(
            shapes::shape_path(&equation.expression, viewport)?.into_iter(),
        )),
    }
}

/// Groups a command sequence into drawable segments: each stroke starts at
/// a MoveTo and extends through the following LineTo run.
pub fn strokes(path: impl Iterator<Item = PathCommand>) -> Vec<Vec<(f64, f64)>> {
    let mut result: Vec<Vec<(f64, f64)>> = Vec::new();
    for command in path {
        match command {
            PathCommand::MoveTo(x, y) => result.push(vec![(x, y)]),
            PathCommand::LineTo(x, y) => {
                if let Some(stroke) = result.last_mut() {
                    stroke.push((x, y));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn equation(expression: &str, kind: GraphKind) -> Equation {
        Equation {
            id: 1,
            expression: expression.to_string(),
            color: "#ff5555".to_string(),
            kind,
            visible: true,
            parameter: None,
        }
    }

    fn default_scope() -> ParamScope {
        let mut scope = ParamScope::new();
        scope.insert("r".to_string(), 5.0);
        scope.insert("a".to_string(), 2.0);
        scope.insert("b".to_string(), 3.0);
        scope.insert("n".to_string(), 3.0);
        scope
    }

    #[test]
    fn test_cartesian_hyperbola_breaks_at_asymptote() {
        let eq = equation("1/x", GraphKind::Cartesian);
        let path = sample(&eq, &Viewport::default(), &ParamRange::default(), &default_scope())
            .unwrap();
        let segments = strokes(path);
        assert!(
            segments.len() >= 2,
            "expected a break near x = 0, got {} strokes",
            segments.len()
        );
    }

    #[test]
    fn test_cartesian_parabola_is_one_stroke() {
        let eq = equation("x^2 / 20", GraphKind::Cartesian);
        let path = sample(&eq, &Viewport::default(), &ParamRange::default(), &default_scope())
            .unwrap();
        let segments = strokes(path);
        assert_eq!(segments.len(), 1);
        // one sample per pixel column
        assert_eq!(segments[0].len(), 801);
    }

    #[test]
    fn test_parametric_circle_stays_on_unit_circle() {
        let eq = equation("[cos(t), sin(t)]", GraphKind::Parametric);
        let viewport = Viewport::default();
        let path = sample(&eq, &viewport, &ParamRange::default(), &default_scope()).unwrap();
        let mut count = 0;
        for command in path {
            let (cx, cy) = command.point();
            let (x, y) = viewport.canvas_to_graph(cx, cy);
            assert_relative_eq!(x * x + y * y, 1.0, epsilon = 1e-9);
            count += 1;
        }
        assert!(count > 600);
    }

    #[test]
    fn test_polar_rose_uses_scope_parameters() {
        let eq = equation("r*cos(n*theta)", GraphKind::Polar);
        let viewport = Viewport::default();
        let path = sample(&eq, &viewport, &ParamRange::default(), &default_scope()).unwrap();
        // at theta = 0 the radius is r = 5
        let first = path.into_iter().next().unwrap();
        let (cx, cy) = first.point();
        let (x, y) = viewport.canvas_to_graph(cx, cy);
        assert_relative_eq!(x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let eq = equation("tan(x)", GraphKind::Cartesian);
        let viewport = Viewport::default();
        let range = ParamRange::default();
        let scope = default_scope();
        let first: Vec<PathCommand> = sample(&eq, &viewport, &range, &scope).unwrap().collect();
        let second: Vec<PathCommand> = sample(&eq, &viewport, &range, &scope).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parametric_arity_is_checked() {
        let eq = equation("[cos(t), sin(t), t]", GraphKind::Parametric);
        let err = sample(&eq, &Viewport::default(), &ParamRange::default(), &default_scope())
            .unwrap_err();
        assert_eq!(err, SampleError::InvalidParametricShape);
    }

    #[test]
    fn test_undefined_symbol_is_a_sample_error() {
        let eq = equation("q*x", GraphKind::Cartesian);
        let err = sample(&eq, &Viewport::default(), &ParamRange::default(), &default_scope())
            .unwrap_err();
        match err {
            SampleError::Expression(msg) => assert!(msg.contains("undefined symbol q")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_equation_parameter_overrides_fallback() {
        let mut eq = equation("[cos(t), sin(t)]", GraphKind::Parametric);
        eq.parameter = Some(ParamRange {
            min: 0.0,
            max: 1.0,
            step: 0.5,
        });
        let path = sample(&eq, &Viewport::default(), &ParamRange::default(), &default_scope())
            .unwrap();
        // t = 0, 0.5, 1.0
        assert_eq!(path.count(), 3);
    }
}
