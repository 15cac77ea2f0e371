//! # Equation Solver Module
//!
//! Finds one numeric root of a single nonlinear equation and records every
//! intermediate step, so the whole solve can be replayed as a table.
//!
//! Four independently selectable methods, all sharing the same error
//! taxonomy and never falling back to one another:
//! - **Newton-Raphson** on the symbolically derived first derivative;
//! - **bisection** with automatic widening of the initial interval;
//! - **quadratic fit**: the equation is probed at x = 0, 1, 2 and solved in
//!   closed form from the fitted coefficients;
//! - **cubic fit**: probed at x = 0, 1, 2, 3, then Newton-Raphson on the
//!   reconstructed polynomial (not on the original expression).
//!
//! An equation may contain one `=`; it is normalized to `lhs - rhs = 0`.
//! On success `result` and `steps` are stored; on failure neither field is
//! touched, so previously displayed traces stay valid.

use crate::symbolic::symbolic_engine::{Expr, ParamScope};
use chrono::Local;
use log::{error, info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
use std::fmt;
use std::time::Instant;
use strum_macros::{Display as StrumDisplay, EnumString};
use tabled::{builder::Builder, settings::Style};

/// |f'(x)| below this is treated as a vanishing derivative
const DERIVATIVE_FLOOR: f64 = 1e-10;
/// |leading coefficient| below this fails the quadratic/cubic fit
const COEFF_FLOOR: f64 = 1e-10;
/// how many times the bisection bracket may be widened by +-2^k
const WIDEN_ATTEMPTS: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SolverMethod {
    Newton,
    Bisection,
    Quadratic,
    Cubic,
}

/// One record of the solve trace, discriminated by the producing method so
/// rendering and tests can match exhaustively.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverStep {
    /// Newton-Raphson iteration
    Iterative {
        iteration: usize,
        x: f64,
        f_x: f64,
        f_prime_x: f64,
        next_x: f64,
    },
    /// bisection iteration; the endpoint values are re-evaluated for the
    /// record, not cached
    Bracketing {
        iteration: usize,
        a: f64,
        b: f64,
        c: f64,
        f_a: f64,
        f_b: f64,
        f_c: f64,
    },
    /// closed-form quadratic result
    QuadraticFit {
        a: f64,
        b: f64,
        c: f64,
        discriminant: f64,
        root1: f64,
        root2: f64,
    },
    /// fitted cubic coefficients and the one numerically found root
    CubicFit {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        root: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// the equation failed to parse or references an unknown symbol
    Expression(String),
    DerivativeNearZero,
    Diverging,
    MaxIterationsExceeded,
    NoSignChange,
    NotQuadratic,
    NotCubic,
    ComplexRoots,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::Expression(msg) => write!(f, "{}", msg),
            SolverError::DerivativeNearZero => write!(
                f,
                "Derivative is too close to zero. Try a different initial guess."
            ),
            SolverError::Diverging => write!(
                f,
                "The method is not converging. Try a different initial guess."
            ),
            SolverError::MaxIterationsExceeded => {
                write!(f, "Maximum iterations reached without convergence.")
            }
            SolverError::NoSignChange => write!(
                f,
                "Could not find an interval with a sign change. Try a different initial guess."
            ),
            SolverError::NotQuadratic => write!(
                f,
                "This is not a quadratic equation. The coefficient of x^2 is too close to zero."
            ),
            SolverError::NotCubic => write!(
                f,
                "This is not a cubic equation. The coefficient of x^3 is too close to zero."
            ),
            SolverError::ComplexRoots => write!(f, "This equation has complex roots."),
        }
    }
}

impl std::error::Error for SolverError {}

/// three-valued sign, so an exact zero at an endpoint ends the bracket search
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub struct EquationSolver {
    pub equation: String,   // equation text, may contain one '='
    pub variable: String,   // the solve variable
    pub method: SolverMethod,
    pub initial_guess: f64, // used by newton, bisection and cubic
    pub tolerance: f64,
    pub max_iterations: usize,

    pub result: Option<f64>,      // root of the last successful solve
    pub steps: Vec<SolverStep>,   // trace of the last successful solve
    pub loglevel: Option<String>, // "info"/"warn"/"error"/"off"
}

impl EquationSolver {
    pub fn new() -> EquationSolver {
        EquationSolver {
            equation: "x^2 - 4 = 0".to_string(),
            variable: "x".to_string(),
            method: SolverMethod::Newton,
            initial_guess: 1.0,
            tolerance: 1e-4,
            max_iterations: 100,
            result: None,
            steps: Vec::new(),
            loglevel: Some("info".to_string()),
        }
    }

    pub fn set_equation(
        &mut self,
        equation: &str,
        variable: &str,
        method: SolverMethod,
        initial_guess: f64,
        tolerance: f64,
        max_iterations: usize,
    ) {
        assert!(!equation.trim().is_empty(), "Equation should not be empty.");
        assert!(!variable.trim().is_empty(), "Variable should not be empty.");
        assert!(
            tolerance >= 0.0,
            "Tolerance should be a non-negative number."
        );
        assert!(
            max_iterations > 0,
            "Max iterations should be a positive number."
        );
        self.equation = equation.to_string();
        self.variable = variable.to_string();
        self.method = method;
        self.initial_guess = initial_guess;
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
    }

    /// "lhs = rhs" is turned into "(lhs) - (rhs)"; text without '=' is
    /// treated as already zeroed
    fn zeroed_equation(&self) -> String {
        if let Some((left, right)) = self.equation.split_once('=') {
            format!("({}) - ({})", left.trim(), right.trim())
        } else {
            self.equation.clone()
        }
    }

    fn parse(&self) -> Result<Expr, SolverError> {
        Expr::parse_expression(&self.zeroed_equation()).map_err(SolverError::Expression)
    }

    fn compile(&self, expr: &Expr) -> Result<Box<dyn Fn(f64) -> f64>, SolverError> {
        expr.lambdify1D_with_scope(&self.variable, &ParamScope::new())
            .map_err(SolverError::Expression)
    }

    /////////////////////////////////////////////////////////////////////////
    //                            METHODS
    /////////////////////////////////////////////////////////////////////////

    fn solve_newton_raphson(&mut self) -> Result<f64, SolverError> {
        let parsed = self.parse()?;
        let deriv = parsed.diff(&self.variable);
        let f = self.compile(&parsed)?;
        let f_prime = self.compile(&deriv)?;

        let mut x = self.initial_guess;
        let mut prev_x = x;
        let mut iter = 0usize;
        let mut steps: Vec<SolverStep> = Vec::new();

        while iter < self.max_iterations {
            let f_x = f(x);
            let f_prime_x = f_prime(x);
            if f_prime_x.abs() < DERIVATIVE_FLOOR {
                return Err(SolverError::DerivativeNearZero);
            }
            let next_x = x - f_x / f_prime_x;
            // the step record goes in before the convergence test
            steps.push(SolverStep::Iterative {
                iteration: iter + 1,
                x,
                f_x,
                f_prime_x,
                next_x,
            });
            if (next_x - x).abs() < self.tolerance {
                self.result = Some(next_x);
                self.steps = steps;
                return Ok(next_x);
            }
            x = next_x;
            iter += 1;
            info!("iteration = {}, x = {}", iter, x);
            if iter > 3 && (x - prev_x).abs() > prev_x.abs() {
                warn!("step size is growing relative to the previous iterate");
                return Err(SolverError::Diverging);
            }
            prev_x = x;
        }
        Err(SolverError::MaxIterationsExceeded)
    }

    fn solve_bisection(&mut self) -> Result<f64, SolverError> {
        let parsed = self.parse()?;
        let f = self.compile(&parsed)?;

        let mut a = self.initial_guess;
        let mut b = a + 1.0;
        let f_a0 = f(a);
        let mut f_b = f(b);

        // widen the bracket by +-2^k until f changes sign
        let mut attempts = 0u32;
        while sign(f_a0) == sign(f_b) && attempts < WIDEN_ATTEMPTS {
            b = if a < 0.0 {
                a - 2f64.powi(attempts as i32)
            } else {
                a + 2f64.powi(attempts as i32)
            };
            f_b = f(b);
            attempts += 1;
        }
        if sign(f_a0) == sign(f_b) {
            return Err(SolverError::NoSignChange);
        }

        let mut steps: Vec<SolverStep> = Vec::new();
        let mut iter = 0usize;
        while iter < self.max_iterations {
            let c = (a + b) / 2.0;
            let f_c = f(c);
            // endpoints are re-evaluated for every record, not cached
            steps.push(SolverStep::Bracketing {
                iteration: iter + 1,
                a,
                b,
                c,
                f_a: f(a),
                f_b: f(b),
                f_c,
            });
            if f_c.abs() < self.tolerance || (b - a).abs() < self.tolerance {
                self.result = Some(c);
                self.steps = steps;
                return Ok(c);
            }
            if sign(f_c) == sign(f(a)) {
                a = c;
            } else {
                b = c;
            }
            iter += 1;
            info!("iteration = {}, interval = [{}, {}]", iter, a, b);
        }
        Err(SolverError::MaxIterationsExceeded)
    }

    fn solve_quadratic(&mut self) -> Result<f64, SolverError> {
        let parsed = self.parse()?;
        let f = self.compile(&parsed)?;

        // fit a*x^2 + b*x + c through the probes at x = 0, 1, 2
        let x0 = f(0.0);
        let x1 = f(1.0);
        let x2 = f(2.0);
        let a = (x2 - 2.0 * x1 + x0) / 2.0;
        let b = x1 - x0 - a;
        let c = x0;

        if a.abs() < COEFF_FLOOR {
            return Err(SolverError::NotQuadratic);
        }
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Err(SolverError::ComplexRoots);
        }
        let sqrt_disc = discriminant.sqrt();
        let root1 = (-b + sqrt_disc) / (2.0 * a);
        let root2 = (-b - sqrt_disc) / (2.0 * a);

        self.steps = vec![SolverStep::QuadraticFit {
            a,
            b,
            c,
            discriminant,
            root1,
            root2,
        }];
        self.result = Some(root1);
        Ok(root1)
    }

    fn solve_cubic(&mut self) -> Result<f64, SolverError> {
        let parsed = self.parse()?;
        let f = self.compile(&parsed)?;

        // fit a*x^3 + b*x^2 + c*x + d through the probes at x = 0, 1, 2, 3
        // by third-order forward differences
        let x0 = f(0.0);
        let x1 = f(1.0);
        let x2 = f(2.0);
        let x3 = f(3.0);
        let a = (x3 - 3.0 * x2 + 3.0 * x1 - x0) / 6.0;
        let b = (x2 - 2.0 * x1 + x0) / 2.0 - 3.0 * a;
        let c = x1 - x0 - a - b;
        let d = x0;

        if a.abs() < COEFF_FLOOR {
            return Err(SolverError::NotCubic);
        }

        // Newton-Raphson on the reconstructed polynomial, not on the
        // original expression
        let mut x = self.initial_guess;
        let mut iter = 0usize;
        while iter < self.max_iterations {
            let fval = a * x * x * x + b * x * x + c * x + d;
            let f_prime = 3.0 * a * x * x + 2.0 * b * x + c;
            if f_prime.abs() < DERIVATIVE_FLOOR {
                return Err(SolverError::DerivativeNearZero);
            }
            let next_x = x - fval / f_prime;
            if (next_x - x).abs() < self.tolerance {
                self.steps = vec![SolverStep::CubicFit {
                    a,
                    b,
                    c,
                    d,
                    root: next_x,
                }];
                self.result = Some(next_x);
                return Ok(next_x);
            }
            x = next_x;
            iter += 1;
        }
        Err(SolverError::MaxIterationsExceeded)
    }

    /////////////////////////////////////////////////////////////////////////
    //                            ENTRY POINTS
    /////////////////////////////////////////////////////////////////////////

    /// dispatches to the selected method; no method falls back to another
    pub fn solver(&mut self) -> Result<f64, SolverError> {
        info!(
            "solving {} for {} by {} method, started at {}",
            self.equation,
            self.variable,
            self.method,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let begin = Instant::now();
        let res = match self.method {
            SolverMethod::Newton => self.solve_newton_raphson(),
            SolverMethod::Bisection => self.solve_bisection(),
            SolverMethod::Quadratic => self.solve_quadratic(),
            SolverMethod::Cubic => self.solve_cubic(),
        };
        match &res {
            Ok(root) => {
                info!("root found: {}", root);
                info!("\n \n SOLUTION STEPS \n \n {}", self.step_table());
            }
            Err(e) => error!("{}", e),
        }
        info!("solution took {:?}", begin.elapsed());
        res
    }

    // wrapper around solver function to implement logging
    pub fn solve(&mut self) -> Result<f64, SolverError> {
        let is_logging_disabled = self
            .loglevel
            .as_ref()
            .map(|level| level == "off" || level == "none")
            .unwrap_or(false);

        if is_logging_disabled {
            self.solver()
        } else {
            let log_option = match self.loglevel.as_deref() {
                Some("debug") | Some("info") | None => LevelFilter::Info,
                Some("warn") => LevelFilter::Warn,
                Some("error") => LevelFilter::Error,
                Some(_) => panic!("loglevel must be debug, info, warn or error"),
            };
            let logger_instance = CombinedLogger::init(vec![TermLogger::new(
                log_option,
                Config::default(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )]);
            match logger_instance {
                Ok(()) => {
                    let res = self.solver();
                    info!("solve finished");
                    res
                }
                // logger already set up by an earlier solve
                Err(_) => self.solver(),
            }
        }
    }

    pub fn get_result(&self) -> Option<f64> {
        self.result
    }

    /// renders the trace of the last successful solve with headers matching
    /// the step variant
    pub fn step_table(&self) -> String {
        let mut builder = Builder::default();
        match self.steps.first() {
            Some(SolverStep::Iterative { .. }) => {
                builder.push_record(["iteration", "x", "f(x)", "f'(x)", "next x"]);
                for step in &self.steps {
                    if let SolverStep::Iterative {
                        iteration,
                        x,
                        f_x,
                        f_prime_x,
                        next_x,
                    } = step
                    {
                        builder.push_record([
                            iteration.to_string(),
                            format!("{:.6}", x),
                            format!("{:.6}", f_x),
                            format!("{:.6}", f_prime_x),
                            format!("{:.6}", next_x),
                        ]);
                    }
                }
            }
            Some(SolverStep::Bracketing { .. }) => {
                builder.push_record(["iteration", "a", "b", "c", "f(a)", "f(b)", "f(c)"]);
                for step in &self.steps {
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
                        builder.push_record([
                            iteration.to_string(),
                            format!("{:.6}", a),
                            format!("{:.6}", b),
                            format!("{:.6}", c),
                            format!("{:.6}", f_a),
                            format!("{:.6}", f_b),
                            format!("{:.6}", f_c),
                        ]);
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
                builder.push_record(["a", format!("{:.6}", a).as_str()]);
                builder.push_record(["b", format!("{:.6}", b).as_str()]);
                builder.push_record(["c", format!("{:.6}", c).as_str()]);
                builder.push_record(["discriminant", format!("{:.6}", discriminant).as_str()]);
                builder.push_record(["root 1", format!("{:.6}", root1).as_str()]);
                builder.push_record(["root 2", format!("{:.6}", root2).as_str()]);
            }
            Some(SolverStep::CubicFit { a, b, c, d, root }) => {
                builder.push_record(["a", format!("{:.6}", a).as_str()]);
                builder.push_record(["b", format!("{:.6}", b).as_str()]);
                builder.push_record(["c", format!("{:.6}", c).as_str()]);
                builder.push_record(["d", format!("{:.6}", d).as_str()]);
                builder.push_record(["found root", format!("{:.6}", root).as_str()]);
            }
            None => return String::new(),
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

///////////////////////////////////////////////////////////////////////////////
//                                   TESTS
///////////////////////////////////////////////////////////////////////////////
