//! # Symbolic Engine Module
//!
//! Core expression tree for the calculator. An algebraic string is parsed into
//! an [`Expr`], which can then be pretty-printed, differentiated analytically,
//! evaluated against a parameter scope, or compiled into a plain Rust closure
//! for repeated evaluation (see `symbolic_engine_derivatives`).
//!
//! The variant set is the function vocabulary the calculator exposes:
//! arithmetic, powers, `exp`/`ln`/`log10`/`sqrt`/`abs`, direct and inverse
//! trigonometry, and the hyperbolic trio. Trigonometric variants use the
//! mathematical notation (`tg`, `arctg`) rather than the programming one.

#![allow(non_camel_case_types)]

use std::collections::HashMap;
use std::fmt;

/// Evaluation context: symbol name -> numeric value.
///
/// The sweep/solve variable is bound per sample by the caller; every other
/// entry persists across samples.
pub type ParamScope = HashMap<String, f64>;

/// Symbolic expression represented as a recursive abstract syntax tree.
///
/// Uses `Box<Expr>` for nesting, so arbitrarily deep expressions are possible.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable, e.g. "x", "theta", "r"
    Var(String),
    /// Numerical constant
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm
    Ln(Box<Expr>),
    /// Base-10 logarithm
    Log10(Box<Expr>),
    Sqrt(Box<Expr>),
    Abs(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent - mathematical notation 'tg'
    tg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// Arctangent - mathematical notation 'arctg'
    arctg(Box<Expr>),
    sinh(Box<Expr>),
    cosh(Box<Expr>),
    tanh(Box<Expr>),
}

/// Pretty printing with full parenthesization, so the output can be parsed
/// back and compared against expected trees in tests.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::Log10(expr) => write!(f, "log10({})", expr),
            Expr::Sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::Abs(expr) => write!(f, "abs({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::sinh(expr) => write!(f, "sinh({})", expr),
            Expr::cosh(expr) => write!(f, "cosh({})", expr),
            Expr::tanh(expr) => write!(f, "tanh({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Convenience wrapper for recursive construction.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(mut self, rhs: Expr) -> Expr {
        self = Expr::Pow(self.boxed(), rhs.boxed());
        self
    }

    /// Creates exponential function e^(self).
    pub fn exp(mut self) -> Expr {
        self = Expr::Exp(self.boxed());
        self
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(mut self) -> Expr {
        self = Expr::Ln(self.boxed());
        self
    }

    /// Creates square root sqrt(self).
    pub fn sqrt(mut self) -> Expr {
        self = Expr::Sqrt(self.boxed());
        self
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Const(val) => val == &0.0,
            _ => false,
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::Log10(expr)
            | Expr::Sqrt(expr)
            | Expr::Abs(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::sinh(expr)
            | Expr::cosh(expr)
            | Expr::tanh(expr) => expr.contains_variable(var_name),
        }
    }

    /// Collects the names of all variables occurring in the expression,
    /// sorted and deduplicated.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        self.collect_variables(&mut args);
        args.sort();
        args.dedup();
        args
    }

    fn collect_variables(&self, acc: &mut Vec<String>) {
        match self {
            Expr::Var(name) => acc.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.collect_variables(acc);
                right.collect_variables(acc);
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::Log10(expr)
            | Expr::Sqrt(expr)
            | Expr::Abs(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::sinh(expr)
            | Expr::cosh(expr)
            | Expr::tanh(expr) => expr.collect_variables(acc),
        }
    }

    /// Evaluates the expression against a parameter scope.
    ///
    /// An undefined symbol is an error; a non-finite value (division by zero,
    /// logarithm of a negative number, ...) is returned as-is so the caller
    /// can classify it (the curve sampler breaks a stroke on it, the
    /// calculator shell displays "Error").
    pub fn eval_with_scope(&self, scope: &ParamScope) -> Result<f64, String> {
        match self {
            Expr::Var(name) => match scope.get(name) {
                Some(val) => Ok(*val),
                None => match name.as_str() {
                    "pi" => Ok(std::f64::consts::PI),
                    "e" => Ok(std::f64::consts::E),
                    _ => Err(format!("undefined symbol {}", name)),
                },
            },
            Expr::Const(val) => Ok(*val),
            Expr::Add(lhs, rhs) => Ok(lhs.eval_with_scope(scope)? + rhs.eval_with_scope(scope)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.eval_with_scope(scope)? - rhs.eval_with_scope(scope)?),
            Expr::Mul(lhs, rhs) => Ok(lhs.eval_with_scope(scope)? * rhs.eval_with_scope(scope)?),
            Expr::Div(lhs, rhs) => Ok(lhs.eval_with_scope(scope)? / rhs.eval_with_scope(scope)?),
            Expr::Pow(base, exp) => Ok(base
                .eval_with_scope(scope)?
                .powf(exp.eval_with_scope(scope)?)),
            Expr::Exp(expr) => Ok(expr.eval_with_scope(scope)?.exp()),
            Expr::Ln(expr) => Ok(expr.eval_with_scope(scope)?.ln()),
            Expr::Log10(expr) => Ok(expr.eval_with_scope(scope)?.log10()),
            Expr::Sqrt(expr) => Ok(expr.eval_with_scope(scope)?.sqrt()),
            Expr::Abs(expr) => Ok(expr.eval_with_scope(scope)?.abs()),
            Expr::sin(expr) => Ok(expr.eval_with_scope(scope)?.sin()),
            Expr::cos(expr) => Ok(expr.eval_with_scope(scope)?.cos()),
            Expr::tg(expr) => Ok(expr.eval_with_scope(scope)?.tan()),
            Expr::arcsin(expr) => Ok(expr.eval_with_scope(scope)?.asin()),
            Expr::arccos(expr) => Ok(expr.eval_with_scope(scope)?.acos()),
            Expr::arctg(expr) => Ok(expr.eval_with_scope(scope)?.atan()),
            Expr::sinh(expr) => Ok(expr.eval_with_scope(scope)?.sinh()),
            Expr::cosh(expr) => Ok(expr.eval_with_scope(scope)?.cosh()),
            Expr::tanh(expr) => Ok(expr.eval_with_scope(scope)?.tanh()),
        }
    }

}
