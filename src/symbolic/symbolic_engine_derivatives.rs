//! Analytical differentiation and lambdification.
//!
//! `diff` implements the standard calculus rules (product, quotient, chain,
//! power) by exhaustive pattern matching over the expression tree. The
//! lambdify functions convert an expression into a plain Rust closure once,
//! so the solver and the curve sampler can evaluate it thousands of times
//! without touching the tree again. Every variable that is not the sweep
//! variable is resolved from the parameter scope at compile time, so the
//! returned closure itself cannot fail - it can only produce non-finite
//! values, which the callers classify.

use crate::symbolic::symbolic_engine::{Expr, ParamScope};

impl Expr {
    /// Computes the analytical derivative with respect to `var`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2").unwrap();
    /// let df_dx = f.diff("x"); // 2 * x^1 * 1
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) => {
                if !exp.contains_variable(var) {
                    // power rule: n * f^(n-1) * f'
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                } else {
                    // general case via f^g = exp(g * ln f)
                    Expr::Mul(
                        Box::new(Expr::Pow(base.clone(), exp.clone())),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(
                                Box::new(exp.diff(var)),
                                Box::new(Expr::Ln(base.clone())),
                            )),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    )
                }
            }
            Expr::Exp(expr) => Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var))),
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::Log10(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Mul(
                    expr.clone(),
                    Box::new(Expr::Const(std::f64::consts::LN_10)),
                )),
            ),
            Expr::Sqrt(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(2.0)),
                    Box::new(Expr::Sqrt(expr.clone())),
                )),
            ),
            Expr::Abs(expr) => Expr::Mul(
                Box::new(expr.diff(var)),
                Box::new(Expr::Div(expr.clone(), Box::new(Expr::Abs(expr.clone())))),
            ),
            Expr::sin(expr) => Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var))),
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Mul(
                    Box::new(Expr::sin(expr.clone())),
                    Box::new(expr.diff(var)),
                )),
            ),
            Expr::tg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::cos(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Sqrt(Box::new(Expr::Sub(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )))),
            ),
            Expr::arccos(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    Box::new(expr.diff(var)),
                    Box::new(Expr::Sqrt(Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )))),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::sinh(expr) => {
                Expr::Mul(Box::new(Expr::cosh(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cosh(expr) => {
                Expr::Mul(Box::new(Expr::sinh(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::tanh(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::cosh(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
        }
    }

    /// Compiles the expression into a closure of the sweep variable `var`.
    ///
    /// Every other variable is resolved from `scope` (or the built-in
    /// constants pi and e) right now; an unresolved symbol is a compile
    /// error, so the returned closure never fails at evaluation time.
    pub fn lambdify1D_with_scope(
        &self,
        var: &str,
        scope: &ParamScope,
    ) -> Result<Box<dyn Fn(f64) -> f64>, String> {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Ok(Box::new(|x| x))
                } else {
                    let val = match scope.get(name) {
                        Some(val) => *val,
                        None => match name.as_str() {
                            "pi" => std::f64::consts::PI,
                            "e" => std::f64::consts::E,
                            _ => return Err(format!("undefined symbol {}", name)),
                        },
                    };
                    Ok(Box::new(move |_| val))
                }
            }
            Expr::Const(val) => {
                let val = *val;
                Ok(Box::new(move |_| val))
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify1D_with_scope(var, scope)?;
                let rf = rhs.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| lf(x) + rf(x)))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify1D_with_scope(var, scope)?;
                let rf = rhs.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| lf(x) - rf(x)))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify1D_with_scope(var, scope)?;
                let rf = rhs.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| lf(x) * rf(x)))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify1D_with_scope(var, scope)?;
                let rf = rhs.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| lf(x) / rf(x)))
            }
            Expr::Pow(base, exp) => {
                let bf = base.lambdify1D_with_scope(var, scope)?;
                let ef = exp.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| bf(x).powf(ef(x))))
            }
            Expr::Exp(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).exp()))
            }
            Expr::Ln(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).ln()))
            }
            Expr::Log10(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).log10()))
            }
            Expr::Sqrt(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).sqrt()))
            }
            Expr::Abs(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).abs()))
            }
            Expr::sin(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).sin()))
            }
            Expr::cos(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).cos()))
            }
            Expr::tg(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).tan()))
            }
            Expr::arcsin(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).asin()))
            }
            Expr::arccos(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).acos()))
            }
            Expr::arctg(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).atan()))
            }
            Expr::sinh(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).sinh()))
            }
            Expr::cosh(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).cosh()))
            }
            Expr::tanh(expr) => {
                let f = expr.lambdify1D_with_scope(var, scope)?;
                Ok(Box::new(move |x| f(x).tanh()))
            }
        }
    }

    /// Compiles an expression of at most one free variable.
    pub fn lambdify1D(&self) -> Result<Box<dyn Fn(f64) -> f64>, String> {
        let vars: Vec<String> = self
            .all_arguments_are_variables()
            .into_iter()
            .filter(|name| name != "pi" && name != "e")
            .collect();
        match vars.len() {
            0 => self.lambdify1D_with_scope("", &ParamScope::new()),
            1 => self.lambdify1D_with_scope(&vars[0], &ParamScope::new()),
            _ => Err(format!(
                "expression has more than one free variable: {:?}",
                vars
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::utils::linspace;
    use approx::assert_relative_eq;

    /// analytic derivative against central differences on a mesh
    fn check_against_numerical(input: &str, start: f64, end: f64) {
        let f = Expr::parse_expression(input).unwrap();
        let df = f.diff("x");
        let f = f.lambdify1D().unwrap();
        let df = df.lambdify1D_with_scope("x", &ParamScope::new()).unwrap();
        let h = 1e-6;
        for x in linspace(start, end, 50) {
            let numeric = (f(x + h) - f(x - h)) / (2.0 * h);
            assert_relative_eq!(df(x), numeric, max_relative = 1e-4, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_diff_polynomial() {
        check_against_numerical("x^3 - 2*x + 1", -3.0, 3.0);
    }

    #[test]
    fn test_diff_trig_and_exp() {
        check_against_numerical("sin(x) * exp(x)", -2.0, 2.0);
        check_against_numerical("tan(x)", -1.0, 1.0);
        check_against_numerical("tanh(x) + cosh(x)", -2.0, 2.0);
    }

    #[test]
    fn test_diff_sqrt_and_log() {
        check_against_numerical("sqrt(x) + log(x)", 0.5, 5.0);
        check_against_numerical("log10(x)", 0.5, 5.0);
    }

    #[test]
    fn test_diff_variable_exponent() {
        check_against_numerical("x^x", 0.5, 3.0);
    }

    #[test]
    fn test_lambdify_with_scope_resolves_parameters() {
        let expr = Expr::parse_expression("r*cos(t)").unwrap();
        let mut scope = ParamScope::new();
        scope.insert("r".to_string(), 5.0);
        let f = expr.lambdify1D_with_scope("t", &scope).unwrap();
        assert_relative_eq!(f(0.0), 5.0);
    }

    #[test]
    fn test_lambdify_undefined_symbol_is_compile_error() {
        let expr = Expr::parse_expression("q*x").unwrap();
        let err = expr
            .lambdify1D_with_scope("x", &ParamScope::new())
            .err()
            .unwrap();
        assert!(err.contains("undefined symbol q"));
    }

    #[test]
    fn test_lambdify1D_rejects_two_variables() {
        let expr = Expr::parse_expression("x + y").unwrap();
        assert!(expr.lambdify1D().is_err());
    }
}
