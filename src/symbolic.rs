#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCalcLab::symbolic::symbolic_engine::Expr;
/// let input = "x^2 - 4";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D().unwrap();
/// println!("{}, Rust function at 3: {}  \n", input, parsed_function(3.0));
/// ```
pub mod parse_expr;
///____________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) turns a symbolic expression into a Rust function
/// 3) evaluates a symbolic expression against a parameter scope
///# Example#
/// ```
/// use RustedCalcLab::symbolic::symbolic_engine::{Expr, ParamScope};
/// let input = "r*cos(t)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // all arguments of the expression
/// let all = parsed_expression.all_arguments_are_variables();
/// println!("all arguments are variables {:?}", all);
/// // differentiate with respect to t
/// let df_dt = parsed_expression.diff("t");
/// println!("df_dt = {}", df_dt);
/// // compile with r fixed from the scope, t as the sweep variable
/// let mut scope = ParamScope::new();
/// scope.insert("r".to_string(), 5.0);
/// let f = parsed_expression.lambdify1D_with_scope("t", &scope).unwrap();
/// println!("f(0) = {}", f(0.0));
/// ```
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// bracket scanning helpers shared by the parser, and linspace
pub mod utils;
