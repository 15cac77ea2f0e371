//! a module turns a String expression into a symbolic expression
//!
//! The scheme is recursive: find the rightmost `+`/`-` lying outside brackets
//! and split there, then the rightmost `*`/`/`, then the first `^` (so powers
//! associate to the right), then function applications `name(...)`, then
//! constants and variables. Splitting at the rightmost operator of a
//! precedence level makes `a - b - c` parse as `(a - b) - c`.
//!
//!```text
//!                 search recursion diagram
//!                "y^2+exp(x)+ln(x)/y-x^2.3"
//!                   rightmost '-'  outside brackets
//!                  /                \
//!        "y^2+exp(x)+ln(x)/y"      "x^2.3"
//!           rightmost '+'             '^'
//!          /            \            /    \
//!   "y^2+exp(x)"     "ln(x)/y"     "x"   "2.3"
//!        ...            ...
//!```

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{brackets_are_balanced, find_pair_to_this_bracket, split_outside_brackets};

/// function-name prefixes, longest first where one is a prefix of another
const FUNCTIONS: &[(&str, fn(Box<Expr>) -> Expr)] = &[
    ("arcsin(", Expr::arcsin),
    ("arccos(", Expr::arccos),
    ("arctan(", Expr::arctg),
    ("arctg(", Expr::arctg),
    ("asin(", Expr::arcsin),
    ("acos(", Expr::arccos),
    ("atan(", Expr::arctg),
    ("sinh(", Expr::sinh),
    ("cosh(", Expr::cosh),
    ("tanh(", Expr::tanh),
    ("sin(", Expr::sin),
    ("cos(", Expr::cos),
    ("tan(", Expr::tg),
    ("tg(", Expr::tg),
    ("log10(", Expr::Log10),
    ("log(", Expr::Ln),
    ("ln(", Expr::Ln),
    ("exp(", Expr::Exp),
    ("sqrt(", Expr::Sqrt),
    ("abs(", Expr::Abs),
];

/// a sign is binary unless it opens the string, follows another operator or
/// an opening bracket, or sits inside a scientific literal like 1e-5
fn is_binary_sign(chars: &[(usize, char)], i: usize) -> bool {
    let mut j = i;
    loop {
        if j == 0 {
            return false;
        }
        j -= 1;
        if !chars[j].1.is_whitespace() {
            break;
        }
    }
    let prev = chars[j].1;
    if matches!(prev, '+' | '-' | '*' | '/' | '^' | '(' | '[' | ',') {
        return false;
    }
    if (prev == 'e' || prev == 'E')
        && j > 0
        && (chars[j - 1].1.is_ascii_digit() || chars[j - 1].1 == '.')
    {
        return false;
    }
    true
}

/// byte position and kind of the rightmost binary +/- outside brackets
fn find_rightmost_additive_outside_brackets(input: &str) -> Option<(usize, char)> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut depth = 0i32;
    let mut found = None;
    for (i, (byte_pos, c)) in chars.iter().enumerate() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '+' | '-' if depth == 0 && is_binary_sign(&chars, i) => {
                found = Some((*byte_pos, *c));
            }
            _ => {}
        }
    }
    found
}

fn find_rightmost_multiplicative_outside_brackets(input: &str) -> Option<(usize, char)> {
    let mut depth = 0i32;
    let mut found = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '*' | '/' if depth == 0 => found = Some((i, c)),
            _ => {}
        }
    }
    found
}

fn find_first_power_outside_brackets(input: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in input.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '^' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }

    // addition and subtraction, lowest precedence
    if let Some((pos, op)) = find_rightmost_additive_outside_brackets(input) {
        let left = input[..pos].trim();
        let right = input[pos + 1..].trim();
        let lhs = parse_expression_func(left)?;
        let rhs = parse_expression_func(right)?;
        return match op {
            '+' => Ok(Expr::Add(Box::new(lhs), Box::new(rhs))),
            '-' => Ok(Expr::Sub(Box::new(lhs), Box::new(rhs))),
            _ => unreachable!(),
        };
    }

    // unary sign; binds looser than '^' so that -x^2 reads -(x^2)
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(Expr::Mul(
            Box::new(Expr::Const(-1.0)),
            Box::new(parse_expression_func(rest)?),
        ));
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_expression_func(rest);
    }

    // multiplication and division
    if let Some((pos, op)) = find_rightmost_multiplicative_outside_brackets(input) {
        let left = input[..pos].trim();
        let right = input[pos + 1..].trim();
        let lhs = parse_expression_func(left)?;
        let rhs = parse_expression_func(right)?;
        return match op {
            '*' => Ok(Expr::Mul(Box::new(lhs), Box::new(rhs))),
            '/' => Ok(Expr::Div(Box::new(lhs), Box::new(rhs))),
            _ => unreachable!(),
        };
    }

    // power, split at the first occurrence so the chain associates right
    if let Some(pos) = find_first_power_outside_brackets(input) {
        let base = input[..pos].trim();
        let exponent = input[pos + 1..].trim();
        return Ok(Expr::Pow(
            Box::new(parse_expression_func(base)?),
            Box::new(parse_expression_func(exponent)?),
        ));
    }

    // function applications like sin(...), exp(...), log10(...)
    for (name, ctor) in FUNCTIONS {
        if input.starts_with(name) && input.ends_with(')') {
            let open = name.len() - 1;
            if let Some(close) = find_pair_to_this_bracket(input, open) {
                if close == input.len() - 1 {
                    let inner = input[name.len()..close].trim();
                    return Ok(ctor(Box::new(parse_expression_func(inner)?)));
                }
            }
        }
    }

    // expression that is all in brackets
    if input.starts_with('(') && input.ends_with(')') {
        if let Some(close) = find_pair_to_this_bracket(input, 0) {
            if close == input.len() - 1 {
                return parse_expression_func(&input[1..close]);
            }
        }
    }

    // constants, including scientific notation like 1e-5
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }

    // variables
    if input.chars().next().is_some_and(|c| c.is_alphabetic())
        && input.chars().all(|c| c.is_alphanumeric() || c == '_')
    {
        return Ok(Expr::Var(input.to_string()));
    }

    // implicit multiplication of a numeric prefix: 2pi, 3.5x, 2(x+1)
    let digits = input
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .count();
    if digits > 0 && digits < input.len() {
        if let Ok(value) = input[..digits].parse::<f64>() {
            return Ok(Expr::Mul(
                Box::new(Expr::Const(value)),
                Box::new(parse_expression_func(&input[digits..])?),
            ));
        }
    }

    Err(format!("Invalid expression format: {}", input))
}

impl Expr {
    /// Parses an algebraic string into a symbolic expression.
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        if !brackets_are_balanced(input) {
            return Err(format!("unbalanced brackets in expression: {}", input));
        }
        parse_expression_func(input)
    }

    /// Parses a vector expression like "[r*cos(t), r*sin(t)]" into its
    /// component expressions.
    pub fn parse_vector_expression(input: &str) -> Result<Vec<Expr>, String> {
        let input = input.trim();
        if !brackets_are_balanced(input) {
            return Err(format!("unbalanced brackets in expression: {}", input));
        }
        let inner = input
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| format!("vector expression must be [..., ...]: {}", input))?;
        split_outside_brackets(inner)
            .into_iter()
            .map(parse_expression_func)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::ParamScope;

    fn eval1(input: &str, var: &str, x: f64) -> f64 {
        let expr = Expr::parse_expression(input).unwrap();
        let mut scope = ParamScope::new();
        scope.insert(var.to_string(), x);
        expr.eval_with_scope(&scope).unwrap()
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_func("x + 2").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power() {
        let expr = parse_expression_func("x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_multiple_subtraction() {
        let expr = parse_expression_func("x^2 - x - 1").unwrap();
        let x = Box::new(Expr::Var("x".to_string()));
        let to_check = Expr::Pow(x.clone(), Box::new(Expr::Const(2.0))) - *x - Expr::Const(1.0);
        assert_eq!(expr, to_check);
    }

    #[test]
    fn test_parse_with_brackets() {
        let expr = parse_expression_func("(x + y) * z").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Var("z".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(
            parse_expression_func("sin(x)").unwrap(),
            Expr::sin(Box::new(Expr::Var("x".to_string())))
        );
        assert_eq!(
            parse_expression_func("tan(x)").unwrap(),
            Expr::tg(Box::new(Expr::Var("x".to_string())))
        );
        assert_eq!(
            parse_expression_func("asin(x)").unwrap(),
            Expr::arcsin(Box::new(Expr::Var("x".to_string())))
        );
        assert_eq!(
            parse_expression_func("log(x)").unwrap(),
            Expr::Ln(Box::new(Expr::Var("x".to_string())))
        );
        assert_eq!(
            parse_expression_func("log10(x)").unwrap(),
            Expr::Log10(Box::new(Expr::Var("x".to_string())))
        );
        assert_eq!(
            parse_expression_func("sinh(x)").unwrap(),
            Expr::sinh(Box::new(Expr::Var("x".to_string())))
        );
    }

    #[test]
    fn test_parse_nested_functions() {
        let expr = parse_expression_func("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::sin(Box::new(Expr::cos(Box::new(Expr::Var("x".to_string())))))
        );
    }

    #[test]
    fn test_left_associativity_of_division() {
        assert_eq!(eval1("8 / 4 / 2", "x", 0.0), 1.0);
        assert_eq!(eval1("10 - 4 - 3", "x", 0.0), 3.0);
    }

    #[test]
    fn test_right_associativity_of_power() {
        assert_eq!(eval1("2^3^2", "x", 0.0), 512.0);
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(eval1("-x^2", "x", 2.0), -4.0);
        assert_eq!(eval1("-x + 1", "x", 2.0), -1.0);
    }

    #[test]
    fn test_scientific_literal() {
        assert_eq!(parse_expression_func("1e-5").unwrap(), Expr::Const(1e-5));
        assert_eq!(eval1("x - 1e-5", "x", 1e-5), 0.0);
    }

    #[test]
    fn test_implicit_numeric_multiplication() {
        assert!((eval1("2pi", "x", 0.0) - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(eval1("3.5x", "x", 2.0), 7.0);
        assert_eq!(eval1("2(x+1)", "x", 2.0), 6.0);
    }

    #[test]
    fn test_invalid_expression() {
        assert!(parse_expression_func("(x +").is_err());
        assert!(Expr::parse_expression("(x + y").is_err());
        assert!(parse_expression_func("#!").is_err());
    }

    #[test]
    fn test_parse_vector_expression() {
        let parts = Expr::parse_vector_expression("[r*cos(t), r*sin(t)]").unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains_variable("t"));
        assert!(parts[1].contains_variable("r"));
    }

    #[test]
    fn test_parse_vector_expression_requires_brackets() {
        assert!(Expr::parse_vector_expression("cos(t), sin(t)").is_err());
    }
}
