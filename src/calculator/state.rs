//! # Calculator Shell Module
//!
//! The standard-calculator state machine: one immutable state struct and a
//! pure reducer over the fixed button vocabulary. The reducer never touches
//! the outside world, so every UI interaction can be unit-tested as
//! `state -> button -> state`.
//!
//! Display glyphs are normalized before evaluation (multiplication and
//! division signs, pi, `ln` -> `log`, `e^` -> `exp(`, one auto-closed
//! parenthesis); evaluation is delegated to the symbolic engine. A throwing
//! or non-finite result yields the literal display "Error" and clears the
//! pending expression, leaving history and memory as they were.

use crate::symbolic::symbolic_engine::{Expr, ParamScope};
use strum_macros::{Display as StrumDisplay, EnumString};

/// most-recent entries kept in the history panel
const HISTORY_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CalculatorMode {
    Standard,
    Graph,
    Matrix,
    Equation,
}

/// the 8x5 standard keypad, row by row
pub const STANDARD_BUTTONS: [[&str; 5]; 8] = [
    ["Rad", "Deg", "(", ")", "⌫"],
    ["sin⁻¹", "cos⁻¹", "tan⁻¹", "EXP", "C"],
    ["sin", "cos", "tan", "π", "√"],
    ["log", "ln", "x²", "x³", "^"],
    ["7", "8", "9", "÷", "M+"],
    ["4", "5", "6", "×", "MR"],
    ["1", "2", "3", "-", "HIS"],
    ["0", ".", "=", "+", "ANS"],
];

#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState {
    pub display: String,
    pub expression: String,
    /// "expr = result" strings, most recent first
    pub history: Vec<String>,
    pub show_history: bool,
    pub is_radian: bool,
    pub mode: CalculatorMode,
    pub memory: Option<f64>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            display: "0".to_string(),
            expression: String::new(),
            history: Vec::new(),
            show_history: false,
            is_radian: true,
            mode: CalculatorMode::Standard,
            memory: None,
        }
    }
}

enum EvalOutcome {
    Empty,
    Value(f64),
    Error,
}

/// display glyphs -> engine vocabulary
fn normalize_expression(expression: &str) -> String {
    let mut processed = expression
        .replace("ln", "log")
        .replace('π', "pi")
        .replace('×', "*")
        .replace('÷', "/")
        .replace("e^(", "exp(")
        .replace("e^", "exp(");
    // one unclosed function call is tolerated
    if processed.contains('(') && !processed.contains(')') {
        processed.push(')');
    }
    processed
}

fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

fn format_number(value: f64) -> String {
    format!("{}", round8(value))
}

fn evaluate_expression(expression: &str) -> EvalOutcome {
    if expression.is_empty() {
        return EvalOutcome::Empty;
    }
    let processed = normalize_expression(expression);
    let parsed = match Expr::parse_expression(&processed) {
        Ok(parsed) => parsed,
        Err(_) => return EvalOutcome::Error,
    };
    match parsed.eval_with_scope(&ParamScope::new()) {
        Ok(value) if value.is_finite() => EvalOutcome::Value(round8(value)),
        _ => EvalOutcome::Error,
    }
}

fn update_expression(next: &mut CalculatorState, value: &str) {
    let new_expression = if value == "e^" {
        if next.expression == "0" {
            "e^(".to_string()
        } else {
            format!("{}e^(", next.expression)
        }
    } else if value == "^2" || value == "^3" {
        if next.expression == "0" {
            format!("({})", value)
        } else {
            format!("({}){}", next.expression, value)
        }
    } else if next.expression == "0" {
        value.to_string()
    } else {
        format!("{}{}", next.expression, value)
    };
    next.display = new_expression.clone();
    next.expression = new_expression;
}

/// The reducer: one button press over the current state.
pub fn press(state: &CalculatorState, button: &str) -> CalculatorState {
    let mut next = state.clone();
    match button {
        "C" => {
            next.display = "0".to_string();
            next.expression = String::new();
        }
        "⌫" => {
            if next.display.chars().count() > 1 {
                next.display.pop();
                next.expression.pop();
            } else {
                next.display = "0".to_string();
                next.expression = String::new();
            }
        }
        "=" => match evaluate_expression(&next.expression) {
            EvalOutcome::Empty => {
                next.display = "0".to_string();
            }
            EvalOutcome::Value(value) => {
                let formatted = format_number(value);
                next.history
                    .insert(0, format!("{} = {}", next.expression, formatted));
                next.history.truncate(HISTORY_LIMIT);
                next.display = formatted.clone();
                next.expression = formatted;
            }
            EvalOutcome::Error => {
                next.display = "Error".to_string();
                next.expression = String::new();
            }
        },
        "ANS" => {
            if let Some(last) = next.history.first() {
                if let Some((_, result)) = last.split_once(" = ") {
                    next.display = result.to_string();
                    next.expression = result.to_string();
                }
            }
        }
        "HIS" => next.show_history = !next.show_history,
        "Rad" | "Deg" => next.is_radian = !next.is_radian,
        "M+" => {
            if next.display != "Error" {
                if let EvalOutcome::Value(value) = evaluate_expression(&next.expression) {
                    next.memory = Some(value);
                }
            }
        }
        "MR" => {
            if let Some(memory) = next.memory {
                next.display = format_number(memory);
                next.expression = format_number(memory);
            }
        }
        "×" => update_expression(&mut next, "*"),
        "÷" => update_expression(&mut next, "/"),
        "π" => update_expression(&mut next, "pi"),
        "EXP" => update_expression(&mut next, "e^"),
        "x²" => update_expression(&mut next, "^2"),
        "x³" => update_expression(&mut next, "^3"),
        "sin" | "cos" | "tan" => {
            let prefix = if next.is_radian { "" } else { "pi/180*" };
            update_expression(&mut next, &format!("{}({}", button, prefix));
        }
        "sin⁻¹" => update_expression(&mut next, "asin("),
        "cos⁻¹" => update_expression(&mut next, "acos("),
        "tan⁻¹" => update_expression(&mut next, "atan("),
        "log" => update_expression(&mut next, "log10("),
        "ln" => update_expression(&mut next, "log("),
        "√" => update_expression(&mut next, "sqrt("),
        _ => update_expression(&mut next, button),
    }
    next
}

/// Mode switching lives outside the keypad vocabulary.
pub fn set_mode(state: &CalculatorState, mode: CalculatorMode) -> CalculatorState {
    let mut next = state.clone();
    next.mode = mode;
    next
}
