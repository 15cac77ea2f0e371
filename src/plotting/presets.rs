//! Predefined graphs the board can add by name.

use crate::plotting::sampler::{GraphKind, ParamRange};
use std::f64::consts::PI;

pub struct Preset {
    pub name: &'static str,
    pub expression: &'static str,
    pub kind: GraphKind,
    pub parameter: Option<ParamRange>,
}

const WIDE_SWEEP: ParamRange = ParamRange {
    min: 0.0,
    max: 10.0 * PI,
    step: 0.01,
};
const FULL_TURN: ParamRange = ParamRange {
    min: 0.0,
    max: 2.0 * PI,
    step: 0.01,
};

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "circle",
        expression: "sqrt(r^2 - x^2)",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "sine",
        expression: "sin(x)",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "cosine",
        expression: "cos(x)",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "tangent",
        expression: "tan(x)",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "parabola",
        expression: "x^2",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "cubic",
        expression: "x^3",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "exponential",
        expression: "e^x",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "logarithm",
        expression: "log(x)",
        kind: GraphKind::Cartesian,
        parameter: None,
    },
    Preset {
        name: "circleParametric",
        expression: "[r*cos(t), r*sin(t)]",
        kind: GraphKind::Parametric,
        parameter: Some(FULL_TURN),
    },
    Preset {
        name: "spiral",
        expression: "[t*cos(t), t*sin(t)]",
        kind: GraphKind::Parametric,
        parameter: Some(WIDE_SWEEP),
    },
    Preset {
        name: "lissajous",
        expression: "[sin(a*t), sin(b*t)]",
        kind: GraphKind::Parametric,
        parameter: Some(FULL_TURN),
    },
    Preset {
        name: "cardioid",
        expression: "[r*(1+cos(t))*cos(t), r*(1+cos(t))*sin(t)]",
        kind: GraphKind::Parametric,
        parameter: Some(FULL_TURN),
    },
    Preset {
        name: "polarRose",
        expression: "r*cos(n*theta)",
        kind: GraphKind::Polar,
        parameter: Some(FULL_TURN),
    },
    Preset {
        name: "polarSpiral",
        expression: "a*theta",
        kind: GraphKind::Polar,
        parameter: Some(WIDE_SWEEP),
    },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;

    #[test]
    fn test_every_preset_expression_parses() {
        for preset in PRESETS {
            match preset.kind {
                GraphKind::Parametric => {
                    let parts = Expr::parse_vector_expression(preset.expression).unwrap();
                    assert_eq!(parts.len(), 2, "{}", preset.name);
                }
                _ => {
                    Expr::parse_expression(preset.expression)
                        .unwrap_or_else(|e| panic!("{}: {}", preset.name, e));
                }
            }
        }
    }

    #[test]
    fn test_find_preset() {
        assert!(find_preset("polarRose").is_some());
        assert!(find_preset("heartbeat").is_none());
    }
}
