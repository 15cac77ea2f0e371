//! # Graph Board Module
//!
//! Session state for the plot mode: the list of equations with their colors
//! and visibility, the axis ranges, the fallback parameter range and the
//! custom-parameter scope. Owns no pixels itself; `render` samples every
//! visible equation and draws the strokes, the grid and the zero axes into
//! a PNG. Rendering the same board twice produces the same image.

use crate::plotting::sampler::{
    Equation, GraphKind, ParamRange, SampleError, sample, strokes,
};
use crate::plotting::presets::find_preset;
use crate::plotting::viewport::Viewport;
use crate::symbolic::symbolic_engine::ParamScope;
use log::{error, warn};
use plotters::prelude::*;
use regex::Regex;

/// color cycle for newly added equations
const COLORS: &[&str] = &[
    "#ff5555", "#55ff55", "#5555ff", "#ffff55", "#ff55ff", "#55ffff",
];

const GRID_DIVISIONS: usize = 20;

/// strict #rrggbb; anything else falls back to white with a warning
fn parse_color(color: &str) -> RGBColor {
    let re = Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap();
    match re.captures(color) {
        Some(caps) => {
            let r = u8::from_str_radix(&caps[1], 16).unwrap();
            let g = u8::from_str_radix(&caps[2], 16).unwrap();
            let b = u8::from_str_radix(&caps[3], 16).unwrap();
            RGBColor(r, g, b)
        }
        None => {
            warn!("unparseable color {}, falling back to white", color);
            WHITE
        }
    }
}

pub struct GraphBoard {
    pub equations: Vec<Equation>,
    pub viewport: Viewport,
    pub parameter_range: ParamRange,
    pub custom_parameters: ParamScope,
}

impl GraphBoard {
    /// Board with the starter parabola, like a fresh plotter session.
    pub fn new() -> GraphBoard {
        let mut custom_parameters = ParamScope::new();
        custom_parameters.insert("r".to_string(), 5.0);
        custom_parameters.insert("a".to_string(), 2.0);
        custom_parameters.insert("b".to_string(), 3.0);
        custom_parameters.insert("n".to_string(), 3.0);
        GraphBoard {
            equations: vec![Equation {
                id: 1,
                expression: "x^2".to_string(),
                color: "#ff5555".to_string(),
                kind: GraphKind::Cartesian,
                visible: true,
                parameter: None,
            }],
            viewport: Viewport::default(),
            parameter_range: ParamRange::default(),
            custom_parameters,
        }
    }

    fn next_id(&self) -> usize {
        self.equations.iter().map(|eq| eq.id).max().unwrap_or(0) + 1
    }

    fn next_color(&self) -> String {
        COLORS[self.equations.len() % COLORS.len()].to_string()
    }

    /// Adds an equation after validating it by compiling against the current
    /// scope; an invalid one leaves the board untouched.
    pub fn add_equation(
        &mut self,
        expression: &str,
        kind: GraphKind,
    ) -> Result<usize, SampleError> {
        let parameter = matches!(kind, GraphKind::Parametric | GraphKind::Polar)
            .then_some(self.parameter_range);
        let candidate = Equation {
            id: self.next_id(),
            expression: expression.to_string(),
            color: self.next_color(),
            kind,
            visible: true,
            parameter,
        };
        sample(
            &candidate,
            &self.viewport,
            &self.parameter_range,
            &self.custom_parameters,
        )?;
        let id = candidate.id;
        self.equations.push(candidate);
        Ok(id)
    }

    /// Adds one of the predefined graphs by name.
    pub fn add_preset(&mut self, name: &str) -> Result<usize, SampleError> {
        let preset = find_preset(name)
            .ok_or_else(|| SampleError::Expression(format!("unknown preset: {}", name)))?;
        let candidate = Equation {
            id: self.next_id(),
            expression: preset.expression.to_string(),
            color: self.next_color(),
            kind: preset.kind,
            visible: true,
            parameter: preset.parameter,
        };
        sample(
            &candidate,
            &self.viewport,
            &self.parameter_range,
            &self.custom_parameters,
        )?;
        let id = candidate.id;
        self.equations.push(candidate);
        Ok(id)
    }

    pub fn remove_equation(&mut self, id: usize) {
        self.equations.retain(|eq| eq.id != id);
    }

    pub fn toggle_visibility(&mut self, id: usize) {
        for eq in &mut self.equations {
            if eq.id == id {
                eq.visible = !eq.visible;
            }
        }
    }

    /// A range where min >= max is ignored, as in the range inputs it models.
    pub fn set_x_range(&mut self, min: f64, max: f64) {
        if min < max {
            self.viewport.x_range = (min, max);
        }
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) {
        if min < max {
            self.viewport.y_range = (min, max);
        }
    }

    pub fn set_parameter_range(&mut self, range: ParamRange) {
        self.parameter_range = range;
    }

    pub fn set_custom_parameter(&mut self, name: &str, value: f64) {
        self.custom_parameters.insert(name.to_string(), value);
    }

    /// Renders every visible equation with grid and zero axes into a PNG.
    ///
    /// An equation that stopped compiling (for example after a scope change)
    /// is logged and skipped, it never aborts the redraw of the others.
    pub fn render(&self, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
        let width = self.viewport.width as u32;
        let height = self.viewport.height as u32;
        let root_area = BitMapBackend::new(filename, (width, height)).into_drawing_area();
        root_area.fill(&RGBColor(20, 16, 30))?;

        let mut chart = ChartBuilder::on(&root_area)
            .margin(0)
            .build_cartesian_2d(0.0..self.viewport.width, 0.0..self.viewport.height)?;

        // canvas y grows downward, the chart axis upward
        let flip = |(x, y): (f64, f64)| (x, self.viewport.height - y);

        let grid_color = RGBColor(51, 51, 51);
        for i in 0..=GRID_DIVISIONS {
            let x = self.viewport.width * i as f64 / GRID_DIVISIONS as f64;
            let y = self.viewport.height * i as f64 / GRID_DIVISIONS as f64;
            chart.draw_series(LineSeries::new(
                vec![(x, 0.0), (x, self.viewport.height)],
                &grid_color,
            ))?;
            chart.draw_series(LineSeries::new(
                vec![(0.0, y), (self.viewport.width, y)],
                &grid_color,
            ))?;
        }

        // zero axes in white, if the origin lines are in view
        let (zero_x, zero_y) = self.viewport.graph_to_canvas(0.0, 0.0);
        if (0.0..=self.viewport.width).contains(&zero_x) {
            chart.draw_series(LineSeries::new(
                vec![flip((zero_x, 0.0)), flip((zero_x, self.viewport.height))],
                &WHITE,
            ))?;
        }
        if (0.0..=self.viewport.height).contains(&zero_y) {
            chart.draw_series(LineSeries::new(
                vec![flip((0.0, zero_y)), flip((self.viewport.width, zero_y))],
                &WHITE,
            ))?;
        }

        for eq in &self.equations {
            if !eq.visible {
                continue;
            }
            let path = match sample(
                eq,
                &self.viewport,
                &self.parameter_range,
                &self.custom_parameters,
            ) {
                Ok(path) => path,
                Err(e) => {
                    error!("Error drawing equation {}: {}", eq.id, e);
                    continue;
                }
            };
            let color = parse_color(&eq.color);
            for stroke in strokes(path) {
                let series: Vec<(f64, f64)> = stroke.into_iter().map(flip).collect();
                chart.draw_series(LineSeries::new(series, &color))?;
            }
        }

        root_area.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_ids_and_colors() {
        let mut board = GraphBoard::new();
        let id = board.add_equation("sin(x)", GraphKind::Cartesian).unwrap();
        assert_eq!(id, 2);
        assert_eq!(board.equations[1].color, "#55ff55");
        let id = board.add_equation("r*cos(n*theta)", GraphKind::Polar).unwrap();
        assert_eq!(id, 3);
        assert!(board.equations[2].parameter.is_some());
    }

    #[test]
    fn test_add_rejects_invalid_equation() {
        let mut board = GraphBoard::new();
        assert!(board.add_equation("q*x", GraphKind::Cartesian).is_err());
        assert!(board.add_equation("[cos(t)]", GraphKind::Parametric).is_err());
        assert_eq!(board.equations.len(), 1);
    }

    #[test]
    fn test_remove_and_toggle() {
        let mut board = GraphBoard::new();
        let id = board.add_equation("cos(x)", GraphKind::Cartesian).unwrap();
        board.toggle_visibility(id);
        assert!(!board.equations[1].visible);
        board.remove_equation(id);
        assert_eq!(board.equations.len(), 1);
    }

    #[test]
    fn test_invalid_range_is_ignored() {
        let mut board = GraphBoard::new();
        board.set_x_range(5.0, -5.0);
        assert_eq!(board.viewport.x_range, (-10.0, 10.0));
        board.set_x_range(-2.0, 2.0);
        assert_eq!(board.viewport.x_range, (-2.0, 2.0));
    }

    #[test]
    fn test_add_preset() {
        let mut board = GraphBoard::new();
        board.add_preset("cardioid").unwrap();
        assert_eq!(board.equations[1].kind, GraphKind::Parametric);
        assert!(board.add_preset("heartbeat").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff5555"), RGBColor(255, 85, 85));
        assert_eq!(parse_color("red"), WHITE);
    }

    #[test]
    fn test_render_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = GraphBoard::new();
        board.add_preset("circleParametric").unwrap();
        board.add_equation("star", GraphKind::Shape).unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        board.render(first.to_str().unwrap()).unwrap();
        board.render(second.to_str().unwrap()).unwrap();
        let first = std::fs::read(first).unwrap();
        let second = std::fs::read(second).unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
