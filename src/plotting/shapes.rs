//! Deterministic vector-drawing recipes. No expression evaluation here;
//! every shape is centered on the canvas and scaled to a quarter of its
//! smaller side, and the only failure mode is an unrecognized name.

use crate::plotting::sampler::{PathCommand, SampleError};
use crate::plotting::viewport::Viewport;
use std::f64::consts::PI;

/// polyline resolution of the circle and of each heart Bezier
const CURVE_SEGMENTS: usize = 100;

/// cubic Bezier point at parameter t
fn bezier(
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
    t: f64,
) -> (f64, f64) {
    let u = 1.0 - t;
    let x = u * u * u * p0.0 + 3.0 * u * u * t * p1.0 + 3.0 * u * t * t * p2.0 + t * t * t * p3.0;
    let y = u * u * u * p0.1 + 3.0 * u * u * t * p1.1 + 3.0 * u * t * t * p2.1 + t * t * t * p3.1;
    (x, y)
}

fn push_bezier(
    commands: &mut Vec<PathCommand>,
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
) {
    for i in 1..=CURVE_SEGMENTS {
        let t = i as f64 / CURVE_SEGMENTS as f64;
        let (x, y) = bezier(p0, p1, p2, p3, t);
        commands.push(PathCommand::LineTo(x, y));
    }
}

/// Builds the command sequence for a named shape.
pub fn shape_path(name: &str, viewport: &Viewport) -> Result<Vec<PathCommand>, SampleError> {
    let center_x = viewport.width / 2.0;
    let center_y = viewport.height / 2.0;
    let scale = viewport.width.min(viewport.height) / 4.0;

    let mut commands: Vec<PathCommand> = Vec::new();
    match name.trim().to_lowercase().as_str() {
        "circle" => {
            commands.push(PathCommand::MoveTo(center_x + scale, center_y));
            for i in 1..=CURVE_SEGMENTS {
                let angle = 2.0 * PI * i as f64 / CURVE_SEGMENTS as f64;
                commands.push(PathCommand::LineTo(
                    center_x + scale * angle.cos(),
                    center_y + scale * angle.sin(),
                ));
            }
        }
        "square" => {
            commands.push(PathCommand::MoveTo(center_x - scale, center_y - scale));
            commands.push(PathCommand::LineTo(center_x + scale, center_y - scale));
            commands.push(PathCommand::LineTo(center_x + scale, center_y + scale));
            commands.push(PathCommand::LineTo(center_x - scale, center_y + scale));
            commands.push(PathCommand::LineTo(center_x - scale, center_y - scale));
        }
        "triangle" => {
            commands.push(PathCommand::MoveTo(center_x, center_y - scale));
            commands.push(PathCommand::LineTo(center_x + scale, center_y + scale));
            commands.push(PathCommand::LineTo(center_x - scale, center_y + scale));
            commands.push(PathCommand::LineTo(center_x, center_y - scale));
        }
        "heart" => {
            let size = scale * 0.8;
            let bottom = (center_x, center_y + size * 0.3);
            let top = (center_x, center_y - size * 0.5);
            commands.push(PathCommand::MoveTo(bottom.0, bottom.1));
            // left lobe
            push_bezier(
                &mut commands,
                bottom,
                (center_x - size, center_y),
                (center_x - size, center_y - size),
                top,
            );
            // right lobe
            push_bezier(
                &mut commands,
                top,
                (center_x + size, center_y - size),
                (center_x + size, center_y),
                bottom,
            );
        }
        "star" => {
            let points = 5;
            let outer_radius = scale;
            let inner_radius = scale * 0.4;
            let mut first = None;
            for i in 0..points * 2 {
                let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
                let angle = PI / points as f64 * i as f64;
                let x = center_x + radius * angle.sin();
                let y = center_y - radius * angle.cos();
                if i == 0 {
                    first = Some((x, y));
                    commands.push(PathCommand::MoveTo(x, y));
                } else {
                    commands.push(PathCommand::LineTo(x, y));
                }
            }
            if let Some((x, y)) = first {
                commands.push(PathCommand::LineTo(x, y));
            }
        }
        other => return Err(SampleError::UnknownShape(other.to_string())),
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::sampler::strokes;
    use approx::assert_relative_eq;
    use itertools::Itertools;

    #[test]
    fn test_circle_is_closed_and_on_radius() {
        let vp = Viewport::default();
        let commands = shape_path("circle", &vp).unwrap();
        let points: Vec<(f64, f64)> = commands.iter().map(|c| c.point()).collect();
        assert_eq!(points.first(), points.last());
        for (x, y) in &points {
            let r = ((x - 400.0).powi(2) + (y - 300.0).powi(2)).sqrt();
            assert_relative_eq!(r, 150.0, epsilon = 1e-9);
        }
        // neighbouring samples stay close together
        for ((x0, y0), (x1, y1)) in points.iter().copied().tuple_windows() {
            assert!((x1 - x0).hypot(y1 - y0) < 20.0);
        }
    }

    #[test]
    fn test_star_has_eleven_commands() {
        let commands = shape_path("star", &Viewport::default()).unwrap();
        assert_eq!(commands.len(), 11);
        assert_eq!(commands.first().map(|c| c.point()), commands.last().map(|c| c.point()));
    }

    #[test]
    fn test_shapes_are_single_strokes() {
        for name in ["circle", "square", "triangle", "heart", "star"] {
            let commands = shape_path(name, &Viewport::default()).unwrap();
            let segments = strokes(commands.into_iter());
            assert_eq!(segments.len(), 1, "{} should be one stroke", name);
        }
    }

    #[test]
    fn test_shape_name_is_case_insensitive() {
        assert!(shape_path("  Heart ", &Viewport::default()).is_ok());
    }

    #[test]
    fn test_unknown_shape() {
        let err = shape_path("hexagon", &Viewport::default()).unwrap_err();
        assert_eq!(err, SampleError::UnknownShape("hexagon".to_string()));
    }
}
