//! Mapping data values onto the canvas

use std::fmt::Write;

use crate::plots::{Point, Tick};

/// Linear map of `v` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// A degenerate input range maps everything to the middle of the output.
pub fn scale(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_min == in_max {
        return (out_min + out_max) / 2.0;
    }
    out_min + (v - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// `count` evenly spaced ticks between two data values
pub fn ticks(min: f64, max: f64, count: usize, out_min: f64, out_max: f64) -> Vec<Tick> {
    if count < 2 || min == max {
        return vec![Tick {
            position: scale(min, min, max, out_min, out_max),
            label: format_value(min),
        }];
    }

    (0..count)
        .map(|i| {
            let value = min + (max - min) * i as f64 / (count - 1) as f64;
            Tick {
                position: scale(value, min, max, out_min, out_max),
                label: format_value(value),
            }
        })
        .collect()
}

/// Short axis label for a value
pub fn format_value(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if magnitude >= 1e4 {
        format!("{:.1}k", v / 1e3)
    } else if v.fract() == 0.0 {
        format!("{}", v)
    } else if magnitude >= 10.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// `M x,y L x,y ...`
pub fn polyline_path(points: &[Point]) -> String {
    let mut path = String::new();
    for (i, p) in points.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            path.push(' ');
        }
        let _ = write!(path, "{}{:.2},{:.2}", command, p.x, p.y);
    }
    path
}

/// Polyline closed back to its first point
pub fn polygon_path(points: &[Point]) -> String {
    let mut path = polyline_path(points);
    if !path.is_empty() {
        path.push_str(" Z");
    }
    path
}

/// Polyline dropped to `baseline` at both ends and closed
pub fn area_path(points: &[Point], baseline: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    let mut path = polyline_path(points);
    let _ = write!(path, " L{:.2},{:.2} L{:.2},{:.2} Z", last.x, baseline, first.x, baseline);
    path
}
