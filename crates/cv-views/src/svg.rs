//! Standalone SVG output for chart geometry

use std::fmt::Write;

use egui::Color32;

use crate::config::Canvas;
use crate::plots::utils::colors::{categorical_color, to_hex, AXIS, LABEL};
use crate::plots::{
    Axes, BarGeometry, BoxGeometry, ChartGeometry, DensityGeometry, HeatmapGeometry, LineGeometry,
    RidgelineGeometry, ScatterGeometry, Segment, ViolinGeometry,
};

const FONT_SIZE: f64 = 11.0;

/// Escape text for use in element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render geometry as an SVG document the size of the canvas
pub fn render_svg(geometry: &ChartGeometry, canvas: &Canvas) -> String {
    let mut svg = open(canvas);

    match geometry {
        ChartGeometry::Bars(g) => bars(&mut svg, g),
        ChartGeometry::Line(g) => line(&mut svg, g),
        ChartGeometry::Scatter(g) => scatter(&mut svg, g),
        ChartGeometry::Box(g) => box_plot(&mut svg, g),
        ChartGeometry::Violin(g) => violin(&mut svg, g),
        ChartGeometry::Density(g) => density(&mut svg, g),
        ChartGeometry::Ridgeline(g) => ridgeline(&mut svg, g),
        ChartGeometry::Heatmap(g) => heatmap(&mut svg, g),
    }

    // the heatmap labels its own rows and columns
    if matches!(geometry, ChartGeometry::Heatmap(_)) {
        heatmap_labels(&mut svg, geometry.axes(), canvas);
    } else {
        axes(&mut svg, geometry.axes(), canvas);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Canvas with a centred message
pub fn render_placeholder_svg(reason: &str, canvas: &Canvas) -> String {
    let mut svg = open(canvas);
    let _ = writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="14" fill="{}">{}</text>"#,
        canvas.width / 2.0,
        canvas.height / 2.0,
        to_hex(LABEL),
        escape(reason)
    );
    svg.push_str("</svg>\n");
    svg
}

fn open(canvas: &Canvas) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = canvas.width,
        h = canvas.height
    );
    let _ = writeln!(svg, r#"<rect width="{}" height="{}" fill="white"/>"#, canvas.width, canvas.height);
    svg
}

fn line_element(svg: &mut String, s: &Segment, color: Color32, width: f64) {
    let _ = writeln!(
        svg,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
        s.from.x,
        s.from.y,
        s.to.x,
        s.to.y,
        to_hex(color),
        width
    );
}

fn text(svg: &mut String, x: f64, y: f64, anchor: &str, content: &str) {
    let _ = writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="{}" font-size="{}" fill="{}">{}</text>"#,
        x,
        y,
        anchor,
        FONT_SIZE,
        to_hex(LABEL),
        escape(content)
    );
}

fn path(svg: &mut String, d: &str, fill: Option<(Color32, f64)>, stroke: Color32) {
    let fill = match fill {
        Some((color, opacity)) => format!(r#"fill="{}" fill-opacity="{:.2}""#, to_hex(color), opacity),
        None => r#"fill="none""#.to_string(),
    };
    let _ = writeln!(svg, r#"<path d="{}" {} stroke="{}" stroke-width="2"/>"#, d, fill, to_hex(stroke));
}

fn axes(svg: &mut String, axes: &Axes, canvas: &Canvas) {
    let (left, right, top, bottom) = (canvas.left(), canvas.right(), canvas.top(), canvas.bottom());
    line_element(svg, &Segment::horizontal(left, right, bottom), AXIS, 1.0);
    line_element(svg, &Segment::vertical(left, bottom, top), AXIS, 1.0);

    for tick in &axes.x_ticks {
        text(svg, tick.position, bottom + 16.0, "middle", &tick.label);
    }
    for tick in &axes.y_ticks {
        text(svg, left - 6.0, tick.position + 4.0, "end", &tick.label);
    }

    text(svg, (left + right) / 2.0, canvas.height - 16.0, "middle", &axes.x_label);
    let _ = writeln!(
        svg,
        r#"<text x="16" y="{:.2}" text-anchor="middle" font-size="{}" fill="{}" transform="rotate(-90 16 {:.2})">{}</text>"#,
        (top + bottom) / 2.0,
        FONT_SIZE,
        to_hex(LABEL),
        (top + bottom) / 2.0,
        escape(&axes.y_label)
    );
}

fn heatmap_labels(svg: &mut String, axes: &Axes, canvas: &Canvas) {
    for tick in &axes.x_ticks {
        text(svg, tick.position, canvas.top() - 8.0, "middle", &tick.label);
    }
    for tick in &axes.y_ticks {
        text(svg, canvas.left() - 6.0, tick.position + 4.0, "end", &tick.label);
    }
}

fn bars(svg: &mut String, g: &BarGeometry) {
    for bar in &g.bars {
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{}: {}</title></rect>"#,
            bar.rect.x,
            bar.rect.y,
            bar.rect.width,
            bar.rect.height,
            to_hex(bar.color),
            escape(&bar.label),
            bar.value
        );
    }
}

fn line(svg: &mut String, g: &LineGeometry) {
    let color = categorical_color(0);
    if let Some(area) = &g.area_path {
        path(svg, area, Some((color, 0.3)), color);
    }
    path(svg, &g.path, None, color);
}

fn scatter(svg: &mut String, g: &ScatterGeometry) {
    for p in &g.points {
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" fill-opacity="0.7"/>"#,
            p.x,
            p.y,
            g.radius,
            to_hex(g.color)
        );
    }
}

fn box_plot(svg: &mut String, g: &BoxGeometry) {
    for b in &g.boxes {
        line_element(svg, &b.whisker, LABEL, 1.0);
        for cap in &b.caps {
            line_element(svg, cap, LABEL, 1.0);
        }
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="0.7" stroke="{}"/>"#,
            b.rect.x,
            b.rect.y,
            b.rect.width,
            b.rect.height,
            to_hex(b.color),
            to_hex(LABEL)
        );
        line_element(svg, &b.median, Color32::WHITE, 2.0);
    }
}

fn violin(svg: &mut String, g: &ViolinGeometry) {
    for v in &g.violins {
        path(svg, &v.path, Some((v.color, 0.6)), v.color);
    }
}

fn density(svg: &mut String, g: &DensityGeometry) {
    path(svg, &g.area_path, Some((g.color, 0.3)), g.color);
    path(svg, &g.path, None, g.color);
}

fn ridgeline(svg: &mut String, g: &RidgelineGeometry) {
    for layer in &g.layers {
        path(svg, &layer.area_path, Some((layer.color, 0.7)), Color32::WHITE);
        path(svg, &layer.path, None, layer.color);
    }
}

fn heatmap(svg: &mut String, g: &HeatmapGeometry) {
    for cell in &g.cells {
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.2}" stroke="white"/>"#,
            cell.rect.x,
            cell.rect.y,
            cell.rect.width,
            cell.rect.height,
            to_hex(cell.color),
            cell.opacity
        );
        let center = cell.rect.center();
        text(svg, center.x, center.y + 4.0, "middle", &cell.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ChartEngine;
    use crate::plots::test_support::summary;
    use cv_core::ChartType;
    use cv_core::ColumnKind::{Categorical, Numeric};

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_bar_chart_svg() {
        let data = summary(&[("fruit", Categorical), ("qty", Numeric)], &[&["apple", "3"], &["pear & fig", "5"]]);
        let engine = ChartEngine::default();
        let geometry = engine.render(ChartType::Bar, &data).unwrap();
        let svg = render_svg(&geometry, &engine.config().canvas);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("pear &amp; fig"));
        assert!(svg.contains(r#"width="600""#));
    }

    #[test]
    fn test_heatmap_svg_labels_cells() {
        let data = summary(&[("x", Numeric), ("y", Numeric)], &[&["1", "2"], &["2", "4"], &["3", "6"]]);
        let engine = ChartEngine::default();
        let geometry = engine.render(ChartType::Heatmap, &data).unwrap();
        let svg = render_svg(&geometry, &engine.config().canvas);

        assert_eq!(svg.matches(">1.00</text>").count(), 4);
        assert!(svg.contains("#3b82f6"));
    }

    #[test]
    fn test_placeholder() {
        let svg = render_placeholder_svg("Bar Chart needs a categorical column", &Canvas::default());
        assert!(svg.contains(r#"x="300.00" y="175.00""#));
        assert!(svg.contains("Bar Chart needs a categorical column"));
    }
}
