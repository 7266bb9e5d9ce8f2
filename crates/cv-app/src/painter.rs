//! Draws chart geometry with the egui painter

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};

use cv_views::plots::utils::colors::{categorical_color, AXIS, LABEL};
use cv_views::plots::{
    BarGeometry, BoxGeometry, DensityGeometry, HeatmapGeometry, LineGeometry, RidgelineGeometry, ScatterGeometry,
    ViolinGeometry,
};
use cv_views::{Axes, Canvas, ChartGeometry, ChartOutcome, Point, Segment};

/// Maps canvas coordinates onto the allocated screen rectangle
struct Frame {
    origin: Pos2,
    scale: f32,
}

impl Frame {
    fn pos(&self, p: Point) -> Pos2 {
        self.xy(p.x, p.y)
    }

    fn xy(&self, x: f64, y: f64) -> Pos2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.scale
    }

    fn rect(&self, r: &cv_views::Rect) -> Rect {
        Rect::from_min_max(self.xy(r.x, r.y), self.xy(r.x + r.width, r.y + r.height))
    }

    fn len(&self, v: f64) -> f32 {
        v as f32 * self.scale
    }
}

fn with_opacity(color: Color32, opacity: f64) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Paint a render outcome into the available width, keeping the canvas aspect ratio
pub fn paint(ui: &mut Ui, outcome: &ChartOutcome, canvas: &Canvas) {
    let width = ui.available_width().max(200.0);
    let scale = width / canvas.width as f32;
    let (response, painter) = ui.allocate_painter(Vec2::new(width, canvas.height as f32 * scale), Sense::hover());
    let frame = Frame { origin: response.rect.min, scale };

    painter.rect_filled(response.rect, 4.0, Color32::WHITE);

    let geometry = match outcome {
        ChartOutcome::Ready(geometry) => geometry,
        ChartOutcome::InsufficientData { reason, .. } => {
            painter.text(response.rect.center(), Align2::CENTER_CENTER, reason, FontId::proportional(14.0), LABEL);
            return;
        }
    };

    match geometry {
        ChartGeometry::Bars(g) => bars(&painter, &frame, g),
        ChartGeometry::Line(g) => line(&painter, &frame, g),
        ChartGeometry::Scatter(g) => scatter(&painter, &frame, g),
        ChartGeometry::Box(g) => box_plot(&painter, &frame, g),
        ChartGeometry::Violin(g) => violin(&painter, &frame, g),
        ChartGeometry::Density(g) => density(&painter, &frame, g),
        ChartGeometry::Ridgeline(g) => ridgeline(&painter, &frame, g),
        ChartGeometry::Heatmap(g) => heatmap(&painter, &frame, g),
    }

    if !matches!(geometry, ChartGeometry::Heatmap(_)) {
        axes(&painter, &frame, geometry.axes(), canvas);
    }

    if let Some(pointer) = response.hover_pos() {
        if let Some(text) = hover_text(&frame, geometry, pointer) {
            egui::show_tooltip_at_pointer(ui.ctx(), response.id.with("chart_tooltip"), |ui| {
                ui.label(text);
            });
        }
    }
}

fn hover_text(frame: &Frame, geometry: &ChartGeometry, pointer: Pos2) -> Option<String> {
    match geometry {
        ChartGeometry::Bars(g) => g
            .bars
            .iter()
            .find(|b| frame.rect(&b.rect).contains(pointer))
            .map(|b| format!("{}: {}", b.label, b.value)),
        ChartGeometry::Box(g) => g.boxes.iter().find(|b| frame.rect(&b.rect).contains(pointer)).map(|b| {
            format!(
                "{} (n={})\nmin {}\nQ1 {}\nmedian {}\nQ3 {}\nmax {}",
                b.label, b.count, b.stats.min, b.stats.q1, b.stats.median, b.stats.q3, b.stats.max
            )
        }),
        ChartGeometry::Heatmap(g) => g
            .cells
            .iter()
            .find(|c| frame.rect(&c.rect).contains(pointer))
            .map(|c| format!("{} × {}: {}", g.data.columns[c.row], g.data.columns[c.col], c.label)),
        _ => None,
    }
}

fn segment(painter: &Painter, frame: &Frame, s: &Segment, stroke: Stroke) {
    painter.line_segment([frame.pos(s.from), frame.pos(s.to)], stroke);
}

/// Fill the area between consecutive points and a baseline with convex quads
fn fill_to_baseline(painter: &Painter, frame: &Frame, points: &[Point], baseline: f64, color: Color32) {
    for pair in points.windows(2) {
        painter.add(Shape::convex_polygon(
            vec![
                frame.pos(pair[0]),
                frame.pos(pair[1]),
                frame.xy(pair[1].x, baseline),
                frame.xy(pair[0].x, baseline),
            ],
            color,
            Stroke::NONE,
        ));
    }
}

fn polyline(painter: &Painter, frame: &Frame, points: &[Point], stroke: Stroke) {
    painter.add(Shape::line(points.iter().map(|p| frame.pos(*p)).collect(), stroke));
}

fn axes(painter: &Painter, frame: &Frame, axes: &Axes, canvas: &Canvas) {
    let stroke = Stroke::new(1.0, AXIS);
    let font = FontId::proportional(11.0);
    let (left, right, top, bottom) = (canvas.left(), canvas.right(), canvas.top(), canvas.bottom());

    painter.line_segment([frame.xy(left, bottom), frame.xy(right, bottom)], stroke);
    painter.line_segment([frame.xy(left, bottom), frame.xy(left, top)], stroke);

    for tick in &axes.x_ticks {
        painter.text(frame.xy(tick.position, bottom + 6.0), Align2::CENTER_TOP, &tick.label, font.clone(), LABEL);
    }
    for tick in &axes.y_ticks {
        painter.text(frame.xy(left - 6.0, tick.position), Align2::RIGHT_CENTER, &tick.label, font.clone(), LABEL);
    }

    painter.text(
        frame.xy((left + right) / 2.0, canvas.height - 12.0),
        Align2::CENTER_CENTER,
        &axes.x_label,
        font.clone(),
        LABEL,
    );
    painter.text(frame.xy(6.0, top - 20.0), Align2::LEFT_CENTER, &axes.y_label, font, LABEL);
}

fn bars(painter: &Painter, frame: &Frame, g: &BarGeometry) {
    for bar in &g.bars {
        painter.rect_filled(frame.rect(&bar.rect), 0.0, bar.color);
    }
}

fn line(painter: &Painter, frame: &Frame, g: &LineGeometry) {
    let color = categorical_color(0);
    if g.area_path.is_some() {
        fill_to_baseline(painter, frame, &g.points, g.baseline, with_opacity(color, 0.3));
    }
    polyline(painter, frame, &g.points, Stroke::new(2.0, color));
}

fn scatter(painter: &Painter, frame: &Frame, g: &ScatterGeometry) {
    let fill = with_opacity(g.color, 0.7);
    for p in &g.points {
        painter.circle_filled(frame.pos(*p), frame.len(g.radius), fill);
    }
}

fn box_plot(painter: &Painter, frame: &Frame, g: &BoxGeometry) {
    let outline = Stroke::new(1.0, LABEL);
    for b in &g.boxes {
        segment(painter, frame, &b.whisker, outline);
        for cap in &b.caps {
            segment(painter, frame, cap, outline);
        }
        let rect = frame.rect(&b.rect);
        painter.rect_filled(rect, 0.0, with_opacity(b.color, 0.7));
        painter.rect_stroke(rect, 0.0, outline);
        segment(painter, frame, &b.median, Stroke::new(2.0, Color32::WHITE));
    }
}

fn violin(painter: &Painter, frame: &Frame, g: &ViolinGeometry) {
    for v in &g.violins {
        let fill = with_opacity(v.color, 0.6);
        let bins = v.outline.len() / 2;
        // right edge runs bottom-up, the left edge mirrors it top-down
        for k in 0..bins.saturating_sub(1) {
            let quad = [v.outline[k], v.outline[k + 1], v.outline[2 * bins - 2 - k], v.outline[2 * bins - 1 - k]];
            painter.add(Shape::convex_polygon(quad.iter().map(|p| frame.pos(*p)).collect(), fill, Stroke::NONE));
        }
        painter.add(Shape::closed_line(
            v.outline.iter().map(|p| frame.pos(*p)).collect(),
            Stroke::new(1.5, v.color),
        ));
    }
}

fn density(painter: &Painter, frame: &Frame, g: &DensityGeometry) {
    fill_to_baseline(painter, frame, &g.points, g.baseline, with_opacity(g.color, 0.3));
    polyline(painter, frame, &g.points, Stroke::new(2.0, g.color));
}

fn ridgeline(painter: &Painter, frame: &Frame, g: &RidgelineGeometry) {
    for layer in &g.layers {
        fill_to_baseline(painter, frame, &layer.points, layer.baseline, with_opacity(layer.color, 0.7));
        polyline(painter, frame, &layer.points, Stroke::new(1.5, layer.color));
    }
}

fn heatmap(painter: &Painter, frame: &Frame, g: &HeatmapGeometry) {
    let font = FontId::proportional(11.0);
    for cell in &g.cells {
        let rect = frame.rect(&cell.rect);
        painter.rect_filled(rect, 0.0, with_opacity(cell.color, cell.opacity));
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::WHITE));
        let text = if cell.opacity > 0.5 { Color32::WHITE } else { LABEL };
        painter.text(rect.center(), Align2::CENTER_CENTER, &cell.label, font.clone(), text);
    }
    for tick in &g.axes.x_ticks {
        painter.text(
            frame.xy(tick.position, g.cells.first().map(|c| c.rect.y).unwrap_or_default() - 6.0),
            Align2::CENTER_BOTTOM,
            &tick.label,
            font.clone(),
            LABEL,
        );
    }
    for tick in &g.axes.y_ticks {
        painter.text(
            frame.xy(g.cells.first().map(|c| c.rect.x).unwrap_or_default() - 6.0, tick.position),
            Align2::RIGHT_CENTER,
            &tick.label,
            font.clone(),
            LABEL,
        );
    }
}
