//! Chart export functionality

use crate::config::Canvas;
use crate::engine::ChartOutcome;
use crate::svg::{render_placeholder_svg, render_svg};

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    /// The serialized geometry
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Svg, ExportFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }

    pub fn filter_name(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "SVG Vector Graphics",
            ExportFormat::Json => "Chart Geometry (JSON)",
        }
    }
}

/// Serialize a render outcome; placeholders export as the message canvas
pub fn export(outcome: &ChartOutcome, format: ExportFormat, canvas: &Canvas) -> serde_json::Result<String> {
    match (format, outcome) {
        (ExportFormat::Svg, ChartOutcome::Ready(geometry)) => Ok(render_svg(geometry, canvas)),
        (ExportFormat::Svg, ChartOutcome::InsufficientData { reason, .. }) => {
            Ok(render_placeholder_svg(reason, canvas))
        }
        (ExportFormat::Json, outcome) => serde_json::to_string_pretty(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::ChartType;

    #[test]
    fn test_insufficient_exports() {
        let outcome = ChartOutcome::InsufficientData {
            chart_type: ChartType::Scatter,
            reason: "Scatter Plot needs 2 numeric columns".to_string(),
        };
        let canvas = Canvas::default();

        let svg = export(&outcome, ExportFormat::Svg, &canvas).unwrap();
        assert!(svg.contains("Scatter Plot needs 2 numeric columns"));

        let json: serde_json::Value = serde_json::from_str(&export(&outcome, ExportFormat::Json, &canvas).unwrap()).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["chart_type"], "scatter");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Svg.extension(), "svg");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
