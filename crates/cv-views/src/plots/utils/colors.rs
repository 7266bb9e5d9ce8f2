//! Color utilities for plots

use egui::Color32;

/// Fill for positive correlations
pub const POSITIVE: Color32 = Color32::from_rgb(59, 130, 246);

/// Fill for negative correlations
pub const NEGATIVE: Color32 = Color32::from_rgb(239, 68, 68);

pub const AXIS: Color32 = Color32::from_rgb(148, 163, 184);
pub const LABEL: Color32 = Color32::from_rgb(71, 85, 105);

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Color32 {
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(99, 102, 241),   // Indigo
        Color32::from_rgb(236, 72, 153),   // Pink
        Color32::from_rgb(20, 184, 166),   // Teal
        Color32::from_rgb(245, 158, 11),   // Amber
        Color32::from_rgb(139, 92, 246),   // Violet
        Color32::from_rgb(34, 197, 94),    // Green
        Color32::from_rgb(14, 165, 233),   // Sky
        Color32::from_rgb(239, 68, 68),    // Red
    ];
    PALETTE[index % PALETTE.len()]
}

/// Hue and opacity of a correlation cell: hue by sign, opacity by magnitude
pub fn correlation_fill(value: f64) -> (Color32, f64) {
    let color = if value >= 0.0 { POSITIVE } else { NEGATIVE };
    (color, value.abs().min(1.0))
}

/// `#rrggbb`
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(categorical_color(0), categorical_color(8));
        assert_ne!(categorical_color(0), categorical_color(1));
    }

    #[test]
    fn test_correlation_fill() {
        assert_eq!(correlation_fill(0.25), (POSITIVE, 0.25));
        assert_eq!(correlation_fill(-0.8), (NEGATIVE, 0.8));
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(POSITIVE), "#3b82f6");
        assert_eq!(to_hex(NEGATIVE), "#ef4444");
    }
}
