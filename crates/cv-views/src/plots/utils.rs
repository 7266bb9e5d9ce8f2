//! Utilities for plot geometry

pub mod colors;
pub mod scale;
pub mod stats;

// Re-export commonly used items
pub use colors::{categorical_color, correlation_fill, to_hex};
pub use scale::{area_path, format_value, polygon_path, polyline_path, scale, ticks};
pub use stats::{correlation_matrix, five_number, pearson, pseudo_kde, pseudo_kde_in_range, DensityCurve, DensityPoint, FiveNumber};
